use super::*;
use crate::services::PersistError;

fn offline() -> PersistError {
    PersistError::Connectivity("connection refused".into())
}

#[test]
fn raised_notice_is_visible_until_ttl() {
    let start = Instant::now();
    let mut notices = Notices::new(Duration::from_millis(4000));
    notices.raise("save item", &offline(), start);

    let shown = notices.current(start + Duration::from_millis(3999));
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].code, "E_CONNECTIVITY");
    assert_eq!(shown[0].text, "Could not save item: backend unreachable: connection refused");

    assert!(notices.current(start + Duration::from_millis(4000)).is_empty());
}

#[test]
fn notices_expire_independently() {
    let start = Instant::now();
    let mut notices = Notices::new(Duration::from_secs(4));
    notices.raise("save item", &offline(), start);
    notices.raise("delete item", &PersistError::NotFound(uuid::Uuid::nil()), start + Duration::from_secs(2));

    let shown = notices.current(start + Duration::from_secs(5));
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].code, "E_NOT_FOUND");
}

#[test]
fn notice_serializes_code_and_text_only() {
    let start = Instant::now();
    let mut notices = Notices::new(Duration::from_secs(1));
    notices.raise("upload file", &PersistError::Validation("status 413: too large".into()), start);
    let json = serde_json::to_value(&notices.current(start)[0]).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"code": "E_VALIDATION", "text": "Could not upload file: rejected by backend: status 413: too large"})
    );
}
