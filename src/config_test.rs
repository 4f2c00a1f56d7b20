#![allow(clippy::float_cmp)]

use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
    move |key| map.get(key).cloned()
}

fn required_only() -> Vec<(&'static str, &'static str)> {
    vec![
        ("DATABASE_URL", "postgres://u:p@localhost/corkboard"),
        ("STORAGE_URL", "https://store.example/"),
        ("STORAGE_KEY", "service-key"),
    ]
}

#[test]
fn defaults_apply_when_optional_vars_absent() {
    let config = Config::from_lookup(lookup_from(&required_only())).unwrap();
    assert_eq!(config.storage.bucket, "files");
    assert_eq!(config.viewport_width, 1280.0);
    assert_eq!(config.viewport_height, 800.0);
    assert_eq!(config.notice_ttl, Duration::from_millis(4000));
}

#[test]
fn storage_url_trailing_slash_is_trimmed() {
    let config = Config::from_lookup(lookup_from(&required_only())).unwrap();
    assert_eq!(config.storage.url, "https://store.example");
}

#[test]
fn missing_database_url_is_an_error() {
    let pairs: Vec<_> = required_only().into_iter().filter(|(k, _)| *k != "DATABASE_URL").collect();
    assert_eq!(Config::from_lookup(lookup_from(&pairs)), Err(ConfigError::Missing("DATABASE_URL")));
}

#[test]
fn empty_storage_key_counts_as_missing() {
    let mut pairs = required_only();
    pairs.retain(|(k, _)| *k != "STORAGE_KEY");
    pairs.push(("STORAGE_KEY", ""));
    assert_eq!(Config::from_lookup(lookup_from(&pairs)), Err(ConfigError::Missing("STORAGE_KEY")));
}

#[test]
fn optional_overrides_are_parsed() {
    let mut pairs = required_only();
    pairs.extend([
        ("STORAGE_BUCKET", "uploads"),
        ("VIEWPORT_WIDTH", "800"),
        ("VIEWPORT_HEIGHT", " 600 "),
        ("NOTICE_TTL_MS", "250"),
    ]);
    let config = Config::from_lookup(lookup_from(&pairs)).unwrap();
    assert_eq!(config.storage.bucket, "uploads");
    assert_eq!(config.viewport_width, 800.0);
    assert_eq!(config.viewport_height, 600.0);
    assert_eq!(config.notice_ttl, Duration::from_millis(250));
}

#[test]
fn unparseable_optional_falls_back() {
    let mut pairs = required_only();
    pairs.extend([("VIEWPORT_WIDTH", "wide"), ("NOTICE_TTL_MS", "-5")]);
    let config = Config::from_lookup(lookup_from(&pairs)).unwrap();
    assert_eq!(config.viewport_width, 1280.0);
    assert_eq!(config.notice_ttl, Duration::from_millis(4000));
}
