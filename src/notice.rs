//! Transient user-facing notices for failed background work.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::services::ErrorCode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub code: &'static str,
    pub text: String,
    #[serde(skip)]
    expires_at: Instant,
}

/// Notices that expire a fixed time after they were raised.
#[derive(Debug)]
pub struct Notices {
    ttl: Duration,
    active: Vec<Notice>,
}

impl Notices {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, active: Vec::new() }
    }

    /// Raise a notice for a failed operation, e.g. `"save item"`.
    pub fn raise(&mut self, op: &str, err: &impl ErrorCode, now: Instant) {
        self.active.push(Notice { code: err.error_code(), text: format!("Could not {op}: {err}"), expires_at: now + self.ttl });
    }

    /// Drop expired notices and return what is still showing, oldest first.
    pub fn current(&mut self, now: Instant) -> &[Notice] {
        self.active.retain(|n| n.expires_at > now);
        &self.active
    }
}

#[cfg(test)]
#[path = "notice_test.rs"]
mod tests;
