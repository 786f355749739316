//! Push message and delivery models.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::Result;
use crate::programs::ProgramRecord;
use crate::push::{PushHeaders, VapidError};

/// Notification shown by the service worker: `{ title, body, url }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
    pub url: String,
}

impl NotificationPayload {
    /// Summarizes `programs` as "N new program(s) added: a, b, ...".
    pub fn for_new_programs(title: &str, programs: &[ProgramRecord], url: &str) -> Self {
        let names = programs
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            title: title.to_string(),
            body: format!("{} new program(s) added: {}", programs.len(), names),
            url: url.to_string(),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// One outbound request to a push endpoint.
#[derive(Debug, Clone)]
pub struct PushMessage {
    pub endpoint: String,
    pub headers: PushHeaders,
    /// Opaque payload, shared by every message of a cycle.
    pub body: Arc<[u8]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushResponse {
    pub status: u16,
}

impl PushResponse {
    pub fn new(status: u16) -> Self {
        Self { status }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Why a single subscriber did not receive the notification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("signing failed: {0}")]
    Signing(#[from] VapidError),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("push service responded with {status}")]
    Rejected { status: u16 },

    #[error("no response within {0:?}")]
    TimedOut(Duration),
}

impl DeliveryError {
    /// The push service says the subscription no longer exists.
    pub fn is_gone(&self) -> bool {
        matches!(self, DeliveryError::Rejected { status: 404 | 410 })
    }
}

pub type DeliveryResult<T> = std::result::Result<T, DeliveryError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryFailure {
    pub endpoint: String,
    pub error: DeliveryError,
}

/// Outcome of one fan-out. Failures are listed in subscription order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub attempted: usize,
    pub delivered: usize,
    pub failures: Vec<DeliveryFailure>,
}

impl DeliveryReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Endpoints whose push service answered 404 or 410.
    pub fn gone_endpoints(&self) -> Vec<&str> {
        self.failures
            .iter()
            .filter(|f| f.error.is_gone())
            .map(|f| f.endpoint.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_summarizes_count_and_names() {
        let programs = vec![
            ProgramRecord::new("a", "Sprig", 10),
            ProgramRecord::new("b", "Boba Drops", 3),
        ];

        let payload =
            NotificationPayload::for_new_programs("New!", &programs, "https://tracker.example");

        assert_eq!(payload.title, "New!");
        assert_eq!(payload.body, "2 new program(s) added: Sprig, Boba Drops");
        assert_eq!(payload.url, "https://tracker.example");

        let json: serde_json::Value = serde_json::from_slice(&payload.to_bytes().unwrap()).unwrap();
        assert_eq!(json["body"], "2 new program(s) added: Sprig, Boba Drops");
    }

    #[test]
    fn only_404_and_410_count_as_gone() {
        assert!(DeliveryError::Rejected { status: 404 }.is_gone());
        assert!(DeliveryError::Rejected { status: 410 }.is_gone());
        assert!(!DeliveryError::Rejected { status: 429 }.is_gone());
        assert!(!DeliveryError::Transport("reset".into()).is_gone());
    }

    #[test]
    fn success_is_any_2xx() {
        assert!(PushResponse::new(201).is_success());
        assert!(!PushResponse::new(301).is_success());
        assert!(!PushResponse::new(500).is_success());
    }
}
