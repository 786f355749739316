//! Push subscription models.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::{Error, Result};

/// A browser push subscription, in the shape of `PushSubscription.toJSON()`.
///
/// Identity is the `endpoint`; fields the browser adds beyond these
/// (e.g. `expirationTime`) are dropped on deserialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PushSubscription {
    pub endpoint: String,
    pub keys: SubscriptionKeys,
}

/// Client keys used by the push service to encrypt payloads for the browser.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubscriptionKeys {
    pub p256dh: String,
    pub auth: String,
}

impl PushSubscription {
    pub fn new(
        endpoint: impl Into<String>,
        p256dh: impl Into<String>,
        auth: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            keys: SubscriptionKeys {
                p256dh: p256dh.into(),
                auth: auth.into(),
            },
        }
    }

    /// Checks that the endpoint is an absolute http(s) URL and that both keys
    /// are non-empty base64url strings.
    pub fn validate(&self) -> Result<()> {
        validate_endpoint(&self.endpoint)?;
        validate_key("p256dh", &self.keys.p256dh)?;
        validate_key("auth", &self.keys.auth)?;
        Ok(())
    }
}

fn validate_endpoint(endpoint: &str) -> Result<Url> {
    if endpoint.trim().is_empty() {
        return Err(Error::Validation("Subscription endpoint is required".into()));
    }

    let url = Url::parse(endpoint)
        .map_err(|e| Error::Validation(format!("Invalid subscription endpoint: {e}")))?;

    if !matches!(url.scheme(), "https" | "http") || url.host_str().is_none() {
        return Err(Error::Validation(format!(
            "Subscription endpoint must be an http(s) URL, got '{}'",
            url.scheme()
        )));
    }

    Ok(url)
}

fn validate_key(name: &str, value: &str) -> Result<()> {
    let trimmed = value.trim().trim_end_matches('=');
    if trimmed.is_empty() {
        return Err(Error::Validation(format!(
            "Subscription key '{name}' is required"
        )));
    }

    URL_SAFE_NO_PAD
        .decode(trimmed)
        .map_err(|e| Error::Validation(format!("Subscription key '{name}' is not base64url: {e}")))?;
    Ok(())
}
