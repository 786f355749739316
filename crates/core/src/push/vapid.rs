//! VAPID (RFC 8292) token signing.
//!
//! A push service authenticates the sender by checking an ES256 JWT whose
//! audience is the origin of the push endpoint. The token and the sender's
//! public key travel together in the `Authorization: vapid t=..., k=...` header.

use std::collections::BTreeMap;
use std::fmt;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::constants::VAPID_TOKEN_TTL_SECS;

/// Header name to value map that callers merge into the outbound push request.
pub type PushHeaders = BTreeMap<String, String>;

/// Uncompressed SEC1 point: 0x04 || X || Y.
const PUBLIC_KEY_LEN: usize = 65;
const PRIVATE_KEY_LEN: usize = 32;

// PKCS#8 v1 wrapper for a P-256 ECPrivateKey, up to and including the
// OCTET STRING header of the private scalar.
const PKCS8_P256_PREFIX: [u8; 36] = [
    0x30, 0x81, 0x87, 0x02, 0x01, 0x00, 0x30, 0x13, 0x06, 0x07, 0x2a, 0x86, 0x48, 0xce, 0x3d,
    0x02, 0x01, 0x06, 0x08, 0x2a, 0x86, 0x48, 0xce, 0x3d, 0x03, 0x01, 0x07, 0x04, 0x6d, 0x30,
    0x6b, 0x02, 0x01, 0x01, 0x04, 0x20,
];

// [1] publicKey BIT STRING header that precedes the 65-byte point.
const PKCS8_P256_PUBLIC_KEY_TAG: [u8; 5] = [0xa1, 0x44, 0x03, 0x42, 0x00];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VapidError {
    #[error("Invalid VAPID key: {0}")]
    InvalidKey(String),

    #[error("Invalid VAPID subject: {0}")]
    InvalidSubject(String),

    #[error("Invalid push audience: {0}")]
    InvalidAudience(String),

    #[error("VAPID expiration {0} is not in the future")]
    Expired(u64),

    #[error("Failed to sign VAPID token: {0}")]
    Signing(String),
}

/// The process-wide VAPID keypair.
#[derive(Clone)]
pub struct VapidKeys {
    public_key: Vec<u8>,
    encoding_key: EncodingKey,
}

impl fmt::Debug for VapidKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VapidKeys")
            .field("public_key", &self.public_key_base64url())
            .finish_non_exhaustive()
    }
}

impl VapidKeys {
    /// Builds the keypair from a 65-byte uncompressed public point and a
    /// 32-byte private scalar.
    pub fn from_raw(public_key: &[u8], private_key: &[u8]) -> Result<Self, VapidError> {
        if public_key.len() != PUBLIC_KEY_LEN || public_key[0] != 0x04 {
            return Err(VapidError::InvalidKey(format!(
                "public key must be a {PUBLIC_KEY_LEN}-byte uncompressed P-256 point, got {} bytes",
                public_key.len()
            )));
        }
        if private_key.len() != PRIVATE_KEY_LEN {
            return Err(VapidError::InvalidKey(format!(
                "private key must be {PRIVATE_KEY_LEN} bytes, got {}",
                private_key.len()
            )));
        }

        let mut der = Vec::with_capacity(
            PKCS8_P256_PREFIX.len() + PRIVATE_KEY_LEN + PKCS8_P256_PUBLIC_KEY_TAG.len() + PUBLIC_KEY_LEN,
        );
        der.extend_from_slice(&PKCS8_P256_PREFIX);
        der.extend_from_slice(private_key);
        der.extend_from_slice(&PKCS8_P256_PUBLIC_KEY_TAG);
        der.extend_from_slice(public_key);

        Ok(Self {
            public_key: public_key.to_vec(),
            encoding_key: EncodingKey::from_ec_der(&der),
        })
    }

    /// Builds the keypair from base64url strings (the format web-push tooling
    /// prints). Standard base64 and padding are tolerated.
    pub fn from_base64(public_key: &str, private_key: &str) -> Result<Self, VapidError> {
        let public = decode_key("public", public_key)?;
        let private = decode_key("private", private_key)?;
        Self::from_raw(&public, &private)
    }

    pub fn public_key_bytes(&self) -> &[u8] {
        &self.public_key
    }

    /// The public key as sent in the `k=` parameter and handed to browsers as
    /// `applicationServerKey`.
    pub fn public_key_base64url(&self) -> String {
        URL_SAFE_NO_PAD.encode(&self.public_key)
    }
}

fn decode_key(name: &str, raw: &str) -> Result<Vec<u8>, VapidError> {
    let normalized: String = raw
        .trim()
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();

    URL_SAFE_NO_PAD
        .decode(normalized)
        .map_err(|e| VapidError::InvalidKey(format!("{name} key is not valid base64: {e}")))
}

/// JWT claims of a VAPID token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VapidClaims {
    pub aud: String,
    pub exp: u64,
    pub sub: String,
}

/// Returns the `scheme://host[:port]` origin of a push endpoint.
pub fn audience_for_endpoint(endpoint: &str) -> Result<String, VapidError> {
    let url = Url::parse(endpoint)
        .map_err(|e| VapidError::InvalidAudience(format!("{endpoint}: {e}")))?;
    let origin = url.origin();
    if !origin.is_tuple() {
        return Err(VapidError::InvalidAudience(format!(
            "{endpoint} has no network origin"
        )));
    }
    Ok(origin.ascii_serialization())
}

/// Signs a VAPID token and returns the `Authorization` header for it.
pub fn create_vapid_headers(
    audience: &str,
    subject: &str,
    expiration: u64,
    keys: &VapidKeys,
) -> Result<PushHeaders, VapidError> {
    if audience.is_empty() {
        return Err(VapidError::InvalidAudience("audience is empty".into()));
    }
    let now = Utc::now().timestamp().max(0) as u64;
    if expiration <= now {
        return Err(VapidError::Expired(expiration));
    }

    let claims = VapidClaims {
        aud: audience.to_string(),
        exp: expiration,
        sub: subject.to_string(),
    };
    let token = encode(&Header::new(Algorithm::ES256), &claims, &keys.encoding_key)
        .map_err(|e| VapidError::Signing(e.to_string()))?;

    let mut headers = PushHeaders::new();
    headers.insert(
        "Authorization".to_string(),
        format!("vapid t={}, k={}", token, keys.public_key_base64url()),
    );
    Ok(headers)
}

/// Signs per-endpoint VAPID headers with a fixed keypair and contact subject.
#[derive(Debug, Clone)]
pub struct VapidSigner {
    keys: VapidKeys,
    subject: String,
    token_ttl_secs: i64,
}

impl VapidSigner {
    /// `subject` must be a `mailto:` or `https:` contact URI.
    pub fn new(keys: VapidKeys, subject: impl Into<String>) -> Result<Self, VapidError> {
        let subject = subject.into();
        if !(subject.starts_with("mailto:") || subject.starts_with("https:")) {
            return Err(VapidError::InvalidSubject(format!(
                "'{subject}' must start with mailto: or https:"
            )));
        }
        Ok(Self {
            keys,
            subject,
            token_ttl_secs: VAPID_TOKEN_TTL_SECS,
        })
    }

    /// Signs headers for `endpoint`, valid for 12 hours from now.
    pub fn sign_for_endpoint(&self, endpoint: &str) -> Result<PushHeaders, VapidError> {
        let audience = audience_for_endpoint(endpoint)?;
        let expiration = (Utc::now().timestamp() + self.token_ttl_secs).max(0) as u64;
        create_vapid_headers(&audience, &self.subject, expiration, &self.keys)
    }
}
