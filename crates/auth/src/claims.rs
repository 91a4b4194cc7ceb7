use base64::Engine;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Claims carried in the payload segment of a bearer token.
///
/// Only `exp` matters to the client; the signature is never checked here,
/// the backend remains the authority on token validity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Expiration, seconds since the Unix epoch.
    #[serde(default)]
    pub exp: Option<f64>,

    /// Issued-at, seconds since the Unix epoch.
    #[serde(default)]
    pub iat: Option<f64>,

    #[serde(default)]
    pub sub: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenClaims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let exp_ms = self.exp? * 1000.0;
        if !exp_ms.is_finite() {
            return None;
        }
        DateTime::from_timestamp_millis(exp_ms as i64)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenDecodeError {
    #[error("token must have three dot-separated segments, found {0}")]
    SegmentCount(usize),

    #[error("token payload is not valid base64")]
    Base64,

    #[error("token payload is not a JSON object: {0}")]
    Json(String),
}

/// Decode the payload (second) segment of a `header.payload.signature` token.
pub fn decode_claims(token: &str) -> Result<TokenClaims, TokenDecodeError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(TokenDecodeError::SegmentCount(segments.len()));
    }

    let payload = segments[1].trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| STANDARD_NO_PAD.decode(payload))
        .map_err(|_| TokenDecodeError::Base64)?;

    serde_json::from_slice(&bytes).map_err(|e| TokenDecodeError::Json(e.to_string()))
}

/// Fail-closed expiry check.
///
/// A token is expired when it is absent, cannot be decoded, carries no `exp`
/// claim, or its `exp` (in milliseconds) is at or before `now`.
pub fn is_token_expired(token: Option<&str>, now: DateTime<Utc>) -> bool {
    let Some(token) = token else {
        return true;
    };

    let claims = match decode_claims(token) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::debug!(error = %err, "treating undecodable token as expired");
            return true;
        }
    };

    match claims.exp {
        Some(exp) if exp.is_finite() => now.timestamp_millis() as f64 >= exp * 1000.0,
        _ => true,
    }
}
