//! Correlation token codec.
//!
//! The token is an opaque payload handed to the external provider at
//! initiation time and returned verbatim with the asynchronous callback.
//! It lets the callback verifier re-identify the local payment intent and
//! prove the callback originates from a flow signed with the current
//! webhook secret. The wire form is compact JSON so decode can tell
//! "malformed" apart from "valid but stale".

use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};

/// Decode failure for inbound correlation tokens
///
/// Malformed input must fail loudly; the codec never silently defaults and
/// never panics across the verifier boundary.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed correlation token: {0}")]
    Malformed(String),
}

/// Opaque payload round-tripped through the payment provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelationToken {
    /// Local payment intent id
    pub payment_id: String,

    /// Fingerprint of the webhook secret that was live when the outbound
    /// request was signed. Never the secret itself: the token transits a
    /// third party.
    pub secret_fingerprint: String,
}

impl CorrelationToken {
    pub fn new(payment_id: impl Into<String>, secret_fingerprint: impl Into<String>) -> Self {
        Self {
            payment_id: payment_id.into(),
            secret_fingerprint: secret_fingerprint.into(),
        }
    }

    /// Serializes the token to its compact JSON wire form
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| AppError::internal(format!("Failed to encode correlation token: {}", e)))
    }

    /// Parses a token from its wire form
    ///
    /// Truncated, garbled, or wrong-shape input yields `Malformed`; empty
    /// field values are rejected the same way rather than flowing onward
    /// as a valid-looking tuple.
    pub fn decode(raw: &str) -> std::result::Result<Self, DecodeError> {
        let token: CorrelationToken = serde_json::from_str(raw)
            .map_err(|e| DecodeError::Malformed(e.to_string()))?;

        if token.payment_id.is_empty() {
            return Err(DecodeError::Malformed("empty payment_id".to_string()));
        }
        if token.secret_fingerprint.is_empty() {
            return Err(DecodeError::Malformed(
                "empty secret_fingerprint".to_string(),
            ));
        }

        Ok(token)
    }
}
