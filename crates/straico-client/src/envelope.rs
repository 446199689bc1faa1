//! Response decoding and the service's `success`/`data` envelope

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, StraicoError};

/// Maximum number of body characters carried by a decode error
const MAX_EXCERPT_CHARS: usize = 500;

/// Outer wrapper the service puts around most responses
#[derive(Debug, Deserialize)]
struct EnvelopeHeader {
    success: bool,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

/// Classified response body
#[derive(Debug, PartialEq, Eq)]
pub enum Envelope {
    /// `success: true`, with the nested payload if one was sent
    Success { data: Option<Value> },
    /// `success: false`, with the best available description
    Failure { message: String },
    /// Body does not use the envelope
    Unwrapped,
}

impl Envelope {
    /// Classify a decoded body against the envelope shape
    pub fn classify(body: &Value) -> Self {
        let Ok(header) = EnvelopeHeader::deserialize(body) else {
            return Self::Unwrapped;
        };

        if header.success {
            return Self::Success { data: header.data };
        }

        let message = header
            .message
            .or(header.error)
            .map_or_else(|| body.to_string(), describe);

        Self::Failure { message }
    }
}

/// Decode a raw body and apply the envelope policy
pub fn decode(status: u16, raw: &str) -> Result<Value> {
    let body: Value = serde_json::from_str(raw).map_err(|source| StraicoError::Decode {
        status,
        excerpt: excerpt(raw),
        source,
    })?;

    match Envelope::classify(&body) {
        Envelope::Success { data: Some(data) } => Ok(data),
        Envelope::Success { data: None } => Ok(body),
        Envelope::Failure { message } => {
            tracing::error!(status, message = %message, "Straico API reported failure");
            Err(StraicoError::Api { status, message })
        }
        Envelope::Unwrapped => {
            tracing::warn!(status, "unexpected Straico API response structure, passing through");
            Ok(body)
        }
    }
}

/// Render a `message`/`error` field as text
fn describe(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Truncate a raw body for inclusion in an error
fn excerpt(raw: &str) -> String {
    raw.char_indices()
        .nth(MAX_EXCERPT_CHARS)
        .map_or_else(|| raw.to_owned(), |(cut, _)| format!("{}...", &raw[..cut]))
}
