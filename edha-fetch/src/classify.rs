//! Response classification.
//!
//! Decides between structured and text payloads from the declared content
//! type, and turns failure statuses into a message a person can read.

use serde_json::Value;
use tracing::debug;

use crate::client::RawResponse;
use crate::error::FetchError;

static NULL: Value = Value::Null;

/// Decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// JSON body. Unparseable JSON becomes `Value::Null`.
    Json(Value),
    /// Any other body, as (lossy) UTF-8 text.
    Text(String),
}

impl Payload {
    /// Returns the JSON value, or `Null` for text payloads.
    pub fn json(&self) -> &Value {
        match self {
            Self::Json(value) => value,
            Self::Text(_) => &NULL,
        }
    }

    /// Consumes the payload, returning the JSON value or `Null`.
    pub fn into_json(self) -> Value {
        match self {
            Self::Json(value) => value,
            Self::Text(_) => Value::Null,
        }
    }
}

/// Decodes a response and fails on non-success statuses.
///
/// The failure message is, in order: a string `error` field, a string
/// `message` field, or `HTTP <status>`.
pub fn classify(raw: &RawResponse) -> Result<Payload, FetchError> {
    let payload = decode(raw);

    if raw.is_success() {
        return Ok(payload);
    }

    let status = raw.status.as_u16();
    let message = error_message(&payload).unwrap_or_else(|| format!("HTTP {status}"));
    debug!(status, message = %message, "Failure response");
    Err(FetchError::Status { status, message })
}

/// Decodes the body according to the content type.
pub fn decode(raw: &RawResponse) -> Payload {
    if raw.is_json() {
        let value = serde_json::from_slice(&raw.body).unwrap_or_else(|e| {
            debug!(error = %e, "JSON body did not parse, using null");
            Value::Null
        });
        Payload::Json(value)
    } else {
        Payload::Text(String::from_utf8_lossy(&raw.body).into_owned())
    }
}

/// Extracts `error` or `message` from a structured body.
///
/// Empty strings are ignored.
pub fn error_message(payload: &Payload) -> Option<String> {
    let body = payload.json();
    ["error", "message"].iter().find_map(|key| {
        body.get(*key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}
