//! Backend error surface
//!
//! Error bodies arrive as `{"detail": ...}` where `detail` is a plain string,
//! a list of validation items with a `msg` field, or an arbitrary object.
//! The shape is decoded once, here, into a tagged variant; nothing downstream
//! sniffs JSON shapes.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Detail,
}

/// Decoded `detail` payload of a backend error response
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Detail {
    /// `{"detail": "message"}`
    Text(String),
    /// `{"detail": [{"msg": ...}, ...]}` (validation errors)
    Items(Vec<Value>),
    /// Anything else
    Other(Value),
}

impl Detail {
    /// Normalize into one display string
    pub fn message(&self) -> String {
        match self {
            Detail::Text(text) => text.clone(),
            Detail::Items(items) => items
                .iter()
                .map(|item| match item.get("msg").and_then(Value::as_str) {
                    Some(msg) => msg.to_string(),
                    None => item.to_string(),
                })
                .collect::<Vec<_>>()
                .join("; "),
            Detail::Other(value) => value.to_string(),
        }
    }
}

/// Normalize a non-2xx response body into one display string.
///
/// Bodies without a parseable `detail` fall back to the generic
/// `HTTP Error <status>` message.
pub fn surface_error(status: u16, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.detail.message(),
        Err(_) => format!("HTTP Error {status}"),
    }
}
