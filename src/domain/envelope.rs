//! Uniform error payload shared by every brokerage call site.
//!
//! Transport failures are turned into this shape instead of an `Err`, so batch
//! and reporting flows branch on payload shape rather than on exceptions.
//! Server-reported error bodies use the same layout and are passed through
//! untouched.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub const CLIENT_ERROR_TYPE: &str = "client_error";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub attr: Option<String>,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(rename = "type")]
    pub kind: String,
    pub errors: Vec<ErrorDetail>,
}

impl ErrorEnvelope {
    pub fn client_error(detail: impl Into<String>) -> Self {
        Self {
            kind: CLIENT_ERROR_TYPE.to_string(),
            errors: vec![ErrorDetail {
                attr: None,
                detail: detail.into(),
            }],
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.kind == CLIENT_ERROR_TYPE
    }

    pub fn into_value(self) -> Value {
        serde_json::to_value(&self).unwrap_or_else(|_| {
            serde_json::json!({ "type": self.kind, "errors": [] })
        })
    }
}

impl fmt::Display for ErrorEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let details: Vec<&str> = self.errors.iter().map(|e| e.detail.as_str()).collect();
        write!(f, "{}: {}", self.kind, details.join("; "))
    }
}

/// Returns the envelope when `payload` is a locally generated transport failure.
pub fn client_error_of(payload: &Value) -> Option<ErrorEnvelope> {
    if payload.get("type").and_then(Value::as_str) != Some(CLIENT_ERROR_TYPE) {
        return None;
    }
    serde_json::from_value(payload.clone()).ok()
}

/// Returns the envelope for any payload shaped like `{type, errors: [...]}`,
/// including error bodies reported by the server.
pub fn error_envelope_of(payload: &Value) -> Option<ErrorEnvelope> {
    if payload.get("type").is_none() || payload.get("errors").is_none() {
        return None;
    }
    serde_json::from_value(payload.clone()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_error_shape() {
        let value = ErrorEnvelope::client_error("Request error: connection refused").into_value();

        assert_eq!(value["type"], "client_error");
        assert_eq!(value["errors"][0]["attr"], Value::Null);
        assert_eq!(
            value["errors"][0]["detail"],
            "Request error: connection refused"
        );
    }

    #[test]
    fn test_into_value_matches_wire_layout() {
        let envelope = ErrorEnvelope::client_error("Request error: timed out");
        let value = envelope.clone().into_value();

        assert_eq!(
            value,
            json!({
                "type": "client_error",
                "errors": [{ "attr": null, "detail": "Request error: timed out" }]
            })
        );
        assert_eq!(client_error_of(&value), Some(envelope));
    }

    #[test]
    fn test_client_error_of_ignores_regular_payloads() {
        assert!(client_error_of(&json!({ "results": [] })).is_none());
        assert!(client_error_of(&json!({ "type": "validation_error", "errors": [] })).is_none());
    }

    #[test]
    fn test_server_error_body_is_recognised() {
        let body = json!({
            "type": "validation_error",
            "errors": [{ "attr": "symbol", "detail": "Invalid symbol." }]
        });

        let envelope = error_envelope_of(&body).unwrap();
        assert!(!envelope.is_client_error());
        assert_eq!(envelope.errors[0].attr.as_deref(), Some("symbol"));
    }
}
