//! # HTTP Response Parsing
//!
//! Strict JSON parsing of response bodies, plus status-code hints for the
//! failures operators hit most often.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Return a remediation hint for common HTTP status codes.
///
/// # Example
/// ```rust
/// use flowsync_util::http::status_error_message;
///
/// assert!(status_error_message(401).unwrap().contains("Unauthorized"));
/// assert!(status_error_message(404).is_none());
/// ```
pub fn status_error_message(status_code: u16) -> Option<&'static str> {
    match status_code {
        401 => Some("Unauthorized (401). Hint: check the admin credentials or regenerate the API key"),
        403 => Some("Forbidden (403). Hint: the API key or user lacks permission for workflows"),
        _ => None,
    }
}

/// Parse HTTP response text into JSON, providing detailed errors on failure.
///
/// An empty body parses as `Value::Null`; some endpoints answer writes with no
/// content.
///
/// # Errors
/// Returns a [`JsonParseError`] carrying the status and up to 200 characters
/// of the body with whitespace collapsed.
pub fn parse_response_json_strict(text: &str, status: Option<StatusCode>) -> Result<Value, JsonParseError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str::<Value>(text).map_err(|error| {
        let status_note = status
            .map(|code| format!("status {code}"))
            .unwrap_or_else(|| "unknown status".to_string());
        let preview = truncate_response_preview(text, 200);

        JsonParseError::new(status_note, error, preview)
    })
}

fn truncate_response_preview(text: &str, limit: usize) -> String {
    let mut preview = String::new();
    for ch in text.chars() {
        if preview.len() >= limit {
            preview.push_str("...");
            break;
        }
        match ch {
            '\n' | '\r' | '\t' => {
                if !preview.ends_with(' ') {
                    preview.push(' ');
                }
            }
            _ => preview.push(ch),
        }
    }

    crate::redact_sensitive(preview.trim())
}

/// Error returned when strict JSON parsing of an HTTP response fails.
#[derive(Debug, Error)]
#[error("failed to parse JSON response ({status_note}): {source}. body preview: {body_preview}")]
pub struct JsonParseError {
    status_note: String,
    #[source]
    source: serde_json::Error,
    body_preview: String,
}

impl JsonParseError {
    pub fn new(status_note: String, source: serde_json::Error, body_preview: String) -> Self {
        Self {
            status_note,
            source,
            body_preview,
        }
    }

    /// Access the truncated response preview captured during parsing.
    pub fn body_preview(&self) -> &str {
        &self.body_preview
    }
}
