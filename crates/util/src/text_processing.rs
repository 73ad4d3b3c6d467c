//! # Text Processing Utilities
//!
//! Redaction of secret-looking values and truncation of text for log lines.
//! Remote error bodies can echo request content back, so anything derived from
//! a response passes through here before it is logged.

use once_cell::sync::Lazy;
use regex::Regex;

/// Replacement token for redacted values.
pub const REDACTED: &str = "[REDACTED]";

/// Redacts values that look like secrets in a string.
///
/// Key names are preserved so the output is still useful when debugging.
///
/// # Example
/// ```rust
/// use flowsync_util::redact_sensitive;
///
/// let redacted = redact_sensitive("N8N_ADMIN_PASSWORD=hunter2 PORT=5678");
/// assert_eq!(redacted, "N8N_ADMIN_PASSWORD=[REDACTED] PORT=5678");
///
/// let redacted = redact_sensitive("X-N8N-API-KEY: abc.def");
/// assert_eq!(redacted, "X-N8N-API-KEY: [REDACTED]");
/// ```
pub fn redact_sensitive(input: &str) -> String {
    let mut redacted = input.to_string();

    for pattern in redact_patterns().iter() {
        redacted = pattern
            .replace_all(&redacted, |captures: &regex::Captures| {
                let prefix = captures.get(1).map(|m| m.as_str()).unwrap_or("");
                let suffix = captures.get(3).map(|m| m.as_str()).unwrap_or("");
                format!("{prefix}{REDACTED}{suffix}")
            })
            .to_string();
    }

    redacted
}

/// Compiled redaction patterns.
///
/// Every pattern captures `(prefix)(value)` and optionally `(suffix)`; only the
/// value is replaced.
fn redact_patterns() -> &'static Vec<Regex> {
    static REDACT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
        [
            // Header lines
            r"(?i)((?:authorization|x-n8n-api-key|cookie|set-cookie):\s*)([^\r\n]+)()",
            // Shell or dotenv assignments
            r"(?i)(\b[A-Z0-9_]*(?:KEY|TOKEN|SECRET|PASSWORD)=)([^\s]+)()",
            // JSON entries
            r#"(?i)("(?:password|apiKey|api_key|token|secret|accessToken)"\s*:\s*")([^"]*)(")"#,
        ]
        .iter()
        .filter_map(|pattern| Regex::new(pattern).ok())
        .collect()
    });

    &REDACT_PATTERNS
}

/// Truncate text to at most `max_len` characters, appending `...` when cut.
pub fn truncate_for_summary(text: &str, max_len: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_len {
        return trimmed.to_string();
    }

    // Reserve space for the trailing ellipsis.
    let target_len = max_len.saturating_sub(3);
    let truncated: String = trimmed.chars().take(target_len).collect();
    format!("{}...", truncated.trim_end())
}

/// Redact and truncate a remote response body for inclusion in a log line.
pub fn summarize_response_body(body: &str, max_len: usize) -> String {
    let collapsed = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return "<empty>".to_string();
    }
    truncate_for_summary(&redact_sensitive(&collapsed), max_len)
}
