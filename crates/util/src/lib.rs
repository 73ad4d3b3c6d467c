//! Helpers shared by the flowsync API client and sync engine.

pub mod http;
pub mod text_processing;

pub use text_processing::{REDACTED, redact_sensitive, summarize_response_body, truncate_for_summary};
