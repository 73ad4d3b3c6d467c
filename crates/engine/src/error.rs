use flowsync_api::{ApiError, SessionError};
use flowsync_util::http::status_error_message;
use thiserror::Error;

/// Conditions that end a run before any file is processed.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("cannot connect to {base_url}: {source}")]
    Unreachable {
        base_url: String,
        #[source]
        source: ApiError,
    },
}

impl SyncError {
    /// Steps an operator can take to fix the condition.
    pub fn remediation(&self) -> Vec<String> {
        match self {
            Self::Session(SessionError::NoCredentials {
                secret_file,
                api_key_file,
            }) => vec![
                "Please either:".to_string(),
                format!("  1. Ensure {secret_file} contains N8N_ADMIN_EMAIL and N8N_ADMIN_PASSWORD"),
                format!("  2. Or generate an API key in Settings > API and save it to {api_key_file}"),
            ],
            Self::Session(SessionError::Api(_)) => vec!["Check the API key file contents and TLS setup.".to_string()],
            Self::Unreachable { base_url, source } => {
                let mut steps = Vec::new();
                if let Some(hint) = source.status().and_then(status_error_message) {
                    steps.push(hint.to_string());
                }
                steps.push(format!("Make sure the automation platform is running at {base_url}"));
                steps
            }
        }
    }
}
