//! Base URL validation and endpoint derivation.

use thiserror::Error;
use url::Url;

/// Environment variable consulted for the base URL when no override is given.
pub const BASE_URL_ENV: &str = "N8N_URL";
/// Base URL used when neither an override nor [`BASE_URL_ENV`] is set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5678";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Every URL the client talks to, derived once from the base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: String,
    login: String,
    rest_workflows: String,
    api_workflows: String,
    credentials: String,
}

impl Endpoints {
    /// Validate `base_url` and derive the endpoint set.
    ///
    /// The URL must be absolute, use `http` or `https`, and name a host.
    /// A trailing `/` is ignored.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };

        let parsed = Url::parse(trimmed).map_err(|error| invalid(error.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}://'", parsed.scheme())));
        }
        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(invalid("missing host".into()));
        }

        Ok(Self {
            base_url: trimmed.to_string(),
            login: format!("{trimmed}/rest/login"),
            rest_workflows: format!("{trimmed}/rest/workflows"),
            api_workflows: format!("{trimmed}/api/v1/workflows"),
            credentials: format!("{trimmed}/rest/credentials"),
        })
    }

    /// Resolve the base URL from an explicit override, then the environment,
    /// then [`DEFAULT_BASE_URL`].
    pub fn resolve(override_url: Option<&str>) -> Result<Self, ConfigError> {
        match override_url {
            Some(url) => Self::new(url),
            None => {
                let from_env = std::env::var(BASE_URL_ENV).ok().filter(|value| !value.trim().is_empty());
                Self::new(from_env.as_deref().unwrap_or(DEFAULT_BASE_URL))
            }
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    /// Workflow collection on the session (cookie) surface.
    pub fn rest_workflows(&self) -> &str {
        &self.rest_workflows
    }

    /// Workflow collection on the versioned, key-authenticated surface.
    pub fn api_workflows(&self) -> &str {
        &self.api_workflows
    }

    pub fn credentials(&self) -> &str {
        &self.credentials
    }
}
