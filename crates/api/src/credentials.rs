//! Local authentication material.
//!
//! Two independent sources are read: a dotenv-style secret file holding the
//! admin login, and a plain-text file holding a static API key. A missing or
//! unreadable source simply yields nothing; callers decide what to do when
//! both come up empty.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, warn};

/// Default location of the admin login file, relative to the working directory.
pub const DEFAULT_SECRET_FILE: &str = ".secret";
/// Default location of the API key file, relative to the working directory.
pub const DEFAULT_API_KEY_FILE: &str = "volumes/config/n8n_api_key.txt";

static EMAIL_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"N8N_ADMIN_EMAIL=([^\s]+)").ok());
static PASSWORD_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"N8N_ADMIN_PASSWORD=([^\s]+)").ok());

/// Email and password for the interactive login exchange.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &flowsync_util::REDACTED)
            .finish()
    }
}

/// Static key sent as a request header.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a raw key. Surrounding whitespace is trimmed; an empty key yields `None`.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&flowsync_util::REDACTED).finish()
    }
}

/// Locations of the two credential sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialSources {
    pub secret_file: PathBuf,
    pub api_key_file: PathBuf,
}

impl Default for CredentialSources {
    fn default() -> Self {
        Self {
            secret_file: PathBuf::from(DEFAULT_SECRET_FILE),
            api_key_file: PathBuf::from(DEFAULT_API_KEY_FILE),
        }
    }
}

impl CredentialSources {
    pub fn new(secret_file: impl Into<PathBuf>, api_key_file: impl Into<PathBuf>) -> Self {
        Self {
            secret_file: secret_file.into(),
            api_key_file: api_key_file.into(),
        }
    }

    /// Read the admin login from the secret file.
    pub fn load_login(&self) -> Option<LoginCredentials> {
        let content = read_source(&self.secret_file)?;
        match parse_login(&content) {
            Some(credentials) => {
                info!(path = %self.secret_file.display(), "credentials loaded from secret file");
                Some(credentials)
            }
            None => {
                warn!(path = %self.secret_file.display(), "could not parse credentials from secret file");
                None
            }
        }
    }

    /// Read the static API key.
    pub fn load_api_key(&self) -> Option<ApiKey> {
        let content = read_source(&self.api_key_file)?;
        let key = ApiKey::new(&content);
        match key {
            Some(_) => info!(path = %self.api_key_file.display(), "API key loaded"),
            None => warn!(path = %self.api_key_file.display(), "API key file is empty"),
        }
        key
    }
}

/// Extract `N8N_ADMIN_EMAIL` and `N8N_ADMIN_PASSWORD`. Both must be present.
pub fn parse_login(content: &str) -> Option<LoginCredentials> {
    let email = capture_value(EMAIL_PATTERN.as_ref()?, content)?;
    let password = capture_value(PASSWORD_PATTERN.as_ref()?, content)?;
    Some(LoginCredentials { email, password })
}

fn capture_value(pattern: &Regex, content: &str) -> Option<String> {
    Some(pattern.captures(content)?.get(1)?.as_str().to_string())
}

fn read_source(path: &Path) -> Option<String> {
    if !path.exists() {
        debug!(path = %path.display(), "credential source not found");
        return None;
    }
    match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(error) => {
            warn!(path = %path.display(), error = %error, "error reading credential source");
            None
        }
    }
}
