//! Turning local credentials into an authenticated transport.
//!
//! The login exchange is preferred. If no login is configured or the exchange
//! fails, the static API key is used instead. Exactly one surface is active for
//! the rest of the run.

use thiserror::Error;
use tracing::{info, warn};

use crate::credentials::CredentialSources;
use crate::{ApiError, Endpoints, N8nClient};

#[derive(Debug, Error)]
pub enum SessionError {
    /// Neither source produced usable credentials, or the login failed with no key to fall back on.
    #[error("no authentication method available (checked {secret_file} and {api_key_file})")]
    NoCredentials { secret_file: String, api_key_file: String },
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Establish the transport for this run.
pub async fn establish_session(endpoints: &Endpoints, sources: &CredentialSources) -> Result<N8nClient, SessionError> {
    if let Some(login) = sources.load_login() {
        info!("using username/password authentication");
        match N8nClient::login(endpoints, &login).await {
            Ok(client) => {
                info!(email = %login.email, "logged in");
                return Ok(client);
            }
            Err(error) => warn!(error = %error, "login with username/password failed, trying API key"),
        }
    }

    let Some(key) = sources.load_api_key() else {
        return Err(SessionError::NoCredentials {
            secret_file: sources.secret_file.display().to_string(),
            api_key_file: sources.api_key_file.display().to_string(),
        });
    };
    info!("using API key authentication");
    Ok(N8nClient::with_api_key(endpoints, &key)?)
}
