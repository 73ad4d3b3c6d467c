//! Client for the automation platform's HTTP administration API.
//!
//! The platform exposes two parallel surfaces:
//!
//! - a cookie-based REST surface under `/rest`, reached through a login exchange
//! - a versioned public API under `/api/v1`, authenticated by a static key header
//!
//! [`establish_session`] reads local credentials, picks a surface, and returns
//! an [`N8nClient`]. Callers then use the [`WorkflowApi`] trait without caring
//! which surface is active.
//!
//! # Example
//!
//! ```ignore
//! use flowsync_api::{CredentialSources, Endpoints, WorkflowApi, establish_session};
//!
//! let endpoints = Endpoints::resolve(None)?;
//! let client = establish_session(&endpoints, &CredentialSources::default()).await?;
//! let workflows = client.list_workflows(None).await?;
//! ```

pub mod client;
pub mod credentials;
pub mod endpoints;
pub mod error;
pub mod session;
pub mod transport;

pub use client::{API_KEY_HEADER, N8nClient, READ_TIMEOUT, WRITE_TIMEOUT};
pub use credentials::{ApiKey, CredentialSources, LoginCredentials};
pub use endpoints::{BASE_URL_ENV, ConfigError, DEFAULT_BASE_URL, Endpoints};
pub use error::ApiError;
pub use session::{SessionError, establish_session};
pub use transport::{ApiSurface, WorkflowApi};
