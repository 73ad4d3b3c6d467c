//! The workflow transport capability.
//!
//! The remote exposes two API surfaces with different paths, auth, and
//! response envelopes. Which one is used is decided once, when the session is
//! established; everything downstream talks to a [`WorkflowApi`] and never
//! branches on the auth mode.

use std::fmt;

use async_trait::async_trait;
use flowsync_types::WorkflowPayload;
use serde_json::Value;

use crate::ApiError;

/// Which remote API surface a transport talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiSurface {
    /// Cookie-authenticated REST surface reached through the login exchange.
    Session,
    /// Versioned public API authenticated by a static key header.
    ApiKey,
}

impl fmt::Display for ApiSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Session => f.write_str("username/password session"),
            Self::ApiKey => f.write_str("API key"),
        }
    }
}

/// List, create, and update operations for remote workflows.
///
/// List calls return the raw decoded response; envelope handling is left to
/// the caller because the two surfaces wrap lists differently.
#[async_trait]
pub trait WorkflowApi: Send + Sync {
    fn surface(&self) -> ApiSurface;

    /// Base URL, for log and error messages.
    fn base_url(&self) -> &str;

    /// Cheap authenticated call used to verify connectivity before any work.
    async fn probe(&self) -> Result<(), ApiError>;

    /// Fetch one page of workflows. `cursor` continues a paginated listing.
    async fn list_workflows(&self, cursor: Option<&str>) -> Result<Value, ApiError>;

    async fn create_workflow(&self, payload: &WorkflowPayload) -> Result<Value, ApiError>;

    /// Replace the workflow addressed by `id`.
    async fn update_workflow(&self, id: &str, payload: &WorkflowPayload) -> Result<Value, ApiError>;

    async fn list_credentials(&self) -> Result<Value, ApiError>;
}
