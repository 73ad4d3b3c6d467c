//! Run configuration, built once at startup and passed by reference.

use std::path::PathBuf;

use flowsync_api::{CredentialSources, Endpoints};

/// Directory scanned for definition files when no override is given.
pub const DEFAULT_WORKFLOWS_DIR: &str = "volumes/workflows";

/// Behavior toggles for the sync engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Replace remote workflows whose name matches a local definition.
    /// When off, such files are skipped.
    pub update_existing: bool,
    /// Decide and log every action without issuing remote writes.
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub endpoints: Endpoints,
    pub workflows_dir: PathBuf,
    pub credential_sources: CredentialSources,
    pub options: SyncOptions,
}

impl SyncConfig {
    /// Configuration with default paths for the given endpoints.
    pub fn new(endpoints: Endpoints) -> Self {
        Self {
            endpoints,
            workflows_dir: PathBuf::from(DEFAULT_WORKFLOWS_DIR),
            credential_sources: CredentialSources::default(),
            options: SyncOptions::default(),
        }
    }

    pub fn with_workflows_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workflows_dir = dir.into();
        self
    }

    pub fn with_credential_sources(mut self, sources: CredentialSources) -> Self {
        self.credential_sources = sources;
        self
    }

    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }
}
