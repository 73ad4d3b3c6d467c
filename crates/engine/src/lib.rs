//! # Flowsync Engine
//!
//! Synchronizes a directory of workflow definition files with a running
//! automation platform instance.
//!
//! A run goes through these stages, strictly in sequence:
//!
//! 1. establish a session (login, or API key fallback)
//! 2. probe connectivity; failure here ends the run
//! 3. read the remote catalog once, keyed by workflow name
//! 4. look up the credential used for auto-wiring
//! 5. for each local file in name order: load, strip remote-managed fields,
//!    auto-wire, then create, update, or skip
//! 6. summarize
//!
//! Only stages 1 and 2 can fail the run as a whole. Everything after degrades
//! to warnings or per-file `Error` outcomes.

use flowsync_api::{WorkflowApi, establish_session};
use tracing::{info, warn};

pub mod catalog;
pub mod config;
pub mod error;
pub mod loader;
pub mod report;
pub mod sync;
pub mod wiring;

#[cfg(test)]
mod test_support;

pub use catalog::read_remote_catalog;
pub use config::{DEFAULT_WORKFLOWS_DIR, SyncConfig, SyncOptions};
pub use error::SyncError;
pub use loader::{LoadError, discover_definition_files, load_definition};
pub use report::{SyncReport, Tally};
pub use sync::Synchronizer;
pub use wiring::{REDIS_WIRING, WiringTarget, auto_wire, credentials_needed, find_credential_id};

/// Authenticate and run a full sync.
pub async fn run(config: &SyncConfig) -> Result<SyncReport, SyncError> {
    let client = establish_session(&config.endpoints, &config.credential_sources).await?;
    info!(surface = %client.surface(), "authenticated");
    run_with_api(&client, config).await
}

/// Run a full sync over an already established transport.
pub async fn run_with_api(api: &dyn WorkflowApi, config: &SyncConfig) -> Result<SyncReport, SyncError> {
    info!(url = %api.base_url(), "connecting");
    api.probe().await.map_err(|source| SyncError::Unreachable {
        base_url: api.base_url().to_string(),
        source,
    })?;
    info!("connected");

    let catalog = read_remote_catalog(api).await;
    if !catalog.is_empty() {
        info!(count = catalog.len(), "found existing workflow(s)");
    }

    let files = discover_definition_files(&config.workflows_dir);
    if files.is_empty() {
        warn!("no workflow files to import");
        return Ok(SyncReport::default());
    }

    let wiring = find_credential_id(api, REDIS_WIRING.credential_name)
        .await
        .map(|credential_id| WiringTarget::new(REDIS_WIRING, credential_id));

    info!(count = files.len(), dry_run = config.options.dry_run, "starting import");
    let synchronizer = Synchronizer::new(api, &catalog, wiring, config.options);
    Ok(synchronizer.sync_all(&files).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Call, FakeApi};
    use flowsync_api::Endpoints;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    fn config(dir: &std::path::Path) -> SyncConfig {
        SyncConfig::new(Endpoints::new("http://localhost:5678").unwrap()).with_workflows_dir(dir)
    }

    #[tokio::test]
    async fn failed_probe_stops_before_any_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.json"), r#"{"name": "A", "nodes": []}"#).unwrap();
        let api = FakeApi {
            probe_status: Some(401),
            ..FakeApi::default()
        };

        let error = run_with_api(&api, &config(dir.path())).await.unwrap_err();

        assert!(matches!(error, SyncError::Unreachable { .. }));
        assert_eq!(api.calls(), vec![Call::Probe]);
    }

    #[tokio::test]
    async fn empty_directory_completes_cleanly() {
        let dir = tempdir().unwrap();
        let api = FakeApi::default();

        let report = run_with_api(&api, &config(dir.path())).await.unwrap();

        assert!(report.is_empty());
        assert_eq!(report.exit_code(), 0);
        assert!(api.writes().is_empty());
    }

    #[tokio::test]
    async fn full_run_wires_credentials_and_respects_the_catalog() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("cache.json"),
            r#"{"name": "Cache", "active": true, "nodes": [{"type": "n8n-nodes-base.redis"}]}"#,
        )
        .unwrap();
        fs::write(dir.path().join("existing.json"), r#"{"name": "Existing", "nodes": []}"#).unwrap();

        let api = FakeApi {
            credentials: Ok(json!({"data": [{"id": "redis-1", "name": "Redis Local"}]})),
            ..FakeApi::with_pages(vec![Ok(json!({"data": [{"id": "e1", "name": "Existing"}]}))])
        };

        let report = run_with_api(&api, &config(dir.path())).await.unwrap();

        let tally = report.tally();
        assert_eq!(tally.imported, 1);
        assert_eq!(tally.skipped, 1);
        assert_eq!(report.exit_code(), 0);

        let writes = api.writes();
        assert_eq!(writes.len(), 1);
        let Call::Create(body) = &writes[0] else {
            panic!("expected a create call");
        };
        assert!(body.get("active").is_none());
        assert_eq!(body["nodes"][0]["credentials"]["redis"]["id"], json!("redis-1"));
    }
}
