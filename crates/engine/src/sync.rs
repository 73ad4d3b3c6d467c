//! Per-file create/update/skip decisions.
//!
//! Files are processed one at a time: parse, strip remote-managed fields,
//! auto-wire credentials, decide, write, record. Each file gets at most one
//! remote write and failed writes are not retried.

use std::path::{Path, PathBuf};

use flowsync_api::WorkflowApi;
use flowsync_types::{
    OutcomeRecord, PlannedAction, RemoteCatalog, RemoteWorkflow, SyncOutcome, WorkflowDefinition, WorkflowPayload,
};
use flowsync_util::http::extract_entity_id;
use tracing::{error, info, warn};

use crate::config::SyncOptions;
use crate::loader::{display_file_name, load_definition};
use crate::report::SyncReport;
use crate::wiring::{WiringTarget, auto_wire, credentials_needed};

pub struct Synchronizer<'a> {
    api: &'a dyn WorkflowApi,
    catalog: &'a RemoteCatalog,
    wiring: Option<WiringTarget>,
    options: SyncOptions,
}

impl<'a> Synchronizer<'a> {
    pub fn new(
        api: &'a dyn WorkflowApi,
        catalog: &'a RemoteCatalog,
        wiring: Option<WiringTarget>,
        options: SyncOptions,
    ) -> Self {
        Self {
            api,
            catalog,
            wiring,
            options,
        }
    }

    /// Process every file in order and collect the outcomes.
    pub async fn sync_all(&self, files: &[PathBuf]) -> SyncReport {
        let mut report = SyncReport::default();
        for file in files {
            report.record(self.sync_file(file).await);
        }
        report
    }

    /// Process one definition file. Never fails; problems become an `Error` outcome.
    pub async fn sync_file(&self, path: &Path) -> OutcomeRecord {
        let file = display_file_name(path);
        info!(file = %file, "processing");

        let definition = match load_definition(path) {
            Ok(definition) => definition,
            Err(load_error) => {
                error!(file = %file, error = %load_error, "✗ could not load workflow file");
                return OutcomeRecord::new(file, None, SyncOutcome::error(load_error.to_string()));
            }
        };

        let workflow = definition.name.clone();
        let outcome = self.sync_definition(definition).await;
        OutcomeRecord::new(file, workflow, outcome)
    }

    /// Decide and perform the action for one parsed definition.
    pub async fn sync_definition(&self, definition: WorkflowDefinition) -> SyncOutcome {
        let mut payload = definition.into_payload();

        if let Some(target) = &self.wiring {
            let wired = auto_wire(&mut payload, target);
            if wired > 0 {
                info!(
                    nodes = wired,
                    credential = target.wiring.credential_name,
                    "→ assigned existing credentials to nodes"
                );
            }
        }

        // Nameless definitions are looked up under the fallback display name.
        let existing = self.catalog.get(payload.display_name());
        match existing {
            Some(_) if !self.options.update_existing => {
                warn!(
                    workflow = %payload.display_name(),
                    "workflow already exists, skipping (use --update to overwrite)"
                );
                SyncOutcome::SkippedExists
            }
            Some(existing) => self.update(&payload, existing).await,
            None => self.create(&payload).await,
        }
    }

    async fn update(&self, payload: &WorkflowPayload, existing: &RemoteWorkflow) -> SyncOutcome {
        let workflow = payload.display_name();
        let Some(remote_id) = existing.id.as_deref() else {
            error!(workflow = %workflow, "✗ existing remote workflow has no identifier, cannot update");
            return SyncOutcome::error("existing remote workflow has no identifier");
        };

        if self.options.dry_run {
            info!(workflow = %workflow, remote_id, "would update existing workflow");
            return SyncOutcome::Planned(PlannedAction::Update {
                remote_id: remote_id.to_string(),
            });
        }

        info!(workflow = %workflow, remote_id, "updating existing workflow");
        match self.api.update_workflow(remote_id, payload).await {
            Ok(response) => {
                let confirmed_id = extract_entity_id(&response).unwrap_or_else(|| remote_id.to_string());
                info!(workflow = %workflow, remote_id = %confirmed_id, "✓ workflow updated");
                SyncOutcome::Updated {
                    remote_id: Some(confirmed_id),
                }
            }
            Err(api_error) => {
                error!(workflow = %workflow, error = %api_error, "✗ error updating workflow");
                SyncOutcome::error(api_error.to_string())
            }
        }
    }

    async fn create(&self, payload: &WorkflowPayload) -> SyncOutcome {
        let workflow = payload.display_name();

        if self.options.dry_run {
            info!(workflow = %workflow, "would import new workflow");
            return SyncOutcome::Planned(PlannedAction::Create);
        }

        match self.api.create_workflow(payload).await {
            Ok(response) => {
                let remote_id = extract_entity_id(&response);
                info!(
                    workflow = %workflow,
                    remote_id = remote_id.as_deref().unwrap_or("unknown"),
                    "✓ workflow imported"
                );
                let needed = credentials_needed(payload);
                if !needed.is_empty() {
                    warn!(workflow = %workflow, "⚠ the following credentials need to be configured manually:");
                    for label in &needed {
                        warn!("   - {label}");
                    }
                    warn!("   open the workflow in the editor and configure credentials for these nodes");
                }
                SyncOutcome::Imported {
                    remote_id,
                    credentials_needed: needed,
                }
            }
            Err(api_error) => {
                error!(workflow = %workflow, error = %api_error, "✗ error importing workflow");
                SyncOutcome::error(api_error.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Call, FakeApi};
    use crate::wiring::REDIS_WIRING;
    use flowsync_types::REMOTE_MANAGED_FIELDS;
    use serde_json::{Value, json};
    use std::fs;
    use tempfile::tempdir;

    fn catalog(records: Value) -> RemoteCatalog {
        let mut catalog = RemoteCatalog::new();
        for record in records.as_array().unwrap() {
            catalog.insert(RemoteWorkflow::from_value(record.clone()).unwrap());
        }
        catalog
    }

    fn definition(name: &str) -> WorkflowDefinition {
        serde_json::from_value(json!({
            "name": name,
            "active": true,
            "id": "local-id",
            "createdAt": "2024-01-01T00:00:00.000Z",
            "updatedAt": "2024-01-01T00:00:00.000Z",
            "versionId": "v1",
            "tags": [],
            "nodes": [{"type": "n8n-nodes-base.postgres"}],
            "connections": {}
        }))
        .unwrap()
    }

    fn assert_no_managed_fields(body: &Value) {
        for field in REMOTE_MANAGED_FIELDS {
            assert!(body.get(*field).is_none(), "{field} leaked into payload");
        }
    }

    fn update_mode() -> SyncOptions {
        SyncOptions {
            update_existing: true,
            dry_run: false,
        }
    }

    #[tokio::test]
    async fn absent_name_creates_once() {
        let api = FakeApi::default();
        let catalog = catalog(json!([{"id": "1", "name": "Other"}]));
        let sync = Synchronizer::new(&api, &catalog, None, update_mode());

        let outcome = sync.sync_definition(definition("Fresh")).await;

        assert_eq!(
            outcome,
            SyncOutcome::Imported {
                remote_id: Some("new-1".into()),
                credentials_needed: vec!["PostgreSQL"],
            }
        );
        let writes = api.writes();
        assert_eq!(writes.len(), 1);
        let Call::Create(body) = &writes[0] else {
            panic!("expected a create call, got {writes:?}");
        };
        assert_no_managed_fields(body);
        assert_eq!(body["name"], json!("Fresh"));
    }

    #[tokio::test]
    async fn nameless_definition_matches_fallback_name() {
        let api = FakeApi::default();
        let catalog = catalog(json!([{"id": "u1", "name": "Unknown"}]));
        let sync = Synchronizer::new(&api, &catalog, None, SyncOptions::default());
        let nameless: WorkflowDefinition = serde_json::from_value(json!({"nodes": []})).unwrap();

        let outcome = sync.sync_definition(nameless).await;

        assert_eq!(outcome, SyncOutcome::SkippedExists);
        assert!(api.writes().is_empty());
    }

    #[tokio::test]
    async fn nameless_definition_is_created_without_a_name_field() {
        let api = FakeApi::default();
        let catalog = catalog(json!([{"id": "1", "name": "Other"}]));
        let sync = Synchronizer::new(&api, &catalog, None, SyncOptions::default());
        let nameless: WorkflowDefinition = serde_json::from_value(json!({"nodes": [], "id": "x"})).unwrap();

        let outcome = sync.sync_definition(nameless).await;

        assert!(matches!(outcome, SyncOutcome::Imported { .. }));
        let writes = api.writes();
        let Call::Create(body) = &writes[0] else {
            panic!("expected a create call, got {writes:?}");
        };
        assert!(body.get("name").is_none());
        assert_no_managed_fields(body);
    }

    #[tokio::test]
    async fn existing_name_is_skipped_without_update_mode() {
        let api = FakeApi::default();
        let catalog = catalog(json!([{"id": "1", "name": "Nightly"}]));
        let sync = Synchronizer::new(&api, &catalog, None, SyncOptions::default());

        let outcome = sync.sync_definition(definition("Nightly")).await;

        assert_eq!(outcome, SyncOutcome::SkippedExists);
        assert!(api.writes().is_empty());
    }

    #[tokio::test]
    async fn existing_name_is_updated_by_remote_id() {
        let api = FakeApi::default();
        let catalog = catalog(json!([{"id": "remote-7", "name": "Nightly"}]));
        let sync = Synchronizer::new(&api, &catalog, None, update_mode());

        let outcome = sync.sync_definition(definition("Nightly")).await;

        assert_eq!(
            outcome,
            SyncOutcome::Updated {
                remote_id: Some("remote-7".into())
            }
        );
        let writes = api.writes();
        assert_eq!(writes.len(), 1);
        let Call::Update(id, body) = &writes[0] else {
            panic!("expected an update call, got {writes:?}");
        };
        assert_eq!(id, "remote-7");
        assert_no_managed_fields(body);
    }

    #[tokio::test]
    async fn update_without_remote_id_is_an_error() {
        let api = FakeApi::default();
        let catalog = catalog(json!([{"name": "Nightly"}]));
        let sync = Synchronizer::new(&api, &catalog, None, update_mode());

        let outcome = sync.sync_definition(definition("Nightly")).await;

        assert!(outcome.is_error());
        assert!(api.writes().is_empty());
    }

    #[tokio::test]
    async fn failed_write_is_recorded_not_retried() {
        let api = FakeApi {
            write_status: Some(400),
            ..FakeApi::default()
        };
        let catalog = RemoteCatalog::new();
        let sync = Synchronizer::new(&api, &catalog, None, SyncOptions::default());

        let outcome = sync.sync_definition(definition("Fresh")).await;

        let SyncOutcome::Error { detail } = outcome else {
            panic!("expected an error outcome");
        };
        assert!(detail.contains("400"));
        assert_eq!(api.writes().len(), 1);
    }

    #[tokio::test]
    async fn dry_run_issues_no_writes() {
        let api = FakeApi::default();
        let catalog = catalog(json!([{"id": "remote-7", "name": "Nightly"}]));
        let options = SyncOptions {
            update_existing: true,
            dry_run: true,
        };
        let sync = Synchronizer::new(&api, &catalog, None, options);

        assert_eq!(
            sync.sync_definition(definition("Nightly")).await,
            SyncOutcome::Planned(PlannedAction::Update {
                remote_id: "remote-7".into()
            })
        );
        assert_eq!(
            sync.sync_definition(definition("Fresh")).await,
            SyncOutcome::Planned(PlannedAction::Create)
        );
        assert!(api.writes().is_empty());
    }

    #[tokio::test]
    async fn wiring_is_applied_before_the_write() {
        let api = FakeApi::default();
        let catalog = RemoteCatalog::new();
        let target = WiringTarget::new(REDIS_WIRING, "cred-3");
        let sync = Synchronizer::new(&api, &catalog, Some(target), SyncOptions::default());
        let definition: WorkflowDefinition =
            serde_json::from_value(json!({"name": "Cache", "nodes": [{"type": "n8n-nodes-base.redis"}]})).unwrap();

        let outcome = sync.sync_definition(definition).await;

        assert!(matches!(outcome, SyncOutcome::Imported { ref credentials_needed, .. } if credentials_needed.is_empty()));
        let writes = api.writes();
        let Call::Create(body) = &writes[0] else {
            panic!("expected a create call");
        };
        assert_eq!(body["nodes"][0]["credentials"]["redis"], json!({"id": "cred-3", "name": "Redis Local"}));
    }

    #[tokio::test]
    async fn malformed_files_do_not_stop_the_run() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("01-broken.json"), "{ nope").unwrap();
        fs::write(dir.path().join("02-alpha.json"), r#"{"name": "Alpha", "nodes": []}"#).unwrap();
        fs::write(dir.path().join("03-wrong-shape.json"), "[1, 2, 3]").unwrap();
        fs::write(dir.path().join("04-beta.json"), r#"{"name": "Beta", "nodes": []}"#).unwrap();
        let files = crate::loader::discover_definition_files(dir.path());

        let api = FakeApi::default();
        let catalog = RemoteCatalog::new();
        let sync = Synchronizer::new(&api, &catalog, None, SyncOptions::default());
        let report = sync.sync_all(&files).await;

        let tally = report.tally();
        assert_eq!(tally.errored, 2);
        assert_eq!(tally.imported, 2);
        assert!(report.has_errors());
        assert_eq!(report.exit_code(), 1);
        assert_eq!(report.records()[0].file, "01-broken.json");
        assert!(report.records()[0].workflow.is_none());
        assert_eq!(report.records()[1].workflow.as_deref(), Some("Alpha"));
    }
}
