//! Snapshot of the workflows that already exist remotely.
//!
//! The snapshot is read once per run and never refreshed, so changes made on
//! the remote while a run is in progress go unnoticed.

use flowsync_api::WorkflowApi;
use flowsync_types::{RemoteCatalog, RemoteWorkflow};
use flowsync_util::http::{LIST_ENVELOPE_KEYS, extract_list_page};
use tracing::{debug, warn};

/// Upper bound on pages followed through `nextCursor`.
pub const MAX_CATALOG_PAGES: usize = 500;

/// Read every remote workflow into a name-keyed snapshot.
///
/// Never fails: a transport error or an unexpected response shape is logged
/// and whatever was read so far is returned. When several remote workflows
/// share a name, the one listed last wins.
pub async fn read_remote_catalog(api: &dyn WorkflowApi) -> RemoteCatalog {
    let mut catalog = RemoteCatalog::new();
    let mut cursor: Option<String> = None;

    for page_number in 1..=MAX_CATALOG_PAGES {
        let payload = match api.list_workflows(cursor.as_deref()).await {
            Ok(payload) => payload,
            Err(error) => {
                warn!(page = page_number, error = %error, "could not fetch existing workflows");
                return catalog;
            }
        };

        let Some(page) = extract_list_page(payload, LIST_ENVELOPE_KEYS) else {
            warn!(page = page_number, "unexpected workflow list format, treating as empty");
            return catalog;
        };

        for item in page.items {
            let Some(workflow) = RemoteWorkflow::from_value(item) else {
                debug!(page = page_number, "ignoring workflow record without a name");
                continue;
            };
            if let Some(displaced) = catalog.insert(workflow) {
                debug!(name = %displaced.name, "duplicate remote workflow name, keeping the later record");
            }
        }

        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => return catalog,
        }
    }

    warn!(max_pages = MAX_CATALOG_PAGES, "stopped reading workflow list at the page limit");
    catalog
}
