//! Credential auto-wiring.
//!
//! Nodes of a known type whose credential slot is empty get a reference to a
//! credential that already exists on the remote. Slot emptiness follows loose
//! truthiness, so a slot holding `{}` is filled while `{"id": null}` is left
//! alone. A companion check lists nodes that still lack credentials once the
//! workflow has been imported.

use flowsync_api::WorkflowApi;
use flowsync_types::{CredentialReference, WorkflowPayload, identifier_to_string};
use flowsync_util::http::extract_list_page;
use serde_json::Value;
use tracing::debug;

/// Which nodes to wire and to what.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialWiring {
    /// Name of the remote credential to look up.
    pub credential_name: &'static str,
    /// Credential slot on the node.
    pub slot: &'static str,
    pub node_types: &'static [&'static str],
}

/// Redis nodes get the `Redis Local` credential.
pub const REDIS_WIRING: CredentialWiring = CredentialWiring {
    credential_name: "Redis Local",
    slot: "redis",
    node_types: &["n8n-nodes-base.redis", "n8n-nodes-base.redisTrigger"],
};

/// Node types that need credentials, with the label shown to operators.
pub const CREDENTIAL_NODE_LABELS: &[(&str, &str)] = &[
    ("n8n-nodes-base.redis", "Redis"),
    ("n8n-nodes-base.postgres", "PostgreSQL"),
    ("n8n-nodes-base.mysql", "MySQL"),
    ("n8n-nodes-base.httpRequest", "HTTP Request (potentially)"),
];

/// A wiring rule paired with the remote credential id it resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WiringTarget {
    pub wiring: CredentialWiring,
    pub credential_id: String,
}

impl WiringTarget {
    pub fn new(wiring: CredentialWiring, credential_id: impl Into<String>) -> Self {
        Self {
            wiring,
            credential_id: credential_id.into(),
        }
    }

    fn reference(&self) -> CredentialReference {
        CredentialReference::new(self.credential_id.clone(), self.wiring.credential_name)
    }
}

/// Fill empty credential slots on matching nodes. Returns how many nodes changed.
pub fn auto_wire(payload: &mut WorkflowPayload, target: &WiringTarget) -> usize {
    let mut wired = 0;
    for node in payload.nodes_mut() {
        let matches_type = target.wiring.node_types.iter().any(|node_type| *node_type == node.node_type());
        if !matches_type || node.has_credential(target.wiring.slot) {
            continue;
        }
        node.set_credential(target.wiring.slot, target.reference());
        wired += 1;
    }
    wired
}

/// Labels of credential-bearing nodes with no truthy credential, in node order.
pub fn credentials_needed(payload: &WorkflowPayload) -> Vec<&'static str> {
    payload
        .nodes()
        .iter()
        .filter(|node| !node.has_any_credential())
        .filter_map(|node| {
            CREDENTIAL_NODE_LABELS
                .iter()
                .find(|(node_type, _)| *node_type == node.node_type())
                .map(|(_, label)| *label)
        })
        .collect()
}

/// Look up the id of the remote credential called `name`.
///
/// Any failure is logged at debug level and reads as "not found".
pub async fn find_credential_id(api: &dyn WorkflowApi, name: &str) -> Option<String> {
    let payload = match api.list_credentials().await {
        Ok(payload) => payload,
        Err(error) => {
            debug!(error = %error, "could not fetch credentials");
            return None;
        }
    };

    let page = extract_list_page(payload, &["data"])?;
    let credential = page
        .items
        .iter()
        .find(|credential| credential.get("name").and_then(Value::as_str) == Some(name))?;
    credential.get("id").and_then(identifier_to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeApi;
    use flowsync_types::WorkflowDefinition;
    use serde_json::json;

    fn payload(nodes: Value) -> WorkflowPayload {
        serde_json::from_value::<WorkflowDefinition>(json!({"name": "Cache", "nodes": nodes}))
            .unwrap()
            .into_payload()
    }

    fn target() -> WiringTarget {
        WiringTarget::new(REDIS_WIRING, "cred-7")
    }

    #[test]
    fn fills_empty_slots_on_matching_nodes() {
        let mut payload = payload(json!([
            {"type": "n8n-nodes-base.redis"},
            {"type": "n8n-nodes-base.redisTrigger", "credentials": {"redis": {}}},
            {"type": "n8n-nodes-base.set"}
        ]));

        assert_eq!(auto_wire(&mut payload, &target()), 2);

        let value = payload.to_value();
        let expected = json!({"id": "cred-7", "name": "Redis Local"});
        assert_eq!(value["nodes"][0]["credentials"]["redis"], expected);
        assert_eq!(value["nodes"][1]["credentials"]["redis"], expected);
        assert!(value["nodes"][2].get("credentials").is_none());
    }

    #[test]
    fn wiring_is_idempotent() {
        let mut payload = payload(json!([{"type": "n8n-nodes-base.redis"}]));

        assert_eq!(auto_wire(&mut payload, &target()), 1);
        let once = payload.clone();
        assert_eq!(auto_wire(&mut payload, &target()), 0);
        assert_eq!(payload, once);
    }

    #[test]
    fn configured_slots_are_left_alone() {
        let mut payload = payload(json!([
            {"type": "n8n-nodes-base.redis", "credentials": {"redis": {"id": "mine", "name": "Prod Redis"}}}
        ]));

        assert_eq!(auto_wire(&mut payload, &target()), 0);
        assert_eq!(payload.to_value()["nodes"][0]["credentials"]["redis"]["id"], json!("mine"));
    }

    #[test]
    fn lists_nodes_still_missing_credentials() {
        let payload = payload(json!([
            {"type": "n8n-nodes-base.postgres"},
            {"type": "n8n-nodes-base.mysql", "credentials": {"mySql": {"id": "1"}}},
            {"type": "n8n-nodes-base.httpRequest", "credentials": {"httpBasicAuth": {}}},
            {"type": "n8n-nodes-base.set"}
        ]));

        assert_eq!(credentials_needed(&payload), vec!["PostgreSQL", "HTTP Request (potentially)"]);
    }

    #[tokio::test]
    async fn finds_credential_in_wrapped_or_bare_lists() {
        let api = FakeApi {
            credentials: Ok(json!({"data": [{"id": "1", "name": "Other"}, {"id": "9", "name": "Redis Local"}]})),
            ..FakeApi::default()
        };
        assert_eq!(find_credential_id(&api, "Redis Local").await.as_deref(), Some("9"));

        let api = FakeApi {
            credentials: Ok(json!([{"id": 4, "name": "Redis Local"}])),
            ..FakeApi::default()
        };
        assert_eq!(find_credential_id(&api, "Redis Local").await.as_deref(), Some("4"));
    }

    #[tokio::test]
    async fn lookup_failures_read_as_absent() {
        let api = FakeApi {
            credentials: Err(401),
            ..FakeApi::default()
        };
        assert!(find_credential_id(&api, "Redis Local").await.is_none());

        let api = FakeApi {
            credentials: Ok(json!("nope")),
            ..FakeApi::default()
        };
        assert!(find_credential_id(&api, "Redis Local").await.is_none());
    }
}
