//! Workflow definitions as read from disk and as seen on the remote instance.
//!
//! A [`WorkflowDefinition`] is whatever a local file contains. Before anything
//! is sent to the remote it is converted into a [`WorkflowPayload`], which is
//! the only type the transport accepts. The conversion drops every
//! remote-managed field, so a payload carrying one cannot be built.

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::is_truthy;

/// Fields the remote instance owns. Client-supplied values are rejected or ignored.
pub const REMOTE_MANAGED_FIELDS: &[&str] = &["active", "id", "createdAt", "updatedAt", "versionId", "tags"];

/// Name used in logs when a definition does not carry one.
pub const UNNAMED_WORKFLOW: &str = "Unknown";

/// A workflow definition parsed from a local file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub nodes: Vec<NodeDescriptor>,
    /// Everything else in the file (connections, settings, remote-managed fields, ...).
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl WorkflowDefinition {
    /// Name for display purposes, falling back to [`UNNAMED_WORKFLOW`].
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNNAMED_WORKFLOW)
    }

    /// Strip all remote-managed fields and produce a transmittable payload.
    pub fn into_payload(mut self) -> WorkflowPayload {
        for field in REMOTE_MANAGED_FIELDS {
            self.fields.remove(*field);
        }
        WorkflowPayload { definition: self }
    }
}

/// A definition with every remote-managed field removed.
///
/// The inner definition is private so the invariant cannot be broken after
/// construction; only node descriptors stay mutable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WorkflowPayload {
    definition: WorkflowDefinition,
}

impl WorkflowPayload {
    pub fn display_name(&self) -> &str {
        self.definition.display_name()
    }

    pub fn nodes(&self) -> &[NodeDescriptor] {
        &self.definition.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [NodeDescriptor] {
        &mut self.definition.nodes
    }

    /// Serialize the payload as a JSON value.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// One node inside a workflow definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    /// Credential slot name to credential reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl NodeDescriptor {
    pub fn node_type(&self) -> &str {
        self.node_type.as_deref().unwrap_or_default()
    }

    /// True when the named slot holds a truthy value.
    pub fn has_credential(&self, slot: &str) -> bool {
        self.credentials
            .as_ref()
            .and_then(|credentials| credentials.get(slot))
            .is_some_and(is_truthy)
    }

    /// True when at least one slot holds a truthy value.
    ///
    /// A slot holding `{}` counts as unset, while `{"id": null}` counts as set.
    pub fn has_any_credential(&self) -> bool {
        self.credentials
            .as_ref()
            .is_some_and(|credentials| credentials.values().any(is_truthy))
    }

    /// Write a reference into `slot`, creating the credentials mapping if needed.
    pub fn set_credential(&mut self, slot: &str, reference: CredentialReference) {
        let credentials = self.credentials.get_or_insert_with(Map::new);
        credentials.insert(slot.to_string(), reference.to_value());
    }
}

/// Reference to a credential stored on the remote instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialReference {
    pub id: String,
    pub name: String,
}

impl CredentialReference {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    fn to_value(&self) -> Value {
        let mut object = Map::new();
        object.insert("id".into(), Value::String(self.id.clone()));
        object.insert("name".into(), Value::String(self.name.clone()));
        Value::Object(object)
    }
}

/// A workflow that already exists on the remote instance.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteWorkflow {
    pub name: String,
    pub id: Option<String>,
}

impl RemoteWorkflow {
    /// Build a record from one element of a list response.
    ///
    /// Returns `None` for non-objects and for objects without a string `name`.
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(mut fields) = value else {
            return None;
        };
        let name = match fields.remove("name") {
            Some(Value::String(name)) => name,
            _ => return None,
        };
        let id = fields.get("id").and_then(identifier_to_string);
        Some(Self { name, id })
    }
}

/// Render a remote identifier, which may be serialized as a string or a number.
pub fn identifier_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Snapshot of remote workflows keyed by name.
///
/// Names are not unique on the remote side. Inserting a name twice keeps the
/// later record.
#[derive(Debug, Clone, Default)]
pub struct RemoteCatalog {
    by_name: IndexMap<String, RemoteWorkflow>,
}

impl RemoteCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, returning the one it displaced if the name was taken.
    pub fn insert(&mut self, workflow: RemoteWorkflow) -> Option<RemoteWorkflow> {
        match self.by_name.entry(workflow.name.clone()) {
            Entry::Occupied(mut entry) => Some(entry.insert(workflow)),
            Entry::Vacant(entry) => {
                entry.insert(workflow);
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&RemoteWorkflow> {
        self.by_name.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
