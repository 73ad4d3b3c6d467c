//! Shared types for the flowsync workspace.

use serde_json::Value;

pub mod outcome;
pub mod workflow;

pub use outcome::{OutcomeRecord, PlannedAction, SyncOutcome};
pub use workflow::{
    CredentialReference, NodeDescriptor, REMOTE_MANAGED_FIELDS, RemoteCatalog, RemoteWorkflow, UNNAMED_WORKFLOW,
    WorkflowDefinition, WorkflowPayload, identifier_to_string,
};

/// Loose truthiness for JSON values.
///
/// `null`, `false`, zero, and empty strings, arrays, or objects are falsy.
/// Credential slots are considered configured only when truthy, so a slot
/// holding `{}` reads as empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
