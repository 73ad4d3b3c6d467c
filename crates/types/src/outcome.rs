//! Per-file results of a sync run.

use std::fmt;

/// What a dry run would have done for a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedAction {
    Create,
    Update { remote_id: String },
}

/// Result of processing one local definition file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// A new remote workflow was created.
    Imported {
        remote_id: Option<String>,
        /// Labels of nodes that still need credentials configured by hand.
        credentials_needed: Vec<&'static str>,
    },
    /// An existing remote workflow was replaced.
    Updated { remote_id: Option<String> },
    /// A workflow with the same name exists and update mode is off.
    SkippedExists,
    /// Dry run only; no write was issued.
    Planned(PlannedAction),
    Error { detail: String },
}

impl SyncOutcome {
    pub fn error(detail: impl Into<String>) -> Self {
        Self::Error { detail: detail.into() }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Imported { .. } => f.write_str("imported"),
            Self::Updated { .. } => f.write_str("updated"),
            Self::SkippedExists => f.write_str("skipped (already exists)"),
            Self::Planned(PlannedAction::Create) => f.write_str("would create"),
            Self::Planned(PlannedAction::Update { .. }) => f.write_str("would update"),
            Self::Error { detail } => write!(f, "error: {detail}"),
        }
    }
}

/// Outcome for one file, with enough context to report it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeRecord {
    /// File name without the directory.
    pub file: String,
    /// Workflow name, when the file parsed far enough to have one.
    pub workflow: Option<String>,
    pub outcome: SyncOutcome,
}

impl OutcomeRecord {
    pub fn new(file: impl Into<String>, workflow: Option<String>, outcome: SyncOutcome) -> Self {
        Self {
            file: file.into(),
            workflow,
            outcome,
        }
    }
}
