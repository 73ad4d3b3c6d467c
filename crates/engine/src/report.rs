//! End-of-run summary.

use flowsync_types::{OutcomeRecord, SyncOutcome};
use tracing::info;

/// Advisory shown after a run that imported or updated at least one workflow.
pub const CREDENTIAL_GUIDANCE: &[&str] = &[
    "⚠ IMPORTANT: configure credentials for imported workflows",
    "   Some nodes (Redis, PostgreSQL, ...) require credentials to be set.",
    "   Open each workflow in the editor and configure the credentials manually.",
    "   For Redis inside the compose network, use:",
    "     - Host: redis (the compose service name, not the container name)",
    "     - Port: 6379 (the internal container port, not the host-mapped port)",
    "     - Password: leave empty if Redis has no password",
];

/// Counts per outcome kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub imported: usize,
    pub updated: usize,
    pub skipped: usize,
    pub planned: usize,
    pub errored: usize,
}

impl Tally {
    /// Workflows that were written successfully.
    pub fn succeeded(&self) -> usize {
        self.imported + self.updated
    }
}

/// Ordered outcome records for one run.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    records: Vec<OutcomeRecord>,
}

impl SyncReport {
    pub fn record(&mut self, record: OutcomeRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[OutcomeRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn tally(&self) -> Tally {
        self.records.iter().fold(Tally::default(), |mut tally, record| {
            match record.outcome {
                SyncOutcome::Imported { .. } => tally.imported += 1,
                SyncOutcome::Updated { .. } => tally.updated += 1,
                SyncOutcome::SkippedExists => tally.skipped += 1,
                SyncOutcome::Planned(_) => tally.planned += 1,
                SyncOutcome::Error { .. } => tally.errored += 1,
            }
            tally
        })
    }

    pub fn has_errors(&self) -> bool {
        self.records.iter().any(|record| record.outcome.is_error())
    }

    /// Process exit status: 1 if any file errored, otherwise 0.
    pub fn exit_code(&self) -> u8 {
        u8::from(self.has_errors())
    }

    /// Log the summary, and the credential guidance when something was written.
    pub fn log_summary(&self) {
        let tally = self.tally();
        let rule = "=".repeat(60);

        info!("{rule}");
        info!("Import summary:");
        info!("  ✓ Successfully imported: {}", tally.imported);
        if tally.updated > 0 {
            info!("  ↻ Updated: {}", tally.updated);
        }
        info!("  ⊘ Skipped (already exists): {}", tally.skipped);
        if tally.planned > 0 {
            info!("  … Planned (dry run): {}", tally.planned);
        }
        info!("  ✗ Errors: {}", tally.errored);
        info!("{rule}");

        for record in self.records.iter().filter(|record| record.outcome.is_error()) {
            info!(file = %record.file, "  {}", record.outcome);
        }

        if tally.succeeded() > 0 {
            for line in CREDENTIAL_GUIDANCE {
                info!("{line}");
            }
        }
    }
}
