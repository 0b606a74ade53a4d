//! Diff Models
//!
//! Classification output shown to the user before a transfer. Never
//! persisted.

use serde::{Deserialize, Serialize};

use preset_transfer_core::PromptEntry;

/// Relationship of a source entry to the target collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffStatus {
    /// No target entry has this name
    New,
    /// Same name and identical content, role and injection settings
    Same,
    /// Same name, something differs
    Different,
    /// No target was compared
    Source,
}

impl DiffStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiffStatus::New => "new",
            DiffStatus::Same => "same",
            DiffStatus::Different => "different",
            DiffStatus::Source => "source",
        }
    }
}

impl std::fmt::Display for DiffStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A source entry together with its classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffRecord {
    #[serde(flatten)]
    pub entry: PromptEntry,
    pub status: DiffStatus,
}

/// Per-status counts for a list of records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub new: usize,
    pub same: usize,
    pub different: usize,
    pub source: usize,
}

impl DiffSummary {
    pub fn from_records(records: &[DiffRecord]) -> Self {
        let mut summary = Self::default();
        for record in records {
            match record.status {
                DiffStatus::New => summary.new += 1,
                DiffStatus::Same => summary.same += 1,
                DiffStatus::Different => summary.different += 1,
                DiffStatus::Source => summary.source += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.new + self.same + self.different + self.source
    }
}
