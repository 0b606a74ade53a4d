//! Transfer Models
//!
//! Requests, selections and reports for the compare/transfer/insert/delete
//! operations, plus the position token callers use to say where new entries
//! go.

use std::convert::Infallible;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use preset_transfer_core::PromptEntry;

use crate::models::diff::DiffRecord;

// ============================================================================
// Position Token
// ============================================================================

/// Where a newly created entry is placed in the owner order list.
///
/// Parsed from `"top"`, `"bottom"` or `"after-<K>"`. Anything else reads as
/// `Bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PositionToken {
    /// Prepend to the raw order list
    Top,
    /// Append to the raw order list
    Bottom,
    /// Right after the K-th (0-based) enabled eligible entry
    After(usize),
}

impl PositionToken {
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        match token {
            "top" => PositionToken::Top,
            "bottom" => PositionToken::Bottom,
            _ => match token
                .strip_prefix("after-")
                .and_then(|k| k.parse::<usize>().ok())
            {
                Some(k) => PositionToken::After(k),
                None => {
                    tracing::debug!("Unrecognized position token '{}', using bottom", token);
                    PositionToken::Bottom
                }
            },
        }
    }
}

impl Default for PositionToken {
    fn default() -> Self {
        PositionToken::Bottom
    }
}

impl FromStr for PositionToken {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for PositionToken {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<PositionToken> for String {
    fn from(token: PositionToken) -> String {
        token.to_string()
    }
}

impl std::fmt::Display for PositionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PositionToken::Top => write!(f, "top"),
            PositionToken::Bottom => write!(f, "bottom"),
            PositionToken::After(k) => write!(f, "after-{}", k),
        }
    }
}

// ============================================================================
// Selections and Requests
// ============================================================================

/// An entry chosen for merging into a target preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedEntry {
    #[serde(flatten)]
    pub entry: PromptEntry,
    /// Created from scratch by the user; always inserted as a new entry.
    #[serde(default)]
    pub is_new_blank: bool,
}

impl SelectedEntry {
    pub fn new(entry: PromptEntry) -> Self {
        Self {
            entry,
            is_new_blank: false,
        }
    }

    pub fn new_blank(entry: PromptEntry) -> Self {
        Self {
            entry,
            is_new_blank: true,
        }
    }
}

impl From<DiffRecord> for SelectedEntry {
    fn from(record: DiffRecord) -> Self {
        Self::new(record.entry)
    }
}

/// Copy selected entries into a target preset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    pub target_preset: String,
    pub entries: Vec<SelectedEntry>,
    /// Placement of entries that do not exist in the target yet
    pub position: Option<PositionToken>,
}

/// Create one new entry in a preset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertRequest {
    pub target_preset: String,
    /// Field values of the new entry; `identifier` is ignored and minted.
    pub entry: PromptEntry,
    pub position: Option<PositionToken>,
}

/// Remove entries from a preset by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub target_preset: String,
    pub names: Vec<String>,
}

// ============================================================================
// Reports
// ============================================================================

/// An entry created by a merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedEntry {
    pub name: String,
    pub identifier: String,
}

/// An entry removed by a delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovedEntry {
    pub name: String,
    pub identifier: String,
}

/// Result of a saved transfer or insert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeReport {
    pub preset: String,
    /// Names of existing entries whose fields were replaced
    pub overwritten: Vec<String>,
    pub created: Vec<CreatedEntry>,
    /// Revision of the document as saved
    pub revision: String,
}

/// Result of a saved delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteReport {
    pub preset: String,
    pub removed: Vec<RemovedEntry>,
    /// Order references pruned across all owner lists
    pub pruned_references: usize,
    /// How many of those were matched only by the name-containment heuristic
    pub heuristic_matches: usize,
    pub revision: String,
}
