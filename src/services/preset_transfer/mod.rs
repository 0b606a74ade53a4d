//! Preset Transfer Engine
//!
//! Reconciles the prompt entries of two presets and keeps each preset's
//! order lists consistent with its entry collection.
//!
//! Architecture:
//! - extract.rs:  Entry Extractor (reconciliation candidates)
//! - diff.rs:     Diff Classifier (new / same / different / source)
//! - order.rs:    Order-List Manager (seeding, raw order vs. enabled-eligible view)
//! - position.rs: Position Resolver (top / bottom / after-K)
//! - merge.rs:    Merge Engine (overwrite by name, create and place new entries)
//! - delete.rs:   Delete Engine (remove by name, prune order references)
//! - revision.rs: Snapshot revisions for the save hook
//! - service.rs:  Async facade over the host store and id generator

pub mod delete;
pub mod diff;
pub mod extract;
pub mod merge;
pub mod order;
pub mod position;
pub mod revision;
pub mod service;

use preset_transfer_core::{DEFAULT_INJECTION_DEPTH, GLOBAL_OWNER_ID};

use crate::models::settings::TransferConfig;

pub use delete::{delete_entries, DeleteOutcome};
pub use diff::{classify, select_by_status};
pub use extract::extract_candidates;
pub use merge::{merge_entries, MergeOutcome};
pub use order::{
    get_or_create_owner_order, EnabledEligibleView, RawIndex, RawOrder, ViewIndex,
    DEFAULT_ORDER_SEED,
};
pub use position::{insert_reference, resolve_index};
pub use revision::{compute_revision, PresetSnapshot};
pub use service::PresetTransferService;

/// Knobs shared by the merge and delete engines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Owner whose order list is read and written
    pub owner_id: i64,
    /// Depth given to new or overwritten entries that carry none
    pub default_injection_depth: i64,
    /// Prune dangling order references whose identifier contains a deleted name
    pub name_containment_fallback: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            owner_id: GLOBAL_OWNER_ID,
            default_injection_depth: DEFAULT_INJECTION_DEPTH,
            name_containment_fallback: true,
        }
    }
}

impl From<&TransferConfig> for EngineOptions {
    fn from(config: &TransferConfig) -> Self {
        Self {
            owner_id: config.owner_id,
            default_injection_depth: config.default_injection_depth,
            name_containment_fallback: config.name_containment_fallback,
        }
    }
}
