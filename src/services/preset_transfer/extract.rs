//! Entry Extractor
//!
//! Narrows a preset to the entries that take part in reconciliation.

use preset_transfer_core::{PresetDocument, PromptEntry};

/// Reconciliation candidates of `document`, in collection order.
///
/// System prompts, markers and blank-named entries are left out. The
/// document is not modified.
pub fn extract_candidates(document: &PresetDocument) -> Vec<PromptEntry> {
    document
        .prompts
        .iter()
        .filter(|e| e.is_reconciliation_candidate())
        .cloned()
        .collect()
}
