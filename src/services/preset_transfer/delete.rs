//! Delete Engine
//!
//! Removes every entry whose name is in the deletion set and prunes the
//! order references that pointed at them.
//!
//! References are matched by the deleted entries' identifiers, in every
//! owner list. A second, heuristic pass is available for the configured
//! owner's list: a reference that no longer resolves to any entry and whose
//! identifier contains a deleted entry's name is pruned as well. The
//! heuristic is restricted to dangling references so it can never remove a
//! reference to a live entry, and it can be switched off with
//! `EngineOptions::name_containment_fallback`.

use std::collections::HashSet;

use preset_transfer_core::PresetDocument;

use crate::models::transfer::RemovedEntry;
use crate::services::preset_transfer::EngineOptions;

/// What a delete did to the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub removed: Vec<RemovedEntry>,
    pub pruned_references: usize,
    pub heuristic_matches: usize,
}

/// Delete every entry whose name is in `names`.
pub fn delete_entries(
    document: &mut PresetDocument,
    names: &HashSet<String>,
    options: &EngineOptions,
) -> DeleteOutcome {
    let mut outcome = DeleteOutcome::default();

    let mut kept = Vec::with_capacity(document.prompts.len());
    for entry in document.prompts.drain(..) {
        if names.contains(&entry.name) {
            outcome.removed.push(RemovedEntry {
                name: entry.name,
                identifier: entry.identifier,
            });
        } else {
            kept.push(entry);
        }
    }
    document.prompts = kept;

    if outcome.removed.is_empty() {
        return outcome;
    }

    let deleted_ids: HashSet<&str> = outcome.removed.iter().map(|r| r.identifier.as_str()).collect();
    let deleted_names: Vec<&str> = outcome.removed.iter().map(|r| r.name.as_str()).collect();
    let live_ids: HashSet<&str> = document.prompts.iter().map(|e| e.identifier.as_str()).collect();

    for list in document.prompt_order.iter_mut() {
        let use_heuristic = options.name_containment_fallback && list.is_for(options.owner_id);
        list.order.retain(|reference| {
            let id = reference.identifier.as_str();
            if deleted_ids.contains(id) {
                outcome.pruned_references += 1;
                return false;
            }
            if use_heuristic && !live_ids.contains(id) {
                if let Some(name) = deleted_names.iter().find(|name| id.contains(*name)) {
                    tracing::warn!(
                        "Pruning dangling order reference '{}' by name match with deleted entry '{}'",
                        id,
                        name
                    );
                    outcome.pruned_references += 1;
                    outcome.heuristic_matches += 1;
                    return false;
                }
            }
            true
        });
    }

    outcome
}
