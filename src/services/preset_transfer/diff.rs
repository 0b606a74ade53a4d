//! Diff Classifier
//!
//! Classifies each source entry against a target collection by name.
//!
//! Names are not unique keys. When the target holds several entries with the
//! same name, the first one in collection order is the one compared against.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use preset_transfer_core::{InjectionPosition, PromptEntry, PromptRole};

use crate::models::diff::{DiffRecord, DiffStatus};
use crate::models::transfer::SelectedEntry;

/// The fields that decide `same` vs `different`.
#[derive(Debug, PartialEq, Eq)]
struct ComparedFields<'a> {
    content: Option<&'a str>,
    role: Option<&'a PromptRole>,
    injection_depth: Option<i64>,
    injection_position: Option<InjectionPosition>,
}

impl<'a> ComparedFields<'a> {
    fn of(entry: &'a PromptEntry) -> Self {
        Self {
            content: entry.content.as_deref(),
            role: entry.role.as_ref(),
            injection_depth: entry.injection_depth,
            injection_position: entry.injection_position,
        }
    }
}

/// Build the first-wins name lookup over `entries`.
pub fn index_by_name(entries: &[PromptEntry]) -> HashMap<&str, &PromptEntry> {
    let mut by_name: HashMap<&str, &PromptEntry> = HashMap::with_capacity(entries.len());
    for entry in entries {
        match by_name.entry(entry.name.as_str()) {
            Entry::Occupied(first) => {
                tracing::warn!(
                    "Duplicate entry name '{}' ({} and {}), matching against the first",
                    entry.name,
                    first.get().identifier,
                    entry.identifier
                );
            }
            Entry::Vacant(slot) => {
                slot.insert(entry);
            }
        }
    }
    by_name
}

/// Classify every source entry.
///
/// With no `target`, every record is tagged `source`. The result has one
/// record per source entry, in source order.
pub fn classify(source: &[PromptEntry], target: Option<&[PromptEntry]>) -> Vec<DiffRecord> {
    let Some(target) = target else {
        return source
            .iter()
            .map(|entry| DiffRecord {
                entry: entry.clone(),
                status: DiffStatus::Source,
            })
            .collect();
    };

    let by_name = index_by_name(target);

    source
        .iter()
        .map(|entry| {
            let status = match by_name.get(entry.name.as_str()) {
                None => DiffStatus::New,
                Some(existing) if ComparedFields::of(entry) == ComparedFields::of(existing) => {
                    DiffStatus::Same
                }
                Some(_) => DiffStatus::Different,
            };
            DiffRecord {
                entry: entry.clone(),
                status,
            }
        })
        .collect()
}

/// Turn the records whose status is in `statuses` into merge selections.
pub fn select_by_status(records: &[DiffRecord], statuses: &[DiffStatus]) -> Vec<SelectedEntry> {
    records
        .iter()
        .filter(|r| statuses.contains(&r.status))
        .cloned()
        .map(SelectedEntry::from)
        .collect()
}
