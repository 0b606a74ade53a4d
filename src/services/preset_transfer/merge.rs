//! Merge Engine
//!
//! Applies selected entries to a target document in memory.
//!
//! - A selection whose name matches an existing entry overwrites that
//!   entry's mutable fields and keeps its identifier and position. With
//!   several same-named entries the first in collection order is used.
//! - Anything else becomes a new entry with a minted identifier, placed with
//!   the Position Resolver.
//!
//! Nothing here touches the store; the caller saves (or drops) the document.

use std::collections::HashMap;

use preset_transfer_core::{
    CoreError, CoreResult, IdGenerator, InjectionPosition, OrderReference, PresetDocument,
    PromptEntry, PromptRole,
};

use crate::models::transfer::{CreatedEntry, PositionToken, SelectedEntry};
use crate::services::preset_transfer::order::get_or_create_owner_order;
use crate::services::preset_transfer::position::insert_reference;
use crate::services::preset_transfer::EngineOptions;

/// Regeneration attempts before an identifier collision becomes an error.
const MAX_ID_ATTEMPTS: usize = 8;

/// What a merge did to the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub overwritten: Vec<String>,
    pub created: Vec<CreatedEntry>,
}

/// Merge `selected` into `document`, in selection order.
pub fn merge_entries(
    document: &mut PresetDocument,
    selected: &[SelectedEntry],
    position: PositionToken,
    ids: &dyn IdGenerator,
    options: &EngineOptions,
) -> CoreResult<MergeOutcome> {
    let mut outcome = MergeOutcome::default();

    for selection in selected {
        let existing = if selection.is_new_blank {
            None
        } else {
            find_entry_by_name(document, &selection.entry.name)
        };

        match existing {
            Some(idx) => {
                let identifier = overwrite_entry(&mut document.prompts[idx], &selection.entry, options);
                get_or_create_owner_order(document, options.owner_id).enable_or_append(&identifier);
                outcome.overwritten.push(selection.entry.name.clone());
            }
            None => {
                if selection.is_new_blank && find_entry_by_name(document, &selection.entry.name).is_some() {
                    tracing::warn!(
                        "New entry '{}' shares its name with an existing entry",
                        selection.entry.name
                    );
                }
                let identifier = mint_identifier(document, ids)?;
                let entry = build_new_entry(&identifier, &selection.entry, options);
                document.prompts.push(entry);
                insert_reference(
                    document,
                    options.owner_id,
                    position,
                    OrderReference::new(identifier.clone(), true),
                );
                outcome.created.push(CreatedEntry {
                    name: selection.entry.name.clone(),
                    identifier,
                });
            }
        }
    }

    Ok(outcome)
}

/// Index of the first entry named `name`.
fn find_entry_by_name(document: &PresetDocument, name: &str) -> Option<usize> {
    document.prompts.iter().position(|e| e.name == name)
}

/// Replace the mutable fields of `target`; returns its (unchanged) identifier.
fn overwrite_entry(target: &mut PromptEntry, source: &PromptEntry, options: &EngineOptions) -> String {
    let fields = ResolvedFields::from_selection(source, options);
    target.role = Some(fields.role);
    target.content = Some(fields.content);
    target.injection_depth = Some(fields.injection_depth);
    target.injection_position = Some(fields.injection_position);
    target.forbid_overrides = Some(fields.forbid_overrides);
    target.identifier.clone()
}

fn build_new_entry(identifier: &str, source: &PromptEntry, options: &EngineOptions) -> PromptEntry {
    let fields = ResolvedFields::from_selection(source, options);
    PromptEntry {
        identifier: identifier.to_string(),
        name: source.name.clone(),
        role: Some(fields.role),
        content: Some(fields.content),
        injection_depth: Some(fields.injection_depth),
        injection_position: Some(fields.injection_position),
        system_prompt: Some(false),
        marker: Some(false),
        forbid_overrides: Some(fields.forbid_overrides),
        extra: source.extra.clone(),
        ..Default::default()
    }
}

/// Selected values with defaults filled in for anything unset.
struct ResolvedFields {
    role: PromptRole,
    content: String,
    injection_depth: i64,
    injection_position: InjectionPosition,
    forbid_overrides: bool,
}

impl ResolvedFields {
    fn from_selection(source: &PromptEntry, options: &EngineOptions) -> Self {
        Self {
            role: source.role.clone().unwrap_or(PromptRole::System),
            content: source.content.clone().unwrap_or_default(),
            injection_depth: source.injection_depth.unwrap_or(options.default_injection_depth),
            injection_position: source.injection_position.unwrap_or(InjectionPosition::Relative),
            forbid_overrides: source.forbid_overrides.unwrap_or(false),
        }
    }
}

/// A generated identifier not yet used by any entry in `document`.
fn mint_identifier(document: &PresetDocument, ids: &dyn IdGenerator) -> CoreResult<String> {
    for _ in 0..MAX_ID_ATTEMPTS {
        let candidate = ids.generate_identifier();
        if !candidate.is_empty() && !document.contains_identifier(&candidate) {
            return Ok(candidate);
        }
        tracing::debug!("Generated identifier '{}' is taken, retrying", candidate);
    }
    Err(CoreError::internal(format!(
        "identifier generator produced no unused value in {} attempts",
        MAX_ID_ATTEMPTS
    )))
}

/// Names carried by more than one entry of `document`, for diagnostics.
pub fn duplicate_entry_names(document: &PresetDocument) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for entry in document.prompts.iter().filter(|e| !e.name.trim().is_empty()) {
        *counts.entry(entry.name.as_str()).or_insert(0) += 1;
    }
    let mut names: Vec<String> = counts
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(name, _)| name.to_string())
        .collect();
    names.sort();
    names
}
