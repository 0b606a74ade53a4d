//! Preset Transfer Service
//!
//! Host-facing entry point. Each write operation is one read-modify-write:
//!
//! 1. fetch a fresh snapshot of the target preset
//! 2. mutate a private copy synchronously (merge or delete engine)
//! 3. await the store's whole-document save
//!
//! A failed save surfaces as `CoreError::Storage` and the mutated copy is
//! dropped, so the stored preset is exactly what it was before the call.

use std::collections::HashSet;
use std::sync::Arc;

use preset_transfer_core::{CoreError, CoreResult, IdGenerator, PresetStore, PromptEntry};

use crate::models::diff::DiffRecord;
use crate::models::transfer::{
    DeleteReport, DeleteRequest, InsertRequest, MergeReport, PositionToken, SelectedEntry,
    TransferRequest,
};
use crate::services::preset_transfer::delete::delete_entries;
use crate::services::preset_transfer::diff::classify;
use crate::services::preset_transfer::extract::extract_candidates;
use crate::services::preset_transfer::merge::{duplicate_entry_names, merge_entries};
use crate::services::preset_transfer::revision::{compute_revision, PresetSnapshot};
use crate::services::preset_transfer::EngineOptions;

/// Compare, transfer, insert and delete prompt entries between presets.
pub struct PresetTransferService {
    store: Arc<dyn PresetStore>,
    ids: Arc<dyn IdGenerator>,
    options: EngineOptions,
}

impl PresetTransferService {
    /// Create a service with default engine options.
    pub fn new(store: Arc<dyn PresetStore>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            store,
            ids,
            options: EngineOptions::default(),
        }
    }

    /// Replace the engine options.
    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    // ========================================================================
    // Read path
    // ========================================================================

    /// Names of all presets in the store.
    pub async fn list_presets(&self) -> CoreResult<Vec<String>> {
        self.store.list_preset_names().await
    }

    /// Fetch a preset together with its revision.
    pub async fn snapshot(&self, name: &str) -> CoreResult<PresetSnapshot> {
        let document = self.store.fetch_preset(name).await?;
        PresetSnapshot::new(name, document)
    }

    /// Reconciliation candidates of a preset.
    pub async fn load_entries(&self, name: &str) -> CoreResult<Vec<PromptEntry>> {
        let document = self.store.fetch_preset(name).await?;
        Ok(extract_candidates(&document))
    }

    /// Classify the entries of `source` against `target`.
    ///
    /// Without a target every record is tagged `source`.
    pub async fn compare(&self, source: &str, target: Option<&str>) -> CoreResult<Vec<DiffRecord>> {
        let source_entries = self.load_entries(source).await?;
        let target_entries = match target {
            Some(name) => Some(self.load_entries(name).await?),
            None => None,
        };
        Ok(classify(&source_entries, target_entries.as_deref()))
    }

    // ========================================================================
    // Write path
    // ========================================================================

    /// Merge selected entries into the target preset and save it.
    pub async fn transfer(&self, request: TransferRequest) -> CoreResult<MergeReport> {
        if request.entries.is_empty() {
            return Err(CoreError::invalid_selection("no entries selected for transfer"));
        }
        validate_names(request.entries.iter().map(|s| s.entry.name.as_str()))?;
        let position = request
            .position
            .ok_or_else(|| CoreError::missing_position("transfer needs a position for new entries"))?;

        self.merge_and_save(&request.target_preset, &request.entries, position).await
    }

    /// Create one new entry in the target preset and save it.
    pub async fn insert_entry(&self, request: InsertRequest) -> CoreResult<MergeReport> {
        validate_names(std::iter::once(request.entry.name.as_str()))?;
        let position = request
            .position
            .ok_or_else(|| CoreError::missing_position("insert needs a position"))?;

        let selection = [SelectedEntry::new_blank(request.entry)];
        self.merge_and_save(&request.target_preset, &selection, position).await
    }

    /// Delete entries by name from the target preset and save it.
    pub async fn delete_entries(&self, request: DeleteRequest) -> CoreResult<DeleteReport> {
        let names: HashSet<String> = request
            .names
            .into_iter()
            .filter(|n| !n.trim().is_empty())
            .collect();
        if names.is_empty() {
            return Err(CoreError::invalid_selection("no entries selected for deletion"));
        }

        let mut snapshot = self.snapshot(&request.target_preset).await?;
        let outcome = delete_entries(&mut snapshot.document, &names, &self.options);
        let revision = self.commit(&snapshot).await?;

        tracing::info!(
            "Deleted {} entries from preset '{}' ({} order references pruned)",
            outcome.removed.len(),
            snapshot.name,
            outcome.pruned_references
        );

        Ok(DeleteReport {
            preset: snapshot.name,
            removed: outcome.removed,
            pruned_references: outcome.pruned_references,
            heuristic_matches: outcome.heuristic_matches,
            revision,
        })
    }

    async fn merge_and_save(
        &self,
        target: &str,
        selection: &[SelectedEntry],
        position: PositionToken,
    ) -> CoreResult<MergeReport> {
        let mut snapshot = self.snapshot(target).await?;

        let duplicates = duplicate_entry_names(&snapshot.document);
        if !duplicates.is_empty() {
            tracing::warn!(
                "Preset '{}' has duplicate entry names {:?}; merges match the first of each",
                target,
                duplicates
            );
        }

        let outcome = merge_entries(
            &mut snapshot.document,
            selection,
            position,
            self.ids.as_ref(),
            &self.options,
        )?;
        let revision = self.commit(&snapshot).await?;

        tracing::info!(
            "Merged into preset '{}': {} overwritten, {} created at {}",
            snapshot.name,
            outcome.overwritten.len(),
            outcome.created.len(),
            position
        );

        Ok(MergeReport {
            preset: snapshot.name,
            overwritten: outcome.overwritten,
            created: outcome.created,
            revision,
        })
    }

    /// Save a mutated snapshot; any store error becomes a storage failure.
    async fn commit(&self, snapshot: &PresetSnapshot) -> CoreResult<String> {
        self.store
            .save_preset(&snapshot.name, &snapshot.document, Some(&snapshot.revision))
            .await
            .map_err(|e| match e {
                CoreError::Storage(_) => e,
                other => CoreError::storage(other.to_string()),
            })?;
        compute_revision(&snapshot.document)
    }
}

fn validate_names<'a>(names: impl IntoIterator<Item = &'a str>) -> CoreResult<()> {
    for name in names {
        if name.trim().is_empty() {
            return Err(CoreError::invalid_selection("selected entry has an empty name"));
        }
    }
    Ok(())
}
