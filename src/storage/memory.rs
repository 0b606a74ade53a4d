//! In-Memory Preset Store
//!
//! A `PresetStore` backed by a map, for tests and for hosts that keep presets
//! in memory already. Saves can be forced to fail to exercise the
//! all-or-nothing contract.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use preset_transfer_core::{CoreError, CoreResult, PresetDocument, PresetStore};

/// Presets kept in insertion order.
#[derive(Debug, Default)]
pub struct MemoryPresetStore {
    presets: Mutex<Vec<(String, PresetDocument)>>,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryPresetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a preset without going through `save_preset`.
    pub fn insert(&self, name: impl Into<String>, document: PresetDocument) {
        let name = name.into();
        if let Ok(mut presets) = self.presets.lock() {
            match presets.iter_mut().find(|(n, _)| *n == name) {
                Some((_, existing)) => *existing = document,
                None => presets.push((name, document)),
            }
        }
    }

    /// Current stored copy of a preset.
    pub fn get(&self, name: &str) -> Option<PresetDocument> {
        self.presets
            .lock()
            .ok()?
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, doc)| doc.clone())
    }

    /// Make every subsequent save fail (or succeed again).
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PresetStore for MemoryPresetStore {
    async fn list_preset_names(&self) -> CoreResult<Vec<String>> {
        let presets = self
            .presets
            .lock()
            .map_err(|_| CoreError::internal("lock poisoned"))?;
        Ok(presets.iter().map(|(n, _)| n.clone()).collect())
    }

    async fn fetch_preset(&self, name: &str) -> CoreResult<PresetDocument> {
        self.get(name)
            .ok_or_else(|| CoreError::not_found(format!("preset '{}'", name)))
    }

    async fn save_preset(
        &self,
        name: &str,
        document: &PresetDocument,
        _base_revision: Option<&str>,
    ) -> CoreResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(CoreError::storage(format!("save of preset '{}' rejected", name)));
        }
        let mut presets = self
            .presets
            .lock()
            .map_err(|_| CoreError::storage("lock poisoned"))?;
        match presets.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = document.clone(),
            None => presets.push((name.to_string(), document.clone())),
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
