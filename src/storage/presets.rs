//! File Preset Store
//!
//! One `<name>.json` file per preset inside a directory. Saves go to a
//! sibling temp file that is then renamed over the original, so a failed save
//! never leaves a half-written preset behind.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use preset_transfer_core::{CoreError, CoreResult, PresetDocument, PresetStore};

use crate::services::preset_transfer::compute_revision;

const PRESET_EXTENSION: &str = "json";

/// Preset store over a directory of JSON files.
#[derive(Debug, Clone)]
pub struct FilePresetStore {
    dir: PathBuf,
}

impl FilePresetStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path for `name`, rejecting names that would escape the directory.
    fn preset_path(&self, name: &str) -> CoreResult<PathBuf> {
        let trimmed = name.trim();
        if trimmed.is_empty()
            || trimmed.contains(['/', '\\'])
            || trimmed == "."
            || trimmed == ".."
        {
            return Err(CoreError::validation(format!("invalid preset name '{}'", name)));
        }
        Ok(self.dir.join(format!("{}.{}", name, PRESET_EXTENSION)))
    }

    async fn read_document(path: &Path) -> CoreResult<PresetDocument> {
        let content = fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    async fn write_atomically(path: &Path, content: &[u8]) -> std::io::Result<()> {
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content).await?;
        if let Err(e) = fs::rename(&tmp, path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e);
        }
        Ok(())
    }
}

#[async_trait]
impl PresetStore for FilePresetStore {
    async fn list_preset_names(&self) -> CoreResult<Vec<String>> {
        let mut names = Vec::new();
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(names),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(PRESET_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }

        names.sort_by_key(|n| n.to_lowercase());
        Ok(names)
    }

    async fn fetch_preset(&self, name: &str) -> CoreResult<PresetDocument> {
        let path = self.preset_path(name)?;
        match Self::read_document(&path).await {
            Err(CoreError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(CoreError::not_found(format!("preset '{}'", name)))
            }
            other => other,
        }
    }

    async fn save_preset(
        &self,
        name: &str,
        document: &PresetDocument,
        base_revision: Option<&str>,
    ) -> CoreResult<()> {
        let path = self.preset_path(name)?;

        if let Some(base) = base_revision {
            if let Ok(current) = Self::read_document(&path).await {
                let current_revision = compute_revision(&current)?;
                if current_revision != base {
                    tracing::warn!(
                        "Preset '{}' changed on disk since it was read; overwriting (last writer wins)",
                        name
                    );
                }
            }
        }

        let content = serde_json::to_vec_pretty(document)?;
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| CoreError::storage(format!("cannot create {}: {}", self.dir.display(), e)))?;
        Self::write_atomically(&path, &content)
            .await
            .map_err(|e| CoreError::storage(format!("cannot write preset '{}': {}", name, e)))?;

        tracing::debug!("Saved preset '{}' to {}", name, path.display());
        Ok(())
    }
}
