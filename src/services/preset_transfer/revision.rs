//! Document Revisions
//!
//! SHA-256 over a document's serialized JSON, taken when a preset is fetched.
//! The revision travels with the snapshot to `PresetStore::save_preset` so a
//! store can tell whether someone else wrote the preset in between.

use sha2::{Digest, Sha256};

use preset_transfer_core::{CoreResult, PresetDocument};

/// A fetched preset plus the revision it had when fetched.
#[derive(Debug, Clone)]
pub struct PresetSnapshot {
    pub name: String,
    pub document: PresetDocument,
    pub revision: String,
}

impl PresetSnapshot {
    pub fn new(name: impl Into<String>, document: PresetDocument) -> CoreResult<Self> {
        let revision = compute_revision(&document)?;
        Ok(Self {
            name: name.into(),
            document,
            revision,
        })
    }
}

/// Full hex SHA-256 of the document's JSON.
pub fn compute_revision(document: &PresetDocument) -> CoreResult<String> {
    let bytes = serde_json::to_vec(document)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex_encode(&hasher.finalize()))
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
