//! Host Boundary Traits
//!
//! The engine never touches storage or id minting directly. Hosts plug in:
//!
//! - `PresetStore` - list, fetch and whole-document save of named presets
//! - `IdGenerator` - opaque identifiers for newly created entries
//!
//! Keeping these as traits lets tests drive the engine against in-memory
//! doubles and lets a host back presets with files, a database or an RPC.

use async_trait::async_trait;

use crate::document::PresetDocument;
use crate::error::CoreResult;

/// Named preset storage.
///
/// Saves are whole-document replaces. A failing save must leave the
/// previously stored document as it was.
#[async_trait]
pub trait PresetStore: Send + Sync {
    /// Names of all stored presets, in the store's display order.
    async fn list_preset_names(&self) -> CoreResult<Vec<String>>;

    /// Fetch a preset by name.
    ///
    /// # Returns
    /// - `Ok(PresetDocument)` - a private copy the caller may mutate
    /// - `Err(CoreError::NotFound)` - no preset with that name
    async fn fetch_preset(&self, name: &str) -> CoreResult<PresetDocument>;

    /// Replace the stored preset with `document`.
    ///
    /// `base_revision` is the revision of the snapshot the caller started
    /// from. Stores may compare it against what they currently hold; none is
    /// required to reject on mismatch.
    ///
    /// # Returns
    /// - `Ok(())` - the document is durably stored
    /// - `Err(CoreError::Storage)` - nothing was written
    async fn save_preset(
        &self,
        name: &str,
        document: &PresetDocument,
        base_revision: Option<&str>,
    ) -> CoreResult<()>;
}

/// Source of identifiers for new prompt entries.
pub trait IdGenerator: Send + Sync {
    /// A fresh identifier. Must be unique with overwhelming probability.
    fn generate_identifier(&self) -> String;
}

// Closures make handy generators in tests and small hosts.
impl<F> IdGenerator for F
where
    F: Fn() -> String + Send + Sync,
{
    fn generate_identifier(&self) -> String {
        self()
    }
}
