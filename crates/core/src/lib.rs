//! Preset Transfer Core
//!
//! Foundational types for the preset transfer workspace: the preset document
//! model, the error type, and the traits a host implements to plug storage
//! and identifier minting into the engine. This crate has no dependencies on
//! the engine, the file store or configuration.
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `document` - Preset document model (`PresetDocument`, `PromptEntry`, `OwnerOrderList`)
//! - `layout` - Shape-preserving (de)serialization behind the document model
//! - `store` - Host boundary traits (`PresetStore`, `IdGenerator`)

pub mod document;
pub mod error;
pub mod layout;
pub mod store;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Document Model ─────────────────────────────────────────────────────
pub use document::{
    InjectionPosition, OrderReference, OwnerOrderList, PresetDocument, PromptEntry, PromptRole,
    DEFAULT_INJECTION_DEPTH, GLOBAL_OWNER_ID,
};
pub use layout::ItemLayout;

// ── Host Boundary ──────────────────────────────────────────────────────
pub use store::{IdGenerator, PresetStore};
