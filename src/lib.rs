//! Preset Transfer - Rust Library
//!
//! Compares, transfers, inserts and deletes prompt entries between
//! chat-completion presets while keeping each preset's per-owner order lists
//! consistent with its entry collection.
//! It includes:
//! - The reconciliation engine and its async service facade
//! - Storage layer (file-backed and in-memory preset stores, JSON config)
//! - Data models and utilities

pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

// Re-export the core crate's document model and host traits
pub use preset_transfer_core::{
    CoreError, CoreResult, IdGenerator, InjectionPosition, OrderReference, OwnerOrderList,
    PresetDocument, PresetStore, PromptEntry, PromptRole, GLOBAL_OWNER_ID,
};

pub use models::diff::{DiffRecord, DiffStatus, DiffSummary};
pub use models::settings::{TransferConfig, TransferConfigUpdate};
pub use models::transfer::{
    DeleteReport, DeleteRequest, InsertRequest, MergeReport, PositionToken, SelectedEntry,
    TransferRequest,
};
pub use services::{EngineOptions, PresetTransferService};
pub use storage::{ConfigService, FilePresetStore, MemoryPresetStore, UuidGenerator};
pub use utils::error::{AppError, AppResult};
