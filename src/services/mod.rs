//! Services
//!
//! Business logic services for the crate.

pub mod preset_transfer;

pub use preset_transfer::{EngineOptions, PresetTransferService};
