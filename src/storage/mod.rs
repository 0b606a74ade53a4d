//! Storage Layer
//!
//! Handles persistence: preset stores (file-backed and in-memory), identifier
//! minting, and the JSON engine config.

pub mod config;
pub mod ids;
pub mod memory;
pub mod presets;

pub use config::ConfigService;
pub use ids::UuidGenerator;
pub use memory::MemoryPresetStore;
pub use presets::FilePresetStore;
