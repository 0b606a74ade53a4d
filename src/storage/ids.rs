//! Identifier Generation
//!
//! Default `IdGenerator` for hosts that have no identifier scheme of their own.

use preset_transfer_core::IdGenerator;

/// Mints identifiers from random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate_identifier(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}
