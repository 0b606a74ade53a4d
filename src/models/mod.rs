//! Data Models
//!
//! Requests, reports and settings exchanged with the transfer service.

pub mod diff;
pub mod settings;
pub mod transfer;

pub use diff::*;
pub use settings::*;
pub use transfer::*;
