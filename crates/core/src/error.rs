//! Core Error Types
//!
//! Errors surfaced by the reconciliation engine and by the store and id
//! generator boundaries. Dependency-free apart from thiserror, so store
//! implementations in other crates can construct them directly.

use thiserror::Error;

/// Core error type for the preset transfer workspace.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Named preset (or the document it should contain) is missing
    #[error("Not found: {0}")]
    NotFound(String),

    /// Operation needs at least one selected entry
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// Operation needs a position token and none was given
    #[error("Missing position: {0}")]
    MissingPosition(String),

    /// The store rejected a save; nothing was written
    #[error("Storage failure: {0}")]
    Storage(String),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an invalid selection error
    pub fn invalid_selection(msg: impl Into<String>) -> Self {
        Self::InvalidSelection(msg.into())
    }

    /// Create a missing position error
    pub fn missing_position(msg: impl Into<String>) -> Self {
        Self::MissingPosition(msg.into())
    }

    /// Create a storage failure
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error came from the save boundary.
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, CoreError::Storage(_))
    }
}

/// Convert CoreError to a string
impl From<CoreError> for String {
    fn from(err: CoreError) -> String {
        err.to_string()
    }
}
