/// Core error types for Annil
use thiserror::Error;

/// Result type alias using `AnnilError`
pub type Result<T> = std::result::Result<T, AnnilError>;

/// Core error type for Annil
#[derive(Error, Debug)]
pub enum AnnilError {
    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A content source could not be reached or read
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Malformed request shape (bad catalog name, track out of range, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Account store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl AnnilError {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create a backend unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::BackendUnavailable(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Whether this error means the resource is missing (as opposed to unreachable)
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
