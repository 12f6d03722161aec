/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique key already taken
    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    /// Rejected input (e.g. an invite limit of zero)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// Stored value could not be decoded
    #[error("Corrupt record: {0}")]
    Corrupt(String),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StorageError {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

impl From<StorageError> for annil_core::AnnilError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { entity, id } => annil_core::AnnilError::not_found(entity, id),
            StorageError::InvalidInput(msg) => annil_core::AnnilError::invalid_input(msg),
            other => annil_core::AnnilError::storage(other.to_string()),
        }
    }
}
