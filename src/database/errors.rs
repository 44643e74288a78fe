use thiserror::Error;

/// All errors that can be returned by a `DatabaseServiceProvider`
#[derive(Error, Debug)]
pub enum StorageError {
    /// No record with the given identifier
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Optimistic concurrency conflict: the stored version no longer matches
    /// the version the caller read
    #[error("concurrent conflict on {entity} {id}: expected version {expected_version}")]
    ConcurrentConflict {
        entity: &'static str,
        id: String,
        expected_version: i64,
    },

    #[error("{entity} already exists: {id}")]
    AlreadyExists { entity: &'static str, id: String },

    /// Stored data could not be mapped back into the domain model
    #[error("invalid stored data for {entity} {id}: {reason}")]
    InvalidData {
        entity: &'static str,
        id: String,
        reason: String,
    },

    /// A backend-specific failure (connection, pool exhaustion, ...)
    #[error("storage backend error: {0}")]
    Backend(String),

    #[cfg(feature = "postgres")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StorageError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::ConcurrentConflict { .. })
    }
}

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
