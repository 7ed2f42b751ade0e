//! Storage error types.

/// Errors raised by the persistence layer.
///
/// `Unavailable` only appears while probing for a durable backing and is
/// consumed by the in-memory fallback; callers of an opened store see
/// `Backend` and `Serde`, both of which are non-fatal to the session.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("persistent backing unavailable: {0}")]
    Unavailable(String),

    #[error("storage backend operation failed: {0}")]
    Backend(#[from] redb::Error),

    #[error("record serialization failed: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;

macro_rules! backend_error_from {
    ($($err:ty),+ $(,)?) => {
        $(
            impl From<$err> for StorageError {
                fn from(err: $err) -> Self {
                    Self::Backend(redb::Error::from(err))
                }
            }
        )+
    };
}

backend_error_from!(
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);
