/// Store error type.
///
/// Statement and connection failures carry the driver error verbatim; the
/// remaining variants are raised before any statement reaches the server.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid database uri: {0}")]
    InvalidUri(String),

    #[error("empty arguments")]
    EmptyBatch,

    #[error("incorrect argument size: expected {expected}, got {got}")]
    ArgumentSize { expected: usize, got: usize },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
