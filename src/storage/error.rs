use thiserror::Error;

/// Storage-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Entity not found")]
    NotFound,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Backend error: {0}")]
    Backend(String),
}
