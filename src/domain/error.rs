use thiserror::Error;

/// Domain-level errors representing violated value invariants
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
