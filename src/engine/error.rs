use thiserror::Error;

use crate::domain::DomainError;
use crate::storage::StorageError;

/// Failure of one product's write task in the reduce stage
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductImportError {
    #[error("product {product}: product upsert failed: {source}")]
    ProductUpsert {
        product: String,
        source: StorageError,
    },

    #[error("product {product}: product lookup failed: {source}")]
    ProductLookup {
        product: String,
        source: StorageError,
    },

    #[error("product {product}: price snapshot upsert failed: {source}")]
    SnapshotUpsert {
        product: String,
        source: StorageError,
    },

    #[error("product {product}: cancelled")]
    Cancelled { product: String },

    #[error("product {product}: task failed: {message}")]
    TaskFailed { product: String, message: String },
}

impl ProductImportError {
    /// Name of the product whose task failed
    pub fn product(&self) -> &str {
        match self {
            Self::ProductUpsert { product, .. }
            | Self::ProductLookup { product, .. }
            | Self::SnapshotUpsert { product, .. }
            | Self::Cancelled { product }
            | Self::TaskFailed { product, .. } => product,
        }
    }
}

/// Engine-level errors for importing a price batch
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Some product tasks failed; writes of the others stay committed
    #[error("partially failed ({failed} of {total} products failed): {}", join_failures(.failures))]
    PartialFailure {
        failed: usize,
        total: usize,
        failures: Vec<ProductImportError>,
    },

    #[error("import cancelled")]
    Cancelled,
}

impl From<DomainError> for EngineError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidInput(msg) => Self::InvalidInput(msg),
        }
    }
}

fn join_failures(failures: &[ProductImportError]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
