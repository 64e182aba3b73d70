pub mod entry;
pub mod error;
pub mod product;

// Re-export commonly used types
pub use entry::{Entry, ImportBatch, ImportTimestamp, timestamp_is_unset};
pub use error::DomainError;
pub use product::{Price, PriceEntry, PriceSnapshot, Product, ProductId, SnapshotId};
