pub mod concurrent;
pub mod error;
pub mod query;
pub mod traits;

// Re-export commonly used types
pub use concurrent::ConcurrentPriceStore;
pub use error::StorageError;
pub use query::{Pagination, SortField, SortOption, SortOptions, SortOrder};
pub use traits::{PriceEntryReader, PriceStore};
