//! Prelude module for convenient imports
//!
//! Import everything you need with: `use pricefeed::prelude::*;`

// Domain types
pub use crate::domain::{
    DomainError, Entry, ImportBatch, ImportTimestamp, Price, PriceEntry, PriceSnapshot, Product,
    ProductId, SnapshotId,
};

// Storage types
pub use crate::storage::{
    ConcurrentPriceStore, Pagination, PriceEntryReader, PriceStore, SortField, SortOptions,
    SortOrder, StorageError,
};

// Engine types
pub use crate::engine::{EngineError, PriceImporter, ProductImportError};

// IO types
pub use crate::io::{DEFAULT_DELIMITER, IoError, PriceRowStream, write_price_entries};

// Streaming types
pub use crate::streaming::{
    ChunkSink, ChunkStreamProcessor, DEFAULT_CHUNK_SIZE, MAX_PARSING_ERRORS, PipelineError,
};

// App types
pub use crate::app::{AppError, CliApp, CliArgs, ImportConfig, init_tracing};

// Cancellation context threaded through the pipeline
pub use tokio_util::sync::CancellationToken;
