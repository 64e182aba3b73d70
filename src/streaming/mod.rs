pub mod chunk;
pub mod error;
pub mod processor;
pub mod sink;

// Re-export commonly used types
pub use chunk::{Chunk, MAX_PARSING_ERRORS, RowError};
pub use error::PipelineError;
pub use processor::{ChunkStreamProcessor, DEFAULT_CHUNK_SIZE};
pub use sink::ChunkSink;
