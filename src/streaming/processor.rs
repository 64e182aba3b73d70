use futures::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::chunk::Chunk;
use super::error::PipelineError;
use super::sink::ChunkSink;
use crate::domain::{Entry, ImportTimestamp};
use crate::io::IoError;

/// Number of entries per chunk unless configured otherwise
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// Sequential chunked ingestion of a row stream into a sink.
///
/// Rows are read one at a time and accumulated into chunks of `chunk_size`
/// entries. Each full chunk, and the trailing partial one, is handed to the
/// sink before the next row is read. Row errors and sink failures are recorded
/// per chunk and reported together at the end; they never stop the stream.
pub struct ChunkStreamProcessor<K>
where
    K: ChunkSink,
{
    sink: K,
    chunk_size: usize,
}

/// Running tally of dispatched and failed chunks
#[derive(Default)]
struct ChunkTally {
    total: usize,
    entries: usize,
    reports: Vec<String>,
}

impl<K> ChunkStreamProcessor<K>
where
    K: ChunkSink,
{
    /// Create a new processor writing into `sink`
    ///
    /// # Example
    /// ```rust,ignore
    /// let importer = PriceImporter::new(Arc::new(ConcurrentPriceStore::new()));
    /// let processor = ChunkStreamProcessor::new(importer).with_chunk_size(500);
    /// ```
    pub fn new(sink: K) -> Self {
        Self {
            sink,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Set the number of entries per chunk (must be at least 1)
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Process a row stream, stamping every chunk with `timestamp`.
    ///
    /// Each stream item is one row; its 1-based position is the line number
    /// used in error reports. A terminal read error ends the stream after it
    /// is recorded on the current chunk.
    ///
    /// # Returns
    /// `Ok(())` when every chunk succeeded, otherwise
    /// `PipelineError::PartiallyProcessed` carrying each failed chunk's report.
    /// `PipelineError::Cancelled` when `cancel` fires between chunks.
    pub async fn process<S>(
        &self,
        cancel: &CancellationToken,
        mut stream: S,
        timestamp: ImportTimestamp,
    ) -> Result<(), PipelineError>
    where
        S: Stream<Item = Result<Entry, IoError>> + Unpin,
    {
        if self.chunk_size == 0 {
            return Err(PipelineError::InvalidInput(
                "chunk size: must be greater than 0".to_string(),
            ));
        }

        let mut tally = ChunkTally::default();
        let mut chunk_id: u64 = 1;
        let mut chunk = Chunk::new(chunk_id, self.chunk_size, timestamp);
        let mut line: u64 = 0;

        while let Some(row) = stream.next().await {
            line += 1;

            match row {
                Ok(entry) => {
                    chunk.add_entry(entry);
                    if chunk.is_full() {
                        self.dispatch(cancel, &mut chunk, &mut tally).await?;
                        chunk_id += 1;
                        chunk = Chunk::new(chunk_id, self.chunk_size, timestamp);
                    }
                }
                Err(e) if e.is_terminal() => {
                    error!(line, error = %e, "Row stream failed, stopping");
                    chunk.add_parsing_error(line, e);
                    break;
                }
                Err(e) => {
                    debug!(line, error = %e, "Skipping malformed row");
                    chunk.add_parsing_error(line, e);
                }
            }
        }

        // Trailing chunk: execute if it has rows, report if it only has errors
        if !chunk.is_empty() {
            self.dispatch(cancel, &mut chunk, &mut tally).await?;
        } else if chunk.is_failed() {
            tally.total += 1;
            Self::record_failure(&chunk, &mut tally);
        }

        info!(
            chunks = tally.total,
            entries = tally.entries,
            failed = tally.reports.len(),
            "Row stream processed"
        );

        if tally.reports.is_empty() {
            Ok(())
        } else {
            Err(PipelineError::PartiallyProcessed {
                failed: tally.reports.len(),
                total: tally.total,
                reports: tally.reports,
            })
        }
    }

    /// Execute one chunk against the sink and log its outcome
    async fn dispatch(
        &self,
        cancel: &CancellationToken,
        chunk: &mut Chunk,
        tally: &mut ChunkTally,
    ) -> Result<(), PipelineError> {
        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }

        chunk.execute(cancel, &self.sink).await;
        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }

        tally.total += 1;
        tally.entries += chunk.len();

        if chunk.is_failed() {
            Self::record_failure(chunk, tally);
        } else {
            info!(chunk_id = chunk.id(), entries = chunk.len(), "Chunk imported");
        }

        Ok(())
    }

    fn record_failure(chunk: &Chunk, tally: &mut ChunkTally) {
        let report = chunk.error_report();
        error!(chunk_id = chunk.id(), report = %report, "Chunk failed");
        tally.reports.push(report);
    }
}
