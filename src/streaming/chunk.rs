use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::sink::ChunkSink;
use crate::domain::{Entry, ImportBatch, ImportTimestamp};
use crate::io::IoError;

/// Maximum number of row errors kept per chunk; later ones are dropped
pub const MAX_PARSING_ERRORS: usize = 10;

/// Row-level error tagged with its 1-based line number
#[derive(Error, Debug)]
#[error("parsing line [{line}]: {source}")]
pub struct RowError {
    pub line: u64,
    pub source: IoError,
}

/// Bounded unit of parsed rows dispatched together to a sink.
///
/// Holds at most `capacity` entries and at most [`MAX_PARSING_ERRORS`] row
/// errors. Executed at most once; its entries move into the batch handed to
/// the sink.
pub struct Chunk {
    id: u64,
    timestamp: ImportTimestamp,
    capacity: usize,
    entries: Vec<Entry>,
    parsing_errors: Vec<RowError>,
    dropped_errors: usize,
    execution_error: Option<Box<dyn std::error::Error + Send + Sync>>,
    executed_entries: Option<usize>,
}

impl Chunk {
    /// Create an empty chunk
    pub fn new(id: u64, capacity: usize, timestamp: ImportTimestamp) -> Self {
        Self {
            id,
            timestamp,
            capacity,
            entries: Vec::with_capacity(capacity),
            parsing_errors: Vec::with_capacity(MAX_PARSING_ERRORS),
            dropped_errors: 0,
            execution_error: None,
            executed_entries: None,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Append an entry; callers check [`Chunk::is_full`] first
    pub fn add_entry(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    /// Record a row error unless the cap is reached
    pub fn add_parsing_error(&mut self, line: u64, source: IoError) {
        if self.parsing_errors.len() == MAX_PARSING_ERRORS {
            self.dropped_errors += 1;
            return;
        }
        self.parsing_errors.push(RowError { line, source });
    }

    pub fn parsing_errors(&self) -> &[RowError] {
        &self.parsing_errors
    }

    /// True when row errors were dropped because the cap was reached
    pub fn is_truncated(&self) -> bool {
        self.dropped_errors > 0
    }

    pub fn len(&self) -> usize {
        self.executed_entries.unwrap_or(self.entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() == self.capacity
    }

    /// True when any row error or an execution error was recorded
    pub fn is_failed(&self) -> bool {
        !self.parsing_errors.is_empty() || self.execution_error.is_some()
    }

    pub fn is_executed(&self) -> bool {
        self.executed_entries.is_some()
    }

    /// Hand the entries to the sink and record its outcome.
    ///
    /// The sink is invoked exactly once per chunk; later calls are ignored.
    pub async fn execute<K>(&mut self, cancel: &CancellationToken, sink: &K)
    where
        K: ChunkSink + ?Sized,
    {
        if self.is_executed() {
            warn!(chunk_id = self.id, "Chunk already executed, ignoring");
            return;
        }

        let entries = std::mem::take(&mut self.entries);
        self.executed_entries = Some(entries.len());

        let batch = ImportBatch::new(self.timestamp, entries);
        if let Err(e) = sink.import(cancel, batch).await {
            self.execution_error = Some(Box::new(e));
        }
    }

    /// Human-readable summary of everything that went wrong in this chunk
    pub fn error_report(&self) -> String {
        let parsing = if self.parsing_errors.is_empty() {
            "none".to_string()
        } else {
            let mut joined = self
                .parsing_errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            if self.is_truncated() {
                joined.push_str(", ...");
            }
            joined
        };

        let execution = match &self.execution_error {
            Some(e) => e.to_string(),
            None => "none".to_string(),
        };

        format!("chunk {}; parsing: {}; execution: {}", self.id, parsing, execution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageError;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::sync::Mutex;

    fn ts() -> ImportTimestamp {
        Utc.with_ymd_and_hms(2024, 2, 2, 10, 0, 0).unwrap()
    }

    #[derive(Default)]
    struct RecordingSink {
        batches: Mutex<Vec<ImportBatch>>,
        fail: bool,
    }

    #[async_trait]
    impl ChunkSink for RecordingSink {
        type Error = StorageError;

        async fn import(&self, _cancel: &CancellationToken, batch: ImportBatch) -> Result<(), StorageError> {
            self.batches.lock().unwrap().push(batch);
            if self.fail {
                return Err(StorageError::Backend("write rejected".to_string()));
            }
            Ok(())
        }
    }

    #[test]
    fn new_chunk_is_empty_and_healthy() {
        let chunk = Chunk::new(1, 3, ts());
        assert!(chunk.is_empty());
        assert!(!chunk.is_full());
        assert!(!chunk.is_failed());
        assert!(!chunk.is_executed());
    }

    #[test]
    fn becomes_full_at_capacity() {
        let mut chunk = Chunk::new(1, 2, ts());
        chunk.add_entry(Entry::new("A", 1));
        assert!(!chunk.is_full());
        chunk.add_entry(Entry::new("B", 2));
        assert!(chunk.is_full());
        assert_eq!(chunk.len(), 2);
    }

    #[test]
    fn parsing_error_marks_chunk_failed() {
        let mut chunk = Chunk::new(7, 3, ts());
        chunk.add_parsing_error(4, IoError::InvalidRowLength(3));

        assert!(chunk.is_failed());
        assert_eq!(chunk.parsing_errors().len(), 1);
        assert_eq!(
            chunk.error_report(),
            "chunk 7; parsing: parsing line [4]: invalid row length (3); execution: none"
        );
    }

    #[test]
    fn parsing_errors_are_capped_with_truncation_marker() {
        let mut chunk = Chunk::new(1, 3, ts());
        for line in 1..=15 {
            chunk.add_parsing_error(line, IoError::InvalidPrice("x".to_string()));
        }

        assert_eq!(chunk.parsing_errors().len(), MAX_PARSING_ERRORS);
        assert!(chunk.is_truncated());

        let report = chunk.error_report();
        assert_eq!(report.matches("parsing line [").count(), MAX_PARSING_ERRORS);
        assert!(report.contains("parsing line [10]"));
        assert!(!report.contains("parsing line [11]"));
        assert!(report.contains(", ...; execution"));
    }

    #[test]
    fn exactly_cap_errors_is_not_truncated() {
        let mut chunk = Chunk::new(1, 3, ts());
        for line in 1..=10 {
            chunk.add_parsing_error(line, IoError::InvalidRowLength(1));
        }

        assert!(!chunk.is_truncated());
        assert!(!chunk.error_report().contains("..."));
    }

    #[tokio::test]
    async fn execute_hands_entries_to_sink_once() {
        let sink = RecordingSink::default();
        let cancel = CancellationToken::new();
        let mut chunk = Chunk::new(1, 3, ts());
        chunk.add_entry(Entry::new("A", 10));
        chunk.add_entry(Entry::new("B", 20));

        chunk.execute(&cancel, &sink).await;
        chunk.execute(&cancel, &sink).await;

        let batches = sink.batches.lock().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].timestamp(), ts());
        assert_eq!(batches[0].entries(), &[Entry::new("A", 10), Entry::new("B", 20)]);

        assert!(chunk.is_executed());
        assert_eq!(chunk.len(), 2);
        assert!(!chunk.is_failed());
    }

    #[tokio::test]
    async fn execute_records_sink_error() {
        let sink = RecordingSink {
            fail: true,
            ..Default::default()
        };
        let mut chunk = Chunk::new(3, 3, ts());
        chunk.add_entry(Entry::new("A", 1));

        chunk.execute(&CancellationToken::new(), &sink).await;

        assert!(chunk.is_failed());
        assert_eq!(
            chunk.error_report(),
            "chunk 3; parsing: none; execution: Backend error: write rejected"
        );
    }
}
