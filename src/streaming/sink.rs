use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::ImportBatch;

/// Destination for completed chunks.
///
/// Called at most once per dispatched chunk, never concurrently for the same
/// chunk. The returned error is recorded against the chunk and does not stop
/// the stream.
#[async_trait]
pub trait ChunkSink: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Consume one batch
    async fn import(&self, cancel: &CancellationToken, batch: ImportBatch) -> Result<(), Self::Error>;
}

#[async_trait]
impl<T: ChunkSink + ?Sized> ChunkSink for Arc<T> {
    type Error = T::Error;

    async fn import(&self, cancel: &CancellationToken, batch: ImportBatch) -> Result<(), Self::Error> {
        (**self).import(cancel, batch).await
    }
}
