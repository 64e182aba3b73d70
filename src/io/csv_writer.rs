use csv_async::AsyncWriterBuilder;
use tokio::io::AsyncWrite;
use tokio_util::compat::TokioAsyncWriteCompatExt;

use super::error::IoError;
use crate::domain::PriceEntry;

/// Write price entries as comma-separated CSV with a `name,price,timestamp` header
pub async fn write_price_entries<W>(entries: &[PriceEntry], writer: W) -> Result<(), IoError>
where
    W: AsyncWrite + Unpin + Send,
{
    let mut serializer = AsyncWriterBuilder::new()
        .has_headers(true)
        .create_serializer(writer.compat_write());

    for entry in entries {
        serializer.serialize(entry).await?;
    }

    serializer.flush().await?;
    Ok(())
}
