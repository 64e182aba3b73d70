use std::path::Path;
use std::pin::Pin;
use std::task::{Context, Poll};

use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::{Stream, StreamExt};
use tokio::fs::File;
use tokio_util::compat::TokioAsyncReadCompatExt;

use super::error::IoError;
use super::parse::parse_row;
use crate::domain::Entry;

/// Async stream of parsed price rows from delimited text input.
///
/// Yields one item per row: the parsed entry, a row-level error, or a
/// terminal read error (see [`IoError::is_terminal`]). The feed has no header
/// row and rows of any length are read, so a wrong field count surfaces as
/// a row error instead of a reader failure.
pub struct PriceRowStream {
    inner: Pin<Box<dyn Stream<Item = Result<Entry, IoError>> + Send>>,
}

impl PriceRowStream {
    /// Create a new row stream from an async reader
    pub fn new<R>(reader: R, delimiter: u8) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let csv_reader = AsyncReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .flexible(true)
            .create_reader(reader);

        let stream = csv_reader.into_records().map(|result| {
            result.map_err(IoError::from).and_then(|record| {
                let fields: Vec<&str> = record.iter().collect();
                parse_row(&fields)
            })
        });

        Self {
            inner: Box::pin(stream),
        }
    }

    /// Create a new row stream from a file path
    ///
    /// # Example
    /// ```rust,ignore
    /// let rows = PriceRowStream::from_file("prices.csv", DEFAULT_DELIMITER).await?;
    /// ```
    pub async fn from_file(path: impl AsRef<Path>, delimiter: u8) -> Result<Self, IoError> {
        let file = File::open(path.as_ref()).await?;
        Ok(Self::new(file.compat(), delimiter))
    }
}

impl Stream for PriceRowStream {
    type Item = Result<Entry, IoError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::parse::DEFAULT_DELIMITER;
    use futures::io::Cursor;
    use std::io::Write;

    fn stream_of(data: &'static str) -> PriceRowStream {
        PriceRowStream::new(Cursor::new(data.as_bytes()), DEFAULT_DELIMITER)
    }

    #[tokio::test]
    async fn reads_valid_rows_in_order() {
        let mut stream = stream_of("Product_1;1\nProduct_2;2\nProduct_1;3\n");

        assert_eq!(stream.next().await.unwrap().unwrap(), Entry::new("Product_1", 1));
        assert_eq!(stream.next().await.unwrap().unwrap(), Entry::new("Product_2", 2));
        assert_eq!(stream.next().await.unwrap().unwrap(), Entry::new("Product_1", 3));
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn first_row_is_data_not_header() {
        let rows: Vec<_> = stream_of("name;10\n").collect().await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].as_ref().unwrap(), &Entry::new("name", 10));
    }

    #[tokio::test]
    async fn wrong_length_row_is_a_row_error() {
        let rows: Vec<_> = stream_of("A;1\nB;2;3\nC;4\n").collect().await;

        assert_eq!(rows.len(), 3);
        assert!(rows[0].is_ok());
        match &rows[1] {
            Err(e @ IoError::InvalidRowLength(3)) => assert!(!e.is_terminal()),
            other => panic!("Expected InvalidRowLength, got {:?}", other),
        }
        assert!(rows[2].is_ok());
    }

    #[tokio::test]
    async fn invalid_price_is_a_row_error() {
        let rows: Vec<_> = stream_of("A;abc\nB; 7 \n").collect().await;

        assert!(matches!(rows[0], Err(IoError::InvalidPrice(_))));
        assert_eq!(rows[1].as_ref().unwrap(), &Entry::new("B", 7));
    }

    #[tokio::test]
    async fn honours_custom_delimiter() {
        let rows: Vec<_> = PriceRowStream::new(Cursor::new(b"A,5\n".as_slice()), b',')
            .collect()
            .await;
        assert_eq!(rows[0].as_ref().unwrap(), &Entry::new("A", 5));
    }

    #[tokio::test]
    async fn handles_quoted_names() {
        let rows: Vec<_> = stream_of("\"Brand; Deluxe\";12\n").collect().await;
        assert_eq!(rows[0].as_ref().unwrap(), &Entry::new("Brand; Deluxe", 12));
    }

    #[tokio::test]
    async fn handles_empty_input() {
        let mut stream = stream_of("");
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn invalid_utf8_is_a_row_error() {
        let data: &'static [u8] = b"A;1\n\xff\xfe;2\nB;3\n";
        let rows: Vec<_> = PriceRowStream::new(Cursor::new(data), DEFAULT_DELIMITER)
            .collect()
            .await;

        assert_eq!(rows.len(), 3);
        assert!(rows[0].is_ok());
        match &rows[1] {
            Err(e @ IoError::Csv(_)) => assert!(!e.is_terminal()),
            other => panic!("Expected Csv decoding error, got {:?}", other),
        }
        assert_eq!(rows[2].as_ref().unwrap(), &Entry::new("B", 3));
    }

    #[tokio::test]
    async fn reads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "A;10").unwrap();
        writeln!(file, "B;20").unwrap();
        file.flush().unwrap();

        let rows: Vec<_> = PriceRowStream::from_file(file.path(), DEFAULT_DELIMITER)
            .await
            .unwrap()
            .collect()
            .await;

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.is_ok()));
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let result = PriceRowStream::from_file("/nonexistent/prices.csv", DEFAULT_DELIMITER).await;
        assert!(matches!(result, Err(IoError::Io(_))));
    }
}
