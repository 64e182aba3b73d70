use std::io;
use thiserror::Error;

/// IO-level errors for reading and writing delimited price rows
#[derive(Error, Debug)]
pub enum IoError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv_async::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid row length ({0})")]
    InvalidRowLength(usize),

    #[error("price conversion failed ({0})")]
    InvalidPrice(String),
}

impl IoError {
    /// Terminal errors leave the reader unusable; row errors only spoil one row.
    ///
    /// A CSV error is terminal only when the underlying read or seek failed.
    /// Decoding errors (invalid UTF-8) are raised after the record was
    /// consumed, so the reader moves on to the next row.
    pub fn is_terminal(&self) -> bool {
        match self {
            Self::Io(_) => true,
            Self::Csv(e) => matches!(
                e.kind(),
                csv_async::ErrorKind::Io(_) | csv_async::ErrorKind::Seek
            ),
            Self::InvalidRowLength(_) | Self::InvalidPrice(_) => false,
        }
    }
}
