use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;

use super::error::AppError;
use crate::domain::ImportTimestamp;
use crate::io::DEFAULT_DELIMITER;
use crate::storage::{Pagination, SortField, SortOptions, SortOrder};
use crate::streaming::DEFAULT_CHUNK_SIZE;

/// Command-line arguments; import settings fall back to environment variables
#[derive(Parser, Debug, Clone)]
#[command(name = "pricefeed")]
#[command(about = "Import a product/price feed and print the stored prices", long_about = None)]
pub struct CliArgs {
    /// Feed file with one `product;price` row per line
    pub input: PathBuf,

    /// Entries per chunk handed to the importer
    #[arg(long, env = "PRICEFEED_CHUNK_SIZE", default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Field separator of the feed
    #[arg(long, env = "PRICEFEED_DELIMITER", default_value_t = DEFAULT_DELIMITER as char)]
    pub delimiter: char,

    /// Log level used when RUST_LOG is not set
    #[arg(long, env = "PRICEFEED_LOG", default_value = "info")]
    pub log_level: String,

    /// Import timestamp (RFC 3339); defaults to the current time
    #[arg(long)]
    pub timestamp: Option<ImportTimestamp>,

    /// Output sort keys, comma separated (name, price, timestamp)
    #[arg(long, value_delimiter = ',')]
    pub sort: Vec<SortField>,

    /// Sort descending instead of ascending
    #[arg(long)]
    pub desc: bool,

    /// Number of output rows to skip
    #[arg(long, default_value_t = 0)]
    pub skip: usize,

    /// Maximum number of output rows
    #[arg(long)]
    pub limit: Option<usize>,
}

impl CliArgs {
    /// Timestamp stamped on every chunk of this import
    pub fn import_timestamp(&self) -> ImportTimestamp {
        self.timestamp.unwrap_or_else(Utc::now)
    }

    pub fn sort_options(&self) -> SortOptions {
        let order = if self.desc {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        };
        self.sort
            .iter()
            .fold(SortOptions::new(), |sort, &field| sort.by(field, order))
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.skip, self.limit)
    }
}

/// Validated import settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    pub chunk_size: usize,
    pub delimiter: u8,
    pub log_level: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            delimiter: DEFAULT_DELIMITER,
            log_level: "info".to_string(),
        }
    }
}

impl ImportConfig {
    /// Create a config, rejecting a zero chunk size and delimiters the CSV reader cannot use
    pub fn new(chunk_size: usize, delimiter: char, log_level: impl Into<String>) -> Result<Self, AppError> {
        if chunk_size == 0 {
            return Err(AppError::InvalidConfig(
                "chunk size must be at least 1".to_string(),
            ));
        }
        if !delimiter.is_ascii() {
            return Err(AppError::InvalidConfig(format!(
                "delimiter must be a single ASCII character, got {delimiter:?}"
            )));
        }
        if matches!(delimiter, '"' | '\n' | '\r') {
            return Err(AppError::InvalidConfig(format!(
                "delimiter must not be a quote or line terminator, got {delimiter:?}"
            )));
        }

        Ok(Self {
            chunk_size,
            delimiter: delimiter as u8,
            log_level: log_level.into(),
        })
    }

    pub fn from_args(args: &CliArgs) -> Result<Self, AppError> {
        Self::new(args.chunk_size, args.delimiter, args.log_level.clone())
    }
}
