pub mod csv_reader;
pub mod csv_writer;
pub mod error;
pub mod parse;

// Re-export commonly used types
pub use csv_reader::PriceRowStream;
pub use csv_writer::write_price_entries;
pub use error::IoError;
pub use parse::{DEFAULT_DELIMITER, parse_row};
