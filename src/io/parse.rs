use super::error::IoError;
use crate::domain::Entry;

/// Field separator used by the price feed unless configured otherwise
pub const DEFAULT_DELIMITER: u8 = b';';

/// Parse the fields of one row into an entry.
///
/// The row must have exactly two fields (product name, price) and the price,
/// trimmed of surrounding whitespace, must be a non-negative integer. The
/// product name is taken as-is.
pub fn parse_row<S: AsRef<str>>(fields: &[S]) -> Result<Entry, IoError> {
    let [name, price_text] = fields else {
        return Err(IoError::InvalidRowLength(fields.len()));
    };
    let price_text = price_text.as_ref();

    let price: i64 = price_text
        .trim()
        .parse()
        .map_err(|_| IoError::InvalidPrice(price_text.to_string()))?;
    if price < 0 {
        return Err(IoError::InvalidPrice(price_text.to_string()));
    }

    Ok(Entry::new(name.as_ref(), price))
}
