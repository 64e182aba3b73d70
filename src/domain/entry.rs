use chrono::{DateTime, Utc};

use super::error::DomainError;

/// Import timestamp shared by every chunk of one feed
pub type ImportTimestamp = DateTime<Utc>;

/// Returns true for the default (epoch) timestamp, which marks "not set"
pub fn timestamp_is_unset(timestamp: &ImportTimestamp) -> bool {
    *timestamp == ImportTimestamp::default()
}

/// One validated `product,price` row of the feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub product_name: String,
    pub price: i64,
}

impl Entry {
    /// Create a new entry
    pub fn new(product_name: impl Into<String>, price: i64) -> Self {
        Self {
            product_name: product_name.into(),
            price,
        }
    }
}

/// Read-only view of one completed chunk, handed to a sink exactly once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBatch {
    timestamp: ImportTimestamp,
    entries: Vec<Entry>,
}

impl ImportBatch {
    /// Create a new batch
    pub fn new(timestamp: ImportTimestamp, entries: Vec<Entry>) -> Self {
        Self { timestamp, entries }
    }

    /// Get the import timestamp
    pub fn timestamp(&self) -> ImportTimestamp {
        self.timestamp
    }

    /// Get the entries in feed order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Consume the batch, returning its entries
    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check that the batch can be imported: timestamp set, at least one
    /// entry, and every entry with a non-empty name and a non-negative price.
    pub fn validate(&self) -> Result<(), DomainError> {
        if timestamp_is_unset(&self.timestamp) {
            return Err(DomainError::InvalidInput(
                "batch timestamp: unset".to_string(),
            ));
        }
        if self.entries.is_empty() {
            return Err(DomainError::InvalidInput("batch entries: empty".to_string()));
        }

        for (idx, entry) in self.entries.iter().enumerate() {
            if entry.product_name.is_empty() {
                return Err(DomainError::InvalidInput(format!(
                    "batch entries[{idx}].product_name: empty"
                )));
            }
            if entry.price < 0 {
                return Err(DomainError::InvalidInput(format!(
                    "batch entries[{idx}].price: negative ({})",
                    entry.price
                )));
            }
        }

        Ok(())
    }
}
