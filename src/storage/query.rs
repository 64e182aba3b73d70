use std::cmp::Ordering;
use std::str::FromStr;

use super::error::StorageError;
use crate::domain::PriceEntry;

/// Price entry field to sort by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Price,
    Timestamp,
}

impl FromStr for SortField {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "price" => Ok(Self::Price),
            "timestamp" => Ok(Self::Timestamp),
            other => Err(StorageError::InvalidInput(format!(
                "unknown sort field: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// One sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOption {
    pub field: SortField,
    pub order: SortOrder,
}

/// Ordered list of sort keys; earlier keys take precedence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortOptions(Vec<SortOption>);

impl SortOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sort key (fluent interface)
    pub fn by(mut self, field: SortField, order: SortOrder) -> Self {
        self.0.push(SortOption { field, order });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Compare two entries by every key in turn
    pub fn compare(&self, a: &PriceEntry, b: &PriceEntry) -> Ordering {
        for option in &self.0 {
            let ordering = match option.field {
                SortField::Name => a.name.cmp(&b.name),
                SortField::Price => a.price.cmp(&b.price),
                SortField::Timestamp => a.timestamp.cmp(&b.timestamp),
            };
            let ordering = match option.order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

/// Skip/limit window over a result list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    pub skip: usize,
    pub limit: Option<usize>,
}

impl Pagination {
    pub fn new(skip: usize, limit: Option<usize>) -> Self {
        Self { skip, limit }
    }

    /// Apply the window to an already ordered list
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let window = items.into_iter().skip(self.skip);
        match self.limit {
            Some(limit) => window.take(limit).collect(),
            None => window.collect(),
        }
    }
}
