use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entry::ImportTimestamp;

/// Identifier of a stored product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductId(Uuid);

impl ProductId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of a stored price snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SnapshotId(Uuid);

impl SnapshotId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Product record, unique by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
}

/// Single price value inside a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    pub value: i64,
}

impl From<i64> for Price {
    fn from(value: i64) -> Self {
        Self { value }
    }
}

/// Prices observed for one product in one import, unique by (product, timestamp)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub id: SnapshotId,
    pub product_id: ProductId,
    pub timestamp: ImportTimestamp,
    pub prices: Vec<Price>,
}

/// Flattened product/snapshot view: one row per stored price
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceEntry {
    pub name: String,
    pub price: i64,
    pub timestamp: ImportTimestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_distinct() {
        assert_ne!(ProductId::generate(), ProductId::generate());
        assert_ne!(SnapshotId::generate(), SnapshotId::generate());
    }

    #[test]
    fn product_id_displays_as_uuid() {
        let id = ProductId::generate();
        assert_eq!(id.to_string(), id.as_uuid().to_string());
    }

    #[test]
    fn price_from_integer() {
        assert_eq!(Price::from(42), Price { value: 42 });
    }
}
