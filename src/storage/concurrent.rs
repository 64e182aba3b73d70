use std::collections::HashMap;

use async_trait::async_trait;
use dashmap::{DashMap, Entry};

use super::error::StorageError;
use super::query::{Pagination, SortOptions};
use super::traits::{PriceEntryReader, PriceStore};
use crate::domain::{
    ImportTimestamp, Price, PriceEntry, PriceSnapshot, Product, ProductId, SnapshotId,
    timestamp_is_unset,
};

/// Concurrent in-memory price store using DashMap
///
/// Products are keyed by their unique name and snapshots by the unique
/// (product id, timestamp) pair; both upserts go through DashMap's entry API
/// so each key is created at most once under concurrent writers.
pub struct ConcurrentPriceStore {
    products: DashMap<String, Product>,
    snapshots: DashMap<(ProductId, ImportTimestamp), PriceSnapshot>,
}

impl ConcurrentPriceStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            products: DashMap::new(),
            snapshots: DashMap::new(),
        }
    }

    /// All products, ordered by name
    pub fn products(&self) -> Vec<Product> {
        let mut products: Vec<Product> = self
            .products
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        products
    }

    /// Snapshot stored for (product, timestamp), if any
    pub fn snapshot(&self, product_id: ProductId, timestamp: ImportTimestamp) -> Option<PriceSnapshot> {
        self.snapshots
            .get(&(product_id, timestamp))
            .map(|r| r.value().clone())
    }

    pub fn snapshot_count(&self) -> usize {
        self.snapshots.len()
    }
}

impl Default for ConcurrentPriceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceStore for ConcurrentPriceStore {
    async fn upsert_product_by_name(&self, name: &str) -> Result<Option<ProductId>, StorageError> {
        match self.products.entry(name.to_string()) {
            // Same name means same content: nothing to update
            Entry::Occupied(_) => Ok(None),
            Entry::Vacant(e) => {
                let id = ProductId::generate();
                e.insert(Product {
                    id,
                    name: name.to_string(),
                });
                Ok(Some(id))
            }
        }
    }

    async fn get_product_by_name(&self, name: &str) -> Result<Product, StorageError> {
        self.products
            .get(name)
            .map(|r| r.value().clone())
            .ok_or(StorageError::NotFound)
    }

    async fn upsert_price_snapshot(
        &self,
        product_id: ProductId,
        timestamp: ImportTimestamp,
        prices: Vec<Price>,
    ) -> Result<Option<SnapshotId>, StorageError> {
        if timestamp_is_unset(&timestamp) {
            return Err(StorageError::InvalidInput(
                "timestamp: can not be empty".to_string(),
            ));
        }

        match self.snapshots.entry((product_id, timestamp)) {
            Entry::Occupied(mut e) => {
                e.get_mut().prices = prices;
                Ok(None)
            }
            Entry::Vacant(e) => {
                let id = SnapshotId::generate();
                e.insert(PriceSnapshot {
                    id,
                    product_id,
                    timestamp,
                    prices,
                });
                Ok(Some(id))
            }
        }
    }
}

#[async_trait]
impl PriceEntryReader for ConcurrentPriceStore {
    async fn price_entries(
        &self,
        sort: &SortOptions,
        page: Pagination,
    ) -> Result<Vec<PriceEntry>, StorageError> {
        let names: HashMap<ProductId, String> = self
            .products
            .iter()
            .map(|entry| (entry.value().id, entry.key().clone()))
            .collect();

        // Snapshots whose product is gone have nothing to join with
        let mut entries: Vec<PriceEntry> = Vec::new();
        for snapshot in self.snapshots.iter() {
            let Some(name) = names.get(&snapshot.product_id) else {
                continue;
            };
            entries.extend(snapshot.prices.iter().map(|price| PriceEntry {
                name: name.clone(),
                price: price.value,
                timestamp: snapshot.timestamp,
            }));
        }

        if !sort.is_empty() {
            entries.sort_by(|a, b| sort.compare(a, b));
        }

        Ok(page.apply(entries))
    }
}
