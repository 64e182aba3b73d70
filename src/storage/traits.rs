use std::sync::Arc;

use async_trait::async_trait;

use super::error::StorageError;
use super::query::{Pagination, SortOptions};
use crate::domain::{ImportTimestamp, Price, PriceEntry, Product, ProductId, SnapshotId};

/// Write and lookup operations the price importer needs from a store.
///
/// Upserts must be atomic per key. They return the new identifier when a
/// record was created and `None` when one already existed.
#[async_trait]
pub trait PriceStore: Send + Sync {
    /// Create a product with this unique name unless one already exists
    async fn upsert_product_by_name(&self, name: &str) -> Result<Option<ProductId>, StorageError>;

    /// Load a product by name, `StorageError::NotFound` if absent
    async fn get_product_by_name(&self, name: &str) -> Result<Product, StorageError>;

    /// Set the prices stored for (product, timestamp), replacing any previous list
    async fn upsert_price_snapshot(
        &self,
        product_id: ProductId,
        timestamp: ImportTimestamp,
        prices: Vec<Price>,
    ) -> Result<Option<SnapshotId>, StorageError>;
}

/// Read side: stored prices joined with their product names
#[async_trait]
pub trait PriceEntryReader: Send + Sync {
    /// List price entries, sorted and paginated
    async fn price_entries(
        &self,
        sort: &SortOptions,
        page: Pagination,
    ) -> Result<Vec<PriceEntry>, StorageError>;
}

// Shared stores are handed to spawned tasks behind an Arc
#[async_trait]
impl<T: PriceStore + ?Sized> PriceStore for Arc<T> {
    async fn upsert_product_by_name(&self, name: &str) -> Result<Option<ProductId>, StorageError> {
        (**self).upsert_product_by_name(name).await
    }

    async fn get_product_by_name(&self, name: &str) -> Result<Product, StorageError> {
        (**self).get_product_by_name(name).await
    }

    async fn upsert_price_snapshot(
        &self,
        product_id: ProductId,
        timestamp: ImportTimestamp,
        prices: Vec<Price>,
    ) -> Result<Option<SnapshotId>, StorageError> {
        (**self)
            .upsert_price_snapshot(product_id, timestamp, prices)
            .await
    }
}

#[async_trait]
impl<T: PriceEntryReader + ?Sized> PriceEntryReader for Arc<T> {
    async fn price_entries(
        &self,
        sort: &SortOptions,
        page: Pagination,
    ) -> Result<Vec<PriceEntry>, StorageError> {
        (**self).price_entries(sort, page).await
    }
}
