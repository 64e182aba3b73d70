use std::collections::HashMap;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::error::{EngineError, ProductImportError};
use crate::domain::{Entry, ImportBatch, ImportTimestamp, Price};
use crate::storage::PriceStore;
use crate::streaming::ChunkSink;

/// Prices observed per product within one batch, in feed order
pub type ProductPriceGroups = HashMap<String, Vec<Price>>;

/// Group entries by product name, keeping each product's prices in feed order
pub fn group_by_product(entries: Vec<Entry>) -> ProductPriceGroups {
    let mut groups = ProductPriceGroups::new();
    for entry in entries {
        groups
            .entry(entry.product_name)
            .or_default()
            .push(Price::from(entry.price));
    }
    groups
}

/// Reduce stage of the import: writes one batch into a price store.
///
/// Every distinct product in the batch gets its own task, all spawned before
/// any is awaited. A task upserts the product by name and then replaces its
/// price snapshot for the batch timestamp. Failed tasks never roll back the
/// writes of successful ones.
pub struct PriceImporter<S>
where
    S: PriceStore + Clone + 'static,
{
    store: S,
}

impl<S> PriceImporter<S>
where
    S: PriceStore + Clone + 'static,
{
    /// Create a new importer over a shared store (typically `Arc<impl PriceStore>`)
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Get reference to the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Import one batch.
    ///
    /// Fails with `EngineError::InvalidInput` before any write when the batch
    /// is invalid. Otherwise waits for every product task and returns
    /// `EngineError::PartialFailure` naming each failed product, or
    /// `EngineError::Cancelled` if `cancel` stopped any product task.
    pub async fn import_prices(
        &self,
        cancel: &CancellationToken,
        batch: ImportBatch,
    ) -> Result<(), EngineError> {
        batch.validate()?;

        let timestamp = batch.timestamp();
        let groups = group_by_product(batch.into_entries());
        let total = groups.len();
        debug!(products = total, %timestamp, "Importing price batch");

        let handles: Vec<_> = groups
            .into_iter()
            .map(|(name, prices)| {
                let store = self.store.clone();
                let cancel = cancel.clone();
                let product = name.clone();
                let handle = tokio::spawn(async move {
                    import_product(&store, &cancel, name, timestamp, prices).await
                });
                (product, handle)
            })
            .collect();

        // Full join: every task is awaited regardless of sibling failures
        let mut failures = Vec::new();
        for (product, handle) in handles {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => failures.push(e),
                Err(join_err) => failures.push(ProductImportError::TaskFailed {
                    product,
                    message: join_err.to_string(),
                }),
            }
        }

        // Only tasks that stopped on the token make the batch cancelled
        if failures
            .iter()
            .any(|e| matches!(e, ProductImportError::Cancelled { .. }))
        {
            return Err(EngineError::Cancelled);
        }

        if !failures.is_empty() {
            warn!(failed = failures.len(), total, "Price batch partially imported");
            return Err(EngineError::PartialFailure {
                failed: failures.len(),
                total,
                failures,
            });
        }

        Ok(())
    }
}

/// Write one product group: upsert product, resolve its id, replace its snapshot
async fn import_product<S>(
    store: &S,
    cancel: &CancellationToken,
    name: String,
    timestamp: ImportTimestamp,
    prices: Vec<Price>,
) -> Result<(), ProductImportError>
where
    S: PriceStore,
{
    if cancel.is_cancelled() {
        return Err(ProductImportError::Cancelled { product: name });
    }

    let created = store
        .upsert_product_by_name(&name)
        .await
        .map_err(|source| ProductImportError::ProductUpsert {
            product: name.clone(),
            source,
        })?;

    let product_id = match created {
        Some(id) => id,
        // Already existed. A concurrent writer may delete or rename it before
        // this lookup; the resulting NotFound fails this product, no retry.
        None => {
            store
                .get_product_by_name(&name)
                .await
                .map_err(|source| ProductImportError::ProductLookup {
                    product: name.clone(),
                    source,
                })?
                .id
        }
    };

    if cancel.is_cancelled() {
        return Err(ProductImportError::Cancelled { product: name });
    }

    let snapshot = store
        .upsert_price_snapshot(product_id, timestamp, prices)
        .await
        .map_err(|source| ProductImportError::SnapshotUpsert {
            product: name.clone(),
            source,
        })?;

    match snapshot {
        Some(snapshot_id) => {
            info!(product = %name, %snapshot_id, %timestamp, "Price snapshot created")
        }
        None => warn!(product = %name, %timestamp, "Price snapshot replaced"),
    }

    Ok(())
}

#[async_trait]
impl<S> ChunkSink for PriceImporter<S>
where
    S: PriceStore + Clone + 'static,
{
    type Error = EngineError;

    async fn import(&self, cancel: &CancellationToken, batch: ImportBatch) -> Result<(), EngineError> {
        self.import_prices(cancel, batch).await
    }
}
