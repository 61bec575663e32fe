use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::domain::{Product, ProductCreate, ProductId, UnitId};
use crate::inventory::Allocator;
use crate::product_actor::ProductError;
use crate::store::{ActorStore, DataStore, StoreError};

/// Client for the catalog: creating products and seeding their stock.
#[derive(Clone)]
pub struct ProductClient {
    store: Arc<ActorStore>,
    allocator: Arc<Allocator<ActorStore>>,
}

impl ProductClient {
    pub fn new(store: Arc<ActorStore>, allocator: Arc<Allocator<ActorStore>>) -> Self {
        Self { store, allocator }
    }

    #[cfg(test)]
    pub(crate) fn allocator(&self) -> &Allocator<ActorStore> {
        &self.allocator
    }

    /// Creates a product and stocks `initial_units` fresh units for it.
    #[instrument(skip(self))]
    pub async fn create_product(&self, name: &str, price: f64, initial_units: u32) -> Result<Product, ProductError> {
        debug!("Sending request");
        let payload = ProductCreate {
            name: name.to_string(),
            price,
        };
        let product = self.store.create_product(payload).await.map_err(product_error)?;
        if initial_units > 0 {
            self.allocator.restock(product.id, initial_units).await?;
        }
        info!(product_id = %product.id, initial_units, "Product created");
        self.get_product(product.id).await?.ok_or(ProductError::NotFound(product.id))
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: ProductId) -> Result<Option<Product>, ProductError> {
        debug!("Sending request");
        let found = self.store.find_products_by_ids(&[id]).await?;
        Ok(found.into_iter().next())
    }

    /// Adds `count` units to an existing product and returns their ids.
    #[instrument(skip(self))]
    pub async fn restock(&self, id: ProductId, count: u32) -> Result<Vec<UnitId>, ProductError> {
        if self.get_product(id).await?.is_none() {
            warn!("Restock of unknown product");
            return Err(ProductError::NotFound(id));
        }
        Ok(self.allocator.restock(id, count).await?)
    }

    #[instrument(skip(self))]
    pub async fn check_stock(&self, id: ProductId) -> Result<u32, ProductError> {
        self.store.stock_level(id).await.map_err(|e| match e {
            StoreError::NotFound { .. } => ProductError::NotFound(id),
            e => ProductError::Store(e),
        })
    }

    /// Ids of every unit currently in stock for the product, lowest first.
    #[instrument(skip(self))]
    pub async fn units_of(&self, id: ProductId) -> Result<Vec<UnitId>, ProductError> {
        let units = self.store.find_units_by_product(id, usize::MAX).await?;
        Ok(units.into_iter().map(|unit| unit.id).collect())
    }
}

fn product_error(e: StoreError) -> ProductError {
    match e {
        StoreError::Rejected { reason, .. } => ProductError::ValidationError(reason),
        e => ProductError::Store(e),
    }
}
