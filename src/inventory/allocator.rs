use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

use super::{KeyedLocks, SectionGuard};
use crate::domain::{ProductId, Unit, UnitId};
use crate::store::{DataStore, StoreError};

/// Errors that can occur while moving units in or out of stock.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AllocationError {
    #[error("Not enough units for product ID: {0}")]
    InsufficientStock(ProductId),
    #[error("Section for {0} is not part of this reservation")]
    SectionNotHeld(ProductId),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Hands out exclusive stock sections per product.
pub struct Allocator<S> {
    store: Arc<S>,
    sections: KeyedLocks<ProductId>,
}

impl<S: DataStore> Allocator<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            sections: KeyedLocks::new(),
        }
    }

    /// Locks the sections of every product in `products` and opens a journal.
    pub async fn reserve(&self, products: impl IntoIterator<Item = ProductId>) -> Reservation<'_, S> {
        let held: BTreeMap<ProductId, SectionGuard<ProductId>> = self.sections
            .acquire_all(products)
            .await
            .into_iter()
            .map(|guard| (*guard.key(), guard))
            .collect();
        debug!(products = held.len(), "Reservation opened");
        Reservation {
            store: self.store.as_ref(),
            held,
            journal: Vec::new(),
        }
    }

    /// Adds `count` fresh units to a product's stock.
    #[instrument(skip(self))]
    pub async fn restock(&self, product_id: ProductId, count: u32) -> Result<Vec<UnitId>, AllocationError> {
        let mut reservation = self.reserve([product_id]).await;
        match reservation.stock(product_id, count).await {
            Ok(units) => {
                reservation.commit();
                info!(added = units.len(), "Product restocked");
                Ok(units)
            }
            Err(e) => {
                if let Err(rollback) = reservation.rollback().await {
                    error!(error = %rollback, "Restock rollback failed");
                }
                Err(e)
            }
        }
    }
}

#[derive(Debug)]
enum Step {
    /// Units left stock (allocated to an order).
    Taken { product_id: ProductId, units: Vec<UnitId> },
    /// Units entered stock (restored or freshly stocked).
    Added { product_id: ProductId, units: Vec<UnitId> },
}

/// A set of held product sections plus the journal of what was changed
/// under them. Finish with [`Reservation::commit`] or [`Reservation::rollback`].
pub struct Reservation<'a, S: DataStore> {
    store: &'a S,
    held: BTreeMap<ProductId, SectionGuard<ProductId>>,
    journal: Vec<Step>,
}

impl<'a, S: DataStore> Reservation<'a, S> {
    fn ensure_held(&self, product_id: ProductId) -> Result<(), AllocationError> {
        if self.held.contains_key(&product_id) {
            Ok(())
        } else {
            Err(AllocationError::SectionNotHeld(product_id))
        }
    }

    /// Picks `quantity` units of the product, removes them from stock and
    /// returns their ids. Nothing changes when stock is insufficient.
    #[instrument(skip(self))]
    pub async fn allocate(&mut self, product_id: ProductId, quantity: u32) -> Result<Vec<UnitId>, AllocationError> {
        self.ensure_held(product_id)?;

        let available = self.store.find_units_by_product(product_id, quantity as usize).await?;
        if available.len() < quantity as usize {
            warn!(available = available.len(), "Not enough units");
            return Err(AllocationError::InsufficientStock(product_id));
        }

        let units: Vec<UnitId> = available.into_iter().map(|unit| unit.id).collect();
        self.take(product_id, &units).await?;
        self.journal.push(Step::Taken { product_id, units: units.clone() });
        debug!(?units, "Units allocated");
        Ok(units)
    }

    /// Puts previously allocated units back into stock under their own ids.
    #[instrument(skip(self, units), fields(count = units.len()))]
    pub async fn release(&mut self, product_id: ProductId, units: &[UnitId]) -> Result<(), AllocationError> {
        self.ensure_held(product_id)?;
        if units.is_empty() {
            return Ok(());
        }
        self.restore(product_id, units).await?;
        self.journal.push(Step::Added { product_id, units: units.to_vec() });
        Ok(())
    }

    /// Stocks `count` brand new units.
    pub async fn stock(&mut self, product_id: ProductId, count: u32) -> Result<Vec<UnitId>, AllocationError> {
        self.ensure_held(product_id)?;
        if count == 0 {
            return Ok(Vec::new());
        }
        let units = self.store.stock_units(product_id, count).await?;
        if let Err(e) = self.store.increment_product_quantity(product_id, count).await {
            if let Err(undo) = self.store.delete_units(&units).await {
                error!(error = %undo, "Could not remove units after failed increment");
            }
            return Err(e.into());
        }
        self.journal.push(Step::Added { product_id, units: units.clone() });
        Ok(units)
    }

    /// Conditionally decrements the counter, then deletes the units.
    async fn take(&self, product_id: ProductId, units: &[UnitId]) -> Result<(), StoreError> {
        let count = units.len() as u32;
        self.store.decrement_product_quantity(product_id, count).await?;
        match self.store.delete_units(units).await {
            Ok(removed) if removed != units.len() => {
                warn!(expected = units.len(), removed, "Unit table and stock counter disagree");
                Ok(())
            }
            Ok(_) => Ok(()),
            Err(e) => {
                if let Err(undo) = self.store.increment_product_quantity(product_id, count).await {
                    error!(error = %undo, "Could not restore counter after failed unit delete");
                }
                Err(e)
            }
        }
    }

    /// Recreates the units, then increments the counter.
    async fn restore(&self, product_id: ProductId, units: &[UnitId]) -> Result<(), StoreError> {
        let records = units.iter().map(|&id| Unit::new(id, product_id)).collect();
        self.store.create_units(records).await?;
        if let Err(e) = self.store.increment_product_quantity(product_id, units.len() as u32).await {
            if let Err(undo) = self.store.delete_units(units).await {
                error!(error = %undo, "Could not remove units after failed increment");
            }
            return Err(e);
        }
        Ok(())
    }

    /// Keeps every change and releases the sections.
    pub fn commit(mut self) {
        debug!(steps = self.journal.len(), "Reservation committed");
        self.journal.clear();
    }

    /// Undoes every journalled step, newest first, then releases the sections.
    #[instrument(skip(self), fields(steps = self.journal.len()))]
    pub async fn rollback(mut self) -> Result<(), StoreError> {
        while let Some(step) = self.journal.pop() {
            let result = match &step {
                Step::Taken { product_id, units } => self.restore(*product_id, units).await,
                Step::Added { product_id, units } => self.take(*product_id, units).await,
            };
            if let Err(e) = result {
                error!(?step, error = %e, "Rollback step failed");
                return Err(e);
            }
        }
        info!("Reservation rolled back");
        Ok(())
    }
}

impl<S: DataStore> Drop for Reservation<'_, S> {
    fn drop(&mut self) {
        if !self.journal.is_empty() {
            warn!(steps = self.journal.len(), "Reservation dropped without commit or rollback; changes kept");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_system::{ActorConfig, MarketplaceSystem};
    use crate::domain::ProductCreate;

    async fn stocked(system: &MarketplaceSystem, units: u32) -> ProductId {
        let store = system.store();
        let product = store.create_product(ProductCreate { name: "Mug".into(), price: 4.0 }).await.unwrap();
        system.allocator().restock(product.id, units).await.unwrap();
        product.id
    }

    async fn stock_of(system: &MarketplaceSystem, id: ProductId) -> (u32, Vec<UnitId>) {
        let store = system.store();
        let product = store.find_products_by_ids(&[id]).await.unwrap().remove(0);
        let units = store.find_units_by_product(id, usize::MAX).await.unwrap();
        (product.quantity, units.into_iter().map(|u| u.id).collect())
    }

    #[tokio::test]
    async fn allocate_takes_lowest_units_and_decrements() {
        let system = MarketplaceSystem::new(&ActorConfig::default());
        let product = stocked(&system, 4).await;
        let (_, before) = stock_of(&system, product).await;

        let mut reservation = system.allocator().reserve([product]).await;
        let units = reservation.allocate(product, 3).await.unwrap();
        reservation.commit();

        assert_eq!(units, before[..3].to_vec());
        assert_eq!(stock_of(&system, product).await, (1, before[3..].to_vec()));
        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn insufficient_stock_changes_nothing() {
        let system = MarketplaceSystem::new(&ActorConfig::default());
        let product = stocked(&system, 2).await;
        let before = stock_of(&system, product).await;

        let mut reservation = system.allocator().reserve([product]).await;
        let err = reservation.allocate(product, 3).await.unwrap_err();
        reservation.commit();

        assert_eq!(err, AllocationError::InsufficientStock(product));
        assert_eq!(stock_of(&system, product).await, before);
        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn rollback_undoes_takes_and_releases() {
        let system = MarketplaceSystem::new(&ActorConfig::default());
        let first = stocked(&system, 3).await;
        let second = stocked(&system, 3).await;

        // Hand two units of `second` out as if an older order held them
        let mut setup = system.allocator().reserve([second]).await;
        let held = setup.allocate(second, 2).await.unwrap();
        setup.commit();
        let before = (stock_of(&system, first).await, stock_of(&system, second).await);

        let mut reservation = system.allocator().reserve([first, second]).await;
        reservation.allocate(first, 2).await.unwrap();
        reservation.release(second, &held).await.unwrap();
        reservation.allocate(second, 3).await.unwrap();
        reservation.rollback().await.unwrap();

        let after = (stock_of(&system, first).await, stock_of(&system, second).await);
        assert_eq!(after, before);
        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn unreserved_product_is_refused() {
        let system = MarketplaceSystem::new(&ActorConfig::default());
        let product = stocked(&system, 1).await;

        let mut reservation = system.allocator().reserve(Vec::new()).await;
        let err = reservation.allocate(product, 1).await.unwrap_err();
        assert_eq!(err, AllocationError::SectionNotHeld(product));
        drop(reservation);
        system.shutdown().await.unwrap();
    }
}
