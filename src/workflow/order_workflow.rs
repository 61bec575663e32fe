use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use super::snapshot::{self, OrderedItem};
use crate::domain::{
    CreateOrderRequest, Order, OrderCreate, OrderId, OrderPatch, OrderedItemRequest, ProductId,
    UpdateOrderRequest, UserId,
};
use crate::inventory::{Allocator, KeyedLocks, Reservation};
use crate::order_actor::OrderError;
use crate::store::{DataStore, StoreError};

/// Places, changes and cancels orders while keeping unit records and stock
/// counters consistent.
///
/// Every mutation holds the order's section (update and delete) and then the
/// sections of every product it touches, and is all or nothing.
pub struct OrderWorkflow<S> {
    store: Arc<S>,
    allocator: Arc<Allocator<S>>,
    order_sections: KeyedLocks<OrderId>,
}

impl<S: DataStore> OrderWorkflow<S> {
    pub fn new(store: Arc<S>, allocator: Arc<Allocator<S>>) -> Self {
        Self {
            store,
            allocator,
            order_sections: KeyedLocks::new(),
        }
    }

    #[instrument(skip(self, request), fields(user_id = %request.user_id, items = request.ordered_items.len()))]
    pub async fn create_order(&self, request: CreateOrderRequest) -> Result<Order, OrderError> {
        validate_items(&request.ordered_items)?;
        self.ensure_user(request.user_id).await?;
        let products = self.ensure_products(&request.ordered_items).await?;

        let mut reservation = self.allocator.reserve(products).await;
        let outcome = self.place(&mut reservation, request).await;
        let order = settle(reservation, outcome).await?;

        info!(order_id = %order.id, "Order created");
        Ok(order)
    }

    #[instrument(skip(self, request))]
    pub async fn update_order(&self, id: OrderId, request: UpdateOrderRequest) -> Result<Order, OrderError> {
        let _order_section = self.order_sections.acquire(id).await;
        let order = self.find_order(id).await?;
        let (items, patch) = request.into_parts();

        let Some(items) = items else {
            if patch.is_empty() {
                debug!("Nothing to update");
                return Ok(order);
            }
            let updated = self.store.update_order(id, patch).await.map_err(|e| order_error(id, e))?;
            info!("Order metadata updated");
            return Ok(updated);
        };

        validate_items(&items)?;
        let mut products = self.ensure_products(&items).await?;
        let previous = snapshot::decode(&order.ordered_items)?;
        products.extend(previous.iter().map(|item| item.product_id));

        let mut reservation = self.allocator.reserve(products).await;
        let outcome = self.reallocate(&mut reservation, id, &previous, &items, patch).await;
        let updated = settle(reservation, outcome).await?;

        info!(released = previous.len(), allocated = items.len(), "Order items replaced");
        Ok(updated)
    }

    /// Deletes the order and puts every unit it held back into stock.
    #[instrument(skip(self))]
    pub async fn delete_order(&self, id: OrderId) -> Result<Order, OrderError> {
        let _order_section = self.order_sections.acquire(id).await;
        let order = self.find_order(id).await?;
        let previous = snapshot::decode(&order.ordered_items)?;

        let mut reservation = self.allocator.reserve(previous.iter().map(|item| item.product_id)).await;
        let outcome = self.restore(&mut reservation, id, &previous).await;
        let deleted = settle(reservation, outcome).await?;

        info!(restored = previous.iter().map(|item| item.assigned_units.len()).sum::<usize>(), "Order deleted");
        Ok(deleted)
    }

    #[instrument(skip(self))]
    pub async fn get_order(&self, id: OrderId) -> Result<Option<Order>, OrderError> {
        Ok(self.store.find_order_by_id(id).await?)
    }

    /// The decoded allocation snapshot of an order.
    #[instrument(skip(self))]
    pub async fn ordered_items(&self, id: OrderId) -> Result<Vec<OrderedItem>, OrderError> {
        let order = self.find_order(id).await?;
        snapshot::decode(&order.ordered_items)
    }

    async fn find_order(&self, id: OrderId) -> Result<Order, OrderError> {
        match self.store.find_order_by_id(id).await? {
            Some(order) => Ok(order),
            None => {
                warn!(order_id = %id, "Order not found");
                Err(OrderError::NotFound(id))
            }
        }
    }

    async fn ensure_user(&self, user_id: UserId) -> Result<(), OrderError> {
        match self.store.find_user_by_id(user_id).await? {
            Some(user) => {
                debug!(username = %user.username, "User validation successful");
                Ok(())
            }
            None => {
                warn!(user_id = %user_id, "User not found");
                Err(OrderError::InvalidUser(user_id))
            }
        }
    }

    /// Checks every referenced product before anything is mutated and returns
    /// the distinct ids in first occurrence order.
    async fn ensure_products(&self, items: &[OrderedItemRequest]) -> Result<Vec<ProductId>, OrderError> {
        let mut seen = HashSet::new();
        let requested: Vec<ProductId> = items
            .iter()
            .map(|item| item.product_id)
            .filter(|id| seen.insert(*id))
            .collect();

        let found: HashSet<ProductId> = self.store
            .find_products_by_ids(&requested)
            .await?
            .into_iter()
            .map(|product| product.id)
            .collect();

        let missing: Vec<ProductId> = requested.iter().copied().filter(|id| !found.contains(id)).collect();
        if !missing.is_empty() {
            warn!(?missing, "Unknown products in order");
            return Err(OrderError::InvalidProduct(missing));
        }
        Ok(requested)
    }

    async fn allocate_items(
        reservation: &mut Reservation<'_, S>,
        items: &[OrderedItemRequest],
    ) -> Result<Vec<OrderedItem>, OrderError> {
        let mut allocated = Vec::with_capacity(items.len());
        for item in items {
            let units = reservation.allocate(item.product_id, item.quantity).await?;
            allocated.push(OrderedItem {
                product_id: item.product_id,
                quantity: item.quantity,
                assigned_units: units,
            });
        }
        Ok(allocated)
    }

    async fn release_items(reservation: &mut Reservation<'_, S>, items: &[OrderedItem]) -> Result<(), OrderError> {
        for item in items {
            reservation.release(item.product_id, &item.assigned_units).await?;
        }
        Ok(())
    }

    async fn place(&self, reservation: &mut Reservation<'_, S>, request: CreateOrderRequest) -> Result<Order, OrderError> {
        let allocated = Self::allocate_items(reservation, &request.ordered_items).await?;
        let record = OrderCreate {
            user_id: request.user_id,
            ordered_items: snapshot::encode(&allocated)?,
            shipment_company: request.shipment_company,
            shipment_status: request.shipment_status,
            payment_status: request.payment_status,
        };
        Ok(self.store.create_order(record).await?)
    }

    async fn reallocate(
        &self,
        reservation: &mut Reservation<'_, S>,
        id: OrderId,
        previous: &[OrderedItem],
        items: &[OrderedItemRequest],
        mut patch: OrderPatch,
    ) -> Result<Order, OrderError> {
        Self::release_items(reservation, previous).await?;
        let allocated = Self::allocate_items(reservation, items).await?;
        patch.ordered_items = Some(snapshot::encode(&allocated)?);
        self.store.update_order(id, patch).await.map_err(|e| order_error(id, e))
    }

    async fn restore(
        &self,
        reservation: &mut Reservation<'_, S>,
        id: OrderId,
        previous: &[OrderedItem],
    ) -> Result<Order, OrderError> {
        Self::release_items(reservation, previous).await?;
        self.store.delete_order(id).await.map_err(|e| order_error(id, e))
    }
}

fn validate_items(items: &[OrderedItemRequest]) -> Result<(), OrderError> {
    if items.is_empty() {
        return Err(OrderError::ValidationError("Order must contain at least one item".into()));
    }
    if let Some(item) = items.iter().find(|item| item.quantity == 0) {
        return Err(OrderError::ValidationError(format!(
            "Quantity for product ID {} must be positive",
            item.product_id
        )));
    }
    Ok(())
}

fn order_error(id: OrderId, e: StoreError) -> OrderError {
    match e {
        StoreError::NotFound { entity: "order", .. } => OrderError::NotFound(id),
        e => OrderError::Store(e),
    }
}

/// Commits the reservation on success. On failure undoes it and returns the
/// original error; a failed undo is only logged.
async fn settle<S: DataStore, T>(reservation: Reservation<'_, S>, outcome: Result<T, OrderError>) -> Result<T, OrderError> {
    match outcome {
        Ok(value) => {
            reservation.commit();
            Ok(value)
        }
        Err(e) => {
            warn!(error = %e, "Order mutation failed, rolling back");
            if let Err(rollback) = reservation.rollback().await {
                error!(error = %rollback, original = %e, "Rollback failed, stock may be inconsistent");
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_zero_quantity_orders_are_invalid() {
        assert!(matches!(validate_items(&[]), Err(OrderError::ValidationError(_))));
        let items = [OrderedItemRequest::new(1, 2), OrderedItemRequest::new(2, 0)];
        let err = validate_items(&items).unwrap_err();
        assert_eq!(err, OrderError::ValidationError("Quantity for product ID product_2 must be positive".into()));
        assert!(validate_items(&items[..1]).is_ok());
    }

    #[test]
    fn missing_order_record_maps_to_not_found() {
        let err = order_error(OrderId(4), StoreError::NotFound { entity: "order", id: "order_4".into() });
        assert_eq!(err, OrderError::NotFound(OrderId(4)));

        let err = order_error(OrderId(4), StoreError::NotFound { entity: "product", id: "product_1".into() });
        assert!(matches!(err, OrderError::Store(_)));
    }
}
