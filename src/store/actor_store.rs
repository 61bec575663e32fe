use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use super::{DataStore, StoreError};
use crate::actor_framework::{Entity, FrameworkError, ResourceClient};
use crate::domain::{
    Order, OrderCreate, OrderId, OrderPatch, Product, ProductCreate, ProductId, Unit, UnitCreate,
    UnitId, User, UserCreate, UserId, UserPatch,
};
use crate::product_actor::{ProductAction, ProductActionResult};

/// Maps actor failures onto the gateway's error type, tagged with the table.
fn store_error<T: Entity>(e: FrameworkError) -> StoreError {
    match e {
        FrameworkError::NotFound(id) => StoreError::NotFound { entity: T::KIND, id },
        FrameworkError::AlreadyExists(id) => StoreError::AlreadyExists { entity: T::KIND, id },
        FrameworkError::Rejected(reason) => StoreError::Rejected { entity: T::KIND, reason },
        e @ (FrameworkError::ActorClosed | FrameworkError::ActorDropped) => {
            StoreError::Unavailable(format!("{} actor: {}", T::KIND, e))
        }
    }
}

/// [`DataStore`] backed by one [`ResourceActor`](crate::actor_framework::ResourceActor)
/// per table.
#[derive(Clone)]
pub struct ActorStore {
    products: ResourceClient<Product>,
    units: ResourceClient<Unit>,
    orders: ResourceClient<Order>,
    users: ResourceClient<User>,
}

impl ActorStore {
    pub fn new(
        products: ResourceClient<Product>,
        units: ResourceClient<Unit>,
        orders: ResourceClient<Order>,
        users: ResourceClient<User>,
    ) -> Self {
        Self { products, units, orders, users }
    }

    /// Asks every table actor to stop. Actors that are already gone are skipped.
    pub async fn shutdown(&self) {
        let results = [
            (Order::KIND, self.orders.shutdown().await),
            (Unit::KIND, self.units.shutdown().await),
            (Product::KIND, self.products.shutdown().await),
            (User::KIND, self.users.shutdown().await),
        ];
        for (kind, result) in results {
            if let Err(e) = result {
                warn!(kind, error = %e, "Actor already stopped");
            }
        }
    }

    /// Reads a product's stock counter without touching it.
    #[instrument(skip(self))]
    pub async fn stock_level(&self, id: ProductId) -> Result<u32, StoreError> {
        debug!("Sending request");
        self.stock_action(id, ProductAction::CheckStock).await
    }

    async fn stock_action(&self, id: ProductId, action: ProductAction) -> Result<u32, StoreError> {
        match self.products.perform_action(id, action).await.map_err(store_error::<Product>)? {
            ProductActionResult::StockLevel(level) => Ok(level),
        }
    }
}

#[async_trait]
impl DataStore for ActorStore {
    #[instrument(skip(self))]
    async fn create_product(&self, product: ProductCreate) -> Result<Product, StoreError> {
        let id = self.products.create(product).await.map_err(store_error::<Product>)?;
        self.products.get(id).await.map_err(store_error::<Product>)?
            .ok_or_else(|| StoreError::NotFound { entity: Product::KIND, id: id.to_string() })
    }

    #[instrument(skip(self))]
    async fn find_products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, StoreError> {
        debug!("Sending request");
        self.products.get_many(ids.to_vec()).await.map_err(store_error::<Product>)
    }

    #[instrument(skip(self))]
    async fn decrement_product_quantity(&self, id: ProductId, by: u32) -> Result<u32, StoreError> {
        self.stock_action(id, ProductAction::Decrement(by)).await
    }

    #[instrument(skip(self))]
    async fn increment_product_quantity(&self, id: ProductId, by: u32) -> Result<u32, StoreError> {
        self.stock_action(id, ProductAction::Increment(by)).await
    }

    #[instrument(skip(self))]
    async fn find_units_by_product(&self, product_id: ProductId, limit: usize) -> Result<Vec<Unit>, StoreError> {
        debug!("Sending request");
        self.units
            .find(move |unit: &Unit| unit.product_id == product_id, Some(limit))
            .await
            .map_err(store_error::<Unit>)
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn delete_units(&self, ids: &[UnitId]) -> Result<usize, StoreError> {
        let removed = self.units.delete_many(ids.to_vec()).await.map_err(store_error::<Unit>)?;
        Ok(removed.len())
    }

    #[instrument(skip(self, units), fields(count = units.len()))]
    async fn create_units(&self, units: Vec<Unit>) -> Result<Vec<UnitId>, StoreError> {
        self.units.insert(units).await.map_err(store_error::<Unit>)
    }

    #[instrument(skip(self))]
    async fn stock_units(&self, product_id: ProductId, count: u32) -> Result<Vec<UnitId>, StoreError> {
        let mut ids = Vec::with_capacity(count as usize);
        for _ in 0..count {
            match self.units.create(UnitCreate { product_id }).await {
                Ok(id) => ids.push(id),
                Err(e) => {
                    // All or nothing: drop the units created so far
                    if !ids.is_empty() {
                        if let Err(undo) = self.units.delete_many(ids.clone()).await {
                            warn!(error = %undo, orphaned = ids.len(), "Could not remove partially stocked units");
                        }
                    }
                    return Err(store_error::<Unit>(e));
                }
            }
        }
        Ok(ids)
    }

    #[instrument(skip(self, order), fields(user_id = %order.user_id))]
    async fn create_order(&self, order: OrderCreate) -> Result<Order, StoreError> {
        let id = self.orders.create(order).await.map_err(store_error::<Order>)?;
        self.orders.get(id).await.map_err(store_error::<Order>)?
            .ok_or_else(|| StoreError::NotFound { entity: Order::KIND, id: id.to_string() })
    }

    #[instrument(skip(self, patch))]
    async fn update_order(&self, id: OrderId, patch: OrderPatch) -> Result<Order, StoreError> {
        self.orders.update(id, patch).await.map_err(store_error::<Order>)
    }

    #[instrument(skip(self))]
    async fn find_order_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        debug!("Sending request");
        self.orders.get(id).await.map_err(store_error::<Order>)
    }

    #[instrument(skip(self))]
    async fn delete_order(&self, id: OrderId) -> Result<Order, StoreError> {
        self.orders.delete(id).await.map_err(store_error::<Order>)
    }

    #[instrument(skip(self))]
    async fn create_user(&self, user: UserCreate) -> Result<User, StoreError> {
        let id = self.users.create(user).await.map_err(store_error::<User>)?;
        self.users.get(id).await.map_err(store_error::<User>)?
            .ok_or_else(|| StoreError::NotFound { entity: User::KIND, id: id.to_string() })
    }

    #[instrument(skip(self))]
    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        debug!("Sending request");
        self.users.get(id).await.map_err(store_error::<User>)
    }

    #[instrument(skip(self))]
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let username = username.to_string();
        let found = self.users
            .find(move |user: &User| user.username == username, Some(1))
            .await
            .map_err(store_error::<User>)?;
        Ok(found.into_iter().next())
    }

    #[instrument(skip(self))]
    async fn update_user(&self, id: UserId, patch: UserPatch) -> Result<User, StoreError> {
        self.users.update(id, patch).await.map_err(store_error::<User>)
    }

    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        self.users.list().await.map_err(store_error::<User>)
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, id: UserId) -> Result<User, StoreError> {
        self.users.delete(id).await.map_err(store_error::<User>)
    }
}
