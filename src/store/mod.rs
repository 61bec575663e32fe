//! Data store gateway.
//!
//! The order workflow only talks to storage through [`DataStore`]. Every call
//! is atomic on its own; nothing here spans several calls, which is why the
//! workflow brings its own exclusive sections and rollback journal.

mod actor_store;

pub use actor_store::ActorStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    Order, OrderCreate, OrderId, OrderPatch, Product, ProductCreate, ProductId, Unit, UnitId,
    User, UserCreate, UserId, UserPatch,
};

/// Errors that can occur during storage operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("{entity} already exists: {id}")]
    AlreadyExists { entity: &'static str, id: String },
    #[error("{entity} rejected the request: {reason}")]
    Rejected { entity: &'static str, reason: String },
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Trait defining the repository-style interface over the marketplace tables.
#[async_trait]
pub trait DataStore: Send + Sync + 'static {
    // --- Products ---

    async fn create_product(&self, product: ProductCreate) -> Result<Product, StoreError>;

    /// Returns the products that exist among `ids`; unknown ids are skipped.
    async fn find_products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, StoreError>;

    /// Conditional decrement: fails without change if stock would go negative.
    /// Returns the remaining stock.
    async fn decrement_product_quantity(&self, id: ProductId, by: u32) -> Result<u32, StoreError>;

    /// Returns the new stock level.
    async fn increment_product_quantity(&self, id: ProductId, by: u32) -> Result<u32, StoreError>;

    // --- Units ---

    /// At most `limit` units of the product, lowest id first.
    async fn find_units_by_product(&self, product_id: ProductId, limit: usize) -> Result<Vec<Unit>, StoreError>;

    /// Deletes the given units and returns how many existed.
    async fn delete_units(&self, ids: &[UnitId]) -> Result<usize, StoreError>;

    /// Recreates units under their own ids. Fails as a whole if any id is taken.
    async fn create_units(&self, units: Vec<Unit>) -> Result<Vec<UnitId>, StoreError>;

    /// Creates `count` fresh units with generated ids. Leaves none behind on failure.
    async fn stock_units(&self, product_id: ProductId, count: u32) -> Result<Vec<UnitId>, StoreError>;

    // --- Orders ---

    async fn create_order(&self, order: OrderCreate) -> Result<Order, StoreError>;
    async fn update_order(&self, id: OrderId, patch: OrderPatch) -> Result<Order, StoreError>;
    async fn find_order_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError>;
    async fn delete_order(&self, id: OrderId) -> Result<Order, StoreError>;

    // --- Users ---

    async fn create_user(&self, user: UserCreate) -> Result<User, StoreError>;
    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn update_user(&self, id: UserId, patch: UserPatch) -> Result<User, StoreError>;
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;
    async fn delete_user(&self, id: UserId) -> Result<User, StoreError>;
}
