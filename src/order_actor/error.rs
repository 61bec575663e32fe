use thiserror::Error;
use crate::domain::{OrderId, ProductId, UserId};
use crate::inventory::AllocationError;
use crate::store::StoreError;

/// Errors that can occur during order operations.
///
/// Every variant carries the offending ids so callers can render a precise message.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Invalid product IDs: {}", join_ids(.0))]
    InvalidProduct(Vec<ProductId>),
    #[error("Not enough units for product ID: {0}")]
    InsufficientStock(ProductId),
    #[error("Order with ID {0} not found")]
    NotFound(OrderId),
    #[error("Invalid user: {0}")]
    InvalidUser(UserId),
    #[error("Conflicting state: {0}")]
    ConflictingState(String),
    #[error("Order validation error: {0}")]
    ValidationError(String),
    #[error("Ordered items snapshot error: {0}")]
    Snapshot(String),
    #[error("Order store error: {0}")]
    Store(#[from] StoreError),
}

fn join_ids(ids: &[ProductId]) -> String {
    ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

impl From<AllocationError> for OrderError {
    fn from(e: AllocationError) -> Self {
        match e {
            AllocationError::InsufficientStock(product_id) => OrderError::InsufficientStock(product_id),
            AllocationError::SectionNotHeld(product_id) => {
                OrderError::ConflictingState(format!("{} was touched outside its reservation", product_id))
            }
            AllocationError::Store(e @ StoreError::AlreadyExists { .. }) => {
                OrderError::ConflictingState(e.to_string())
            }
            AllocationError::Store(e) => OrderError::Store(e),
        }
    }
}
