use thiserror::Error;
use crate::domain::ProductId;
use crate::inventory::AllocationError;
use crate::store::StoreError;

/// Errors that can occur during catalog and stock operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(ProductId),
    #[error("Product validation error: {0}")]
    ValidationError(String),
    #[error("Stock allocation error: {0}")]
    Allocation(#[from] AllocationError),
    #[error("Product store error: {0}")]
    Store(#[from] StoreError),
}
