use crate::domain::{ProductId, UnitId};
use serde::{Deserialize, Serialize};

/// One discrete, interchangeable physical item of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub product_id: ProductId,
}

impl Unit {
    pub fn new(id: impl Into<UnitId>, product_id: impl Into<ProductId>) -> Self {
        Self {
            id: id.into(),
            product_id: product_id.into(),
        }
    }
}

/// Payload for stocking a brand new unit.
#[derive(Debug, Clone)]
pub struct UnitCreate {
    pub product_id: ProductId,
}
