use crate::domain::ProductId;
use serde::{Deserialize, Serialize};

/// Represents a product in the catalog.
///
/// `quantity` is the aggregate stock count and always equals the number of
/// unassigned [`Unit`](crate::domain::Unit)s of this product. It only changes
/// through [`ProductAction`](crate::product_actor::ProductAction)s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

impl Product {
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: f64, quantity: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            quantity,
        }
    }
}

/// Payload for creating a new product. Stock starts at zero and is added as units.
#[derive(Debug, Clone)]
pub struct ProductCreate {
    pub name: String,
    pub price: f64,
}
