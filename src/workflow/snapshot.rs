//! Codec for the `ordered_items` column.
//!
//! The column holds a JSON array of
//! `{"productId": <int>, "quantity": <int>, "assignedUnits": [<int>, ...]}`.

use serde::{Deserialize, Serialize};

use crate::domain::{ProductId, UnitId};
use crate::order_actor::OrderError;

/// One line of an order together with the units that were allocated to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderedItem {
    pub product_id: ProductId,
    pub quantity: u32,
    #[serde(default)]
    pub assigned_units: Vec<UnitId>,
}

pub fn encode(items: &[OrderedItem]) -> Result<String, OrderError> {
    serde_json::to_string(items).map_err(|e| OrderError::Snapshot(e.to_string()))
}

pub fn decode(raw: &str) -> Result<Vec<OrderedItem>, OrderError> {
    serde_json::from_str(raw).map_err(|e| OrderError::Snapshot(e.to_string()))
}
