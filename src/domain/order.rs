use crate::domain::{OrderId, ProductId, UserId};
use serde::{Deserialize, Serialize};

/// Represents a placed order as stored in the order table.
///
/// `ordered_items` is the serialized snapshot of the allocated units. It is
/// opaque outside of [`crate::workflow`], which is the only place that decodes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub ordered_items: String,
    pub shipment_company: Option<String>,
    pub shipment_request_status: Option<String>,
    pub shipment_status: Option<String>,
    pub invoice: Option<String>,
    pub refund_status: Option<String>,
    pub refund_details: Option<String>,
    pub shipping_cost: Option<f64>,
    pub ordering_status: Option<String>,
    pub order_fulfillment_status: Option<String>,
    pub pre_payment: Option<f64>,
    pub payment_status: Option<String>,
}

/// Payload for inserting a new order record.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub user_id: UserId,
    pub ordered_items: String,
    pub shipment_company: Option<String>,
    pub shipment_status: Option<String>,
    pub payment_status: Option<String>,
}

/// Field-wise overwrite of an order record. `None` leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderPatch {
    pub ordered_items: Option<String>,
    pub shipment_company: Option<String>,
    pub shipment_request_status: Option<String>,
    pub shipment_status: Option<String>,
    pub invoice: Option<String>,
    pub refund_status: Option<String>,
    pub refund_details: Option<String>,
    pub shipping_cost: Option<f64>,
    pub ordering_status: Option<String>,
    pub order_fulfillment_status: Option<String>,
    pub pre_payment: Option<f64>,
    pub payment_status: Option<String>,
}

impl OrderPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// =============================================================================
// Inbound DTOs
// =============================================================================

/// One requested line of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderedItemRequest {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl OrderedItemRequest {
    pub fn new(product_id: impl Into<ProductId>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// Checkout request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub user_id: UserId,
    pub ordered_items: Vec<OrderedItemRequest>,
    #[serde(default)]
    pub shipment_company: Option<String>,
    #[serde(default)]
    pub shipment_status: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
}

impl CreateOrderRequest {
    pub fn new(user_id: impl Into<UserId>, ordered_items: Vec<OrderedItemRequest>) -> Self {
        Self {
            user_id: user_id.into(),
            ordered_items,
            shipment_company: None,
            shipment_status: None,
            payment_status: None,
        }
    }
}

/// Update request. Every omitted field keeps its stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateOrderRequest {
    pub ordered_items: Option<Vec<OrderedItemRequest>>,
    pub shipment_company: Option<String>,
    pub shipment_request_status: Option<String>,
    pub shipment_status: Option<String>,
    pub invoice: Option<String>,
    pub refund_status: Option<String>,
    pub refund_details: Option<String>,
    pub shipping_cost: Option<f64>,
    pub ordering_status: Option<String>,
    pub order_fulfillment_status: Option<String>,
    pub pre_payment: Option<f64>,
    pub payment_status: Option<String>,
}

impl UpdateOrderRequest {
    /// Splits the request into the new item list (if any) and the metadata patch.
    pub fn into_parts(self) -> (Option<Vec<OrderedItemRequest>>, OrderPatch) {
        let patch = OrderPatch {
            ordered_items: None,
            shipment_company: self.shipment_company,
            shipment_request_status: self.shipment_request_status,
            shipment_status: self.shipment_status,
            invoice: self.invoice,
            refund_status: self.refund_status,
            refund_details: self.refund_details,
            shipping_cost: self.shipping_cost,
            ordering_status: self.ordering_status,
            order_fulfillment_status: self.order_fulfillment_status,
            pre_payment: self.pre_payment,
            payment_status: self.payment_status,
        };
        (self.ordered_items, patch)
    }
}
