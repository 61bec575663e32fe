use crate::actor_framework::Entity;
use crate::domain::{Order, OrderCreate, OrderId, OrderPatch};

impl Entity for Order {
    const KIND: &'static str = "order";

    type Id = OrderId;
    type CreatePayload = OrderCreate;
    type Patch = OrderPatch;
    type Action = ();
    type ActionResult = ();

    fn id(&self) -> &OrderId { &self.id }

    /// Creates a new Order record. Fields not known at checkout start empty.
    fn from_create(id: OrderId, params: OrderCreate) -> Result<Self, String> {
        Ok(Self {
            id,
            user_id: params.user_id,
            ordered_items: params.ordered_items,
            shipment_company: params.shipment_company,
            shipment_request_status: None,
            shipment_status: params.shipment_status,
            invoice: None,
            refund_status: None,
            refund_details: None,
            shipping_cost: None,
            ordering_status: None,
            order_fulfillment_status: None,
            pre_payment: None,
            payment_status: params.payment_status,
        })
    }

    /// Overwrites every field present in the patch.
    fn on_update(&mut self, patch: OrderPatch) -> Result<(), String> {
        if let Some(ordered_items) = patch.ordered_items {
            self.ordered_items = ordered_items;
        }
        if let Some(value) = patch.shipment_company {
            self.shipment_company = Some(value);
        }
        if let Some(value) = patch.shipment_request_status {
            self.shipment_request_status = Some(value);
        }
        if let Some(value) = patch.shipment_status {
            self.shipment_status = Some(value);
        }
        if let Some(value) = patch.invoice {
            self.invoice = Some(value);
        }
        if let Some(value) = patch.refund_status {
            self.refund_status = Some(value);
        }
        if let Some(value) = patch.refund_details {
            self.refund_details = Some(value);
        }
        if let Some(value) = patch.shipping_cost {
            self.shipping_cost = Some(value);
        }
        if let Some(value) = patch.ordering_status {
            self.ordering_status = Some(value);
        }
        if let Some(value) = patch.order_fulfillment_status {
            self.order_fulfillment_status = Some(value);
        }
        if let Some(value) = patch.pre_payment {
            self.pre_payment = Some(value);
        }
        if let Some(value) = patch.payment_status {
            self.payment_status = Some(value);
        }
        Ok(())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;

    fn placed() -> Order {
        let params = OrderCreate {
            user_id: UserId(1),
            ordered_items: "[]".into(),
            shipment_company: Some("DHL".into()),
            shipment_status: None,
            payment_status: Some("PENDING".into()),
        };
        Order::from_create(OrderId(1), params).unwrap()
    }

    #[test]
    fn patch_leaves_omitted_fields_as_is() {
        let mut order = placed();
        let patch = OrderPatch {
            payment_status: Some("PAID".into()),
            shipping_cost: Some(9.0),
            ..Default::default()
        };
        order.on_update(patch).unwrap();

        assert_eq!(order.payment_status.as_deref(), Some("PAID"));
        assert_eq!(order.shipping_cost, Some(9.0));
        assert_eq!(order.shipment_company.as_deref(), Some("DHL"));
        assert_eq!(order.ordered_items, "[]");
    }
}
