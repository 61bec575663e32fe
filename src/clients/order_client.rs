use std::sync::Arc;
use tracing::{debug, instrument};

use crate::domain::{CreateOrderRequest, Order, OrderId, UpdateOrderRequest};
use crate::order_actor::OrderError;
use crate::store::ActorStore;
use crate::workflow::{OrderWorkflow, OrderedItem};

/// Client for placing and managing orders.
///
/// Validation, stock allocation and rollback all happen in the shared
/// [`OrderWorkflow`]; clones share it.
#[derive(Clone)]
pub struct OrderClient {
    workflow: Arc<OrderWorkflow<ActorStore>>,
}

impl OrderClient {
    pub fn new(workflow: Arc<OrderWorkflow<ActorStore>>) -> Self {
        Self { workflow }
    }

    #[instrument(skip(self, request))]
    pub async fn create_order(&self, request: CreateOrderRequest) -> Result<Order, OrderError> {
        debug!("Processing create_order request");
        self.workflow.create_order(request).await
    }

    #[instrument(skip(self, request))]
    pub async fn update_order(&self, id: OrderId, request: UpdateOrderRequest) -> Result<Order, OrderError> {
        debug!("Processing update_order request");
        self.workflow.update_order(id, request).await
    }

    #[instrument(skip(self))]
    pub async fn delete_order(&self, id: OrderId) -> Result<Order, OrderError> {
        debug!("Processing delete_order request");
        self.workflow.delete_order(id).await
    }

    #[instrument(skip(self))]
    pub async fn get_order(&self, id: OrderId) -> Result<Option<Order>, OrderError> {
        self.workflow.get_order(id).await
    }

    #[instrument(skip(self))]
    pub async fn ordered_items(&self, id: OrderId) -> Result<Vec<OrderedItem>, OrderError> {
        self.workflow.ordered_items(id).await
    }
}
