//! Order create, update and delete on top of the inventory allocator.

mod order_workflow;
pub mod snapshot;

pub use order_workflow::OrderWorkflow;
pub use snapshot::OrderedItem;
