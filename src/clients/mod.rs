//! Inbound clients handed out by [`crate::app_system::MarketplaceSystem`].

mod order_client;
mod product_client;
mod user_client;

pub use order_client::OrderClient;
pub use product_client::ProductClient;
pub use user_client::UserClient;
