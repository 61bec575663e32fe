mod domain;
mod actor_framework;
mod store;
mod inventory;
mod workflow;
mod clients;
mod app_system;

mod product_actor;
mod unit_actor;
mod order_actor;
mod user_actor;

#[cfg(test)]
mod mock_framework;

use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, Instrument};

use crate::app_system::{setup_tracing, AppConfig, MarketplaceSystem, SystemError};
use crate::domain::{CreateOrderRequest, OrderedItemRequest, UpdateOrderRequest, UserPatch, SELLER_ROLE_ID};
use crate::product_actor::ProductError;

#[derive(Parser, Debug)]
#[command(name = "marketplace_orders")]
#[command(about = "Order and inventory allocation for a multi-seller marketplace", long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "MARKETPLACE_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter, overrides the configured one (e.g. "debug")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), SystemError> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };
    if let Some(level) = args.log_level {
        config.logging.filter = level;
    }

    // Setup tracing once for the entire application
    setup_tracing(&config.logging);

    info!("Starting marketplace order system");
    let system = MarketplaceSystem::new(&config.actors);

    let span = tracing::info_span!("seeding");
    let (user, product) = async {
        let user = system.user_client.register("alice").await?;
        let seller = system.user_client.register("bob").await?;
        let seller = system.user_client
            .update_user(seller.id, UserPatch { role_id: Some(SELLER_ROLE_ID), ..Default::default() })
            .await?;
        info!(seller = %seller.username, is_seller = seller.is_seller, "Seller registered");

        let product = system.product_client.create_product("Ceramic mug", 12.5, 6).await?;
        let added = system.product_client.restock(product.id, 4).await?;
        let units = system.product_client.units_of(product.id).await?;
        info!(added = added.len(), in_stock = units.len(), "Product restocked");

        let product = system.product_client.get_product(product.id).await?.ok_or(ProductError::NotFound(product.id))?;
        Ok::<_, SystemError>((user, product))
    }
    .instrument(span)
    .await?;

    info!(user_id = %user.id, product_id = %product.id, stock = product.quantity, "Catalog seeded");
    if let Some(found) = system.user_client.get_user(user.id).await? {
        info!(username = %found.username, users = system.user_client.list_users().await?.len(), "Buyer ready");
    }

    let span = tracing::info_span!("order_processing");
    let result = async {
        let request = CreateOrderRequest::new(user.id, vec![OrderedItemRequest::new(product.id, 3)]);
        let order = system.order_client.create_order(request).await?;
        info!(order_id = %order.id, stock = system.product_client.check_stock(product.id).await?, "Order placed");

        let shipped = UpdateOrderRequest {
            shipment_status: Some("SHIPPED".to_string()),
            ..Default::default()
        };
        system.order_client.update_order(order.id, shipped).await?;
        if let Some(stored) = system.order_client.get_order(order.id).await? {
            info!(shipment_status = ?stored.shipment_status, "Order metadata updated");
        }

        let resized = UpdateOrderRequest {
            ordered_items: Some(vec![OrderedItemRequest::new(product.id, 5)]),
            ..Default::default()
        };
        system.order_client.update_order(order.id, resized).await?;
        let items = system.order_client.ordered_items(order.id).await?;
        info!(units = items.iter().map(|item| item.assigned_units.len()).sum::<usize>(), "Order resized");

        system.order_client.delete_order(order.id).await?;
        info!(stock = system.product_client.check_stock(product.id).await?, "Order deleted, stock restored");
        Ok::<_, SystemError>(())
    }
    .instrument(span)
    .await;

    if let Err(e) = result {
        error!(error = %e, "Order processing failed");
    }

    let removed = system.user_client.delete_user(user.id).await?;
    info!(user_id = %removed.id, "Buyer removed");

    // Shutdown system gracefully
    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
