use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tracing::{error, info};

use super::{ActorConfig, SystemError};
use crate::actor_framework::{Entity, ResourceActor, ResourceClient};
use crate::clients::{OrderClient, ProductClient, UserClient};
use crate::domain::{Order, Product, Unit, User};
use crate::inventory::Allocator;
use crate::store::ActorStore;
use crate::workflow::OrderWorkflow;

/// The main application system that orchestrates all actors.
///
/// Responsible for starting up actors, wiring them together, and handling shutdown.
pub struct MarketplaceSystem {
    pub order_client: OrderClient,
    pub user_client: UserClient,
    pub product_client: ProductClient,
    store: Arc<ActorStore>,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

/// Spawns a table actor whose ids count up from 1.
fn spawn_table<T>(buffer_size: usize) -> (ResourceClient<T>, tokio::task::JoinHandle<()>)
where
    T: Entity,
    T::Id: From<u32>,
{
    let id_counter = Arc::new(AtomicU32::new(1));
    let next_id = move || <T::Id as From<u32>>::from(id_counter.fetch_add(1, Ordering::SeqCst));

    let (actor, client) = ResourceActor::<T>::new(buffer_size, next_id);
    let handle = tokio::spawn(actor.run());
    (client, handle)
}

impl MarketplaceSystem {
    pub fn new(config: &ActorConfig) -> Self {
        let (products, product_handle) = spawn_table::<Product>(config.buffer_size);
        let (units, unit_handle) = spawn_table::<Unit>(config.buffer_size);
        let (orders, order_handle) = spawn_table::<Order>(config.buffer_size);
        let (users, user_handle) = spawn_table::<User>(config.buffer_size);

        let store = Arc::new(ActorStore::new(products, units, orders, users));
        let allocator = Arc::new(Allocator::new(Arc::clone(&store)));
        let workflow = Arc::new(OrderWorkflow::new(Arc::clone(&store), Arc::clone(&allocator)));

        info!(buffer_size = config.buffer_size, "Marketplace actors started");

        Self {
            order_client: OrderClient::new(workflow),
            user_client: UserClient::new(Arc::clone(&store)),
            product_client: ProductClient::new(Arc::clone(&store), allocator),
            store,
            handles: vec![product_handle, unit_handle, order_handle, user_handle],
        }
    }

    /// Direct access to the table gateway.
    #[cfg(test)]
    pub fn store(&self) -> &ActorStore {
        &self.store
    }

    #[cfg(test)]
    pub fn allocator(&self) -> &Allocator<ActorStore> {
        self.product_client.allocator()
    }

    /// Stops every actor and waits for its task to finish.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");
        self.store.shutdown().await;

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Actor task failed");
                return Err(SystemError::Shutdown(e.to_string()));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
