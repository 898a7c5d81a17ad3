use tracing::{error, info};

use crate::actor_framework::ResourceActor;
use crate::app_system::SeedData;
use crate::clients::{DishClient, OrderClient};
use crate::domain::{Dish, Order};
use crate::repository::MemoryRepository;

/// The main application system that owns both resource actors.
///
/// Responsible for starting the actors with their repositories, handing out
/// clients, and handling shutdown.
pub struct RestaurantSystem {
    pub dish_client: DishClient,
    pub order_client: OrderClient,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl RestaurantSystem {
    pub fn new(channel_capacity: usize, seed: SeedData) -> Self {
        info!(
            dishes = seed.dishes.len(),
            orders = seed.orders.len(),
            "Starting restaurant system"
        );

        let (dish_actor, dish_resource_client) =
            ResourceActor::<Dish>::new(channel_capacity, MemoryRepository::seeded(seed.dishes));
        let dish_client = DishClient::new(dish_resource_client);
        let dish_handle = tokio::spawn(dish_actor.run());

        let (order_actor, order_resource_client) =
            ResourceActor::<Order>::new(channel_capacity, MemoryRepository::seeded(seed.orders));
        let order_client = OrderClient::new(order_resource_client);
        let order_handle = tokio::spawn(order_actor.run());

        Self {
            dish_client,
            order_client,
            handles: vec![dish_handle, order_handle],
        }
    }

    /// Drops this system's clients and waits for the actors to drain.
    ///
    /// Actors stop once every clone of their client is gone, so callers must
    /// release any clones (e.g. the HTTP router) first.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");
        drop(self.dish_client);
        drop(self.order_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
