use tracing::{debug, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::Order;
use crate::error::ApiError;

/// Client for interacting with the Order actor.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl_basic_client!(OrderClient, Order, order, orders);

impl OrderClient {
    /// Removes a pending order. Any other status is refused by the actor.
    #[instrument(skip(self))]
    pub async fn delete_order(&self, id: u64) -> Result<(), ApiError> {
        debug!("Sending request");
        self.inner.delete(id).await
    }
}
