use std::fmt::Debug;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, instrument, warn};

use crate::error::ApiError;
use crate::repository::{next_id, Repository, Slot};
use crate::validation::{run_rules, Payload, Rule, RuleContext};

// =============================================================================
// 1. THE ABSTRACTION (Entity with rule lists and lifecycle hooks)
// =============================================================================

/// Trait that any resource must implement to be managed by a [`ResourceActor`].
pub trait Entity: Clone + Debug + Send + Sync + 'static {
    /// Human-facing resource name used in messages, e.g. `"Dish"`.
    const RESOURCE: &'static str;

    fn id(&self) -> u64;

    /// Validator chain run before [`Entity::from_create`].
    fn create_rules() -> &'static [Rule];

    /// Validator chain run against the resolved entity before [`Entity::on_update`].
    fn update_rules() -> &'static [Rule];

    /// Construct the entity from its assigned id and an already validated payload.
    fn from_create(id: u64, payload: &Payload) -> Result<Self, ApiError>;

    // --- Lifecycle Hooks ---

    /// Merge a validated payload. Must never touch the id.
    fn on_update(&mut self, payload: &Payload) -> Result<(), ApiError>;

    /// Deletion guard. Refuses unless the entity type opts in.
    fn on_delete(&self) -> Result<(), ApiError> {
        Err(ApiError::StateConflict(format!(
            "A {} cannot be deleted",
            Self::RESOURCE.to_lowercase()
        )))
    }
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<Result<T, ApiError>>;

#[derive(Debug)]
pub enum ResourceRequest<T: Entity> {
    List {
        respond_to: Response<Vec<T>>,
    },
    Create {
        payload: Payload,
        respond_to: Response<T>,
    },
    Get {
        id: u64,
        respond_to: Response<T>,
    },
    Update {
        id: u64,
        payload: Payload,
        respond_to: Response<T>,
    },
    Delete {
        id: u64,
        respond_to: Response<()>,
    },
}

/// Per-request state produced by the resolver and consumed by later stages.
#[derive(Debug, Clone)]
pub struct RequestContext<T> {
    pub route_id: u64,
    /// Where the entity lives; writes go here instead of searching again.
    pub slot: Slot,
    pub entity: T,
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

/// Sole owner of one resource collection. Requests are handled strictly one
/// after another, so a pipeline never interleaves with another request.
pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: Box<dyn Repository<T>>,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(buffer_size: usize, store: impl Repository<T>) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: Box::new(store),
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    #[instrument(name = "resource_actor", skip(self), fields(resource = T::RESOURCE))]
    pub async fn run(mut self) {
        info!(count = self.store.len(), "Actor starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::List { respond_to } => {
                    self.handle_list(respond_to);
                }
                ResourceRequest::Create { payload, respond_to } => {
                    self.handle_create(payload, respond_to);
                }
                ResourceRequest::Get { id, respond_to } => {
                    self.handle_get(id, respond_to);
                }
                ResourceRequest::Update { id, payload, respond_to } => {
                    self.handle_update(id, payload, respond_to);
                }
                ResourceRequest::Delete { id, respond_to } => {
                    self.handle_delete(id, respond_to);
                }
            }
        }
        info!("Actor stopped");
    }

    #[instrument(skip(self, respond_to))]
    fn handle_list(&self, respond_to: Response<Vec<T>>) {
        let items = self.store.list();
        debug!(count = items.len(), "Listed items");
        let _ = respond_to.send(Ok(items));
    }

    #[instrument(skip(self, payload, respond_to))]
    fn handle_create(&mut self, payload: Payload, respond_to: Response<T>) {
        let result = self.create(&payload);
        match &result {
            Ok(item) => info!(id = item.id(), "Item created"),
            Err(e) => debug!(error = %e, "Create rejected"),
        }
        let _ = respond_to.send(result);
    }

    #[instrument(skip(self, respond_to))]
    fn handle_get(&self, id: u64, respond_to: Response<T>) {
        let result = self.resolve(id).map(|ctx| ctx.entity);
        let _ = respond_to.send(result);
    }

    #[instrument(skip(self, payload, respond_to))]
    fn handle_update(&mut self, id: u64, payload: Payload, respond_to: Response<T>) {
        let result = self.update(id, &payload);
        match &result {
            Ok(_) => info!("Item updated"),
            Err(e) => debug!(error = %e, "Update rejected"),
        }
        let _ = respond_to.send(result);
    }

    #[instrument(skip(self, respond_to))]
    fn handle_delete(&mut self, id: u64, respond_to: Response<()>) {
        let result = self.delete(id);
        match &result {
            Ok(()) => info!("Item deleted"),
            Err(e @ ApiError::StateConflict(_)) => warn!(error = %e, "Delete refused"),
            Err(e) => debug!(error = %e, "Delete rejected"),
        }
        let _ = respond_to.send(result);
    }

    // --- Pipeline stages ---

    /// Entity Resolver: the only lookup by id in the pipeline.
    fn resolve(&self, id: u64) -> Result<RequestContext<T>, ApiError> {
        match self.store.locate(id) {
            Some((slot, entity)) => Ok(RequestContext {
                route_id: id,
                slot,
                entity: entity.clone(),
            }),
            None => {
                debug!("Item not found");
                Err(ApiError::not_found(T::RESOURCE, id))
            }
        }
    }

    fn create(&mut self, payload: &Payload) -> Result<T, ApiError> {
        run_rules(T::create_rules(), payload, &RuleContext::create(T::RESOURCE))?;
        let id = next_id(T::RESOURCE, self.store.max_id())?;
        let item = T::from_create(id, payload)?;
        self.store.insert(item.clone());
        Ok(item)
    }

    fn update(&mut self, id: u64, payload: &Payload) -> Result<T, ApiError> {
        let RequestContext {
            route_id,
            slot,
            mut entity,
        } = self.resolve(id)?;
        run_rules(
            T::update_rules(),
            payload,
            &RuleContext::update(T::RESOURCE, route_id),
        )?;
        entity.on_update(payload)?;
        if entity.id() != route_id || self.store.replace(slot, entity.clone()).is_none() {
            error!(route_id, entity_id = entity.id(), "Update lost its entity");
            return Err(ApiError::not_found(T::RESOURCE, route_id));
        }
        Ok(entity)
    }

    fn delete(&mut self, id: u64) -> Result<(), ApiError> {
        let RequestContext {
            route_id,
            slot,
            entity,
        } = self.resolve(id)?;
        entity.on_delete()?;
        self.store
            .remove(slot)
            .map(|_| ())
            .ok_or_else(|| ApiError::not_found(T::RESOURCE, route_id))
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

#[derive(Debug)]
pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: Entity> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn call<R>(
        &self,
        request: impl FnOnce(Response<R>) -> ResourceRequest<T>,
    ) -> Result<R, ApiError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(request(respond_to))
            .await
            .map_err(|_| ApiError::Unavailable("Actor closed".to_string()))?;
        response
            .await
            .map_err(|_| ApiError::Unavailable("Actor dropped".to_string()))?
    }

    pub async fn list(&self) -> Result<Vec<T>, ApiError> {
        self.call(|respond_to| ResourceRequest::List { respond_to }).await
    }

    pub async fn create(&self, payload: Payload) -> Result<T, ApiError> {
        self.call(|respond_to| ResourceRequest::Create { payload, respond_to })
            .await
    }

    pub async fn get(&self, id: u64) -> Result<T, ApiError> {
        self.call(|respond_to| ResourceRequest::Get { id, respond_to })
            .await
    }

    pub async fn update(&self, id: u64, payload: Payload) -> Result<T, ApiError> {
        self.call(|respond_to| ResourceRequest::Update { id, payload, respond_to })
            .await
    }

    pub async fn delete(&self, id: u64) -> Result<(), ApiError> {
        self.call(|respond_to| ResourceRequest::Delete { id, respond_to })
            .await
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================
