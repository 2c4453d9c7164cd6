use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::AbortHandle;
use tracing::{debug, instrument};

// =============================================================================
// 1. THE ABSTRACTION (Traits with Hooks)
// =============================================================================

/// Trait that any entity must implement to be managed by ResourceActor
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;
    type CreatePayload: Send + Sync + Debug;

    /// Get the ID of the entity
    fn id(&self) -> &Self::Id;

    /// Construct the full Entity from the ID and Payload
    fn from_create(id: Self::Id, payload: Self::CreatePayload) -> Result<Self, FrameworkError>;

    // --- Lifecycle Hooks ---

    fn on_create(&mut self) -> Result<(), FrameworkError> {
        Ok(())
    }

    /// How long the entity stays in the store before the actor evicts it.
    /// `None` keeps it until an explicit delete.
    fn expires_after(&self) -> Option<Duration> {
        None
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped")]
    ActorDropped,
    #[error("Rejected: {0}")]
    Rejected(String),
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

#[derive(Debug)]
pub enum ResourceRequest<T: Entity> {
    Create {
        payload: T::CreatePayload,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    /// Removing an id that is not present answers `Ok(None)`.
    Delete {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Clear {
        respond_to: Response<usize>,
    },
    /// Sent by the actor's own expiry timers.
    Expire {
        id: T::Id,
    },
    Shutdown,
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    timer_sender: mpsc::WeakSender<ResourceRequest<T>>,
    store: Vec<T>,
    timers: HashMap<T::Id, AbortHandle>,
    published: watch::Sender<Vec<T>>,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (published, snapshots) = watch::channel(Vec::new());
        let actor = Self {
            receiver,
            timer_sender: sender.downgrade(),
            store: Vec::new(),
            timers: HashMap::new(),
            published,
            next_id_fn: Box::new(next_id_fn),
        };
        let client = ResourceClient::new(sender, snapshots);
        (actor, client)
    }

    #[instrument(name = "resource_actor", skip(self), fields(entity = std::any::type_name::<T>()))]
    pub async fn run(mut self) {
        debug!("ResourceActor starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { payload, respond_to } => {
                    let _ = respond_to.send(self.handle_create(payload));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.iter().find(|item| item.id() == &id).cloned();
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { respond_to } => {
                    let _ = respond_to.send(Ok(self.store.clone()));
                }
                ResourceRequest::Delete { id, respond_to } => {
                    let _ = respond_to.send(Ok(self.remove(&id)));
                }
                ResourceRequest::Clear { respond_to } => {
                    let removed = self.store.len();
                    for (_, timer) in self.timers.drain() {
                        timer.abort();
                    }
                    self.store.clear();
                    self.publish();
                    let _ = respond_to.send(Ok(removed));
                }
                ResourceRequest::Expire { id } => {
                    if self.remove(&id).is_some() {
                        debug!(id = %id, "Entity expired");
                    }
                }
                ResourceRequest::Shutdown => {
                    debug!("ResourceActor shutting down");
                    break;
                }
            }
        }
        for (_, timer) in self.timers.drain() {
            timer.abort();
        }
        debug!("ResourceActor stopped");
    }

    fn handle_create(&mut self, payload: T::CreatePayload) -> Result<T::Id, FrameworkError> {
        let id = (self.next_id_fn)();
        let mut item = T::from_create(id.clone(), payload)?;
        item.on_create()?;

        if let Some(ttl) = item.expires_after() {
            self.schedule_expiry(id.clone(), ttl);
        }
        self.store.push(item);
        self.publish();
        Ok(id)
    }

    fn schedule_expiry(&mut self, id: T::Id, ttl: Duration) {
        let sender = self.timer_sender.clone();
        let timer_id = id.clone();
        let deadline = tokio::time::Instant::now() + ttl;
        let task = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if let Some(sender) = sender.upgrade() {
                let _ = sender.send(ResourceRequest::Expire { id: timer_id }).await;
            }
        });
        self.timers.insert(id, task.abort_handle());
    }

    fn remove(&mut self, id: &T::Id) -> Option<T> {
        if let Some(timer) = self.timers.remove(id) {
            timer.abort();
        }
        let position = self.store.iter().position(|item| item.id() == id)?;
        let removed = self.store.remove(position);
        self.publish();
        Some(removed)
    }

    // send_replace keeps the value current even while nobody is subscribed.
    fn publish(&self) {
        self.published.send_replace(self.store.clone());
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
    snapshots: watch::Receiver<Vec<T>>,
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>, snapshots: watch::Receiver<Vec<T>>) -> Self {
        Self { sender, snapshots }
    }

    pub async fn create(&self, payload: T::CreatePayload) -> Result<T::Id, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Create { payload, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Get { id, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn list(&self) -> Result<Vec<T>, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::List { respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn delete(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Delete { id, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn clear(&self) -> Result<usize, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ResourceRequest::Clear { respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn shutdown(&self) -> Result<(), FrameworkError> {
        self.sender
            .send(ResourceRequest::Shutdown)
            .await
            .map_err(|_| FrameworkError::ActorClosed)
    }

    /// Every mutation the actor applies is published here as the full ordered sequence.
    pub fn subscribe(&self) -> watch::Receiver<Vec<T>> {
        self.snapshots.clone()
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================
