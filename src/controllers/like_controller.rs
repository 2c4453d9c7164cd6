use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::broadcast;
use tracing::{debug, error, info, instrument, warn};

use crate::clients::{ApiClient, Notifier};
use crate::controllers::{BusyFlag, LastError, Optimistic};
use crate::domain::{LikeChange, LikeState};
use crate::error::MutationError;
use crate::session::Session;

const CONFIRMATION_BUFFER: usize = 64;

/// Per-product like state with optimistic toggling.
///
/// A toggle is shown immediately and rolled back if the backend rejects it.
/// Confirmed changes are broadcast to subscribers; there is no success toast.
/// Answers that arrive after a sign-in or sign-out leave the state alone.
pub struct LikeController {
    api: ApiClient,
    session: Session,
    notifier: Arc<dyn Notifier>,
    likes: Mutex<HashMap<String, LikeState>>,
    confirmations: broadcast::Sender<LikeChange>,
    busy: BusyFlag,
    last_error: LastError,
}

impl LikeController {
    pub fn new(api: ApiClient, session: Session, notifier: Arc<dyn Notifier>) -> Self {
        let (confirmations, _) = broadcast::channel(CONFIRMATION_BUFFER);
        Self {
            api,
            session,
            notifier,
            likes: Mutex::new(HashMap::new()),
            confirmations,
            busy: BusyFlag::default(),
            last_error: LastError::default(),
        }
    }

    /// Seeds the state for a product the caller already has details for.
    pub fn track(&self, product_id: impl Into<String>, state: LikeState) {
        self.store(product_id.into(), state);
    }

    pub fn state(&self, product_id: &str) -> Option<LikeState> {
        self.likes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(product_id)
            .copied()
    }

    /// Fetches the product and seeds its like state. The token is sent when
    /// present so the backend can report whether this user likes it.
    #[instrument(skip(self))]
    pub async fn load(&self, product_id: &str) -> Result<LikeState, MutationError> {
        let epoch = self.session.epoch();
        let _busy = self.busy.enter();
        match self.api.fetch_product(product_id.to_string(), self.session.token()).await {
            Ok(product) => {
                let state = product.like_state();
                debug!(is_liked = state.is_liked, like_count = state.like_count, "Like state loaded");
                if self.session.is_current(epoch) {
                    self.store(product_id.to_string(), state);
                }
                Ok(state)
            }
            Err(e) => {
                warn!(error = %e, "Failed to load product");
                let e = MutationError::from(e);
                self.last_error.set(Some(e.clone()));
                Err(e)
            }
        }
    }

    /// Seeds the state of every product the signed-in user likes. Returns how
    /// many products were tracked.
    #[instrument(skip(self))]
    pub async fn load_liked(&self) -> Result<usize, MutationError> {
        let epoch = self.session.epoch();
        let result = match self.session.token() {
            Some(token) => {
                let _busy = self.busy.enter();
                self.api.fetch_liked_products(token).await.map_err(MutationError::from)
            }
            None => Err(MutationError::Unauthenticated),
        };
        let products = match result {
            Ok(products) => products,
            Err(e) => {
                warn!(error = %e, "Failed to load liked products");
                self.last_error.set(Some(e.clone()));
                return Err(e);
            }
        };
        if !self.session.is_current(epoch) {
            debug!("Session changed, discarding liked products");
            return Ok(0);
        }
        let mut likes = self.likes.lock().unwrap_or_else(PoisonError::into_inner);
        for product in &products {
            likes.insert(product.product_id.clone(), LikeState::new(true, product.like_count));
        }
        info!(count = products.len(), "Liked products tracked");
        Ok(products.len())
    }

    /// Flips the like flag and count right away, then asks the backend.
    /// On failure the previous state comes back and an error toast is shown.
    #[instrument(skip(self))]
    pub async fn toggle_like(&self, product_id: &str) -> Result<LikeState, MutationError> {
        let result = self.try_toggle(product_id).await;
        match &result {
            Ok(state) => {
                info!(is_liked = state.is_liked, like_count = state.like_count, "Like confirmed");
                self.last_error.set(None);
            }
            Err(e) => {
                error!(error = %e, "Like toggle failed");
                self.last_error.set(Some(e.clone()));
                self.notifier
                    .error("Failed to update like", Some(&e.user_message()))
                    .await;
            }
        }
        result
    }

    /// Confirmed like changes, in the order the backend acknowledged them.
    pub fn subscribe(&self) -> broadcast::Receiver<LikeChange> {
        self.confirmations.subscribe()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    pub fn last_error(&self) -> Option<MutationError> {
        self.last_error.get()
    }

    /// Forgets every tracked product and any recorded failure.
    pub fn reset(&self) {
        self.likes.lock().unwrap_or_else(PoisonError::into_inner).clear();
        self.last_error.set(None);
    }

    async fn try_toggle(&self, product_id: &str) -> Result<LikeState, MutationError> {
        let epoch = self.session.epoch();
        let token = self.session.token().ok_or(MutationError::Unauthenticated)?;
        if product_id.trim().is_empty() {
            return Err(MutationError::Validation("Product ID is required".to_string()));
        }
        let current = self.state(product_id).ok_or_else(|| {
            MutationError::Validation(format!("Like state for product {product_id} is not loaded"))
        })?;

        let update = Optimistic::apply(current, LikeState::toggled);
        self.store(product_id.to_string(), *update.applied());

        let _busy = self.busy.enter();
        match self.api.toggle_like(product_id.to_string(), token).await {
            Ok(_) => {
                let state = update.commit();
                if self.session.is_current(epoch) && self.replace_tracked(product_id, state) {
                    // Nobody listening is fine.
                    let _ = self.confirmations.send(LikeChange {
                        product_id: product_id.to_string(),
                        state,
                    });
                }
                Ok(state)
            }
            Err(e) => {
                if self.session.is_current(epoch) {
                    self.replace_tracked(product_id, update.rollback());
                }
                Err(e.into())
            }
        }
    }

    /// Overwrites the state only if the product is still tracked.
    fn replace_tracked(&self, product_id: &str, state: LikeState) -> bool {
        match self.likes.lock().unwrap_or_else(PoisonError::into_inner).get_mut(product_id) {
            Some(entry) => {
                *entry = state;
                true
            }
            None => false,
        }
    }

    fn store(&self, product_id: String, state: LikeState) {
        self.likes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(product_id, state);
    }
}
