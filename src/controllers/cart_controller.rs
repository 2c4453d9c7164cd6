use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, instrument, warn};

use crate::app_system::navigation::{Navigator, Route};
use crate::clients::{ApiClient, Notifier};
use crate::controllers::{BusyFlag, LastError};
use crate::domain::{CartSnapshot, ToastAction, ToastKind};
use crate::error::MutationError;
use crate::session::Session;

/// Cart mutations a shopper can trigger.
#[derive(Debug, Clone, Copy)]
enum CartMutation<'a> {
    Add { product_id: &'a str },
    UpdateQuantity { product_id: &'a str, quantity: u32 },
    Remove { product_id: &'a str },
}

impl CartMutation<'_> {
    fn product_id(&self) -> &str {
        match self {
            CartMutation::Add { product_id }
            | CartMutation::UpdateQuantity { product_id, .. }
            | CartMutation::Remove { product_id } => product_id,
        }
    }

    fn validate(&self) -> Result<(), MutationError> {
        if self.product_id().trim().is_empty() {
            return Err(MutationError::Validation("Product ID is required".to_string()));
        }
        if let CartMutation::UpdateQuantity { quantity: 0, .. } = self {
            return Err(MutationError::Validation("Quantity must be at least 1".to_string()));
        }
        Ok(())
    }

    fn failure_title(&self) -> &'static str {
        match self {
            CartMutation::Add { .. } => "Failed to add to cart",
            CartMutation::UpdateQuantity { .. } => "Failed to update quantity",
            CartMutation::Remove { .. } => "Failed to remove from cart",
        }
    }
}

/// Owns the cached cart. Each cart change is sent to the backend and the
/// cart is refetched only once that change has been acknowledged.
///
/// The cache only ever holds a snapshot the server returned for the user who
/// is still signed in; a failed mutation leaves it untouched. Independent
/// calls are not ordered against each other.
pub struct CartController {
    api: ApiClient,
    session: Session,
    notifier: Arc<dyn Notifier>,
    navigator: Navigator,
    cart: watch::Sender<Option<CartSnapshot>>,
    busy: BusyFlag,
    last_error: LastError,
}

impl CartController {
    pub fn new(
        api: ApiClient,
        session: Session,
        notifier: Arc<dyn Notifier>,
        navigator: Navigator,
    ) -> Self {
        let (cart, _) = watch::channel(None);
        Self {
            api,
            session,
            notifier,
            navigator,
            cart,
            busy: BusyFlag::default(),
            last_error: LastError::default(),
        }
    }

    /// Adds one unit of the product, then refreshes the cart.
    ///
    /// `Ok(None)` means the backend took the change but the cart could not be
    /// refreshed afterwards; the cached cart is then stale.
    #[instrument(skip(self))]
    pub async fn add_to_cart(&self, product_id: &str) -> Result<Option<CartSnapshot>, MutationError> {
        self.run(CartMutation::Add { product_id }).await
    }

    /// Sets the product's quantity, then refreshes the cart.
    #[instrument(skip(self))]
    pub async fn update_quantity(
        &self,
        product_id: &str,
        quantity: u32,
    ) -> Result<Option<CartSnapshot>, MutationError> {
        self.run(CartMutation::UpdateQuantity { product_id, quantity }).await
    }

    /// Removes the product, then refreshes the cart.
    #[instrument(skip(self))]
    pub async fn remove_from_cart(&self, product_id: &str) -> Result<Option<CartSnapshot>, MutationError> {
        self.run(CartMutation::Remove { product_id }).await
    }

    /// Reloads the cart in the background. Failures are recorded but never
    /// surface as a toast. `Ok(None)` if the user changed while it loaded.
    #[instrument(skip(self))]
    pub async fn fetch_cart(&self) -> Result<Option<CartSnapshot>, MutationError> {
        let epoch = self.session.epoch();
        let result = match self.session.user_id() {
            Some(user_id) => {
                let _busy = self.busy.enter();
                self.reload(user_id, epoch).await
            }
            None => Err(MutationError::Unauthenticated),
        };
        match &result {
            Ok(_) => self.last_error.set(None),
            Err(e) => {
                warn!(error = %e, "Failed to fetch cart");
                self.last_error.set(Some(e.clone()));
            }
        }
        result
    }

    /// Last snapshot the server returned, if any.
    pub fn cart(&self) -> Option<CartSnapshot> {
        self.cart.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<CartSnapshot>> {
        self.cart.subscribe()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    pub fn last_error(&self) -> Option<MutationError> {
        self.last_error.get()
    }

    /// Drops the cached cart and any recorded failure.
    pub fn reset(&self) {
        self.cart.send_replace(None);
        self.last_error.set(None);
    }

    async fn run(&self, mutation: CartMutation<'_>) -> Result<Option<CartSnapshot>, MutationError> {
        let epoch = self.session.epoch();
        let _busy = self.busy.enter();

        let user_id = match self.mutate(mutation).await {
            Ok(user_id) => user_id,
            Err(e) => {
                error!(error = %e, "Cart mutation failed");
                self.last_error.set(Some(e.clone()));
                self.notifier
                    .error(mutation.failure_title(), Some(&e.user_message()))
                    .await;
                return Err(e);
            }
        };
        self.last_error.set(None);

        // The change is acknowledged from here on; a failed refresh only leaves the cache stale.
        let cart = match self.reload(user_id, epoch).await {
            Ok(cart) => cart,
            Err(e) => {
                warn!(error = %e, "Cart changed but could not be refreshed");
                self.last_error.set(Some(e));
                None
            }
        };
        if let Some(cart) = &cart {
            info!(total_items = cart.total_items, "Cart updated");
        }

        if self.session.is_current(epoch) {
            self.announce(mutation).await;
        } else {
            info!("Session changed during cart mutation");
        }
        Ok(cart)
    }

    /// Sends the mutation and returns the user it was made for once acknowledged.
    async fn mutate(&self, mutation: CartMutation<'_>) -> Result<String, MutationError> {
        let user_id = self.session.user_id().ok_or(MutationError::Unauthenticated)?;
        mutation.validate()?;

        let product_id = mutation.product_id().to_string();
        match mutation {
            CartMutation::Add { .. } => {
                self.api.add_or_update_cart_item(user_id.clone(), product_id, 1).await?;
            }
            CartMutation::UpdateQuantity { quantity, .. } => {
                self.api
                    .add_or_update_cart_item(user_id.clone(), product_id, quantity)
                    .await?;
            }
            CartMutation::Remove { .. } => {
                self.api.remove_cart_item(user_id.clone(), product_id).await?;
            }
        }
        Ok(user_id)
    }

    /// Fetches the cart and caches it, unless someone signed in or out since `epoch`.
    async fn reload(&self, user_id: String, epoch: u64) -> Result<Option<CartSnapshot>, MutationError> {
        if !self.session.is_current(epoch) {
            return Ok(None);
        }
        let cart = self.api.fetch_cart(user_id).await?;
        if !self.session.is_current(epoch) {
            debug!("Session changed, discarding fetched cart");
            return Ok(None);
        }
        self.cart.send_replace(Some(cart.clone()));
        Ok(Some(cart))
    }

    async fn announce(&self, mutation: CartMutation<'_>) {
        match mutation {
            CartMutation::Add { .. } => {
                let navigator = self.navigator.clone();
                let view_cart = ToastAction::new("View Cart", move || navigator.push(Route::Cart));
                self.notifier
                    .with_action(
                        ToastKind::Success,
                        "Added to Cart",
                        Some("Product has been added to your cart."),
                        view_cart,
                        None,
                    )
                    .await;
            }
            CartMutation::Remove { .. } => {
                self.notifier
                    .success("Removed from Cart", Some("Product has been removed from your cart."))
                    .await;
            }
            CartMutation::UpdateQuantity { .. } => {}
        }
    }
}
