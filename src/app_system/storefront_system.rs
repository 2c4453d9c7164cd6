use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::actor_framework::ResourceActor;
use crate::actors::HttpBackend;
use crate::app_system::config::Config;
use crate::app_system::navigation::{Navigator, Route};
use crate::clients::{ApiClient, Notifier, ToastClient};
use crate::controllers::{CartController, LikeController};
use crate::domain::{Identity, Toast, ToastId};
use crate::error::ApiError;
use crate::session::Session;

/// The client core: the toast actor, the backend actor, and the controllers
/// wired on top of them.
///
/// Responsible for starting up actors, wiring them together, and handling shutdown.
pub struct StorefrontSystem {
    pub toasts: ToastClient,
    pub api: ApiClient,
    pub session: Session,
    pub navigator: Navigator,
    pub cart: CartController,
    pub likes: LikeController,
    handles: Vec<JoinHandle<()>>,
}

impl StorefrontSystem {
    /// Starts every actor against the backend named in `config`.
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let (backend, api) = HttpBackend::new(config.channel_buffer, config)?;
        let backend_handle = tokio::spawn(backend.run());
        let mut system = Self::with_api(config, api);
        system.handles.push(backend_handle);
        Ok(system)
    }

    /// Wires the system around an existing backend client. The caller owns
    /// whatever serves `api`.
    pub fn with_api(config: &Config, api: ApiClient) -> Self {
        let next_toast_id = || ToastId::new(uuid::Uuid::new_v4().simple().to_string());
        let (toast_actor, toast_resource_client) =
            ResourceActor::<Toast>::new(config.channel_buffer, next_toast_id);
        let toasts = ToastClient::new(toast_resource_client, config.default_toast_duration);
        let toast_handle = tokio::spawn(toast_actor.run());

        let session = Session::new();
        let navigator = Navigator::default();
        let notifier: Arc<dyn Notifier> = Arc::new(toasts.clone());
        let cart = CartController::new(
            api.clone(),
            session.clone(),
            Arc::clone(&notifier),
            navigator.clone(),
        );
        let likes = LikeController::new(api.clone(), session.clone(), notifier);

        Self {
            toasts,
            api,
            session,
            navigator,
            cart,
            likes,
            handles: vec![toast_handle],
        }
    }

    /// Records the identity and greets the user.
    pub async fn sign_in(&self, identity: Identity) {
        let greeting = format!("Welcome back, {}!", identity.name);
        self.session.sign_in(identity);
        self.toasts.success("Login Successful", Some(&greeting)).await;
    }

    /// Forgets the user and everything cached on their behalf, then sends
    /// them to the login screen.
    pub async fn logout(&self) {
        self.session.sign_out();
        self.cart.reset();
        self.likes.reset();
        self.toasts
            .info("Logged Out", Some("You have been successfully logged out."))
            .await;
        self.navigator.push(Route::Login);
    }

    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        if let Err(e) = self.toasts.shutdown().await {
            warn!(error = %e, "Toast actor already stopped");
        }
        if let Err(e) = self.api.shutdown().await {
            warn!(error = %e, "Backend actor already stopped");
        }

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
