use tracing::{error, info, warn, Instrument};

use storefront_core::app_system::{setup_tracing, Config, StorefrontSystem};
use storefront_core::domain::{AuthToken, Identity};

const USER_ID_VAR: &str = "STOREFRONT_USER_ID";
const TOKEN_VAR: &str = "STOREFRONT_TOKEN";
const DEMO_PRODUCT_VAR: &str = "STOREFRONT_DEMO_PRODUCT";

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = Config::from_env().map_err(|e| e.to_string())?;
    info!(api_base_url = %config.api_base_url, "Starting storefront client");

    let system = StorefrontSystem::new(&config).map_err(|e| e.to_string())?;

    let (Ok(user_id), Ok(token)) = (std::env::var(USER_ID_VAR), std::env::var(TOKEN_VAR)) else {
        warn!("{USER_ID_VAR} and {TOKEN_VAR} not set, nothing to do");
        return system.shutdown().await;
    };
    system
        .sign_in(Identity::new(user_id, AuthToken::new(token), "Demo Shopper", ""))
        .await;

    if let Err(e) = system.likes.load_liked().await {
        warn!(error = %e, "Liked products unavailable");
    }

    let span = tracing::info_span!("cart_sync");
    async {
        match system.cart.fetch_cart().await {
            Ok(Some(cart)) => info!(total_items = cart.total_items, final_total = cart.final_total, "Cart loaded"),
            Ok(None) => warn!("Session changed while the cart was loading"),
            Err(e) => warn!(error = %e, "Cart unavailable"),
        }
    }
    .instrument(span)
    .await;

    if let Ok(product_id) = std::env::var(DEMO_PRODUCT_VAR) {
        let span = tracing::info_span!("product_demo", product_id = %product_id);
        async {
            if let Err(e) = system.likes.load(&product_id).await {
                error!(error = %e, "Could not load product");
                return;
            }
            match system.likes.toggle_like(&product_id).await {
                Ok(state) => info!(is_liked = state.is_liked, like_count = state.like_count, "Like toggled"),
                Err(e) => error!(error = %e, "Like toggle failed"),
            }
            match system.cart.add_to_cart(&product_id).await {
                Ok(Some(cart)) => info!(total_items = cart.total_items, "Product added to cart"),
                Ok(None) => warn!("Product added, cart not refreshed"),
                Err(e) => error!(error = %e, "Add to cart failed"),
            }
        }
        .instrument(span)
        .await;
    }

    match system.toasts.toasts().await {
        Ok(toasts) => {
            for toast in toasts {
                info!(kind = %toast.kind, title = %toast.title, message = ?toast.message, "Toast");
            }
        }
        Err(e) => error!(error = %e, "Could not read toasts"),
    }

    system.logout().await;
    info!(route = %system.navigator.current().path(), "Session ended");

    // Shutdown system gracefully
    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
