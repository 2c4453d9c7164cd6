use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::domain::{AuthToken, CartAck, CartSnapshot, LikeAck, ProductDetail};
use crate::error::ApiError;
use crate::messages::ApiRequest;

/// Handle to the storefront backend actor.
#[derive(Clone)]
pub struct ApiClient {
    sender: mpsc::Sender<ApiRequest>,
}

impl ApiClient {
    pub fn new(sender: mpsc::Sender<ApiRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), ApiError> {
        debug!("Sending shutdown");
        self.sender
            .send(ApiRequest::Shutdown)
            .await
            .map_err(|_| ApiError::ActorCommunicationError("Actor closed".to_string()))
    }
}

client_method!(ApiClient => fn add_or_update_cart_item(user_id: String, product_id: String, quantity: u32) -> CartAck as ApiRequest::AddOrUpdateCartItem, Error = ApiError);
client_method!(ApiClient => fn remove_cart_item(user_id: String, product_id: String) -> () as ApiRequest::RemoveCartItem, Error = ApiError);
client_method!(ApiClient => fn fetch_cart(user_id: String) -> CartSnapshot as ApiRequest::FetchCart, Error = ApiError);
client_method!(ApiClient => fn toggle_like(product_id: String, token: AuthToken) -> LikeAck as ApiRequest::ToggleLike, Error = ApiError);
client_method!(ApiClient => fn fetch_liked_products(token: AuthToken) -> Vec<ProductDetail> as ApiRequest::FetchLikedProducts, Error = ApiError);
client_method!(ApiClient => fn fetch_product(product_id: String, token: Option<AuthToken>) -> ProductDetail as ApiRequest::FetchProduct, Error = ApiError);
