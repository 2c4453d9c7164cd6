use tokio::sync::oneshot;

use crate::domain::{AuthToken, CartAck, CartSnapshot, LikeAck, ProductDetail};
use crate::error::ApiError;

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Requests handled by the storefront backend actor. Each variant carries its
/// parameters and a oneshot channel for the response.
#[derive(Debug)]
pub enum ApiRequest {
    AddOrUpdateCartItem {
        user_id: String,
        product_id: String,
        quantity: u32,
        respond_to: ServiceResponse<CartAck, ApiError>,
    },
    RemoveCartItem {
        user_id: String,
        product_id: String,
        respond_to: ServiceResponse<(), ApiError>,
    },
    FetchCart {
        user_id: String,
        respond_to: ServiceResponse<CartSnapshot, ApiError>,
    },
    ToggleLike {
        product_id: String,
        token: AuthToken,
        respond_to: ServiceResponse<LikeAck, ApiError>,
    },
    FetchProduct {
        product_id: String,
        token: Option<AuthToken>,
        respond_to: ServiceResponse<ProductDetail, ApiError>,
    },
    FetchLikedProducts {
        token: AuthToken,
        respond_to: ServiceResponse<Vec<ProductDetail>, ApiError>,
    },
    Shutdown,
}
