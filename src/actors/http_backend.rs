use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn, Instrument};

use super::wire::{
    CartActionBody, CartDeleteBody, ErrorBody, LikeBody, CART_PATH, LIKED_PRODUCTS_PATH, LIKE_PATH,
    PRODUCT_PATH, USER_ACTIONS_PATH,
};
use crate::app_system::Config;
use crate::clients::ApiClient;
use crate::domain::{AuthToken, CartAck, CartSnapshot, LikeAck, ProductDetail};
use crate::error::ApiError;
use crate::messages::ApiRequest;

// =============================================================================
// HTTP BACKEND SERVICE
// =============================================================================

/// Owns the HTTP client and answers `ApiRequest`s against the storefront REST API.
///
/// Each request runs on its own task and owns its `respond_to`, so a slow call
/// never holds up the others. No ordering is implied between independent requests.
pub struct HttpBackend {
    receiver: mpsc::Receiver<ApiRequest>,
    endpoint: Endpoint,
}

impl HttpBackend {
    pub fn new(buffer_size: usize, config: &Config) -> Result<(Self, ApiClient), ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            endpoint: Endpoint {
                http,
                base_url: Arc::from(config.api_base_url.trim_end_matches('/')),
            },
        };
        Ok((service, ApiClient::new(sender)))
    }

    #[instrument(name = "http_backend", skip(self), fields(base_url = %self.endpoint.base_url))]
    pub async fn run(mut self) {
        info!("HttpBackend starting");
        while let Some(msg) = self.receiver.recv().await {
            let endpoint = self.endpoint.clone();
            match msg {
                ApiRequest::AddOrUpdateCartItem { user_id, product_id, quantity, respond_to } => {
                    tokio::spawn(
                        async move {
                            let result = endpoint.add_or_update_cart_item(user_id, product_id, quantity).await;
                            let _ = respond_to.send(result);
                        }
                        .in_current_span(),
                    );
                }
                ApiRequest::RemoveCartItem { user_id, product_id, respond_to } => {
                    tokio::spawn(
                        async move {
                            let _ = respond_to.send(endpoint.remove_cart_item(user_id, product_id).await);
                        }
                        .in_current_span(),
                    );
                }
                ApiRequest::FetchCart { user_id, respond_to } => {
                    tokio::spawn(
                        async move {
                            let _ = respond_to.send(endpoint.fetch_cart(user_id).await);
                        }
                        .in_current_span(),
                    );
                }
                ApiRequest::ToggleLike { product_id, token, respond_to } => {
                    tokio::spawn(
                        async move {
                            let _ = respond_to.send(endpoint.toggle_like(product_id, token).await);
                        }
                        .in_current_span(),
                    );
                }
                ApiRequest::FetchProduct { product_id, token, respond_to } => {
                    tokio::spawn(
                        async move {
                            let _ = respond_to.send(endpoint.fetch_product(product_id, token).await);
                        }
                        .in_current_span(),
                    );
                }
                ApiRequest::FetchLikedProducts { token, respond_to } => {
                    tokio::spawn(
                        async move {
                            let _ = respond_to.send(endpoint.fetch_liked_products(token).await);
                        }
                        .in_current_span(),
                    );
                }
                ApiRequest::Shutdown => {
                    info!("HttpBackend shutting down");
                    break;
                }
            }
        }
        info!("HttpBackend stopped");
    }
}

#[derive(Clone)]
struct Endpoint {
    http: reqwest::Client,
    base_url: Arc<str>,
}

impl Endpoint {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    #[instrument(skip(self))]
    async fn add_or_update_cart_item(
        &self,
        user_id: String,
        product_id: String,
        quantity: u32,
    ) -> Result<CartAck, ApiError> {
        debug!("Processing add_or_update_cart_item request");
        let body = CartActionBody::new(user_id, product_id, quantity);
        let response = self
            .http
            .post(self.url(USER_ACTIONS_PATH))
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        let ack = decode_or_default(ensure_success(response, "Failed to add to cart").await?).await?;
        info!("Cart item stored");
        Ok(ack)
    }

    #[instrument(skip(self))]
    async fn remove_cart_item(&self, user_id: String, product_id: String) -> Result<(), ApiError> {
        debug!("Processing remove_cart_item request");
        let body = CartDeleteBody::new(user_id, product_id);
        let response = self
            .http
            .delete(self.url(USER_ACTIONS_PATH))
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        ensure_success(response, "Failed to delete from cart").await?;
        info!("Cart item removed");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn fetch_cart(&self, user_id: String) -> Result<CartSnapshot, ApiError> {
        debug!("Processing fetch_cart request");
        let response = self
            .http
            .get(self.url(CART_PATH))
            .query(&[("userId", user_id.as_str())])
            .send()
            .await
            .map_err(transport)?;
        let cart: CartSnapshot = decode(ensure_success(response, "Failed to fetch cart").await?).await?;
        info!(total_items = cart.total_items, "Cart fetched");
        Ok(cart)
    }

    #[instrument(skip(self))]
    async fn toggle_like(&self, product_id: String, token: AuthToken) -> Result<LikeAck, ApiError> {
        debug!("Processing toggle_like request");
        let response = self
            .http
            .post(self.url(LIKE_PATH))
            .bearer_auth(token.as_str())
            .json(&LikeBody { product_id })
            .send()
            .await
            .map_err(transport)?;
        let ack = decode_or_default(ensure_success(response, "Failed to toggle like").await?).await?;
        info!("Like toggled");
        Ok(ack)
    }

    #[instrument(skip(self))]
    async fn fetch_product(
        &self,
        product_id: String,
        token: Option<AuthToken>,
    ) -> Result<ProductDetail, ApiError> {
        debug!("Processing fetch_product request");
        let mut request = self
            .http
            .get(self.url(PRODUCT_PATH))
            .query(&[("id", product_id.as_str())]);
        if let Some(token) = &token {
            request = request.bearer_auth(token.as_str());
        }
        let response = request.send().await.map_err(transport)?;
        decode(ensure_success(response, "Failed to fetch product").await?).await
    }

    #[instrument(skip(self))]
    async fn fetch_liked_products(&self, token: AuthToken) -> Result<Vec<ProductDetail>, ApiError> {
        debug!("Processing fetch_liked_products request");
        let response = self
            .http
            .get(self.url(LIKED_PRODUCTS_PATH))
            .bearer_auth(token.as_str())
            .send()
            .await
            .map_err(transport)?;
        let products: Vec<ProductDetail> =
            decode(ensure_success(response, "Failed to fetch liked products").await?).await?;
        info!(count = products.len(), "Liked products fetched");
        Ok(products)
    }
}

fn transport(error: reqwest::Error) -> ApiError {
    ApiError::Transport(error.to_string())
}

/// Passes successful responses through; otherwise surfaces the backend's
/// `message` or, failing that, `fallback`.
async fn ensure_success(response: reqwest::Response, fallback: &str) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| fallback.to_string());
    warn!(status = status.as_u16(), message = %message, "Backend rejected request");
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

/// Acks may arrive with an empty body.
async fn decode_or_default<T: DeserializeOwned + Default>(response: reqwest::Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await.map_err(transport)?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::{IntoResponse, Response};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::Mutex;

    async fn start(app: Router) -> ApiClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let config = Config {
            api_base_url: format!("http://{addr}"),
            ..Config::default()
        };
        let (backend, client) = HttpBackend::new(8, &config).unwrap();
        tokio::spawn(backend.run());
        client
    }

    fn cart_json() -> Value {
        json!({
            "totalItems": 1,
            "items": [{
                "productId": "p1",
                "productName": "Linen Shirt",
                "price": 1200.0,
                "quantity": 1
            }],
            "totalOriginalPrice": 1200.0,
            "totalDiscount": 0.0,
            "subtotal": 1200.0,
            "shippingCharge": 50.0,
            "finalTotal": 1250.0,
            "message": "ok"
        })
    }

    async fn cart(Query(params): Query<HashMap<String, String>>) -> Response {
        match params.get("userId").map(String::as_str) {
            Some("u1") => Json(cart_json()).into_response(),
            _ => (StatusCode::NOT_FOUND, Json(json!({"message": "Cart not found"}))).into_response(),
        }
    }

    async fn like(headers: HeaderMap, Json(body): Json<Value>) -> Response {
        let authorized = headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            == Some("Bearer good-token");
        if !authorized {
            return (StatusCode::UNAUTHORIZED, Json(json!({"message": "Invalid token"}))).into_response();
        }
        Json(json!({"message": format!("toggled {}", body["productId"].as_str().unwrap_or(""))})).into_response()
    }

    async fn remove() -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    #[tokio::test]
    async fn test_add_sends_cart_action_body() {
        let seen: Arc<Mutex<Vec<Value>>> = Arc::default();
        let recorded = seen.clone();
        let app = Router::new().route(
            USER_ACTIONS_PATH,
            post(move |Json(body): Json<Value>| {
                let recorded = recorded.clone();
                async move {
                    recorded.lock().unwrap().push(body.clone());
                    Json(json!({
                        "userId": body["userId"],
                        "actionType": "CART",
                        "productId": body["productId"],
                        "quantity": body["quantity"],
                        "createdAt": "2024-05-01T10:00:00Z"
                    }))
                }
            }),
        );
        let client = start(app).await;

        let ack = client
            .add_or_update_cart_item("u1".into(), "p1".into(), 2)
            .await
            .unwrap();
        assert_eq!(ack.product_id, "p1");
        assert_eq!(ack.quantity, "2");

        let bodies = seen.lock().unwrap().clone();
        assert_eq!(
            bodies,
            vec![json!({"userId": "u1", "actionType": "CART", "productId": "p1", "quantity": "2"})]
        );
    }

    #[tokio::test]
    async fn test_fetch_cart_by_user() {
        let client = start(Router::new().route(CART_PATH, get(cart))).await;

        let snapshot = client.fetch_cart("u1".into()).await.unwrap();
        assert_eq!(snapshot.total_items, 1);
        assert_eq!(snapshot.final_total, 1250.0);

        let missing = client.fetch_cart("nobody".into()).await;
        assert_eq!(
            missing,
            Err(ApiError::Status { status: 404, message: "Cart not found".into() })
        );
    }

    #[tokio::test]
    async fn test_toggle_like_uses_bearer_token() {
        let client = start(Router::new().route(LIKE_PATH, post(like))).await;

        let ack = client
            .toggle_like("p9".into(), AuthToken::new("good-token"))
            .await
            .unwrap();
        assert_eq!(ack.message, "toggled p9");

        let rejected = client.toggle_like("p9".into(), AuthToken::new("stale")).await;
        assert_eq!(
            rejected,
            Err(ApiError::Status { status: 401, message: "Invalid token".into() })
        );
    }

    async fn liked(headers: HeaderMap) -> Response {
        if headers.get("authorization").and_then(|value| value.to_str().ok()) != Some("Bearer good-token") {
            return StatusCode::UNAUTHORIZED.into_response();
        }
        Json(json!([
            {"productId": "p1", "productName": "Linen Shirt", "likeCount": 4, "brand": "Acme"},
            {"productId": "p2", "productName": "Canvas Tote", "likeCount": 1}
        ]))
        .into_response()
    }

    #[tokio::test]
    async fn test_fetch_liked_products_with_token() {
        let client = start(Router::new().route(LIKED_PRODUCTS_PATH, get(liked))).await;

        let products = client
            .fetch_liked_products(AuthToken::new("good-token"))
            .await
            .unwrap();
        let ids: Vec<_> = products.iter().map(|p| p.product_id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
        assert_eq!(products[0].like_count, 4);
        assert_eq!(products[0].extra.get("brand"), Some(&json!("Acme")));

        let rejected = client.fetch_liked_products(AuthToken::new("stale")).await;
        assert_eq!(
            rejected,
            Err(ApiError::Status { status: 401, message: "Failed to fetch liked products".into() })
        );
    }

    #[tokio::test]
    async fn test_failure_without_body_uses_fallback_message() {
        let client = start(Router::new().route(USER_ACTIONS_PATH, axum::routing::delete(remove))).await;

        let result = client.remove_cart_item("u1".into(), "p1".into()).await;
        assert_eq!(
            result,
            Err(ApiError::Status { status: 500, message: "Failed to delete from cart".into() })
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = Config {
            api_base_url: format!("http://{addr}"),
            ..Config::default()
        };
        let (backend, client) = HttpBackend::new(8, &config).unwrap();
        tokio::spawn(backend.run());

        let result = client.fetch_cart("u1".into()).await;
        assert!(matches!(result, Err(ApiError::Transport(_))));
    }

    #[tokio::test]
    async fn test_shutdown_stops_backend() {
        let (backend, client) = HttpBackend::new(8, &Config::default()).unwrap();
        let handle = tokio::spawn(backend.run());

        client.shutdown().await.unwrap();
        handle.await.unwrap();

        let result = client.fetch_cart("u1".into()).await;
        assert!(matches!(result, Err(ApiError::ActorCommunicationError(_))));
    }
}
