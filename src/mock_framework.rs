//! # Mock Framework
//!
//! Utilities for testing clients and controllers in isolation.
//!
//! Use [`create_mock_api`] to get an [`ApiClient`] and the receiver its
//! requests land on, then answer them with the `expect_*` helpers. Nothing
//! reaches the network, so tests decide exactly what the backend says and when.

use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};
use tokio::sync::{mpsc, oneshot, watch};

use crate::actor_framework::{Entity, FrameworkError, ResourceClient, ResourceRequest};
use crate::clients::{ApiClient, Notifier};
use crate::domain::{AuthToken, CartAck, CartSnapshot, LikeAck, NewToast, ProductDetail};
use crate::error::ApiError;
use crate::messages::ApiRequest;

type Reply<T> = oneshot::Sender<Result<T, ApiError>>;

/// Creates a mock resource client and a receiver for asserting requests.
pub fn create_mock_client<T: Entity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    let (_, snapshots) = watch::channel(Vec::new());
    (ResourceClient::new(sender, snapshots), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::CreatePayload, oneshot::Sender<Result<T::Id, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { payload, respond_to }) => Some((payload, respond_to)),
        _ => None,
    }
}

/// Creates a backend client whose requests are delivered to the returned receiver.
pub fn create_mock_api(buffer_size: usize) -> (ApiClient, mpsc::Receiver<ApiRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ApiClient::new(sender), receiver)
}

pub async fn expect_add_or_update(
    receiver: &mut mpsc::Receiver<ApiRequest>,
) -> Option<(String, String, u32, Reply<CartAck>)> {
    match receiver.recv().await {
        Some(ApiRequest::AddOrUpdateCartItem { user_id, product_id, quantity, respond_to }) => {
            Some((user_id, product_id, quantity, respond_to))
        }
        _ => None,
    }
}

pub async fn expect_remove_cart_item(
    receiver: &mut mpsc::Receiver<ApiRequest>,
) -> Option<(String, String, Reply<()>)> {
    match receiver.recv().await {
        Some(ApiRequest::RemoveCartItem { user_id, product_id, respond_to }) => {
            Some((user_id, product_id, respond_to))
        }
        _ => None,
    }
}

pub async fn expect_fetch_cart(
    receiver: &mut mpsc::Receiver<ApiRequest>,
) -> Option<(String, Reply<CartSnapshot>)> {
    match receiver.recv().await {
        Some(ApiRequest::FetchCart { user_id, respond_to }) => Some((user_id, respond_to)),
        _ => None,
    }
}

pub async fn expect_toggle_like(
    receiver: &mut mpsc::Receiver<ApiRequest>,
) -> Option<(String, AuthToken, Reply<LikeAck>)> {
    match receiver.recv().await {
        Some(ApiRequest::ToggleLike { product_id, token, respond_to }) => {
            Some((product_id, token, respond_to))
        }
        _ => None,
    }
}

pub async fn expect_fetch_product(
    receiver: &mut mpsc::Receiver<ApiRequest>,
) -> Option<(String, Option<AuthToken>, Reply<ProductDetail>)> {
    match receiver.recv().await {
        Some(ApiRequest::FetchProduct { product_id, token, respond_to }) => {
            Some((product_id, token, respond_to))
        }
        _ => None,
    }
}

pub async fn expect_fetch_liked_products(
    receiver: &mut mpsc::Receiver<ApiRequest>,
) -> Option<(AuthToken, Reply<Vec<ProductDetail>>)> {
    match receiver.recv().await {
        Some(ApiRequest::FetchLikedProducts { token, respond_to }) => Some((token, respond_to)),
        _ => None,
    }
}

/// Fails the test if any request is waiting on the receiver.
pub fn assert_no_requests(receiver: &mut mpsc::Receiver<ApiRequest>) {
    if let Ok(request) = receiver.try_recv() {
        panic!("Unexpected backend request: {:?}", request);
    }
}

/// Notifier that keeps every toast it is asked to show.
#[derive(Default)]
pub struct RecordingNotifier {
    toasts: Mutex<Vec<NewToast>>,
}

impl RecordingNotifier {
    pub fn recorded(&self) -> Vec<NewToast> {
        self.toasts.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, toast: NewToast) {
        self.toasts.lock().unwrap_or_else(PoisonError::into_inner).push(toast);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Toast, ToastId};

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<Toast>(10);

        let create_task = tokio::spawn(async move { client.create(NewToast::info("Test")).await });

        let (payload, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(payload.title, "Test");
        responder.send(Ok(ToastId::new("toast_1"))).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result, Ok(ToastId::new("toast_1")));
    }

    #[tokio::test]
    async fn test_mock_api_answers_requests() {
        let (api, mut receiver) = create_mock_api(10);

        let fetch = tokio::spawn(async move { api.fetch_cart("u1".to_string()).await });

        let (user_id, responder) = expect_fetch_cart(&mut receiver).await.expect("Expected FetchCart");
        assert_eq!(user_id, "u1");
        responder
            .send(Err(ApiError::Status { status: 404, message: "Cart not found".into() }))
            .unwrap();

        assert!(matches!(fetch.await.unwrap(), Err(ApiError::Status { status: 404, .. })));
        assert_no_requests(&mut receiver);
    }
}
