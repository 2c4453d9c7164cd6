use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::clients::Notifier;
use crate::domain::{NewToast, Toast, ToastId};
use crate::toast_actor::ToastError;

/// Client for the toast actor: the visible, ordered sequence of toasts.
#[derive(Clone)]
pub struct ToastClient {
    inner: ResourceClient<Toast>,
    default_duration: Duration,
}

impl ToastClient {
    pub fn new(inner: ResourceClient<Toast>, default_duration: Duration) -> Self {
        Self { inner, default_duration }
    }

    /// Appends a toast to the visible sequence and returns its id. A toast with
    /// a non-zero duration removes itself once that much time has passed.
    #[instrument(skip(self, toast), fields(kind = %toast.kind, title = %toast.title))]
    pub async fn add_toast(&self, mut toast: NewToast) -> Result<ToastId, ToastError> {
        debug!("Sending request");
        if toast.duration.is_none() {
            toast.duration = Some(self.default_duration);
        }
        let id = self.inner.create(toast).await?;
        debug!(toast_id = %id, "Toast added");
        Ok(id)
    }

    /// Removes a toast. Returns false when it was already gone.
    #[instrument(skip(self, id), fields(toast_id = %id))]
    pub async fn remove_toast(&self, id: &ToastId) -> Result<bool, ToastError> {
        debug!("Sending request");
        Ok(self.inner.delete(id.clone()).await?.is_some())
    }

    /// Dismisses the toast and runs its action. The action runs at most once:
    /// if the toast already expired or was dismissed, nothing happens.
    #[instrument(skip(self, id), fields(toast_id = %id))]
    pub async fn invoke_action(&self, id: &ToastId) -> Result<bool, ToastError> {
        debug!("Sending request");
        let Some(toast) = self.inner.delete(id.clone()).await? else {
            debug!("Toast already gone");
            return Ok(false);
        };
        match toast.action {
            Some(action) => {
                info!(label = %action.label, "Running toast action");
                action.invoke();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    #[instrument(skip(self))]
    pub async fn clear_all(&self) -> Result<usize, ToastError> {
        debug!("Sending request");
        Ok(self.inner.clear().await?)
    }

    /// Snapshot of the visible toasts, oldest first.
    pub async fn toasts(&self) -> Result<Vec<Toast>, ToastError> {
        Ok(self.inner.list().await?)
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Toast>> {
        self.inner.subscribe()
    }

    pub async fn shutdown(&self) -> Result<(), ToastError> {
        Ok(self.inner.shutdown().await?)
    }
}

#[async_trait]
impl Notifier for ToastClient {
    async fn notify(&self, toast: NewToast) {
        if let Err(e) = self.add_toast(toast).await {
            warn!(error = %e, "Failed to show toast");
        }
    }
}
