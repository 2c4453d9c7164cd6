use async_trait::async_trait;
use std::time::Duration;

use crate::domain::{NewToast, ToastAction, ToastKind};

/// Write-only notification sink. Everything that wants to surface a message to
/// the shopper goes through here; delivery never fails from the caller's view.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, toast: NewToast);

    async fn success(&self, title: &str, message: Option<&str>) {
        self.notify(with_message(NewToast::success(title), message)).await
    }

    async fn error(&self, title: &str, message: Option<&str>) {
        self.notify(with_message(NewToast::error(title), message)).await
    }

    async fn warning(&self, title: &str, message: Option<&str>) {
        self.notify(with_message(NewToast::warning(title), message)).await
    }

    async fn info(&self, title: &str, message: Option<&str>) {
        self.notify(with_message(NewToast::info(title), message)).await
    }

    async fn with_action(
        &self,
        kind: ToastKind,
        title: &str,
        message: Option<&str>,
        action: ToastAction,
        duration: Option<Duration>,
    ) {
        let mut toast = with_message(NewToast::new(kind, title), message).with_action(action);
        toast.duration = duration;
        self.notify(toast).await
    }
}

fn with_message(toast: NewToast, message: Option<&str>) -> NewToast {
    match message {
        Some(message) => toast.with_message(message),
        None => toast,
    }
}
