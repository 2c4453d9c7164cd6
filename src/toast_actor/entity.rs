use std::time::Duration;

use crate::actor_framework::{Entity, FrameworkError};
use crate::domain::{NewToast, Toast, ToastId, DEFAULT_TOAST_DURATION};

impl Entity for Toast {
    type Id = ToastId;
    type CreatePayload = NewToast;

    fn id(&self) -> &ToastId {
        &self.id
    }

    /// Builds the toast, applying the default duration when none was given.
    fn from_create(id: ToastId, payload: NewToast) -> Result<Self, FrameworkError> {
        if payload.title.trim().is_empty() {
            return Err(FrameworkError::Rejected("toast title is required".to_string()));
        }
        Ok(Self {
            id,
            kind: payload.kind,
            title: payload.title,
            message: payload.message,
            duration: payload.duration.unwrap_or(DEFAULT_TOAST_DURATION),
            action: payload.action,
        })
    }

    fn expires_after(&self) -> Option<Duration> {
        (!self.duration.is_zero()).then_some(self.duration)
    }
}
