use thiserror::Error;

use crate::actor_framework::FrameworkError;

/// Errors that can occur while talking to the toast actor.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ToastError {
    #[error("Toast rejected: {0}")]
    Rejected(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for ToastError {
    fn from(error: FrameworkError) -> Self {
        match error {
            FrameworkError::Rejected(reason) => ToastError::Rejected(reason),
            other => ToastError::ActorCommunicationError(other.to_string()),
        }
    }
}
