use thiserror::Error;

/// Failures talking to the storefront backend.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// The backend answered with a non-success status.
    #[error("{message} (status {status})")]
    Status { status: u16, message: String },
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Invalid response body: {0}")]
    Decode(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl ApiError {
    /// The message worth showing to a shopper.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { message, .. } => message.clone(),
            ApiError::Transport(_) | ApiError::ActorCommunicationError(_) => {
                "Network error occurred. Please check your connection.".to_string()
            }
            ApiError::Decode(_) => "Unexpected response from the server.".to_string(),
        }
    }
}

/// Outcome taxonomy for every optimistic mutation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MutationError {
    #[error("User not authenticated")]
    Unauthenticated,
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Remote failure: {0}")]
    RemoteFailure(String),
}

impl MutationError {
    /// The message worth showing to a shopper.
    pub fn user_message(&self) -> String {
        match self {
            MutationError::Unauthenticated => "Please log in to continue.".to_string(),
            MutationError::Validation(message) | MutationError::RemoteFailure(message) => message.clone(),
        }
    }
}

impl From<ApiError> for MutationError {
    fn from(error: ApiError) -> Self {
        MutationError::RemoteFailure(error.user_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_reaches_the_shopper() {
        let error = ApiError::Status { status: 409, message: "Out of stock".into() };
        assert_eq!(
            MutationError::from(error),
            MutationError::RemoteFailure("Out of stock".into())
        );
    }

    #[test]
    fn test_transport_failure_is_generic() {
        let error = ApiError::Transport("connection refused".into());
        assert!(matches!(
            MutationError::from(error),
            MutationError::RemoteFailure(message) if message.contains("Network error")
        ));
    }
}
