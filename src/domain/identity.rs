use serde::{Deserialize, Serialize};
use std::fmt;

/// Bearer token issued by the backend at login.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Spans record arguments with Debug; never print the secret.
impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// The signed-in user as seen by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: String,
    pub token: AuthToken,
    pub name: String,
    pub email: String,
}

impl Identity {
    pub fn new(
        user_id: impl Into<String>,
        token: AuthToken,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            token,
            name: name.into(),
            email: email.into(),
        }
    }

    /// Both the user id and the token are needed for any mutating call.
    pub fn is_complete(&self) -> bool {
        !self.user_id.is_empty() && !self.token.is_empty()
    }
}
