use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

use crate::domain::{AuthToken, Identity};

/// Process-wide identity state. Cheap to clone; every clone sees the same user.
///
/// The epoch moves on every sign-in and sign-out. Work started under one
/// epoch must not write user state once the epoch has moved.
#[derive(Clone, Default)]
pub struct Session {
    current: Arc<RwLock<Option<Identity>>>,
    epoch: Arc<AtomicU64>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sign_in(&self, identity: Identity) {
        info!(user_id = %identity.user_id, "Signed in");
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = Some(identity);
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }

    pub fn sign_out(&self) -> Option<Identity> {
        let previous = {
            let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
            self.epoch.fetch_add(1, Ordering::SeqCst);
            current.take()
        };
        if let Some(identity) = &previous {
            info!(user_id = %identity.user_id, "Signed out");
        }
        previous
    }

    /// The signed-in identity, if it carries both a user id and a token.
    pub fn current(&self) -> Option<Identity> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .filter(|identity| identity.is_complete())
            .cloned()
    }

    pub fn user_id(&self) -> Option<String> {
        self.current().map(|identity| identity.user_id)
    }

    pub fn token(&self) -> Option<AuthToken> {
        self.current().map(|identity| identity.token)
    }

    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// True while nobody has signed in or out since `epoch` was read.
    pub fn is_current(&self, epoch: u64) -> bool {
        self.epoch() == epoch
    }
}
