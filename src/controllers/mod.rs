//! Optimistic mutation controllers for the cart and product likes.

pub mod busy;
pub mod cart_controller;
pub mod like_controller;
pub mod optimistic;

pub use busy::BusyFlag;
pub use cart_controller::CartController;
pub use like_controller::LikeController;
pub use optimistic::Optimistic;

use std::sync::{Mutex, PoisonError};

use crate::error::MutationError;

/// The most recent failure of a controller, kept for the caller to inspect.
#[derive(Debug, Default)]
pub struct LastError(Mutex<Option<MutationError>>);

impl LastError {
    pub fn get(&self) -> Option<MutationError> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn set(&self, error: Option<MutationError>) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = error;
    }
}
