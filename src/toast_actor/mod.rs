//! Toast-specific actor logic: how a toast is built from its payload and when it expires.

pub mod entity;
pub mod error;

pub use error::*;
