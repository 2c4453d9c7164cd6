//! Client core for the storefront: toast notifications and optimistic cart
//! and like mutations against the storefront REST API.

pub mod actor_framework;
pub mod actors;
pub mod app_system;
pub mod clients;
pub mod controllers;
pub mod domain;
pub mod error;
pub mod messages;
pub mod session;
pub mod toast_actor;

#[cfg(test)]
mod mock_framework;
