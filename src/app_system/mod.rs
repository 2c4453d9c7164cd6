//! System orchestration, configuration, startup, and shutdown logic.

pub mod config;
pub mod navigation;
pub mod storefront_system;
pub mod telemetry;

pub use config::*;
pub use navigation::*;
pub use storefront_system::*;
pub use telemetry::*;
