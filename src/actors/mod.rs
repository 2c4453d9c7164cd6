//! Services that talk to the outside world.

pub mod http_backend;
pub mod wire;

pub use http_backend::HttpBackend;
