#[macro_use]
mod macros;

pub mod api_client;
pub mod notifier;
pub mod toast_client;

pub use api_client::ApiClient;
pub use notifier::Notifier;
pub use toast_client::ToastClient;
