pub mod cart;
pub mod identity;
pub mod product;
pub mod toast;

pub use cart::*;
pub use identity::*;
pub use product::*;
pub use toast::*;
