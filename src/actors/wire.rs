//! Request bodies and paths the storefront backend expects.

use serde::{Deserialize, Serialize};

pub const USER_ACTIONS_PATH: &str = "/api/user-actions";
pub const CART_PATH: &str = "/api/user-actions/cart";
pub const LIKED_PRODUCTS_PATH: &str = "/api/user-actions/liked-products";
pub const LIKE_PATH: &str = "/api/products/like";
pub const PRODUCT_PATH: &str = "/api/products";

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    Cart,
}

/// Body of `POST /api/user-actions`. The backend wants the quantity as a string.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartActionBody {
    pub user_id: String,
    pub action_type: ActionType,
    pub product_id: String,
    pub quantity: String,
}

impl CartActionBody {
    pub fn new(user_id: String, product_id: String, quantity: u32) -> Self {
        Self {
            user_id,
            action_type: ActionType::Cart,
            product_id,
            quantity: quantity.to_string(),
        }
    }
}

/// Body of `DELETE /api/user-actions`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartDeleteBody {
    pub user_id: String,
    pub action_type: ActionType,
    pub product_id: String,
}

impl CartDeleteBody {
    pub fn new(user_id: String, product_id: String) -> Self {
        Self {
            user_id,
            action_type: ActionType::Cart,
            product_id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeBody {
    pub product_id: String,
}

/// Error payload the backend sends with non-success statuses.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
