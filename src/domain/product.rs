use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Whether the signed-in user likes a product, plus its total like count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LikeState {
    pub is_liked: bool,
    pub like_count: u64,
}

impl LikeState {
    pub fn new(is_liked: bool, like_count: u64) -> Self {
        Self { is_liked, like_count }
    }

    /// The state after one toggle: the flag flips and the count follows it.
    pub fn toggled(&self) -> Self {
        if self.is_liked {
            Self::new(false, self.like_count.saturating_sub(1))
        } else {
            Self::new(true, self.like_count + 1)
        }
    }
}

/// A confirmed like change, broadcast once the backend acknowledged it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeChange {
    pub product_id: String,
    pub state: LikeState,
}

/// Product detail from `GET /api/products?id=..`. Only the fields the client
/// reasons about are typed; everything else is kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    pub product_id: String,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default)]
    pub like_count: u64,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl ProductDetail {
    pub fn like_state(&self) -> LikeState {
        LikeState::new(self.is_liked, self.like_count)
    }
}

/// Acknowledgement for a like toggle.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LikeAck {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_toggle_moves_count_with_flag() {
        let state = LikeState::new(false, 10);
        assert_eq!(state.toggled(), LikeState::new(true, 11));
        assert_eq!(state.toggled().toggled(), state);
    }

    #[test]
    fn test_unlike_never_underflows() {
        assert_eq!(LikeState::new(true, 0).toggled(), LikeState::new(false, 0));
    }

    #[test]
    fn test_product_detail_keeps_unknown_fields() {
        let detail: ProductDetail = serde_json::from_value(json!({
            "productId": "p7",
            "productName": "Canvas Tote",
            "isLiked": true,
            "likeCount": 42,
            "imageUrls": ["a.jpg", "b.jpg"],
            "price": 499.0
        }))
        .unwrap();

        assert_eq!(detail.like_state(), LikeState::new(true, 42));
        assert_eq!(detail.extra["price"], json!(499.0));
        assert!(detail.extra.contains_key("imageUrls"));
    }
}
