//! Cart models as the backend serves them.
//!
//! Totals are computed by the server. The client never recomputes them; it
//! refetches the whole cart after every successful mutation.

use serde::{Deserialize, Serialize};

/// One line of the cart. `product_id` is unique within a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: String,
    pub product_name: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub material: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub seller_id: String,
    pub price: f64,
    #[serde(default)]
    pub discount_on_product: f64,
    #[serde(default)]
    pub discount_amount: f64,
    pub quantity: u32,
    #[serde(default)]
    pub total_discounted_price: f64,
}

/// Authoritative cart returned by `GET /api/user-actions/cart`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub total_items: u32,
    #[serde(default)]
    pub items: Vec<CartItem>,
    pub total_original_price: f64,
    pub total_discount: f64,
    pub subtotal: f64,
    pub shipping_charge: f64,
    pub final_total: f64,
    #[serde(default)]
    pub message: String,
}

impl CartSnapshot {
    pub fn contains(&self, product_id: &str) -> bool {
        self.items.iter().any(|item| item.product_id == product_id)
    }

    pub fn quantity_of(&self, product_id: &str) -> Option<u32> {
        self.items
            .iter()
            .find(|item| item.product_id == product_id)
            .map(|item| item.quantity)
    }
}

/// Acknowledgement for a cart add or update.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CartAck {
    pub user_id: String,
    pub action_type: String,
    pub product_id: String,
    pub quantity: String,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_snapshot_decodes_backend_payload() {
        let payload = json!({
            "totalItems": 2,
            "items": [{
                "productId": "p1",
                "productName": "Linen Shirt",
                "imageUrl": "https://cdn.example.com/p1.jpg",
                "color": "white",
                "size": "M",
                "gender": "men",
                "material": "linen",
                "brand": "Acme",
                "sellerId": "s9",
                "price": 1200.0,
                "discountOnProduct": 10.0,
                "discountAmount": 120.0,
                "quantity": 2,
                "totalDiscountedPrice": 2160.0
            }],
            "totalOriginalPrice": 2400.0,
            "totalDiscount": 240.0,
            "subtotal": 2160.0,
            "shippingCharge": 0.0,
            "finalTotal": 2160.0,
            "message": "Cart fetched"
        });

        let cart: CartSnapshot = serde_json::from_value(payload).unwrap();
        assert_eq!(cart.total_items, 2);
        assert!(cart.contains("p1"));
        assert_eq!(cart.quantity_of("p1"), Some(2));
        assert_eq!(cart.items[0].seller_id, "s9");
        assert_eq!(cart.final_total, 2160.0);
    }

    #[test]
    fn test_empty_cart_without_items_field() {
        let payload = json!({
            "totalItems": 0,
            "totalOriginalPrice": 0.0,
            "totalDiscount": 0.0,
            "subtotal": 0.0,
            "shippingCharge": 0.0,
            "finalTotal": 0.0
        });

        let cart: CartSnapshot = serde_json::from_value(payload).unwrap();
        assert!(cart.items.is_empty());
        assert!(!cart.contains("p1"));
    }
}
