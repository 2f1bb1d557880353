//! `/cart` endpoints.

use storefront_shared::{
    AddCartItemRequest, ApiError, ApplyCouponRequest, Cart, UpdateCartItemRequest,
};

use super::segment;
use crate::api_client::ApiClient;

impl ApiClient {
    pub async fn get_cart(&self) -> Result<Cart, ApiError> {
        self.get_json("/cart").await
    }

    pub async fn add_cart_item(&self, product_id: &str, quantity: i64) -> Result<Cart, ApiError> {
        let body = AddCartItemRequest {
            product_id: product_id.to_string(),
            quantity,
        };
        self.post_json("/cart/items", &body).await
    }

    pub async fn update_cart_item(&self, item_id: &str, quantity: i64) -> Result<Cart, ApiError> {
        let path = format!("/cart/items/{}", segment(item_id));
        self.put_json(&path, &UpdateCartItemRequest { quantity }).await
    }

    pub async fn remove_cart_item(&self, item_id: &str) -> Result<(), ApiError> {
        let path = format!("/cart/items/{}", segment(item_id));
        self.delete(&path).await
    }

    pub async fn clear_cart(&self) -> Result<(), ApiError> {
        self.delete("/cart").await
    }

    pub async fn apply_coupon(&self, code: &str) -> Result<Cart, ApiError> {
        let body = ApplyCouponRequest {
            code: code.to_string(),
        };
        self.post_json("/cart/coupon", &body).await
    }

    /// Some backends answer with the updated cart, others with an empty body.
    pub async fn remove_coupon(&self) -> Result<Option<Cart>, ApiError> {
        self.delete_json("/cart/coupon").await
    }
}
