//! `/orders` endpoints.

use storefront_shared::{ApiError, CheckoutForm, Order};

use super::segment;
use crate::api_client::ApiClient;

impl ApiClient {
    pub async fn create_order(&self, checkout: &CheckoutForm) -> Result<Order, ApiError> {
        self.post_json("/orders", checkout).await
    }

    pub async fn get_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.get_json("/orders").await
    }

    pub async fn get_order(&self, order_id: &str) -> Result<Order, ApiError> {
        let path = format!("/orders/{}", segment(order_id));
        self.get_json(&path).await
    }

    pub async fn cancel_order(&self, order_id: &str) -> Result<Order, ApiError> {
        let path = format!("/orders/{}/cancel", segment(order_id));
        self.post_empty(&path).await
    }

    /// Carrier tracking details; the shape is carrier specific.
    pub async fn get_order_tracking(&self, order_id: &str) -> Result<serde_json::Value, ApiError> {
        let path = format!("/orders/{}/tracking", segment(order_id));
        self.get_json(&path).await
    }
}
