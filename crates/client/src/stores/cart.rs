//! Shopping cart store.
//!
//! Two update channels feed the same cart:
//!
//! - optimistic actions edit the local cart immediately, before the server
//!   has seen the change;
//! - confirmed actions apply what the server answered, which is
//!   authoritative.
//!
//! Every local edit goes through the cart's `recompute_totals`, so
//! `total` and `item_count` always match the line items. A failed
//! confirmed call records an error but does not undo earlier optimistic
//! edits: the two channels are not linked.

use storefront_shared::{ApiError, Cart, Product};
use tokio::sync::watch;
use uuid::Uuid;

use super::{Reducer, Store};
use crate::api_client::ApiClient;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartState {
    pub cart: Option<Cart>,
    pub is_loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    ClearError,
    /// Add `quantity` of `product`. `item_id` names the line if a new one is created.
    AddItemOptimistic {
        product: Product,
        quantity: i64,
        item_id: String,
    },
    UpdateItemOptimistic { item_id: String, quantity: i64 },
    RemoveItemOptimistic { item_id: String },
    FetchPending,
    FetchFulfilled(Cart),
    FetchRejected(String),
    /// The server answered with the full cart.
    Replaced(Cart),
    /// The server confirmed a line item removal.
    ItemRemoved(String),
    Cleared,
    Rejected(String),
}

impl Reducer for CartState {
    type Action = CartAction;

    fn reduce(&mut self, action: CartAction) {
        match action {
            CartAction::ClearError => self.error = None,
            CartAction::AddItemOptimistic {
                product,
                quantity,
                item_id,
            } => {
                let cart = self.cart.get_or_insert_with(Cart::placeholder);
                cart.add_product(product, quantity, || item_id);
            }
            CartAction::UpdateItemOptimistic { item_id, quantity } => {
                if let Some(cart) = self.cart.as_mut() {
                    cart.set_item_quantity(&item_id, quantity);
                }
            }
            CartAction::RemoveItemOptimistic { item_id } | CartAction::ItemRemoved(item_id) => {
                if let Some(cart) = self.cart.as_mut() {
                    cart.remove_item(&item_id);
                }
            }
            CartAction::FetchPending => {
                self.is_loading = true;
                self.error = None;
            }
            CartAction::FetchFulfilled(cart) => {
                self.is_loading = false;
                self.cart = Some(cart);
            }
            CartAction::FetchRejected(message) => {
                self.is_loading = false;
                self.error = Some(message);
            }
            CartAction::Replaced(cart) => self.cart = Some(cart),
            CartAction::Cleared => self.cart = None,
            CartAction::Rejected(message) => self.error = Some(message),
        }
    }
}

/// Identifier for a line item that only exists locally.
pub fn temporary_item_id() -> String {
    format!("temp-{}", Uuid::new_v4())
}

#[derive(Clone)]
pub struct CartStore {
    store: Store<CartState>,
    api: ApiClient,
}

impl CartStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            store: Store::new(CartState::default()),
            api,
        }
    }

    pub fn snapshot(&self) -> CartState {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.store.subscribe()
    }

    pub fn dispatch(&self, action: CartAction) {
        self.store.dispatch(action);
    }

    pub fn cart(&self) -> Option<Cart> {
        self.store.read(|s| s.cart.clone())
    }

    pub fn item_count(&self) -> i64 {
        self.store.read(|s| s.cart.as_ref().map_or(0, |c| c.item_count))
    }

    pub fn total(&self) -> f64 {
        self.store.read(|s| s.cart.as_ref().map_or(0.0, |c| c.total))
    }

    pub fn clear_error(&self) {
        self.store.dispatch(CartAction::ClearError);
    }

    // --- Optimistic channel ---

    pub fn add_item_optimistic(&self, product: &Product, quantity: i64) {
        self.store.dispatch(CartAction::AddItemOptimistic {
            product: product.clone(),
            quantity,
            item_id: temporary_item_id(),
        });
    }

    pub fn update_item_optimistic(&self, item_id: &str, quantity: i64) {
        self.store.dispatch(CartAction::UpdateItemOptimistic {
            item_id: item_id.to_string(),
            quantity,
        });
    }

    pub fn remove_item_optimistic(&self, item_id: &str) {
        self.store.dispatch(CartAction::RemoveItemOptimistic {
            item_id: item_id.to_string(),
        });
    }

    // --- Confirmed channel ---

    pub async fn fetch_cart(&self) -> Result<Cart, ApiError> {
        self.store.dispatch(CartAction::FetchPending);
        match self.api.get_cart().await {
            Ok(cart) => {
                self.store.dispatch(CartAction::FetchFulfilled(cart.clone()));
                Ok(cart)
            }
            Err(e) => {
                let message = e.message_or("Failed to fetch cart");
                crate::log_error!("cart fetch failed: {}", message);
                self.store.dispatch(CartAction::FetchRejected(message));
                Err(e)
            }
        }
    }

    pub async fn add_to_cart(&self, product_id: &str, quantity: i64) -> Result<Cart, ApiError> {
        let result = self.api.add_cart_item(product_id, quantity).await;
        self.replace_with(result, "Failed to add to cart")
    }

    pub async fn update_cart_item(&self, item_id: &str, quantity: i64) -> Result<Cart, ApiError> {
        let result = self.api.update_cart_item(item_id, quantity).await;
        self.replace_with(result, "Failed to update cart item")
    }

    pub async fn remove_from_cart(&self, item_id: &str) -> Result<(), ApiError> {
        match self.api.remove_cart_item(item_id).await {
            Ok(()) => {
                self.store.dispatch(CartAction::ItemRemoved(item_id.to_string()));
                Ok(())
            }
            Err(e) => {
                let message = e.message_or("Failed to remove from cart");
                self.store.dispatch(CartAction::Rejected(message));
                Err(e)
            }
        }
    }

    pub async fn clear_cart(&self) -> Result<(), ApiError> {
        match self.api.clear_cart().await {
            Ok(()) => {
                self.store.dispatch(CartAction::Cleared);
                Ok(())
            }
            Err(e) => {
                let message = e.message_or("Failed to clear cart");
                self.store.dispatch(CartAction::Rejected(message));
                Err(e)
            }
        }
    }

    pub async fn apply_coupon(&self, code: &str) -> Result<Cart, ApiError> {
        let result = self.api.apply_coupon(code).await;
        self.replace_with(result, "Failed to apply coupon")
    }

    /// Drop the applied coupon. The cart is replaced only if the server sent one back.
    pub async fn remove_coupon(&self) -> Result<Option<Cart>, ApiError> {
        match self.api.remove_coupon().await {
            Ok(cart) => {
                if let Some(cart) = &cart {
                    self.store.dispatch(CartAction::Replaced(cart.clone()));
                }
                Ok(cart)
            }
            Err(e) => {
                let message = e.message_or("Failed to remove coupon");
                self.store.dispatch(CartAction::Rejected(message));
                Err(e)
            }
        }
    }

    fn replace_with(
        &self,
        result: Result<Cart, ApiError>,
        default: &str,
    ) -> Result<Cart, ApiError> {
        match &result {
            Ok(cart) => self.store.dispatch(CartAction::Replaced(cart.clone())),
            Err(e) => {
                let message = e.message_or(default);
                self.store.dispatch(CartAction::Rejected(message));
            }
        }
        result
    }
}
