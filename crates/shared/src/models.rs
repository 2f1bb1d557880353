//! Shared data models for the storefront API.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Identifier used for the cart (and its owner) before the server has
/// confirmed one.
pub const PLACEHOLDER_CART_ID: &str = "temp";

// --- Users ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

/// A user together with the access token issued at login or registration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    #[serde(flatten)]
    pub user: User,
    pub token: String,
}

// --- Catalog ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Unit price.
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub specifications: BTreeMap<String, String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductCategory {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    Price,
    Name,
    Rating,
    #[default]
    CreatedAt,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Price => "price",
            SortBy::Name => "name",
            SortBy::Rating => "rating",
            SortBy::CreatedAt => "createdAt",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Product listing filters. Empty strings and `None` mean "not filtered".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilters {
    pub search: String,
    pub category: String,
    pub brand: String,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub rating: Option<f64>,
    pub in_stock: Option<bool>,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
}

impl ProductFilters {
    /// Query string pairs for the listing endpoint, skipping unset values.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        for (key, value) in [
            ("search", &self.search),
            ("category", &self.category),
            ("brand", &self.brand),
        ] {
            if !value.is_empty() {
                pairs.push((key, value.clone()));
            }
        }
        if let Some(v) = self.min_price {
            pairs.push(("minPrice", v.to_string()));
        }
        if let Some(v) = self.max_price {
            pairs.push(("maxPrice", v.to_string()));
        }
        if let Some(v) = self.rating {
            pairs.push(("rating", v.to_string()));
        }
        if let Some(v) = self.in_stock {
            pairs.push(("inStock", v.to_string()));
        }
        pairs.push(("sortBy", self.sort_by.as_str().to_string()));
        pairs.push(("sortOrder", self.sort_order.as_str().to_string()));
        pairs
    }

    /// Merge a partial update into these filters.
    pub fn merge(&mut self, patch: FilterPatch) {
        if let Some(v) = patch.search {
            self.search = v;
        }
        if let Some(v) = patch.category {
            self.category = v;
        }
        if let Some(v) = patch.brand {
            self.brand = v;
        }
        if let Some(v) = patch.min_price {
            self.min_price = v;
        }
        if let Some(v) = patch.max_price {
            self.max_price = v;
        }
        if let Some(v) = patch.rating {
            self.rating = v;
        }
        if let Some(v) = patch.in_stock {
            self.in_stock = v;
        }
        if let Some(v) = patch.sort_by {
            self.sort_by = v;
        }
        if let Some(v) = patch.sort_order {
            self.sort_order = v;
        }
    }
}

/// A partial filter change. Fields left as `None` keep their current value.
///
/// The optional filters take an inner `Option`: `Some(None)` removes the
/// filter, `Some(Some(v))` sets it. On the wire an explicit `null` removes
/// and an absent key keeps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FilterPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, deserialize_with = "present")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<Option<f64>>,
    #[serde(default, deserialize_with = "present")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<Option<f64>>,
    #[serde(default, deserialize_with = "present")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<Option<f64>>,
    #[serde(default, deserialize_with = "present")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<Option<bool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortBy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

/// A key that is present deserializes to `Some`, even when its value is `null`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl FilterPatch {
    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..Self::default()
        }
    }

    pub fn search(search: impl Into<String>) -> Self {
        Self {
            search: Some(search.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 12,
            total: 0,
            total_pages: 0,
        }
    }
}

// --- Cart ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: String,
    pub product_id: String,
    /// Copy of the product taken when the item was added.
    pub product: Product,
    pub quantity: i64,
    /// Line price: unit price times quantity.
    pub price: f64,
}

impl CartItem {
    pub fn new(id: impl Into<String>, product: Product, quantity: i64) -> Self {
        let price = product.price * quantity as f64;
        Self {
            id: id.into(),
            product_id: product.id.clone(),
            product,
            quantity,
            price,
        }
    }

    /// Set the quantity and reprice the line from the product snapshot.
    pub fn set_quantity(&mut self, quantity: i64) {
        self.quantity = quantity;
        self.price = self.product.price * quantity as f64;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: String,
    pub user_id: String,
    pub items: Vec<CartItem>,
    pub total: f64,
    pub item_count: i64,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// An empty local cart standing in until the server confirms a real one.
    pub fn placeholder() -> Self {
        let now = Utc::now();
        Self {
            id: PLACEHOLDER_CART_ID.to_string(),
            user_id: PLACEHOLDER_CART_ID.to_string(),
            items: Vec::new(),
            total: 0.0,
            item_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.id == PLACEHOLDER_CART_ID
    }

    pub fn item(&self, item_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    pub fn item_for_product(&self, product_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    /// Add `quantity` of `product`, merging into an existing line for the
    /// same product. `new_item_id` is only used when a new line is created.
    ///
    /// A negative `quantity` takes units off the existing line; a line that
    /// drops to zero or below is removed. No line is created for a quantity
    /// of zero or below.
    pub fn add_product(
        &mut self,
        product: Product,
        quantity: i64,
        new_item_id: impl FnOnce() -> String,
    ) {
        if let Some(pos) = self.items.iter().position(|i| i.product_id == product.id) {
            let merged = self.items[pos].quantity + quantity;
            if merged <= 0 {
                self.items.remove(pos);
            } else {
                self.items[pos].set_quantity(merged);
            }
        } else if quantity > 0 {
            self.items.push(CartItem::new(new_item_id(), product, quantity));
        }
        self.recompute_totals();
    }

    /// Rewrite a line's quantity; zero or below removes the line.
    ///
    /// Returns `false` when the item is not in the cart.
    pub fn set_item_quantity(&mut self, item_id: &str, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove_item(item_id);
        }
        let Some(item) = self.items.iter_mut().find(|i| i.id == item_id) else {
            return false;
        };
        item.set_quantity(quantity);
        self.recompute_totals();
        true
    }

    /// Returns `false` when the item is not in the cart.
    pub fn remove_item(&mut self, item_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id != item_id);
        if self.items.len() == before {
            return false;
        }
        self.recompute_totals();
        true
    }

    /// Rebuild `item_count` and `total` from the line items.
    ///
    /// Always a full pass over the items, never an incremental adjustment.
    pub fn recompute_totals(&mut self) {
        self.item_count = self.items.iter().map(|i| i.quantity).sum();
        self.total = self.items.iter().map(|i| i.price).sum();
        self.updated_at = Utc::now();
    }
}

// --- Orders ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: String,
    pub product_id: String,
    pub product: Product,
    pub quantity: i64,
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub phone: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    Paypal,
    BankTransfer,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub billing_address: ShippingAddress,
    pub subtotal: f64,
    pub tax: f64,
    pub shipping: f64,
    pub total: f64,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Orders can be cancelled until they leave the warehouse.
    pub fn is_cancellable(&self) -> bool {
        matches!(
            self.status,
            OrderStatus::Pending | OrderStatus::Confirmed | OrderStatus::Processing
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    pub shipping_address: ShippingAddress,
    pub billing_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub save_billing_address: bool,
}
