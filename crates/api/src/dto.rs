//! JSON request and response bodies.
//!
//! Request bodies carry raw strings; services turn them into validated
//! value types so that validation failures surface as domain errors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopping_cart_core::{CartItemId, CustomerId, Price, ProductId};

use crate::models::{CartItem, Customer, Product};

/// Default number of products per page.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

// =============================================================================
// Customers
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct SignUpRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpResponse {
    pub username: String,
    pub email: String,
}

impl From<&Customer> for SignUpResponse {
    fn from(customer: &Customer) -> Self {
        Self {
            username: customer.name.to_string(),
            email: customer.email.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangePasswordRequest {
    /// Current password.
    pub password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteCustomerRequest {
    pub password: String,
}

/// Profile of the authenticated customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerResponse {
    pub id: CustomerId,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Customer> for CustomerResponse {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id,
            username: customer.name.to_string(),
            email: customer.email.to_string(),
            created_at: customer.created_at,
        }
    }
}

// =============================================================================
// Authentication
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Bearer token issued on login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    /// Lifetime of the token in seconds.
    pub expires_in: u64,
}

impl TokenResponse {
    #[must_use]
    pub fn bearer(access_token: String, expires_in: u64) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_owned(),
            expires_in,
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// Adds a product to the caller's cart.
///
/// `quantity` is signed so that negative input reaches validation instead of
/// failing JSON decoding.
#[derive(Debug, Clone, Deserialize)]
pub struct AddCartItemRequest {
    pub product_id: ProductId,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    #[serde(default = "default_checked")]
    pub checked: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCartItemRequest {
    pub id: CartItemId,
    pub quantity: i64,
    pub checked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddedCartItem {
    pub id: CartItemId,
}

/// A cart row joined with its product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItemResponse {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
    pub image_url: String,
    pub quantity: u32,
    pub checked: bool,
}

impl CartItemResponse {
    #[must_use]
    pub fn new(item: &CartItem, product: &Product) -> Self {
        Self {
            id: item.id,
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            image_url: product.image_url.clone(),
            quantity: item.quantity,
            checked: item.checked,
        }
    }
}

const fn default_quantity() -> i64 {
    1
}

const fn default_checked() -> bool {
    true
}

// =============================================================================
// Products
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductResponse {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            image_url: product.image_url.clone(),
            description: product.description.clone(),
        }
    }
}

/// One page of the product catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPage {
    pub items: Vec<ProductResponse>,
    pub page: u32,
    pub page_size: u32,
    pub total: usize,
    pub total_pages: usize,
}

/// `?size=&page=` query parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page_size")]
    pub size: u32,
    #[serde(default = "default_page")]
    pub page: u32,
}

const fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

const fn default_page() -> u32 {
    1
}
