//! Cart item domain types.

use shopping_cart_core::{CartItemId, CustomerId, ProductId};

/// Largest quantity a cart row can hold (the `INTEGER` column range).
pub const MAX_QUANTITY: u32 = i32::MAX.unsigned_abs();

/// A (customer, product, quantity, checked) association.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    /// Unique cart item ID.
    pub id: CartItemId,
    /// Customer who owns this cart row.
    pub customer_id: CustomerId,
    /// Product in the cart.
    pub product_id: ProductId,
    /// Number of units.
    pub quantity: u32,
    /// Whether the item is selected for checkout.
    pub checked: bool,
}

/// A cart row to insert for a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewCartItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub checked: bool,
}

/// New quantity/checked state for an existing cart row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartItemUpdate {
    pub id: CartItemId,
    pub quantity: u32,
    pub checked: bool,
}
