//! Cart service.
//!
//! Wraps the cart item store with the checks the store itself does not make:
//! the product exists, it is not already in the cart, and the cart item being
//! changed belongs to the caller.

use thiserror::Error;
use tracing::instrument;

use shopping_cart_core::{CartItemId, ProductId};

use crate::db::{CartItemStore, ProductStore, RepositoryError};
use crate::dto::{AddCartItemRequest, CartItemResponse, UpdateCartItemRequest};
use crate::models::{AuthorizedCustomer, CartItemUpdate, MAX_QUANTITY, NewCartItem, Products};

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    #[error("quantity must be between 0 and {max} (got {0})", max = MAX_QUANTITY)]
    InvalidQuantity(i64),

    #[error("product {0} does not exist")]
    ProductNotFound(ProductId),

    #[error("product {0} is already in the cart")]
    AlreadyInCart(ProductId),

    #[error("cart item {0} is not in the customer's cart")]
    NotInCustomerCart(CartItemId),

    #[error("cart item {0} does not exist")]
    InvalidCartItem(CartItemId),

    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Cart operations for the authenticated customer.
pub struct CartService<I, P> {
    cart_items: I,
    products: P,
}

impl<I: CartItemStore, P: ProductStore> CartService<I, P> {
    #[must_use]
    pub const fn new(cart_items: I, products: P) -> Self {
        Self {
            cart_items,
            products,
        }
    }

    /// The customer's cart rows joined with their products, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ProductNotFound` if a row references a product
    /// missing from the catalog.
    #[instrument(skip_all, fields(customer_id = %principal.id()))]
    pub async fn list(
        &self,
        principal: &AuthorizedCustomer,
    ) -> Result<Vec<CartItemResponse>, CartError> {
        let mut items = self.cart_items.find_by_customer_id(principal.id()).await?;
        items.sort_by_key(|item| item.id);

        let products = Products::new(self.products.find_all().await?);

        items
            .iter()
            .map(|item| {
                products
                    .find_by_id(item.product_id)
                    .map(|product| CartItemResponse::new(item, product))
                    .map_err(|_| CartError::ProductNotFound(item.product_id))
            })
            .collect()
    }

    /// Put a product in the customer's cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity`, `CartError::ProductNotFound` or
    /// `CartError::AlreadyInCart` when the row cannot be added.
    #[instrument(skip_all, fields(customer_id = %principal.id(), product_id = %request.product_id))]
    pub async fn add(
        &self,
        principal: &AuthorizedCustomer,
        request: &AddCartItemRequest,
    ) -> Result<CartItemId, CartError> {
        let quantity = quantity(request.quantity)?;

        if self.products.find_by_id(request.product_id).await?.is_none() {
            return Err(CartError::ProductNotFound(request.product_id));
        }

        let in_cart = self
            .cart_items
            .find_product_ids_by_customer_id(principal.id())
            .await?;
        if in_cart.contains(&request.product_id) {
            return Err(CartError::AlreadyInCart(request.product_id));
        }

        let id = self
            .cart_items
            .add_cart_item(
                principal.id(),
                &NewCartItem {
                    product_id: request.product_id,
                    quantity,
                    checked: request.checked,
                },
            )
            .await?;

        tracing::info!(cart_item_id = %id, "Added cart item");

        Ok(id)
    }

    /// Change quantity and checked state of one of the customer's rows.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotInCustomerCart` if the row is not the caller's.
    #[instrument(skip_all, fields(customer_id = %principal.id(), cart_item_id = %request.id))]
    pub async fn update(
        &self,
        principal: &AuthorizedCustomer,
        request: &UpdateCartItemRequest,
    ) -> Result<(), CartError> {
        let quantity = quantity(request.quantity)?;
        self.ensure_owned(principal, request.id).await?;

        self.cart_items
            .update(
                principal.id(),
                &CartItemUpdate {
                    id: request.id,
                    quantity,
                    checked: request.checked,
                },
            )
            .await?;

        Ok(())
    }

    /// Remove one of the customer's rows.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotInCustomerCart` if the row is not the caller's
    /// and `CartError::InvalidCartItem` if it is already gone.
    #[instrument(skip_all, fields(customer_id = %principal.id(), cart_item_id = %id))]
    pub async fn delete(
        &self,
        principal: &AuthorizedCustomer,
        id: CartItemId,
    ) -> Result<(), CartError> {
        self.ensure_owned(principal, id).await?;

        self.cart_items
            .delete_cart_item(id)
            .await
            .map_err(|e| missing_cart_item(e, id))?;

        tracing::info!("Deleted cart item");

        Ok(())
    }

    /// Product referenced by one of the customer's rows.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotInCustomerCart` if the row is not the caller's.
    pub async fn product_of(
        &self,
        principal: &AuthorizedCustomer,
        id: CartItemId,
    ) -> Result<ProductId, CartError> {
        self.ensure_owned(principal, id).await?;

        self.cart_items
            .find_product_id_by_id(id)
            .await
            .map_err(|e| missing_cart_item(e, id))
    }

    async fn ensure_owned(
        &self,
        principal: &AuthorizedCustomer,
        id: CartItemId,
    ) -> Result<(), CartError> {
        let owned = self.cart_items.find_ids_by_customer_id(principal.id()).await?;
        if owned.contains(&id) {
            Ok(())
        } else {
            Err(CartError::NotInCustomerCart(id))
        }
    }
}

fn quantity(raw: i64) -> Result<u32, CartError> {
    u32::try_from(raw)
        .ok()
        .filter(|quantity| *quantity <= MAX_QUANTITY)
        .ok_or(CartError::InvalidQuantity(raw))
}

fn missing_cart_item(e: RepositoryError, id: CartItemId) -> CartError {
    match e {
        RepositoryError::NotFound => CartError::InvalidCartItem(id),
        other => CartError::Repository(other),
    }
}
