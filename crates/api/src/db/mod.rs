//! Database access for the shopping cart `PostgreSQL` database.
//!
//! ## Tables
//!
//! - `customer` - Registered customers (username, email, password hash)
//! - `product` - Catalog products (seeded with `sc-cli seed products`)
//! - `cart_item` - Cart rows, cascade-deleted with their customer
//!
//! Each table is reached through a narrow store trait ([`CustomerStore`],
//! [`CartItemStore`], [`ProductStore`]). Services are generic over these
//! traits; the server injects the `PostgreSQL` repositories and tests inject
//! `MemoryStore` (built for tests, or with the `memory-store` feature).
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p shopping-cart-cli -- migrate
//! ```

pub mod cart_items;
pub mod customers;
#[cfg(any(test, feature = "memory-store"))]
pub mod memory;
pub mod products;

use std::future::Future;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use shopping_cart_core::{CartItemId, CustomerId, Email, Name, ProductId};

use crate::models::{CartItem, CartItemUpdate, Customer, NewCartItem, NewCustomer, Product};

pub use cart_items::CartItemRepository;
pub use customers::CustomerRepository;
#[cfg(any(test, feature = "memory-store"))]
pub use memory::MemoryStore;
pub use products::ProductRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Storage for customer rows.
pub trait CustomerStore: Send + Sync {
    /// Returns `true` if a customer with this username exists.
    fn exists_by_name(
        &self,
        name: &Name,
    ) -> impl Future<Output = Result<bool, RepositoryError>> + Send;

    /// Returns `true` if a customer with this email exists.
    fn exists_by_email(
        &self,
        email: &Email,
    ) -> impl Future<Output = Result<bool, RepositoryError>> + Send;

    /// Inserts a customer and returns the stored row.
    ///
    /// Fails with `RepositoryError::Conflict` when the username or email is
    /// already taken; the message is the violated constraint name
    /// ([`customers::USERNAME_CONSTRAINT`] or [`customers::EMAIL_CONSTRAINT`]).
    fn save(
        &self,
        customer: &NewCustomer,
    ) -> impl Future<Output = Result<Customer, RepositoryError>> + Send;

    /// Loads a customer by username.
    fn find_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Customer>, RepositoryError>> + Send;

    /// Replaces the password hash of the named customer.
    fn update_password(
        &self,
        name: &Name,
        password_hash: &str,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Deletes the named customer.
    fn delete_by_name(
        &self,
        name: &Name,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// Storage for cart rows.
///
/// Row order of the list operations is whatever the store returns and must
/// not be relied upon.
pub trait CartItemStore: Send + Sync {
    fn find_product_ids_by_customer_id(
        &self,
        customer_id: CustomerId,
    ) -> impl Future<Output = Result<Vec<ProductId>, RepositoryError>> + Send;

    fn find_ids_by_customer_id(
        &self,
        customer_id: CustomerId,
    ) -> impl Future<Output = Result<Vec<CartItemId>, RepositoryError>> + Send;

    /// Fails with `RepositoryError::NotFound` when no row has the ID.
    fn find_product_id_by_id(
        &self,
        id: CartItemId,
    ) -> impl Future<Output = Result<ProductId, RepositoryError>> + Send;

    fn add_cart_item(
        &self,
        customer_id: CustomerId,
        item: &NewCartItem,
    ) -> impl Future<Output = Result<CartItemId, RepositoryError>> + Send;

    /// Fails with `RepositoryError::NotFound` when no row was deleted.
    fn delete_cart_item(
        &self,
        id: CartItemId,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Deletes every row of the customer. Deleting nothing is not an error.
    fn delete_all_by_customer_id(
        &self,
        customer_id: CustomerId,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    fn find_by_customer_id(
        &self,
        customer_id: CustomerId,
    ) -> impl Future<Output = Result<Vec<CartItem>, RepositoryError>> + Send;

    /// Updates the row matching both the customer and the item ID.
    ///
    /// Matching nothing is not an error.
    fn update(
        &self,
        customer_id: CustomerId,
        update: &CartItemUpdate,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// Read-only access to the product catalog.
pub trait ProductStore: Send + Sync {
    /// Loads every product, ordered by ID.
    fn find_all(&self) -> impl Future<Output = Result<Vec<Product>, RepositoryError>> + Send;

    fn find_by_id(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<Option<Product>, RepositoryError>> + Send;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a unique-constraint violation to `RepositoryError::Conflict`.
///
/// The conflict message is the violated constraint's name when available.
pub(crate) fn map_unique_violation(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        let constraint = db_err.constraint().unwrap_or("unique").to_owned();
        return RepositoryError::Conflict(constraint);
    }
    RepositoryError::Database(e)
}
