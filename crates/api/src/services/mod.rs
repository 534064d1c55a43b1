//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Password login and bearer-token principal resolution
//! - `customer` - Signup, password change, account deletion
//! - `cart` - Cart rows of the authenticated customer
//! - `product` - Paged catalog listing and lookup
//!
//! Services are generic over the store traits in [`crate::db`] and are built
//! per request from the shared pool.

pub mod auth;
pub mod cart;
pub mod customer;
pub mod product;

pub use auth::{AuthError, AuthService, TokenError, TokenProvider};
pub use cart::{CartError, CartService};
pub use customer::{CustomerError, CustomerService};
pub use product::{CatalogError, ProductService};
