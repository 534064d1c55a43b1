//! Domain models for the shopping cart.
//!
//! These types represent validated domain objects, separate from the database
//! row types in [`crate::db`] and the wire types in [`crate::dto`].

pub mod cart_item;
pub mod customer;
pub mod product;

pub use cart_item::{CartItem, CartItemUpdate, MAX_QUANTITY, NewCartItem};
pub use customer::{AuthorizedCustomer, Customer, HashedPassword, NewCustomer, PasswordHashError};
pub use product::{PageError, Product, ProductError, Products};
