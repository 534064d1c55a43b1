//! Core value types for the shopping cart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod name;
pub mod password;
pub mod price;

pub use email::{Email, EmailError};
pub use id::*;
pub use name::{Name, NameError};
pub use password::{Password, PasswordError};
pub use price::{Price, PriceError};
