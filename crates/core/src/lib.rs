//! Shopping Cart Core - Shared value types.
//!
//! This crate provides the validated primitives used across the workspace:
//! - `api` - HTTP server, data access and services
//! - `cli` - Migrations and catalog seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP.
//! Every type is a smart constructor: invalid input is rejected when the value
//! is built, so a `Name` or `Email` that exists is always valid.
//!
//! # Modules
//!
//! - [`types`] - Entity IDs, customer fields (`Name`, `Email`, `Password`) and `Price`

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
