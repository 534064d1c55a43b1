//! Shopping cart API library.
//!
//! Customer accounts, bearer-token authentication, the product catalog and
//! per-customer carts over `PostgreSQL`, served as JSON by axum. The binary
//! in `main.rs` only wires configuration, telemetry and the listener.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod dto;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
