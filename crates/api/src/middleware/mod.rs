//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (correlation ID on span, Sentry scope and response)
//! 4. `require_customer` (bearer token → principal), on authenticated routes only

pub mod auth;
pub mod request_id;

pub use auth::{CurrentCustomer, extract_bearer, require_customer};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
