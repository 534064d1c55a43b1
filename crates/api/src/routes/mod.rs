//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                  - Liveness check
//! GET    /health/ready            - Readiness check (database)
//!
//! # Auth
//! POST   /auth/login              - Username/password → bearer token
//!
//! # Customers
//! POST   /customers               - Sign up
//! GET    /customers/me            - Profile (requires auth)
//! PATCH  /customers/me/password   - Change password (requires auth)
//! DELETE /customers/me            - Delete account (requires auth)
//!
//! # Products
//! GET    /products?size=&page=    - Paged listing
//! GET    /products/{id}           - Product detail
//!
//! # Cart (requires auth)
//! GET    /cart                    - List cart items
//! POST   /cart                    - Add a product
//! PATCH  /cart                    - Update quantity/checked
//! DELETE /cart/{id}               - Remove a cart item
//! GET    /cart/{id}/product       - Product of a cart item
//! ```

pub mod auth;
pub mod cart;
pub mod customers;
pub mod health;
pub mod products;

use axum::{
    Router,
    extract::Request,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, patch, post},
};
use tower_http::trace::TraceLayer;

use crate::middleware::{request_id_middleware, require_customer};
use crate::state::AppState;

/// Routes that require a bearer token.
pub fn authenticated_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/customers/me",
            get(customers::me).delete(customers::delete),
        )
        .route("/customers/me/password", patch(customers::change_password))
        .route(
            "/cart",
            get(cart::list).post(cart::add).patch(cart::update),
        )
        .route("/cart/{id}", axum::routing::delete(cart::remove))
        .route("/cart/{id}/product", get(cart::product))
        .route_layer(from_fn_with_state(state.clone(), require_customer))
}

/// Routes open to anonymous callers.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/auth/login", post(auth::login))
        .route("/customers", post(customers::sign_up))
        .route("/products", get(products::index))
        .route("/products/{id}", get(products::show))
}

/// Build the complete application router.
///
/// Request ID and tracing layers wrap every route. Sentry layers are added
/// by the binary.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(public_routes())
        .merge(authenticated_routes(&state))
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
                customer_id = tracing::field::Empty,
            )
        }))
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use secrecy::SecretString;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::config::{ApiConfig, TokenConfig};
    use crate::middleware::REQUEST_ID_HEADER;

    /// Router whose pool never connects; only routes that fail before any
    /// query can be exercised.
    fn test_app() -> Router {
        let config = ApiConfig {
            database_url: SecretString::from("postgres://localhost:1/unused".to_owned()),
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            token: TokenConfig {
                secret: SecretString::from("k7Hq2mVx9Lp4Rt8Wn3Bz6Yc1Fd5Gj0Sa".to_owned()),
                ttl_secs: 60,
            },
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost:1/unused")
            .unwrap();
        app(AppState::new(config, pool))
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health_has_request_id() {
        let response = test_app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn test_upstream_request_id_is_echoed() {
        let response = test_app()
            .oneshot(
                Request::get("/health")
                    .header(REQUEST_ID_HEADER, "edge-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()[REQUEST_ID_HEADER], "edge-42");
    }

    #[tokio::test]
    async fn test_cart_requires_token() {
        let response = test_app()
            .oneshot(Request::get("/cart").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({ "error": "missing bearer token" })
        );
    }

    #[tokio::test]
    async fn test_malformed_authorization_is_rejected() {
        let response = test_app()
            .oneshot(
                Request::get("/customers/me")
                    .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_token_is_rejected() {
        let response = test_app()
            .oneshot(
                Request::delete("/cart/1")
                    .header(header::AUTHORIZATION, "Bearer not.a.token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({ "error": "Invalid or expired token" })
        );
    }

    async fn assert_json_bad_request(response: axum::response::Response) -> String {
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        let body = json_body(response).await;
        body["error"].as_str().unwrap().to_owned()
    }

    #[tokio::test]
    async fn test_missing_body_field_is_json_bad_request() {
        let response = test_app()
            .oneshot(
                Request::post("/customers")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"email":"puppy@woowa.com","password":"password123"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        let message = assert_json_bad_request(response).await;
        assert!(message.contains("username"), "{message}");
    }

    #[tokio::test]
    async fn test_body_without_content_type_is_json_bad_request() {
        let response = test_app()
            .oneshot(
                Request::post("/auth/login")
                    .body(Body::from(r#"{"username":"puppy","password":"password123"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_json_bad_request(response).await;
    }

    #[tokio::test]
    async fn test_non_numeric_page_size_is_json_bad_request() {
        let response = test_app()
            .oneshot(Request::get("/products?size=abc").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_json_bad_request(response).await;
    }

    #[tokio::test]
    async fn test_non_numeric_product_id_is_json_bad_request() {
        let response = test_app()
            .oneshot(Request::get("/products/abc").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_json_bad_request(response).await;
    }

    #[tokio::test]
    async fn test_sign_up_validation_runs_before_database() {
        let response = test_app()
            .oneshot(
                Request::post("/customers")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"username":"has space","email":"puppy@woowa.com","password":"password123"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
