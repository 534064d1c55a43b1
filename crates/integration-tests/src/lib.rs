//! End-to-end tests for the shopping cart API.
//!
//! # Running Tests
//!
//! ```bash
//! # Prepare the database
//! cargo run -p shopping-cart-cli -- migrate
//! cargo run -p shopping-cart-cli -- seed products --file seeds/products.yaml
//!
//! # Start the server
//! cargo run -p shopping-cart-api
//!
//! # Run the ignored tests
//! cargo test -p shopping-cart-integration-tests -- --ignored
//! ```
//!
//! `API_BASE_URL` overrides the default `http://localhost:8080`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

/// Password used for every account created by the tests.
pub const PASSWORD: &str = "password123";

/// Base URL of the running API server.
#[must_use]
pub fn base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string())
}

/// A username that no other test run has used.
#[must_use]
pub fn unique_username() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("it{}", suffix.get(..12).unwrap_or(&suffix))
}

/// HTTP client bound to one freshly signed-up customer.
pub struct TestCustomer {
    pub client: Client,
    pub username: String,
    pub email: String,
    pub token: String,
}

impl TestCustomer {
    /// Sign up a new customer and log in.
    ///
    /// # Panics
    ///
    /// Panics if signup or login does not succeed.
    pub async fn sign_up() -> Self {
        let client = Client::new();
        let username = unique_username();
        let email = format!("{username}@example.com");

        let resp = client
            .post(format!("{}/customers", base_url()))
            .json(&json!({ "username": username, "email": email, "password": PASSWORD }))
            .send()
            .await
            .expect("Failed to sign up");
        assert_eq!(resp.status(), StatusCode::CREATED);

        let token = login(&client, &username, PASSWORD)
            .await
            .expect("Failed to log in");

        Self {
            client,
            username,
            email,
            token,
        }
    }

    /// Request to `path` carrying this customer's bearer token.
    #[must_use]
    pub fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{path}", base_url()))
            .bearer_auth(&self.token)
    }
}

/// Log in and return the access token, or the failing status.
///
/// # Errors
///
/// Returns the response status when login is rejected.
///
/// # Panics
///
/// Panics if the server cannot be reached.
pub async fn login(client: &Client, username: &str, password: &str) -> Result<String, StatusCode> {
    let resp = client
        .post(format!("{}/auth/login", base_url()))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await
        .expect("Failed to log in");

    if resp.status() != StatusCode::OK {
        return Err(resp.status());
    }

    let body = json_body(resp).await;
    body["access_token"]
        .as_str()
        .map(String::from)
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Parse a response body as JSON.
///
/// # Panics
///
/// Panics if the body is not JSON.
pub async fn json_body(resp: Response) -> Value {
    resp.json().await.expect("Response body is not JSON")
}
