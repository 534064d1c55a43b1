//! Customer account route handlers.

use axum::{extract::State, http::StatusCode};
use sqlx::PgPool;
use tracing::instrument;

use crate::db::CustomerRepository;
use crate::dto::{
    ChangePasswordRequest, CustomerResponse, DeleteCustomerRequest, SignUpRequest, SignUpResponse,
};
use crate::error::Result;
use crate::extract::Json;
use crate::middleware::CurrentCustomer;
use crate::services::CustomerService;
use crate::state::AppState;

fn service(pool: &PgPool) -> CustomerService<CustomerRepository<'_>> {
    CustomerService::new(CustomerRepository::new(pool))
}

/// POST /customers - Sign up.
#[instrument(skip_all)]
pub async fn sign_up(
    State(state): State<AppState>,
    Json(request): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<SignUpResponse>)> {
    let response = service(state.pool()).sign_up(&request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /customers/me - Profile of the authenticated customer.
#[instrument(skip_all)]
pub async fn me(
    State(state): State<AppState>,
    CurrentCustomer(customer): CurrentCustomer,
) -> Json<CustomerResponse> {
    Json(service(state.pool()).find_customer(&customer))
}

/// PATCH /customers/me/password - Change password.
#[instrument(skip_all)]
pub async fn change_password(
    State(state): State<AppState>,
    CurrentCustomer(customer): CurrentCustomer,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<StatusCode> {
    service(state.pool())
        .change_password(&customer, &request)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /customers/me - Delete the account and its cart.
#[instrument(skip_all)]
pub async fn delete(
    State(state): State<AppState>,
    CurrentCustomer(customer): CurrentCustomer,
    Json(request): Json<DeleteCustomerRequest>,
) -> Result<StatusCode> {
    service(state.pool())
        .delete_customer(&customer, &request)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
