//! Authentication route handlers.

use axum::extract::State;
use tracing::instrument;

use crate::db::CustomerRepository;
use crate::dto::{LoginRequest, TokenResponse};
use crate::error::Result;
use crate::extract::Json;
use crate::services::AuthService;
use crate::state::AppState;

/// POST /auth/login - Exchange username and password for a bearer token.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    let response = AuthService::new(CustomerRepository::new(state.pool()), state.tokens())
        .login(&request)
        .await?;

    Ok(Json(response))
}
