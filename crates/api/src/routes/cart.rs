//! Cart route handlers.
//!
//! Every handler acts on the cart of the authenticated customer.

use axum::{extract::State, http::StatusCode};
use sqlx::PgPool;
use tracing::instrument;

use shopping_cart_core::CartItemId;

use crate::db::{CartItemRepository, ProductRepository};
use crate::dto::{
    AddCartItemRequest, AddedCartItem, CartItemResponse, ProductResponse, UpdateCartItemRequest,
};
use crate::error::Result;
use crate::extract::{Json, Path};
use crate::middleware::CurrentCustomer;
use crate::services::{CartService, ProductService};
use crate::state::AppState;

fn service(pool: &PgPool) -> CartService<CartItemRepository<'_>, ProductRepository<'_>> {
    CartService::new(CartItemRepository::new(pool), ProductRepository::new(pool))
}

/// GET /cart - List cart items.
#[instrument(skip_all)]
pub async fn list(
    State(state): State<AppState>,
    CurrentCustomer(customer): CurrentCustomer,
) -> Result<Json<Vec<CartItemResponse>>> {
    Ok(Json(service(state.pool()).list(&customer).await?))
}

/// POST /cart - Add a product to the cart.
#[instrument(skip_all)]
pub async fn add(
    State(state): State<AppState>,
    CurrentCustomer(customer): CurrentCustomer,
    Json(request): Json<AddCartItemRequest>,
) -> Result<(StatusCode, Json<AddedCartItem>)> {
    let id = service(state.pool()).add(&customer, &request).await?;
    Ok((StatusCode::CREATED, Json(AddedCartItem { id })))
}

/// PATCH /cart - Update quantity and checked state of a cart item.
#[instrument(skip_all)]
pub async fn update(
    State(state): State<AppState>,
    CurrentCustomer(customer): CurrentCustomer,
    Json(request): Json<UpdateCartItemRequest>,
) -> Result<StatusCode> {
    service(state.pool()).update(&customer, &request).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /cart/{id} - Remove a cart item.
#[instrument(skip_all, fields(cart_item_id = %id))]
pub async fn remove(
    State(state): State<AppState>,
    CurrentCustomer(customer): CurrentCustomer,
    Path(id): Path<CartItemId>,
) -> Result<StatusCode> {
    service(state.pool()).delete(&customer, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /cart/{id}/product - Product referenced by a cart item.
#[instrument(skip_all, fields(cart_item_id = %id))]
pub async fn product(
    State(state): State<AppState>,
    CurrentCustomer(customer): CurrentCustomer,
    Path(id): Path<CartItemId>,
) -> Result<Json<ProductResponse>> {
    let product_id = service(state.pool()).product_of(&customer, id).await?;
    let product = ProductService::new(ProductRepository::new(state.pool()))
        .find(product_id)
        .await?;
    Ok(Json(product))
}
