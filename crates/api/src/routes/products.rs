//! Product route handlers.

use axum::extract::State;
use tracing::instrument;

use shopping_cart_core::ProductId;

use crate::db::ProductRepository;
use crate::dto::{PageQuery, ProductPage, ProductResponse};
use crate::error::Result;
use crate::extract::{Json, Path, Query};
use crate::services::ProductService;
use crate::state::AppState;

/// GET /products - Product listing.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ProductPage>> {
    let page = ProductService::new(ProductRepository::new(state.pool()))
        .page(query.size, query.page)
        .await?;
    Ok(Json(page))
}

/// GET /products/{id} - Product detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductResponse>> {
    let product = ProductService::new(ProductRepository::new(state.pool()))
        .find(id)
        .await?;
    Ok(Json(product))
}
