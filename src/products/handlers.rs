use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::Value;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::{claims::Role, jwt::AuthCustomer},
    cache::{self, PRODUCTS_TAG},
    errors::ApiError,
    pagination::Pagination,
    state::AppState,
};

use super::dto::ProductBody;
use super::repo::Product;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/products/:id", get(get_product))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/products", post(create_product))
        .route("/products/:id", put(update_product).delete(delete_product))
}

#[instrument(skip(state, auth))]
pub async fn list_products(
    State(state): State<AppState>,
    auth: AuthCustomer,
    Query(p): Query<Pagination>,
) -> Result<Json<Value>, ApiError> {
    auth.require(Role::Client)?;

    let key = cache::list_key("getAllProducts", p.page(), p.limit());
    let db = state.db.clone();
    let value = state
        .cache
        .get_or_compute(&key, PRODUCTS_TAG, || async move {
            let products = Product::list(&db, p.limit(), p.offset()).await?;
            Ok(serde_json::to_value(products)?)
        })
        .await?;

    Ok(Json(value))
}

#[instrument(skip(state, auth))]
pub async fn get_product(
    State(state): State<AppState>,
    auth: AuthCustomer,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, ApiError> {
    auth.require(Role::Client)?;

    let product = Product::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("product not found"))?;
    Ok(Json(product))
}

#[instrument(skip(state, auth, body))]
pub async fn create_product(
    State(state): State<AppState>,
    auth: AuthCustomer,
    Json(body): Json<ProductBody>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<Product>), ApiError> {
    auth.require(Role::Admin)?;

    let errors = body.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let product = Product::create(
        &state.db,
        body.name.trim(),
        body.price,
        body.description.as_deref(),
        body.brand.trim(),
    )
    .await?;

    state.cache.invalidate_tag(PRODUCTS_TAG).await;
    info!(product_id = %product.id, "product created");

    let location = format!("/api/products/{}", product.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(product),
    ))
}

#[instrument(skip(state, auth, body))]
pub async fn update_product(
    State(state): State<AppState>,
    auth: AuthCustomer,
    Path(id): Path<Uuid>,
    Json(body): Json<ProductBody>,
) -> Result<Json<Product>, ApiError> {
    auth.require(Role::Admin)?;

    Product::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("product not found"))?;

    let errors = body.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let product = Product::update(
        &state.db,
        id,
        body.name.trim(),
        body.price,
        body.description.as_deref(),
        body.brand.trim(),
    )
    .await?;

    state.cache.invalidate_tag(PRODUCTS_TAG).await;
    info!(product_id = %product.id, "product updated");
    Ok(Json(product))
}

#[instrument(skip(state, auth))]
pub async fn delete_product(
    State(state): State<AppState>,
    auth: AuthCustomer,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    auth.require(Role::Admin)?;

    if !Product::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("product not found"));
    }

    state.cache.invalidate_tag(PRODUCTS_TAG).await;
    info!(product_id = %id, "product deleted");
    Ok(StatusCode::NO_CONTENT)
}
