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
    auth::{claims::Role, jwt::AuthCustomer, password::hash_password},
    cache::USERS_TAG,
    errors::{unique_violation, ApiError, FieldError},
    pagination::Pagination,
    state::AppState,
};

use super::dto::{CreateUserRequest, UpdateUserRequest};
use super::repo::User;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:id", get(get_user))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/:id", put(update_user).delete(delete_user))
}

/// Cache key for a customer's user pages. Scoped by customer id so one
/// customer's cached page can never be served to another.
fn users_list_key(customer_id: Uuid, page: i64, limit: i64) -> String {
    format!("getAllUsers-{customer_id}-{page}-{limit}")
}

fn map_unique(e: sqlx::Error) -> ApiError {
    let field = match unique_violation(&e) {
        Some(c) if c.contains("username") => Some("username"),
        Some(c) if c.contains("email") => Some("email"),
        _ => None,
    };
    match field {
        Some(field) => ApiError::Validation(vec![FieldError::new(field, "already in use")]),
        None => e.into(),
    }
}

#[instrument(skip(state, auth))]
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthCustomer,
    Query(p): Query<Pagination>,
) -> Result<Json<Value>, ApiError> {
    auth.require(Role::Client)?;

    let key = users_list_key(auth.id, p.page(), p.limit());
    let db = state.db.clone();
    let customer_id = auth.id;
    let value = state
        .cache
        .get_or_compute(&key, USERS_TAG, || async move {
            let users = User::list_by_customer(&db, customer_id, p.limit(), p.offset()).await?;
            Ok(serde_json::to_value(users)?)
        })
        .await?;

    Ok(Json(value))
}

#[instrument(skip(state, auth))]
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthCustomer,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
    auth.require(Role::Client)?;

    let user = User::find_owned(&state.db, auth.id, id)
        .await?
        .ok_or(ApiError::NotFound("user not found"))?;
    Ok(Json(user))
}

#[instrument(skip(state, auth, body))]
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthCustomer,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<User>), ApiError> {
    auth.require(Role::Client)?;

    let errors = body.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let hash = hash_password(&body.password)?;
    let user = User::create(
        &state.db,
        auth.id,
        body.username.trim(),
        body.email.trim(),
        &hash,
    )
    .await
    .map_err(map_unique)?;

    state.cache.invalidate_tag(USERS_TAG).await;
    info!(user_id = %user.id, customer_id = %auth.id, "user created");

    let location = format!("/api/users/{}", user.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(user)))
}

#[instrument(skip(state, auth, body))]
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthCustomer,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    auth.require(Role::Client)?;

    let existing = User::find_owned(&state.db, auth.id, id)
        .await?
        .ok_or(ApiError::NotFound("user not found"))?;

    let errors = body.validate();
    if !errors.is_empty() {
        return Err(ApiError::Validation(errors));
    }

    let username = body.username.as_deref().unwrap_or(&existing.username);
    let email = body.email.as_deref().unwrap_or(&existing.email);
    // Only a supplied password is new plaintext; otherwise keep the old hash.
    let password_hash = match &body.password {
        Some(plain) => hash_password(plain)?,
        None => existing.password_hash.clone(),
    };

    let user = User::update(
        &state.db,
        auth.id,
        id,
        username.trim(),
        email.trim(),
        &password_hash,
    )
    .await
    .map_err(map_unique)?;

    state.cache.invalidate_tag(USERS_TAG).await;
    info!(user_id = %user.id, customer_id = %auth.id, "user updated");
    Ok(Json(user))
}

#[instrument(skip(state, auth))]
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthCustomer,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    auth.require(Role::Client)?;

    if !User::delete_owned(&state.db, auth.id, id).await? {
        return Err(ApiError::NotFound("user not found"));
    }

    state.cache.invalidate_tag(USERS_TAG).await;
    info!(user_id = %id, customer_id = %auth.id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}
