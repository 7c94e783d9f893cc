use axum::{
    extract::{FromRef, State},
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        claims::Role,
        dto::{AuthResponse, LoginRequest, PublicCustomer},
        is_valid_email,
        jwt::JwtKeys,
        password::verify_password,
        repo::Customer,
    },
    errors::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Unauthorized("invalid credentials".into()));
    }

    let customer = match Customer::find_by_email(&state.db, &payload.email).await? {
        Some(c) => c,
        None => {
            warn!(email = %payload.email, "login unknown email");
            return Err(ApiError::Unauthorized("invalid credentials".into()));
        }
    };

    if !verify_password(&payload.password, &customer.password_hash)? {
        warn!(email = %payload.email, customer_id = %customer.id, "login invalid password");
        return Err(ApiError::Unauthorized("invalid credentials".into()));
    }

    let roles: Vec<Role> = customer
        .roles
        .iter()
        .filter_map(|r| Role::parse(r))
        .collect();

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(customer.id, roles)?;

    info!(customer_id = %customer.id, email = %customer.email, "customer logged in");
    Ok(Json(AuthResponse {
        token,
        customer: PublicCustomer {
            id: customer.id,
            email: customer.email,
            name: customer.name,
        },
    }))
}
