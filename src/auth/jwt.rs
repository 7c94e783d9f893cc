use std::time::Duration;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::claims::{Claims, Role};
use crate::config::JwtConfig;
use crate::errors::ApiError;
use crate::state::AppState;

/// JWT signing and verification keys plus validation config.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig {
            secret,
            issuer,
            audience,
            ttl_minutes,
        } = state.config.jwt.clone();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            audience,
            ttl: Duration::from_secs((ttl_minutes as u64) * 60),
        }
    }
}

impl JwtKeys {
    pub fn sign(&self, customer_id: Uuid, roles: Vec<Role>) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            sub: customer_id,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            roles,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(customer_id = %customer_id, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(customer_id = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

/// The authenticated Customer, extracted from the `Authorization` header.
#[derive(Debug, Clone)]
pub struct AuthCustomer {
    pub id: Uuid,
    pub roles: Vec<Role>,
}

impl AuthCustomer {
    /// Route guard: rejects with 403 unless the customer carries `role`.
    pub fn require(&self, role: Role) -> Result<(), ApiError> {
        if self.roles.contains(&role) {
            Ok(())
        } else {
            warn!(customer_id = %self.id, role = role.as_str(), "insufficient role");
            Err(ApiError::Forbidden(format!(
                "role '{}' required",
                role.as_str()
            )))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthCustomer
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("missing Authorization header".into()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized("invalid Authorization header".into()))?;

        let claims = keys.verify(token).map_err(|_| {
            warn!("invalid or expired token");
            ApiError::Unauthorized("invalid or expired token".into())
        })?;

        Ok(AuthCustomer {
            id: claims.sub,
            roles: claims.roles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys() -> JwtKeys {
        let state = AppState::fake();
        JwtKeys::from_ref(&state)
    }

    #[tokio::test]
    async fn sign_and_verify_roundtrip() {
        let keys = make_keys();
        let customer_id = Uuid::new_v4();
        let token = keys
            .sign(customer_id, vec![Role::Client, Role::Admin])
            .expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, customer_id);
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
        assert_eq!(claims.roles, vec![Role::Client, Role::Admin]);
    }

    #[tokio::test]
    async fn verify_rejects_garbage_token() {
        let keys = make_keys();
        assert!(keys.verify("not.a.token").is_err());
    }

    #[test]
    fn require_passes_for_held_role() {
        let customer = AuthCustomer {
            id: Uuid::new_v4(),
            roles: vec![Role::Client],
        };
        assert!(customer.require(Role::Client).is_ok());
    }

    #[test]
    fn require_rejects_missing_role_with_403() {
        let customer = AuthCustomer {
            id: Uuid::new_v4(),
            roles: vec![Role::Client],
        };
        let err = customer.require(Role::Admin).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }
}
