//! Bearer-token authentication. Tokens are issued by the external identity
//! provider; this service only verifies them.

use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// The caller, resolved from `Authorization: Bearer <jwt>`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

pub fn verify_token(secret: &str, token: &str) -> Result<Claims, AppError> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|e| {
        warn!(error = %e, "JWT token validation failed");
        AppError::Unauthorized
    })?;

    if decoded.claims.sub.trim().is_empty() {
        warn!("JWT token has an empty subject");
        return Err(AppError::Unauthorized);
    }
    Ok(decoded.claims)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| {
                warn!("Authentication failed: missing Authorization header");
                AppError::Unauthorized
            })?;

        let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();
        let claims = verify_token(&app_state.config.auth_jwt_secret, token)?;

        debug!(user_id = %claims.sub, "Request authenticated");
        Ok(AuthUser {
            user_id: claims.sub,
        })
    }
}
