use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use super::tokens;
use crate::{error::AppError, state::AppState};

/// Raw bearer token as presented, without database resolution.
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or(AppError::Unauthorized)?;

        Ok(BearerToken(token.to_string()))
    }
}

/// Authenticated user id, resolved by looking the bearer token up in
/// `auth_tokens`. Protected handlers take this as an argument.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;
        let app = AppState::from_ref(state);

        let user_id = tokens::resolve(&app.db, &token).await?.ok_or_else(|| {
            warn!("invalid or revoked token");
            AppError::Unauthorized
        })?;

        Ok(AuthUser(user_id))
    }
}
