use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use super::{services, AuthError};
use crate::{error::AppError, state::AppState, users::User};

/// The authenticated, active user behind the request's bearer token.
pub struct CurrentUser(pub User);

pub(crate) fn bearer_token(parts: &Parts) -> Option<&str> {
    let auth = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())?;
    auth.strip_prefix("Bearer ")
        .or_else(|| auth.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(|| {
            tracing::warn!("missing or malformed Authorization header");
            AuthError::InvalidToken
        })?;
        let user = services::require_active_user(&state.tokens, state.users.as_ref(), token).await?;
        Ok(CurrentUser(user))
    }
}

/// Caller of an endpoint that also serves anonymous requests. Only a
/// missing `Authorization` header means anonymous; a header that is present
/// goes through the full guard and its failure rejects the request.
pub struct MaybeUser(pub Option<User>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key(axum::http::header::AUTHORIZATION) {
            return Ok(MaybeUser(None));
        }
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        Ok(MaybeUser(Some(user)))
    }
}
