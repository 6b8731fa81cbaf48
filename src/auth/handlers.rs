use axum::{
    extract::State,
    routing::post,
    Form, Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::{
        dto::{LoginForm, TokenResponse},
        jwt::TokenKeys,
        services::authenticate,
    },
    error::AppError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/login/access-token", post(login_access_token))
}

/// OAuth2-compatible password login, returns a bearer token for later requests.
#[instrument(skip(state, keys, form))]
pub async fn login_access_token(
    State(state): State<AppState>,
    State(keys): State<TokenKeys>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, AppError> {
    let email = form.username.trim();
    let user = authenticate(state.users.as_ref(), email, &form.password).await?;

    let access_token = keys.issue(user.id)?;
    info!(user_id = %user.id, "user logged in");
    Ok(Json(TokenResponse::bearer(access_token)))
}
