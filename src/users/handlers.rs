use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::{
    dto::{PublicUser, UserCreate, UserUpdate},
    store::{NewUser, UserChanges, UserStore},
};
use crate::{
    auth::{
        password::hash_password,
        services::{ensure_owner_or_superuser, ensure_superuser, is_valid_email},
        AuthError, CurrentUser, MaybeUser,
    },
    error::AppError,
    pagination::Pagination,
    state::AppState,
};

const MIN_PASSWORD_LEN: usize = 8;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/me", get(read_me))
        .route(
            "/users/:user_id",
            get(read_user).put(update_user).delete(delete_user),
        )
}

fn check_email(email: &str) -> Result<(), AppError> {
    if !is_valid_email(email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::BadRequest("Invalid email".into()));
    }
    Ok(())
}

fn check_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(AppError::BadRequest("Password too short".into()));
    }
    Ok(())
}

#[instrument(skip(state, caller))]
pub async fn list_users(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<PublicUser>>, AppError> {
    ensure_superuser(&caller)?;
    let (skip, limit) = page.bounds();
    let users = state.users.list(skip, limit).await?;
    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}

/// Open registration. Anonymous callers always get an active, unprivileged
/// account; a superuser may set the flags.
#[instrument(skip(state, caller, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    MaybeUser(caller): MaybeUser,
    Json(payload): Json<UserCreate>,
) -> Result<Json<PublicUser>, AppError> {
    let email = payload.email.trim().to_string();
    check_email(&email)?;
    check_password(&payload.password)?;

    let privileged = caller.as_ref().is_some_and(|u| u.is_superuser);
    let (is_active, is_superuser) = if privileged {
        (payload.is_active, payload.is_superuser)
    } else {
        (true, false)
    };

    let hashed_password = hash_password(&payload.password)?;
    let user = state
        .users
        .create(NewUser {
            email,
            hashed_password,
            full_name: payload.full_name,
            is_active,
            is_superuser,
        })
        .await
        .inspect_err(|e| warn!(error = %e, "registration rejected"))?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(Json(user.into()))
}

#[instrument(skip(caller))]
pub async fn read_me(CurrentUser(caller): CurrentUser) -> Json<PublicUser> {
    Json(caller.into())
}

#[instrument(skip(state, caller))]
pub async fn read_user(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<PublicUser>, AppError> {
    ensure_owner_or_superuser(&caller, user_id)?;
    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, caller, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UserUpdate>,
) -> Result<Json<PublicUser>, AppError> {
    ensure_owner_or_superuser(&caller, user_id)?;

    let mut changes = UserChanges {
        email: None,
        hashed_password: None,
        full_name: payload.full_name,
        is_active: payload.is_active,
        is_superuser: payload.is_superuser,
    };
    if changes.touches_flags() && !caller.is_superuser {
        warn!(user_id = %caller.id, "non-superuser tried to change account flags");
        return Err(AuthError::Forbidden.into());
    }

    if let Some(email) = payload.email {
        let email = email.trim().to_string();
        check_email(&email)?;
        changes.email = Some(email);
    }
    if let Some(password) = payload.password {
        check_password(&password)?;
        changes.hashed_password = Some(hash_password(&password)?);
    }

    let user = state
        .users
        .update(user_id, changes)
        .await
        .inspect_err(|e| warn!(user_id = %user_id, error = %e, "user update rejected"))?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    info!(user_id = %user.id, by = %caller.id, "user updated");
    Ok(Json(user.into()))
}

#[instrument(skip(state, caller))]
pub async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<PublicUser>, AppError> {
    ensure_owner_or_superuser(&caller, user_id)?;
    let user = state
        .users
        .delete(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    info!(user_id = %user.id, by = %caller.id, "user deleted");
    Ok(Json(user.into()))
}
