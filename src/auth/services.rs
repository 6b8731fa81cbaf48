use lazy_static::lazy_static;
use regex::Regex;
use tracing::{instrument, warn};
use uuid::Uuid;

use super::{jwt::TokenKeys, password, AuthError};
use crate::users::{store::UserStore, User};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Credential check for the login endpoint.
///
/// Unknown email and wrong password both yield
/// [`AuthError::InvalidCredentials`]. The active flag is only consulted
/// after the password matched, so [`AuthError::InactiveUser`] never tells
/// an anonymous caller that an address is registered.
#[instrument(skip(store, plain_password))]
pub async fn authenticate(
    store: &dyn UserStore,
    email: &str,
    plain_password: &str,
) -> Result<User, AuthError> {
    let Some(user) = store.find_by_email(email).await.map_err(AuthError::Store)? else {
        password::burn_verification(plain_password);
        warn!("login unknown email");
        return Err(AuthError::InvalidCredentials);
    };

    let ok = password::verify_password(plain_password, &user.hashed_password).map_err(|e| {
        warn!(user_id = %user.id, error = %e, "stored hash unreadable");
        AuthError::InvalidCredentials
    })?;
    if !ok {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AuthError::InvalidCredentials);
    }

    if !user.is_active {
        warn!(user_id = %user.id, "login inactive user");
        return Err(AuthError::InactiveUser);
    }
    Ok(user)
}

/// Resolves a bearer token to its user without looking at the active flag.
pub async fn current_user(
    keys: &TokenKeys,
    store: &dyn UserStore,
    token: &str,
) -> Result<User, AuthError> {
    let user_id = keys.verify(token)?;
    match store.find_by_id(user_id).await.map_err(AuthError::Store)? {
        Some(user) => Ok(user),
        None => {
            warn!(user_id = %user_id, "token subject no longer exists");
            Err(AuthError::UserNotFound)
        }
    }
}

/// The access guard: valid token, existing user, active account.
pub async fn require_active_user(
    keys: &TokenKeys,
    store: &dyn UserStore,
    token: &str,
) -> Result<User, AuthError> {
    let user = current_user(keys, store, token).await?;
    if !user.is_active {
        warn!(user_id = %user.id, "inactive user presented a token");
        return Err(AuthError::InactiveUser);
    }
    Ok(user)
}

pub fn ensure_owner_or_superuser(user: &User, owner_id: Uuid) -> Result<(), AuthError> {
    if user.is_superuser || user.id == owner_id {
        Ok(())
    } else {
        warn!(user_id = %user.id, owner_id = %owner_id, "access to foreign resource denied");
        Err(AuthError::Forbidden)
    }
}

pub fn ensure_superuser(user: &User) -> Result<(), AuthError> {
    if user.is_superuser {
        Ok(())
    } else {
        warn!(user_id = %user.id, "superuser required");
        Err(AuthError::Forbidden)
    }
}
