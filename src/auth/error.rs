use axum::http::StatusCode;
use thiserror::Error;

/// Outcomes of the authentication and authorization flow.
///
/// Messages are deliberately generic: callers learn which step failed,
/// never why (unknown email and wrong password look the same).
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("Could not validate credentials")]
    InvalidToken,

    #[error("User not found")]
    UserNotFound,

    #[error("Inactive user")]
    InactiveUser,

    #[error("Not enough permissions")]
    Forbidden,

    #[error("user store failure: {0}")]
    Store(#[source] anyhow::Error),
}

impl AuthError {
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::InvalidToken => "invalid_token",
            AuthError::UserNotFound => "user_not_found",
            AuthError::InactiveUser => "inactive_user",
            AuthError::Forbidden => "forbidden",
            AuthError::Store(_) => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials | AuthError::InactiveUser => StatusCode::BAD_REQUEST,
            AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
