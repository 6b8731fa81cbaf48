use crate::state::AppState;
use axum::Router;

mod claims;
mod dto;
mod error;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod services;

pub use error::AuthError;
pub use extractors::{CurrentUser, MaybeUser};
pub use jwt::TokenKeys;

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
