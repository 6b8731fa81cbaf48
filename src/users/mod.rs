use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
#[cfg(test)]
pub(crate) mod memory;
mod repo;
pub mod store;

pub use repo::{PgUserStore, User};

pub fn router() -> Router<AppState> {
    handlers::user_routes()
}
