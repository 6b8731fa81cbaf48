use crate::state::AppState;
use axum::Router;

mod dto;
pub mod handlers;
#[cfg(test)]
pub(crate) mod memory;
mod repo;
pub mod store;

pub use repo::{Item, PgItemStore};

pub fn router() -> Router<AppState> {
    handlers::item_routes()
}
