use crate::auth::TokenKeys;
use crate::config::AppConfig;
use crate::db;
use crate::items::{store::ItemStore, PgItemStore};
use crate::users::{store::UserStore, PgUserStore};
use axum::extract::FromRef;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub items: Arc<dyn ItemStore>,
    pub tokens: TokenKeys,
}

impl FromRef<AppState> for TokenKeys {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = db::connect(&config.database_url).await?;
        let users = Arc::new(PgUserStore::new(db.clone())) as Arc<dyn UserStore>;
        let items = Arc::new(PgItemStore::new(db.clone())) as Arc<dyn ItemStore>;
        Ok(Self::from_parts(db, config, users, items))
    }

    pub fn from_parts(
        db: PgPool,
        config: Arc<AppConfig>,
        users: Arc<dyn UserStore>,
        items: Arc<dyn ItemStore>,
    ) -> Self {
        let tokens = TokenKeys::new(&config.jwt);
        Self {
            db,
            config,
            users,
            items,
            tokens,
        }
    }
}

#[cfg(test)]
pub(crate) struct FakeStores {
    pub users: Arc<crate::users::memory::MemoryUserStore>,
    pub items: Arc<crate::items::memory::MemoryItemStore>,
}

#[cfg(test)]
impl AppState {
    pub fn fake() -> Self {
        Self::fake_with_stores().0
    }

    pub fn fake_with_store() -> (Self, Arc<crate::users::memory::MemoryUserStore>) {
        let (state, stores) = Self::fake_with_stores();
        (state, stores.users)
    }

    /// Lazy pool that never connects, plus in-memory stores the test can
    /// poke at directly.
    pub(crate) fn fake_with_stores() -> (Self, FakeStores) {
        let config = Arc::new(AppConfig::for_tests());
        let db = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .expect("lazy pool ok");
        let stores = FakeStores {
            users: Arc::new(crate::users::memory::MemoryUserStore::default()),
            items: Arc::new(crate::items::memory::MemoryItemStore::default()),
        };
        let users = stores.users.clone() as Arc<dyn UserStore>;
        let items = stores.items.clone() as Arc<dyn ItemStore>;
        (Self::from_parts(db, config, users, items), stores)
    }
}
