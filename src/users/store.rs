use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::User;

/// Fields needed to insert a user; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub hashed_password: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_superuser: bool,
}

/// Partial update. `None` leaves the column untouched; `full_name:
/// Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub hashed_password: Option<String>,
    pub full_name: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub is_superuser: Option<bool>,
}

impl UserChanges {
    pub fn touches_flags(&self) -> bool {
        self.is_active.is_some() || self.is_superuser.is_some()
    }
}

/// Failure of a user write. The email uniqueness check belongs to the store
/// so concurrent writers cannot both pass it.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("email already registered")]
    DuplicateEmail,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// User persistence as seen by the auth flow and the user endpoints.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    async fn list(&self, skip: i64, limit: i64) -> anyhow::Result<Vec<User>>;
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError>;
    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, StoreError>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<Option<User>>;
}
