use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::store::{NewUser, StoreError, UserChanges, UserStore};

/// User record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub hashed_password: String, // argon2 PHC string, never exposed
    pub full_name: Option<String>,
    pub is_active: bool,
    pub is_superuser: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

const USER_COLUMNS: &str =
    "id, email, hashed_password, full_name, is_active, is_superuser, created_at";

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// `users.email` is the only unique column a write can collide on.
fn write_error(e: sqlx::Error, action: &'static str) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::DuplicateEmail,
        _ => StoreError::Other(anyhow::Error::new(e).context(action)),
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .context("find user by email")?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find user by id")?;
        Ok(user)
    }

    async fn list(&self, skip: i64, limit: i64) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC, id ASC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.db)
        .await
        .context("list users")?;
        Ok(users)
    }

    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, email, hashed_password, full_name, is_active, is_superuser)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&new_user.email)
        .bind(&new_user.hashed_password)
        .bind(&new_user.full_name)
        .bind(new_user.is_active)
        .bind(new_user.is_superuser)
        .fetch_one(&self.db)
        .await
        .map_err(|e| write_error(e, "insert user"))?;
        Ok(user)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, StoreError> {
        let set_full_name = changes.full_name.is_some();
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
               SET email           = COALESCE($2, email),
                   hashed_password = COALESCE($3, hashed_password),
                   full_name       = CASE WHEN $7 THEN $4 ELSE full_name END,
                   is_active       = COALESCE($5, is_active),
                   is_superuser    = COALESCE($6, is_superuser)
             WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.email)
        .bind(changes.hashed_password)
        .bind(changes.full_name.flatten())
        .bind(changes.is_active)
        .bind(changes.is_superuser)
        .bind(set_full_name)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| write_error(e, "update user"))?;
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "DELETE FROM users WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("delete user")?;
        Ok(user)
    }
}
