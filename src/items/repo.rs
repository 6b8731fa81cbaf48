use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::store::{ItemChanges, ItemStore, NewItem};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Item {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub owner_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Clone)]
pub struct PgItemStore {
    db: PgPool,
}

impl PgItemStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ItemStore for PgItemStore {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, title, description, owner_id, created_at
            FROM items
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find item")?;
        Ok(item)
    }

    async fn list_all(&self, skip: i64, limit: i64) -> anyhow::Result<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, title, description, owner_id, created_at
            FROM items
            ORDER BY created_at ASC, id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.db)
        .await
        .context("list items")?;
        Ok(items)
    }

    async fn list_by_owner(
        &self,
        owner_id: Uuid,
        skip: i64,
        limit: i64,
    ) -> anyhow::Result<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, title, description, owner_id, created_at
            FROM items
            WHERE owner_id = $1
            ORDER BY created_at ASC, id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(owner_id)
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.db)
        .await
        .context("list items by owner")?;
        Ok(items)
    }

    async fn create(&self, new_item: NewItem) -> anyhow::Result<Item> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items (id, title, description, owner_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, owner_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_item.title)
        .bind(&new_item.description)
        .bind(new_item.owner_id)
        .fetch_one(&self.db)
        .await
        .context("insert item")?;
        Ok(item)
    }

    async fn update(&self, id: Uuid, changes: ItemChanges) -> anyhow::Result<Option<Item>> {
        let set_description = changes.description.is_some();
        let item = sqlx::query_as::<_, Item>(
            r#"
            UPDATE items
               SET title       = COALESCE($2, title),
                   description = CASE WHEN $4 THEN $3 ELSE description END
             WHERE id = $1
            RETURNING id, title, description, owner_id, created_at
            "#,
        )
        .bind(id)
        .bind(changes.title)
        .bind(changes.description.flatten())
        .bind(set_description)
        .fetch_optional(&self.db)
        .await
        .context("update item")?;
        Ok(item)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            DELETE FROM items
            WHERE id = $1
            RETURNING id, title, description, owner_id, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("delete item")?;
        Ok(item)
    }
}
