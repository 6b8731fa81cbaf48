use async_trait::async_trait;
use uuid::Uuid;

use super::Item;

#[derive(Debug, Clone)]
pub struct NewItem {
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
}

/// Partial update. `description: Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct ItemChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
}

/// Item persistence behind the item endpoints.
#[async_trait]
pub trait ItemStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Item>>;
    async fn list_all(&self, skip: i64, limit: i64) -> anyhow::Result<Vec<Item>>;
    async fn list_by_owner(&self, owner_id: Uuid, skip: i64, limit: i64)
        -> anyhow::Result<Vec<Item>>;
    async fn create(&self, new_item: NewItem) -> anyhow::Result<Item>;
    async fn update(&self, id: Uuid, changes: ItemChanges) -> anyhow::Result<Option<Item>>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<Option<Item>>;
}
