use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    store::{ItemChanges, ItemStore, NewItem},
    Item,
};

/// In-process store backing `AppState::fake`.
#[derive(Default)]
pub struct MemoryItemStore {
    items: RwLock<HashMap<Uuid, Item>>,
}

impl MemoryItemStore {
    async fn page(&self, owner_id: Option<Uuid>, skip: i64, limit: i64) -> Vec<Item> {
        let mut items: Vec<Item> = self
            .items
            .read()
            .await
            .values()
            .filter(|i| owner_id.map_or(true, |o| i.owner_id == o))
            .cloned()
            .collect();
        items.sort_by_key(|i| (i.created_at, i.id));
        items
            .into_iter()
            .skip(skip.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect()
    }
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Item>> {
        Ok(self.items.read().await.get(&id).cloned())
    }

    async fn list_all(&self, skip: i64, limit: i64) -> anyhow::Result<Vec<Item>> {
        Ok(self.page(None, skip, limit).await)
    }

    async fn list_by_owner(
        &self,
        owner_id: Uuid,
        skip: i64,
        limit: i64,
    ) -> anyhow::Result<Vec<Item>> {
        Ok(self.page(Some(owner_id), skip, limit).await)
    }

    async fn create(&self, new_item: NewItem) -> anyhow::Result<Item> {
        let item = Item {
            id: Uuid::new_v4(),
            title: new_item.title,
            description: new_item.description,
            owner_id: new_item.owner_id,
            created_at: OffsetDateTime::now_utc(),
        };
        self.items.write().await.insert(item.id, item.clone());
        Ok(item)
    }

    async fn update(&self, id: Uuid, changes: ItemChanges) -> anyhow::Result<Option<Item>> {
        let mut items = self.items.write().await;
        let Some(item) = items.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = changes.title {
            item.title = title;
        }
        if let Some(description) = changes.description {
            item.description = description;
        }
        Ok(Some(item.clone()))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<Option<Item>> {
        Ok(self.items.write().await.remove(&id))
    }
}
