use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::inventory::repo_types::{InventoryItem, InventoryItemRow, ItemStatus, NewItem};

const COLUMNS: &str =
    "id, name, category, location, status, icon, description, quantity, created_at, updated_at";

#[async_trait]
pub trait ItemRepo: Send + Sync {
    /// All items, newest first.
    async fn list(&self) -> anyhow::Result<Vec<InventoryItem>>;

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<InventoryItem>>;

    async fn create(&self, item: NewItem) -> anyhow::Result<InventoryItem>;

    /// Replace the stored document with `item`, provided the stored status is
    /// still `expected`. Returns `None` when the row is gone or its status moved.
    async fn replace(
        &self,
        item: &InventoryItem,
        expected: ItemStatus,
    ) -> anyhow::Result<Option<InventoryItem>>;

    /// Returns `false` when nothing was deleted.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}

pub struct PgItemRepo {
    db: PgPool,
}

impl PgItemRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ItemRepo for PgItemRepo {
    async fn list(&self) -> anyhow::Result<Vec<InventoryItem>> {
        let rows = sqlx::query_as::<_, InventoryItemRow>(&format!(
            "SELECT {COLUMNS} FROM inventory_items ORDER BY created_at DESC"
        ))
        .fetch_all(&self.db)
        .await?;
        rows.into_iter().map(InventoryItem::try_from).collect()
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<InventoryItem>> {
        let row = sqlx::query_as::<_, InventoryItemRow>(&format!(
            "SELECT {COLUMNS} FROM inventory_items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        row.map(InventoryItem::try_from).transpose()
    }

    async fn create(&self, item: NewItem) -> anyhow::Result<InventoryItem> {
        let row = sqlx::query_as::<_, InventoryItemRow>(&format!(
            r#"
            INSERT INTO inventory_items (name, category, location, status, icon, description, quantity)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&item.name)
        .bind(&item.category)
        .bind(&item.location)
        .bind(item.status.as_str())
        .bind(&item.icon)
        .bind(&item.description)
        .bind(item.quantity)
        .fetch_one(&self.db)
        .await?;
        row.try_into()
    }

    async fn replace(
        &self,
        item: &InventoryItem,
        expected: ItemStatus,
    ) -> anyhow::Result<Option<InventoryItem>> {
        let row = sqlx::query_as::<_, InventoryItemRow>(&format!(
            r#"
            UPDATE inventory_items
               SET name = $2, category = $3, location = $4, status = $5,
                   icon = $6, description = $7, quantity = $8, updated_at = now()
             WHERE id = $1 AND status = $9
            RETURNING {COLUMNS}
            "#
        ))
        .bind(item.id)
        .bind(&item.name)
        .bind(&item.category)
        .bind(&item.location)
        .bind(item.status.as_str())
        .bind(&item.icon)
        .bind(&item.description)
        .bind(item.quantity)
        .bind(expected.as_str())
        .fetch_optional(&self.db)
        .await?;
        row.map(InventoryItem::try_from).transpose()
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM inventory_items WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}

/// Items kept in insertion order; listing walks it backwards.
#[derive(Default)]
pub struct MemoryItemRepo {
    items: RwLock<Vec<InventoryItem>>,
}

#[async_trait]
impl ItemRepo for MemoryItemRepo {
    async fn list(&self) -> anyhow::Result<Vec<InventoryItem>> {
        let items = self.items.read().await;
        Ok(items.iter().rev().cloned().collect())
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<InventoryItem>> {
        let items = self.items.read().await;
        Ok(items.iter().find(|i| i.id == id).cloned())
    }

    async fn create(&self, item: NewItem) -> anyhow::Result<InventoryItem> {
        let now = OffsetDateTime::now_utc();
        let item = InventoryItem {
            id: Uuid::new_v4(),
            name: item.name,
            category: item.category,
            location: item.location,
            status: item.status,
            icon: item.icon,
            description: item.description,
            quantity: item.quantity,
            created_at: now,
            updated_at: now,
        };
        self.items.write().await.push(item.clone());
        Ok(item)
    }

    async fn replace(
        &self,
        item: &InventoryItem,
        expected: ItemStatus,
    ) -> anyhow::Result<Option<InventoryItem>> {
        let mut items = self.items.write().await;
        let Some(stored) = items
            .iter_mut()
            .find(|i| i.id == item.id && i.status == expected)
        else {
            return Ok(None);
        };
        *stored = InventoryItem {
            created_at: stored.created_at,
            updated_at: OffsetDateTime::now_utc(),
            ..item.clone()
        };
        Ok(Some(stored.clone()))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut items = self.items.write().await;
        let before = items.len();
        items.retain(|i| i.id != id);
        Ok(items.len() < before)
    }
}
