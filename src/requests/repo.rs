use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::requests::repo_types::{ItemRequest, ItemRequestRow, NewItemRequest, RequestStatus};

#[async_trait]
pub trait RequestRepo: Send + Sync {
    /// All requests, newest first.
    async fn list(&self) -> anyhow::Result<Vec<ItemRequest>>;

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<ItemRequest>>;

    /// Stores a new request with status Pending.
    async fn create(&self, req: NewItemRequest) -> anyhow::Result<ItemRequest>;

    /// Set `next` if the stored status is still `expected`.
    async fn set_status(
        &self,
        id: Uuid,
        expected: RequestStatus,
        next: RequestStatus,
    ) -> anyhow::Result<Option<ItemRequest>>;

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}

pub struct PgRequestRepo {
    db: PgPool,
}

impl PgRequestRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RequestRepo for PgRequestRepo {
    async fn list(&self) -> anyhow::Result<Vec<ItemRequest>> {
        let rows = sqlx::query_as::<_, ItemRequestRow>(
            r#"
            SELECT id, item_id, item_name, requested_by, status, notes, created_at, updated_at
            FROM item_requests
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        rows.into_iter().map(ItemRequest::try_from).collect()
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<ItemRequest>> {
        let row = sqlx::query_as::<_, ItemRequestRow>(
            r#"
            SELECT id, item_id, item_name, requested_by, status, notes, created_at, updated_at
            FROM item_requests
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        row.map(ItemRequest::try_from).transpose()
    }

    async fn create(&self, req: NewItemRequest) -> anyhow::Result<ItemRequest> {
        let row = sqlx::query_as::<_, ItemRequestRow>(
            r#"
            INSERT INTO item_requests (item_id, item_name, requested_by, notes, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, item_id, item_name, requested_by, status, notes, created_at, updated_at
            "#,
        )
        .bind(req.item_id)
        .bind(&req.item_name)
        .bind(&req.requested_by)
        .bind(&req.notes)
        .bind(RequestStatus::Pending.as_str())
        .fetch_one(&self.db)
        .await?;
        row.try_into()
    }

    async fn set_status(
        &self,
        id: Uuid,
        expected: RequestStatus,
        next: RequestStatus,
    ) -> anyhow::Result<Option<ItemRequest>> {
        let row = sqlx::query_as::<_, ItemRequestRow>(
            r#"
            UPDATE item_requests
               SET status = $3, updated_at = now()
             WHERE id = $1 AND status = $2
            RETURNING id, item_id, item_name, requested_by, status, notes, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(expected.as_str())
        .bind(next.as_str())
        .fetch_optional(&self.db)
        .await?;
        row.map(ItemRequest::try_from).transpose()
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM item_requests WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}

#[derive(Default)]
pub struct MemoryRequestRepo {
    requests: RwLock<Vec<ItemRequest>>,
}

#[async_trait]
impl RequestRepo for MemoryRequestRepo {
    async fn list(&self) -> anyhow::Result<Vec<ItemRequest>> {
        Ok(self.requests.read().await.iter().rev().cloned().collect())
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<ItemRequest>> {
        let requests = self.requests.read().await;
        Ok(requests.iter().find(|r| r.id == id).cloned())
    }

    async fn create(&self, req: NewItemRequest) -> anyhow::Result<ItemRequest> {
        let now = OffsetDateTime::now_utc();
        let request = ItemRequest {
            id: Uuid::new_v4(),
            item_id: req.item_id,
            item_name: req.item_name,
            requested_by: req.requested_by,
            status: RequestStatus::Pending,
            notes: req.notes,
            created_at: now,
            updated_at: now,
        };
        self.requests.write().await.push(request.clone());
        Ok(request)
    }

    async fn set_status(
        &self,
        id: Uuid,
        expected: RequestStatus,
        next: RequestStatus,
    ) -> anyhow::Result<Option<ItemRequest>> {
        let mut requests = self.requests.write().await;
        let Some(stored) = requests
            .iter_mut()
            .find(|r| r.id == id && r.status == expected)
        else {
            return Ok(None);
        };
        stored.status = next;
        stored.updated_at = OffsetDateTime::now_utc();
        Ok(Some(stored.clone()))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut requests = self.requests.write().await;
        let before = requests.len();
        requests.retain(|r| r.id != id);
        Ok(requests.len() < before)
    }
}
