use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::Mutex;

/// A flat, deduplicated list of names (categories or locations).
#[async_trait]
pub trait NameRegistry: Send + Sync {
    /// Names in insertion order.
    async fn list(&self) -> anyhow::Result<Vec<String>>;

    /// Returns `false` when the name already exists.
    async fn add(&self, name: &str) -> anyhow::Result<bool>;

    /// Returns `false` when the name was not present.
    async fn remove(&self, name: &str) -> anyhow::Result<bool>;
}

/// Registry backed by a `(id BIGSERIAL, name TEXT UNIQUE)` table.
pub struct PgNameRegistry {
    db: PgPool,
    table: &'static str,
}

impl PgNameRegistry {
    pub fn categories(db: PgPool) -> Self {
        Self { db, table: "categories" }
    }

    pub fn locations(db: PgPool) -> Self {
        Self { db, table: "locations" }
    }
}

#[async_trait]
impl NameRegistry for PgNameRegistry {
    async fn list(&self) -> anyhow::Result<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>(&format!(
            "SELECT name FROM {} ORDER BY id ASC",
            self.table
        ))
        .fetch_all(&self.db)
        .await?;
        Ok(names)
    }

    async fn add(&self, name: &str) -> anyhow::Result<bool> {
        let res = sqlx::query(&format!(
            "INSERT INTO {} (name) VALUES ($1) ON CONFLICT (name) DO NOTHING",
            self.table
        ))
        .bind(name)
        .execute(&self.db)
        .await?;
        Ok(res.rows_affected() == 1)
    }

    async fn remove(&self, name: &str) -> anyhow::Result<bool> {
        let res = sqlx::query(&format!("DELETE FROM {} WHERE name = $1", self.table))
            .bind(name)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}

/// In-process registry; the lock covers the duplicate check and the insert.
pub struct MemoryNameRegistry {
    names: Mutex<Vec<String>>,
}

impl MemoryNameRegistry {
    pub fn with_names(names: &[&str]) -> Self {
        Self {
            names: Mutex::new(names.iter().map(|n| n.to_string()).collect()),
        }
    }
}

#[async_trait]
impl NameRegistry for MemoryNameRegistry {
    async fn list(&self) -> anyhow::Result<Vec<String>> {
        Ok(self.names.lock().await.clone())
    }

    async fn add(&self, name: &str) -> anyhow::Result<bool> {
        let mut names = self.names.lock().await;
        if names.iter().any(|n| n == name) {
            return Ok(false);
        }
        names.push(name.to_string());
        Ok(true)
    }

    async fn remove(&self, name: &str) -> anyhow::Result<bool> {
        let mut names = self.names.lock().await;
        match names.iter().position(|n| n == name) {
            Some(idx) => {
                names.remove(idx);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
