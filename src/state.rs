use crate::auth::repo::{MemoryUserRepo, PgUserRepo, UserRepo};
use crate::config::AppConfig;
use crate::inventory::repo::{ItemRepo, MemoryItemRepo, PgItemRepo};
use crate::registry::repo::{MemoryNameRegistry, NameRegistry, PgNameRegistry};
use crate::registry::{DEFAULT_CATEGORIES, DEFAULT_LOCATIONS};
use crate::requests::repo::{MemoryRequestRepo, PgRequestRepo, RequestRepo};
use anyhow::Context;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepo>,
    pub items: Arc<dyn ItemRepo>,
    pub requests: Arc<dyn RequestRepo>,
    pub categories: Arc<dyn NameRegistry>,
    pub locations: Arc<dyn NameRegistry>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let config = Arc::new(config);

        let Some(database_url) = config.database_url.clone() else {
            tracing::warn!("DATABASE_URL not set; data lives in memory and is lost on restart");
            return Ok(Self::in_memory(config));
        };

        let db = sqlx::postgres::PgPoolOptions::new()
            .max_connections(10)
            .connect(&database_url)
            .await
            .context("connect to database")?;

        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .context("run migrations")?;

        Ok(Self {
            config,
            users: Arc::new(PgUserRepo::new(db.clone())),
            items: Arc::new(PgItemRepo::new(db.clone())),
            requests: Arc::new(PgRequestRepo::new(db.clone())),
            categories: Arc::new(PgNameRegistry::categories(db.clone())),
            locations: Arc::new(PgNameRegistry::locations(db)),
        })
    }

    pub fn in_memory(config: Arc<AppConfig>) -> Self {
        Self {
            config,
            users: Arc::new(MemoryUserRepo::default()),
            items: Arc::new(MemoryItemRepo::default()),
            requests: Arc::new(MemoryRequestRepo::default()),
            categories: Arc::new(MemoryNameRegistry::with_names(DEFAULT_CATEGORIES)),
            locations: Arc::new(MemoryNameRegistry::with_names(DEFAULT_LOCATIONS)),
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::config::{JwtConfig, ServerConfig};

        let config = Arc::new(AppConfig {
            database_url: None,
            jwt: JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 60 * 24 * 7,
            },
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 0,
                allowed_origins: Vec::new(),
            },
            seed: None,
        });
        Self::in_memory(config)
    }
}
