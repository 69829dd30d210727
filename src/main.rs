mod app;
mod auth;
mod config;
mod error;
mod extract;
mod inventory;
mod registry;
mod requests;
mod seed;
mod state;
#[cfg(test)]
mod test_support;

use crate::config::AppConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "school_inventory=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    let server = config.server.clone();
    let seed_config = config.seed.clone();
    let app_state = AppState::init(config).await?;

    if let Some(seed_config) = seed_config {
        seed::run(&app_state, &seed_config).await?;
    }

    let app = app::build_app(app_state);
    app::serve(app, &server).await
}
