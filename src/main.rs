use anyhow::Context;
use health_hub::api::routes::{create_routes, AppState};
use health_hub::config::{self, AppConfig, DatabaseConfig, ModelConfig, StorageConfig};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let app_config = AppConfig::from_env()?;
    let db_config = DatabaseConfig::from_env()?;
    let model_config = ModelConfig::from_env()?;
    let storage_config = StorageConfig::from_env()?;

    let pool = db_config
        .create_pool()
        .await
        .context("failed to open database")?;
    config::run_migrations(&pool)
        .await
        .context("failed to run database migrations")?;

    // Model and chart directory problems are startup-fatal; a process that
    // cannot classify must not accept requests.
    let state = AppState::build(pool, &app_config, &model_config, &storage_config).await?;
    let app = create_routes(state);

    let address = app_config.server_address();
    let listener = TcpListener::bind(&address).await?;
    info!("HealthHub server starting on http://{}", address);
    info!("Health check available at http://{}/health", address);

    axum::serve(listener, app).await?;

    Ok(())
}
