use anyhow::Result;
use axum::{
    extract::FromRef,
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::Key;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::warn;

use super::auth::{login, logout, register};
use super::health::health_check;
use super::pages::{dashboard, index, login_page, register_page};
use super::predict::predict_health;
use crate::config::{AppConfig, ModelConfig, StorageConfig};
use crate::services::{
    ArchiveService, ChartService, RiskModelService, SubmissionService, UserService,
};

#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub submissions: SubmissionService,
    pub model: Arc<RiskModelService>,
    pub charts: ChartService,
    pub archive: Option<Arc<ArchiveService>>,
    pub cookie_key: Key,
}

// Lets SignedCookieJar pull its signing key out of the router state.
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Key {
        state.cookie_key.clone()
    }
}

impl AppState {
    /// Assemble all services. Model loading and chart-directory creation
    /// are fatal here so a broken deployment never starts serving.
    pub async fn build(
        db: SqlitePool,
        app_config: &AppConfig,
        model_config: &ModelConfig,
        storage_config: &StorageConfig,
    ) -> Result<Self> {
        let model = RiskModelService::load(&model_config.path)?;

        let charts = ChartService::new(&storage_config.static_dir);
        charts.ensure_dir()?;

        let archive = match &storage_config.bucket {
            Some(bucket) => {
                let aws_config =
                    aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
                let client = aws_sdk_s3::Client::new(&aws_config);
                Some(Arc::new(ArchiveService::new(client, bucket.clone())))
            }
            None => {
                warn!("S3_BUCKET is not set; remote archival is disabled");
                None
            }
        };

        Ok(Self {
            users: UserService::new(db.clone()),
            submissions: SubmissionService::new(db),
            model: Arc::new(model),
            charts,
            archive,
            cookie_key: Key::derive_from(app_config.session_secret.as_bytes()),
        })
    }
}

pub fn create_routes(state: AppState) -> Router {
    let static_dir = state.charts.static_dir().to_path_buf();

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/dashboard", get(dashboard))
        .route("/predict", post(predict_health))
        .route("/login", get(login_page).post(login))
        .route("/register", get(register_page).post(register))
        .route("/logout", post(logout))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
