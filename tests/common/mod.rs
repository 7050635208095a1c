use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::Router;
use axum_extra::extract::cookie::Key;
use health_hub::api::routes::{create_routes, AppState};
use health_hub::services::{ChartService, RiskModelService, SubmissionService, UserService};
use http_body_util::BodyExt;
use linfa::prelude::*;
use linfa_trees::DecisionTree;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;
use tempfile::TempDir;

pub async fn test_pool() -> SqlitePool {
    // A single connection keeps the in-memory database alive and shared.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    pool
}

/// Train a tree whose every leaf is the given class, making the pipeline's
/// classifier output deterministic.
pub fn constant_model(class: usize) -> DecisionTree<f64, usize> {
    let records = ndarray::arr2(&[
        [20.0, 110.0, 70.0, 90.0, 97.0, 65.0],
        [45.0, 130.0, 85.0, 120.0, 98.0, 78.0],
        [60.0, 150.0, 95.0, 180.0, 99.0, 90.0],
    ]);
    let targets = ndarray::arr1(&[class, class, class]);
    let dataset = Dataset::new(records, targets);

    DecisionTree::params().fit(&dataset).unwrap()
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    // Held so the chart directory outlives the test.
    pub static_dir: TempDir,
}

pub async fn test_app(class: usize) -> TestApp {
    let pool = test_pool().await;
    let static_dir = TempDir::new().unwrap();

    let charts = ChartService::new(static_dir.path());
    charts.ensure_dir().unwrap();

    let state = AppState {
        users: UserService::new(pool.clone()),
        submissions: SubmissionService::new(pool),
        model: Arc::new(RiskModelService::from_model(constant_model(class))),
        charts,
        archive: None,
        cookie_key: Key::generate(),
    };

    TestApp {
        router: create_routes(state.clone()),
        state,
        static_dir,
    }
}

pub fn form_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        )
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn get_with_cookies(uri: &str, cookies: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::COOKIE, cookies)
        .body(Body::empty())
        .unwrap()
}

/// Collapse the response's Set-Cookie headers into a Cookie header value.
pub fn response_cookies(response: &Response) -> String {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

pub async fn body_string(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
