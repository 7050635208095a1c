use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid form input: {0}")]
    Validation(String),
    #[error("Authentication required")]
    Unauthenticated,
    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "invalid input",
                    "message": message,
                })),
            )
                .into_response(),
            // Unauthenticated page requests go back to the login form.
            ApiError::Unauthenticated => Redirect::to("/login").into_response(),
            ApiError::Internal(e) => {
                tracing::error!("request failed: {e:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "internal server error",
                    })),
                )
                    .into_response()
            }
        }
    }
}
