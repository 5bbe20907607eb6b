//! JSON routes over [`DatabrusClient`].

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::client::DatabrusClient;
use crate::error::ScraperError;
use crate::model::{Match, TableEntry};

pub type AppState = Arc<DatabrusClient>;

/// Body of every failed request.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: &'static str,
    pub details: String,
}

impl ApiError {
    fn new(error: &'static str, source: &ScraperError) -> Self {
        tracing::error!(error = %source, context = error, "request failed");
        Self {
            error,
            details: source.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response()
    }
}

pub fn build_app(client: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/matches", get(matches))
        .route("/table", get(table))
        .layer(TraceLayer::new_for_http())
        .with_state(client)
}

async fn index() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Databrus FC API",
        "endpoints": {
            "/matches": "Get all matches (upcoming and previous)",
            "/table": "Get league standings table",
        },
    }))
}

async fn matches(State(client): State<AppState>) -> Result<Json<Vec<Match>>, ApiError> {
    client
        .all_matches()
        .await
        .map(Json)
        .map_err(|e| ApiError::new("Failed to fetch matches", &e))
}

async fn table(State(client): State<AppState>) -> Result<Json<Vec<TableEntry>>, ApiError> {
    client
        .table()
        .await
        .map(Json)
        .map_err(|e| ApiError::new("Failed to fetch table", &e))
}
