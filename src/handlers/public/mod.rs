use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::middleware::ApiResponse;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub database: String,
}

/// GET /ping
pub async fn ping() -> Json<Value> {
    Json(json!({ "message": "pong" }))
}

/// GET /hello
pub async fn hello() -> &'static str {
    "Hello World!!!"
}

/// GET /health - liveness plus a bounded store ping
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let timestamp = chrono::Utc::now();

    match state.series.health().await {
        Ok(()) => ApiResponse::success(HealthStatus {
            status: "ok",
            timestamp,
            database: "ok".to_string(),
        }),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            ApiResponse::with_status(
                HealthStatus {
                    status: "degraded",
                    timestamp,
                    database: "unavailable".to_string(),
                },
                StatusCode::SERVICE_UNAVAILABLE,
            )
        }
    }
}
