// Axum API server: JSON endpoints + HTML pages for the moisture monitor.
//
// The artifact bundle is loaded once at startup and shared read-only. Any
// load or alignment failure aborts startup; the server never falls back to
// a default label.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};

use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use std::sync::Arc;

use crate::error::MonitorError;
use crate::monitor::MoistureMonitor;
use crate::recommend::recommendation_for;
use crate::states::MoistureState;
use crate::web::handlers::pages;

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub monitor: Arc<MoistureMonitor>,
    pub artifact_path: String,
}

impl AppState {
    pub fn new(artifact_path: &str) -> anyhow::Result<Self> {
        tracing::info!("Loading artifact bundle from {}", artifact_path);
        let monitor = MoistureMonitor::load(artifact_path)?;
        tracing::info!(
            "Artifact loaded; declared class ordering {:?} aligned to canonical states",
            monitor.declared_classes()
        );

        Ok(Self {
            monitor: Arc::new(monitor),
            artifact_path: artifact_path.to_string(),
        })
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // HTML pages
        .route("/", get(pages::home_page))
        .route("/predict", get(pages::predict_page))

        // Health check
        .route("/health", get(health_check))

        // JSON API
        .route("/api/predict", post(predict))
        .route("/api/states", get(list_states))

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "artifact": state.artifact_path,
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

#[derive(Debug, serde::Deserialize)]
pub struct PredictRequest {
    pub moisture: f64,
}

async fn predict(
    State(state): State<AppState>,
    Json(payload): Json<PredictRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let report = state.monitor.predict(payload.moisture)?;

    let probabilities = report.probabilities.map(|probs| {
        MoistureState::ALL
            .iter()
            .zip(probs.iter())
            .map(|(s, p)| (s.display_label().to_string(), serde_json::json!(p)))
            .collect::<serde_json::Map<String, serde_json::Value>>()
    });

    Ok(Json(serde_json::json!({
        "moisture_percent": report.raw_percent,
        "normalized": report.normalized,
        "raw_position": report.raw_position,
        "state": report.state.display_label(),
        "severity": report.recommendation.severity.as_str(),
        "recommendation": report.recommendation.advice,
        "probabilities": probabilities,
    })))
}

/// Canonical state set with the advice table, for UI legends.
async fn list_states() -> impl IntoResponse {
    let states: Vec<serde_json::Value> = MoistureState::ALL
        .iter()
        .map(|state| {
            let rec = recommendation_for(*state);
            serde_json::json!({
                "state": state.display_label(),
                "canonical_index": state.canonical_index(),
                "severity": rec.severity.as_str(),
                "recommendation": rec.advice,
            })
        })
        .collect();

    Json(serde_json::json!({ "states": states }))
}

// ============================================================================
// Error Handling
// ============================================================================

enum AppError {
    Validation(String),
    Internal(String),
}

impl From<MonitorError> for AppError {
    fn from(err: MonitorError) -> Self {
        match err {
            MonitorError::Validation(e) => AppError::Validation(e.to_string()),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
