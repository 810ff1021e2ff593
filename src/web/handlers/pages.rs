// Page handlers for HTML rendering with Askama

use askama::Template;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use serde::Deserialize;

use crate::api_server::AppState;
use crate::states::MoistureState;

// ============================================================================
// Home Page (reading form)
// ============================================================================

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub title: String,
    pub default_value: String,
}

pub async fn home_page() -> impl IntoResponse {
    let template = HomeTemplate {
        title: "Soil Moisture Monitor".to_string(),
        default_value: "50.0".to_string(),
    };
    Html(template.render().unwrap_or_else(|e| {
        format!("Template error: {}", e)
    }))
}

// ============================================================================
// Prediction Result Page
// ============================================================================

pub struct ProbabilityRow {
    pub label: String,
    pub percent: String,
}

#[derive(Template)]
#[template(path = "pages/result.html")]
pub struct ResultTemplate {
    pub title: String,
    pub moisture: String,
    pub moisture_value: String,
    pub state_label: String,
    pub severity_class: String,
    pub recommendation: String,
    pub normalized: String,
    pub raw_position: String,
    pub probabilities: Vec<ProbabilityRow>,
}

#[derive(Debug, Deserialize)]
pub struct PredictParams {
    pub moisture: f64,
}

pub async fn predict_page(
    State(state): State<AppState>,
    Query(params): Query<PredictParams>,
) -> axum::response::Response {
    let report = match state.monitor.predict(params.moisture) {
        Ok(report) => report,
        Err(e) => {
            // Validation errors are the only recoverable class; re-prompt.
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(format!(
                    "<p>Invalid reading: {}</p><p><a href=\"/\">Back</a></p>",
                    e
                )),
            )
                .into_response();
        }
    };

    let probabilities = report
        .probabilities
        .map(|probs| {
            MoistureState::ALL
                .iter()
                .zip(probs.iter())
                .map(|(s, p)| ProbabilityRow {
                    label: s.display_label().to_string(),
                    percent: format!("{:.1}%", p * 100.0),
                })
                .collect()
        })
        .unwrap_or_default();

    let template = ResultTemplate {
        title: "Soil Moisture Monitor".to_string(),
        moisture: format!("{:.1}", report.raw_percent),
        moisture_value: format!("{}", report.raw_percent),
        state_label: report.state.display_label().to_string(),
        severity_class: format!("severity-{}", report.recommendation.severity.as_str()),
        recommendation: report.recommendation.advice.to_string(),
        normalized: format!("{:.4}", report.normalized),
        raw_position: format!("{}", report.raw_position),
        probabilities,
    };

    Html(template.render().unwrap_or_else(|e| {
        format!("Template error: {}", e)
    }))
    .into_response()
}
