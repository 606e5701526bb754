use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderName, Method},
    routing::{get, post},
    Json, Router,
};
use herald_insights::{InsightReport, InsightRequest};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, instrument};

use super::error::HttpError;
use super::state::ServeState;
use crate::metrics;

/// Request headers browsers may send on cross-origin calls.
pub const ALLOWED_HEADERS: [&str; 4] = ["authorization", "x-client-info", "apikey", "content-type"];

pub fn build_router(state: ServeState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics::metrics_handler))
        .route("/generate-insights", post(generate_insights_handler))
        .route("/functions/v1/generate-insights", post(generate_insights_handler))
        .layer(cors_layer())
        .with_state(state)
}

/// Answers every `OPTIONS` request itself with `200` and an empty body.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(ALLOWED_HEADERS.map(HeaderName::from_static))
        .expose_headers([header::CONTENT_TYPE])
}

async fn health_handler(State(state): State<ServeState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "insights_configured": state.insights_configured(),
    }))
}

#[instrument(name = "herald.insights.generate", skip_all, fields(body_len = body.len()))]
async fn generate_insights_handler(
    State(state): State<ServeState>,
    body: Bytes,
) -> Result<Json<InsightReport>, HttpError> {
    let request = parse_request(&body)?;
    match state.generator().generate(&request).await {
        Ok(report) => Ok(Json(report)),
        Err(err) => {
            error!(target: "herald::serve", error = %err, kind = err.label(), "insight generation failed");
            Err(err.into())
        }
    }
}

fn parse_request(body: &[u8]) -> Result<InsightRequest, HttpError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(InsightRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|err| HttpError::bad_request(format!("invalid request body: {err}")))
}
