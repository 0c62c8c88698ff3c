use axum::{extract::State, response::IntoResponse, Json};
use chrono::{SecondsFormat, Utc};
use crate::api::dtos::responses::HealthResponse;
use crate::state::AppState;
use std::sync::Arc;

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        uptime: state.started_at.elapsed().as_secs_f64(),
    })
}
