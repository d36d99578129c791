//! Liveness check, served outside of `/api`

use std::sync::Arc;

use axum::{Json, Router, routing::get};

use super::public::HealthResponse;
use crate::api::state::AppState;

type SharedState = Arc<AppState>;

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: String::from("ok"),
    })
}

pub fn router() -> Router<SharedState> {
    Router::new().route("/health", get(health))
}
