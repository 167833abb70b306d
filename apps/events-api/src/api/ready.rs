//! Readiness endpoint
//!
//! The service can always answer from the fallback store, so this never
//! fails; it reports whether MongoDB itself answers a ping right now.

use axum::{Json, Router, extract::State, routing::get};
use domain_events::{ConnectionStatus, StorageMode};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReadyResponse {
    status: &'static str,
    mode: StorageMode,
    connection: ConnectionStatus,
    mongodb: bool,
    response_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(readiness_check))
        .with_state(state)
}

async fn readiness_check(State(state): State<AppState>) -> Json<ReadyResponse> {
    let health = database::mongodb::check_health_detailed(&state.db).await;

    Json(ReadyResponse {
        status: if health.healthy { "ready" } else { "degraded" },
        mode: state.events.mode(),
        connection: state.events.connection_status(),
        mongodb: health.healthy,
        response_time_ms: health.response_time_ms,
        error: health.message,
    })
}
