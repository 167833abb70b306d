//! API routes module

pub mod ready;

use axum::Router;

use crate::state::AppState;

/// Create all API routes
/// Note: These are nested under /api by axum_helpers::create_router
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest("/events", domain_events::events_router(state.events.clone()))
        .merge(ready::router(state.clone()))
}
