//! HTTP handlers for the events API

use crate::backend::EventBackend;
use crate::connection::{ConnectionStatus, StorageMode};
use crate::error::EventError;
use crate::models::{CreateEvent, Event, ListQuery, Pagination, UpdateEvent};
use crate::service::{EventService, ModeTagged};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_helpers::{ApiJson, ApiQuery};
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

/// Events router state
pub type EventsState<F, G> = Arc<EventService<F, G>>;

/// Success envelope shared by every events endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    /// Human-readable outcome; suffixed with ` (demo mode)` while in fallback
    pub message: String,
    pub mode: StorageMode,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> ApiResponse<T> {
    fn from_tagged(message: &str, tagged: ModeTagged<T>) -> Self {
        let message = if tagged.mode.is_fallback() {
            format!("{message} (demo mode)")
        } else {
            message.to_string()
        };

        Self {
            success: true,
            message,
            mode: tagged.mode,
            data: tagged.data,
            pagination: None,
        }
    }
}

/// Liveness payload; always 200 regardless of storage mode
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    pub mode: StorageMode,
    pub connection: ConnectionStatus,
}

/// Create the events router (mount under `/events`)
pub fn events_router<F, G>(service: EventsState<F, G>) -> Router
where
    F: EventBackend + 'static,
    G: EventBackend + 'static,
{
    Router::new()
        .route("/", get(list_events::<F, G>).post(create_event::<F, G>))
        .route(
            "/{id}",
            get(get_event::<F, G>)
                .put(update_event::<F, G>)
                .delete(delete_event::<F, G>),
        )
        .with_state(service)
}

/// Liveness router exposing `GET /health`
pub fn health_router<F, G>(service: EventsState<F, G>) -> Router
where
    F: EventBackend + 'static,
    G: EventBackend + 'static,
{
    Router::new()
        .route("/health", get(health_check::<F, G>))
        .with_state(service)
}

/// List events, newest first
#[utoipa::path(
    get,
    path = "/",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of events", body = ApiResponse<Vec<Event>>),
        (status = 400, response = axum_helpers::BadRequestQueryResponse),
        (status = 500, response = axum_helpers::InternalServerErrorResponse)
    ),
    tag = "events"
)]
#[instrument(skip(state))]
pub async fn list_events<F: EventBackend, G: EventBackend>(
    State(state): State<EventsState<F, G>>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<ApiResponse<Vec<Event>>>, EventError> {
    let tagged = state.list_events(query).await?;
    let pagination = tagged.data.pagination;

    let mut response = ApiResponse::from_tagged(
        "Events retrieved successfully",
        ModeTagged {
            mode: tagged.mode,
            data: tagged.data.events,
        },
    );
    response.pagination = Some(pagination);
    Ok(Json(response))
}

/// Create a new event
#[utoipa::path(
    post,
    path = "/",
    request_body = CreateEvent,
    responses(
        (status = 201, description = "Event created", body = ApiResponse<Event>),
        (status = 400, response = axum_helpers::BadRequestValidationResponse),
        (status = 500, response = axum_helpers::InternalServerErrorResponse)
    ),
    tag = "events"
)]
#[instrument(skip(state, payload))]
pub async fn create_event<F: EventBackend, G: EventBackend>(
    State(state): State<EventsState<F, G>>,
    ApiJson(payload): ApiJson<CreateEvent>,
) -> Result<impl IntoResponse, EventError> {
    let tagged = state.create_event(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::from_tagged("Event created successfully", tagged)),
    ))
}

/// Get event by ID
#[utoipa::path(
    get,
    path = "/{id}",
    params(
        ("id" = String, Path, description = "Event ID (24 hex characters)")
    ),
    responses(
        (status = 200, description = "Event found", body = ApiResponse<Event>),
        (status = 400, response = axum_helpers::BadRequestIdResponse),
        (status = 404, response = axum_helpers::NotFoundResponse),
        (status = 500, response = axum_helpers::InternalServerErrorResponse)
    ),
    tag = "events"
)]
#[instrument(skip(state))]
pub async fn get_event<F: EventBackend, G: EventBackend>(
    State(state): State<EventsState<F, G>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Event>>, EventError> {
    let tagged = state.get_event(&id).await?;
    Ok(Json(ApiResponse::from_tagged(
        "Event retrieved successfully",
        tagged,
    )))
}

/// Update the supplied fields of an event
#[utoipa::path(
    put,
    path = "/{id}",
    params(
        ("id" = String, Path, description = "Event ID (24 hex characters)")
    ),
    request_body = UpdateEvent,
    responses(
        (status = 200, description = "Event updated", body = ApiResponse<Event>),
        (status = 400, response = axum_helpers::BadRequestValidationResponse),
        (status = 404, response = axum_helpers::NotFoundResponse),
        (status = 500, response = axum_helpers::InternalServerErrorResponse)
    ),
    tag = "events"
)]
#[instrument(skip(state, payload))]
pub async fn update_event<F: EventBackend, G: EventBackend>(
    State(state): State<EventsState<F, G>>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateEvent>,
) -> Result<Json<ApiResponse<Event>>, EventError> {
    let tagged = state.update_event(&id, payload).await?;
    Ok(Json(ApiResponse::from_tagged(
        "Event updated successfully",
        tagged,
    )))
}

/// Delete an event and return it
#[utoipa::path(
    delete,
    path = "/{id}",
    params(
        ("id" = String, Path, description = "Event ID (24 hex characters)")
    ),
    responses(
        (status = 200, description = "Event deleted", body = ApiResponse<Event>),
        (status = 400, response = axum_helpers::BadRequestIdResponse),
        (status = 404, response = axum_helpers::NotFoundResponse),
        (status = 500, response = axum_helpers::InternalServerErrorResponse)
    ),
    tag = "events"
)]
#[instrument(skip(state))]
pub async fn delete_event<F: EventBackend, G: EventBackend>(
    State(state): State<EventsState<F, G>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Event>>, EventError> {
    let tagged = state.delete_event(&id).await?;
    Ok(Json(ApiResponse::from_tagged(
        "Event deleted successfully",
        tagged,
    )))
}

/// Liveness check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Server is running", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check<F: EventBackend, G: EventBackend>(
    State(state): State<EventsState<F, G>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        message: "Server is running".to_string(),
        mode: state.mode(),
        connection: state.connection_status(),
    })
}
