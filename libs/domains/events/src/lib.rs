//! Events Domain
//!
//! Event records served from MongoDB when it is reachable and from an
//! in-process store when it is not.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Request Flow                          │
//! ├──────────────────────────────────────────────────────────────┤
//! │                                                              │
//! │  HTTP /api/events ─► EventService ─┬─► MongoEventGateway     │
//! │                          ▲         │   (mode = live)         │
//! │                          │         │                         │
//! │                   ConnectionState  └─► InMemoryEventStore    │
//! │                          ▲             (mode = demo)         │
//! │                          │                                   │
//! │                 ConnectionSupervisor (ping / backoff)        │
//! │                                                              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The two record sets are disjoint: nothing written in one mode is visible
//! in the other.

use utoipa::OpenApi;

mod backend;
mod connection;
mod error;
mod handlers;
mod id;
mod memory;
mod models;
mod mongodb;
mod service;
mod supervisor;
mod validation;

pub use backend::EventBackend;
pub use connection::{ConnectionState, ConnectionStatus, StorageMode, TransitionError};
pub use error::{ErrorKind, EventError, EventResult};
pub use handlers::{ApiResponse, EventsState, HealthResponse, events_router, health_router};
pub use id::{EventId, ID_HEX_LEN, is_valid_id};
pub use memory::{InMemoryEventStore, demo_events};
pub use models::{
    CreateEvent, Event, EventPage, EventPatch, ListOptions, ListQuery, NewEvent, Pagination,
    UpdateEvent,
};
pub use mongodb::{COLLECTION_NAME, DEFAULT_OPERATION_TIMEOUT, MongoEventGateway};
pub use service::{EventService, ModeTagged};
pub use supervisor::{ConnectionSupervisor, Probe, SupervisorConfig};
pub use validation::{parse_date, validate_create, validate_update};

/// OpenAPI documentation for Events API
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_events,
        handlers::create_event,
        handlers::get_event,
        handlers::update_event,
        handlers::delete_event,
    ),
    components(schemas(
        Event,
        CreateEvent,
        UpdateEvent,
        Pagination,
        StorageMode,
        ConnectionStatus,
    )),
    tags(
        (name = "events", description = "Event management with MongoDB and an in-memory fallback")
    )
)]
pub struct ApiDoc;

/// OpenAPI documentation for the liveness endpoint
#[derive(OpenApi)]
#[openapi(
    paths(handlers::health_check),
    components(schemas(HealthResponse, StorageMode, ConnectionStatus)),
    tags((name = "health", description = "Liveness"))
)]
pub struct HealthApiDoc;
