//! Application state management.
//!
//! This module defines the shared application state passed to request handlers.

use domain_events::{EventService, InMemoryEventStore, MongoEventGateway};
use mongodb::{Client, Database};
use std::sync::Arc;

/// Event service as wired in production: in-memory fallback, MongoDB gateway
pub type Events = EventService<InMemoryEventStore, MongoEventGateway>;

/// Shared application state.
///
/// Cloned for each handler (inexpensive Arc clones).
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// MongoDB client (cloneable, shares underlying connection pool)
    pub mongo_client: Client,
    /// MongoDB database instance
    pub db: Database,
    pub events: Arc<Events>,
}
