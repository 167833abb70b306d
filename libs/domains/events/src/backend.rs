//! Storage capability shared by the fallback store and the persistence gateway

use crate::error::EventResult;
use crate::id::EventId;
use crate::models::{Event, EventPatch, ListOptions, NewEvent};
use async_trait::async_trait;

/// CRUD + query contract. Absence is `Ok(None)`, not an error; the service
/// turns it into `NotFound`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventBackend: Send + Sync {
    /// Assign an id and timestamps, then store
    async fn create(&self, input: NewEvent) -> EventResult<Event>;

    async fn get(&self, id: EventId) -> EventResult<Option<Event>>;

    /// Newest first. Returns the requested window and the filtered total.
    async fn list(&self, options: ListOptions) -> EventResult<(Vec<Event>, u64)>;

    /// Merge supplied fields and refresh `updatedAt`
    async fn update(&self, id: EventId, patch: EventPatch) -> EventResult<Option<Event>>;

    /// Remove and return the record
    async fn delete(&self, id: EventId) -> EventResult<Option<Event>>;
}
