//! Event service layer

use crate::backend::EventBackend;
use crate::connection::{ConnectionState, ConnectionStatus, StorageMode};
use crate::error::{EventError, EventResult};
use crate::id::EventId;
use crate::models::{CreateEvent, Event, EventPage, ListOptions, ListQuery, Pagination, UpdateEvent};
use crate::validation::{validate_create, validate_update};
use tracing::{info, instrument, warn};

/// A result tagged with the storage mode that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct ModeTagged<T> {
    pub mode: StorageMode,
    pub data: T,
}

/// Routes every operation to the backend selected by the current mode.
///
/// The mode is read once per call. Failures are never retried against the
/// other backend, so no record is ever written to both.
pub struct EventService<F: EventBackend, G: EventBackend> {
    state: ConnectionState,
    fallback: F,
    gateway: G,
}

impl<F: EventBackend, G: EventBackend> EventService<F, G> {
    pub fn new(state: ConnectionState, fallback: F, gateway: G) -> Self {
        Self {
            state,
            fallback,
            gateway,
        }
    }

    pub fn mode(&self) -> StorageMode {
        self.state.current_mode()
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        self.state.current_status()
    }

    fn active(&self) -> (StorageMode, &dyn EventBackend) {
        match self.mode() {
            StorageMode::External => (StorageMode::External, &self.gateway),
            StorageMode::Fallback => (StorageMode::Fallback, &self.fallback),
        }
    }

    #[instrument(skip(self, payload))]
    pub async fn create_event(&self, payload: CreateEvent) -> EventResult<ModeTagged<Event>> {
        let input = validate_create(payload)?;
        let (mode, backend) = self.active();

        let event = backend.create(input).await.inspect_err(|e| log_failure(mode, e))?;

        info!(event_id = %event.id, %mode, "Event created");
        Ok(ModeTagged { mode, data: event })
    }

    #[instrument(skip(self))]
    pub async fn list_events(&self, query: ListQuery) -> EventResult<ModeTagged<EventPage>> {
        if query.page < 1 || query.limit < 1 {
            return Err(EventError::InvalidQuery(
                "Page and limit must be positive integers".to_string(),
            ));
        }
        let (page, limit) = (query.page as u64, query.limit as u64);

        let options = ListOptions {
            title: query.title.filter(|t| !t.is_empty()),
            skip: (page - 1).saturating_mul(limit),
            limit,
        };

        let (mode, backend) = self.active();
        let (events, total) = backend
            .list(options)
            .await
            .inspect_err(|e| log_failure(mode, e))?;

        Ok(ModeTagged {
            mode,
            data: EventPage {
                events,
                pagination: Pagination::new(page, limit, total),
            },
        })
    }

    #[instrument(skip(self))]
    pub async fn get_event(&self, raw_id: &str) -> EventResult<ModeTagged<Event>> {
        let id = EventId::parse(raw_id)?;
        let (mode, backend) = self.active();

        let event = backend
            .get(id)
            .await
            .inspect_err(|e| log_failure(mode, e))?
            .ok_or(EventError::NotFound(id))?;

        Ok(ModeTagged { mode, data: event })
    }

    #[instrument(skip(self, payload))]
    pub async fn update_event(
        &self,
        raw_id: &str,
        payload: UpdateEvent,
    ) -> EventResult<ModeTagged<Event>> {
        let id = EventId::parse(raw_id)?;
        let patch = validate_update(payload)?;
        let (mode, backend) = self.active();

        let event = backend
            .update(id, patch)
            .await
            .inspect_err(|e| log_failure(mode, e))?
            .ok_or(EventError::NotFound(id))?;

        info!(event_id = %id, %mode, "Event updated");
        Ok(ModeTagged { mode, data: event })
    }

    #[instrument(skip(self))]
    pub async fn delete_event(&self, raw_id: &str) -> EventResult<ModeTagged<Event>> {
        let id = EventId::parse(raw_id)?;
        let (mode, backend) = self.active();

        let event = backend
            .delete(id)
            .await
            .inspect_err(|e| log_failure(mode, e))?
            .ok_or(EventError::NotFound(id))?;

        info!(event_id = %id, %mode, "Event deleted");
        Ok(ModeTagged { mode, data: event })
    }
}

fn log_failure(mode: StorageMode, err: &EventError) {
    warn!(%mode, error = %err, "Backend operation failed");
}
