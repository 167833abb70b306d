//! In-process fallback store.
//!
//! Volatile by nature: contents vanish on restart and are never migrated to or
//! from the external store.

use crate::backend::EventBackend;
use crate::error::EventResult;
use crate::id::EventId;
use crate::models::{Event, EventPatch, ListOptions, NewEvent};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, instrument};

#[derive(Clone, Default)]
pub struct InMemoryEventStore {
    events: Arc<RwLock<Vec<Event>>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with [`demo_events`].
    pub fn seeded() -> Self {
        Self {
            events: Arc::new(RwLock::new(demo_events(Utc::now()))),
        }
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

#[async_trait]
impl EventBackend for InMemoryEventStore {
    #[instrument(skip(self, input), fields(title = %input.title))]
    async fn create(&self, input: NewEvent) -> EventResult<Event> {
        let event = Event::new(EventId::generate(), input, Utc::now());

        self.events.write().await.push(event.clone());

        info!(event_id = %event.id, "Event stored in fallback store");
        Ok(event)
    }

    async fn get(&self, id: EventId) -> EventResult<Option<Event>> {
        let events = self.events.read().await;
        Ok(events.iter().find(|e| e.id == id).cloned())
    }

    async fn list(&self, options: ListOptions) -> EventResult<(Vec<Event>, u64)> {
        let needle = options
            .title
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase);

        let events = self.events.read().await;
        let mut matching: Vec<&Event> = events
            .iter()
            .filter(|e| {
                needle
                    .as_ref()
                    .is_none_or(|n| e.title.to_lowercase().contains(n.as_str()))
            })
            .collect();

        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let total = matching.len() as u64;
        let page = matching
            .into_iter()
            .skip(usize::try_from(options.skip).unwrap_or(usize::MAX))
            .take(usize::try_from(options.limit).unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok((page, total))
    }

    #[instrument(skip(self, patch), fields(event_id = %id))]
    async fn update(&self, id: EventId, patch: EventPatch) -> EventResult<Option<Event>> {
        let mut events = self.events.write().await;
        let Some(event) = events.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };

        event.apply_patch(patch, Utc::now());

        info!("Event updated in fallback store");
        Ok(Some(event.clone()))
    }

    #[instrument(skip(self), fields(event_id = %id))]
    async fn delete(&self, id: EventId) -> EventResult<Option<Event>> {
        let mut events = self.events.write().await;
        let removed = events
            .iter()
            .position(|e| e.id == id)
            .map(|index| events.remove(index));

        if removed.is_some() {
            info!("Event deleted from fallback store");
        }
        Ok(removed)
    }
}

/// The five sample events served while no database is reachable.
///
/// Creation times are staggered a millisecond apart, newest first, so the
/// default newest-first listing keeps this order.
pub fn demo_events(now: DateTime<Utc>) -> Vec<Event> {
    let samples: [(&str, (i32, u32, u32, u32, u32), &str, [&str; 3]); 5] = [
        (
            "Tech Conference 2023",
            (2023, 11, 25, 9, 0),
            "New York",
            ["John Doe", "Jane Smith", "Alice Brown"],
        ),
        (
            "AI/ML Workshop",
            (2023, 12, 5, 10, 0),
            "San Francisco",
            ["Michael Clark", "Emma Wilson", "David Lee"],
        ),
        (
            "Blockchain Summit",
            (2024, 1, 15, 8, 30),
            "London",
            ["Liam Johnson", "Sophia Davis", "Jackson Martinez"],
        ),
        (
            "Data Science Bootcamp",
            (2024, 2, 10, 12, 0),
            "Toronto",
            ["Isabella Garcia", "Ethan Moore", "Ava Rodriguez"],
        ),
        (
            "Cybersecurity Seminar",
            (2024, 3, 3, 14, 0),
            "Berlin",
            ["James Taylor", "Mia Anderson", "Lucas Thomas"],
        ),
    ];

    samples
        .into_iter()
        .enumerate()
        .filter_map(|(index, (title, (y, mo, d, h, mi), location, participants))| {
            let date = Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).single()?;
            let created_at = now - Duration::milliseconds(index as i64);
            Some(Event::new(
                EventId::generate(),
                NewEvent {
                    title: title.to_string(),
                    date,
                    location: location.to_string(),
                    participants: participants.iter().map(|p| p.to_string()).collect(),
                },
                created_at,
            ))
        })
        .collect()
}
