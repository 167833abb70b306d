//! MongoDB implementation of EventBackend

use crate::backend::EventBackend;
use crate::error::{EventError, EventResult};
use crate::id::EventId;
use crate::models::{Event, EventPatch, ListOptions, NewEvent};
use crate::supervisor::Probe;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::{self, Document, doc, oid::ObjectId};
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};
use std::future::IntoFuture;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

pub const COLLECTION_NAME: &str = "events";
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Stored shape of an event. Timestamps are BSON dates, not strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    title: String,
    date: bson::DateTime,
    location: String,
    #[serde(default)]
    participants: Vec<String>,
    created_at: bson::DateTime,
    updated_at: bson::DateTime,
}

fn to_bson_datetime(dt: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(dt.timestamp_millis())
}

fn from_bson_datetime(dt: bson::DateTime) -> EventResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(dt.timestamp_millis())
        .ok_or_else(|| EventError::Internal(format!("Stored date out of range: {dt}")))
}

impl From<&Event> for EventDocument {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id.object_id(),
            title: event.title.clone(),
            date: to_bson_datetime(event.date),
            location: event.location.clone(),
            participants: event.participants.clone(),
            created_at: to_bson_datetime(event.created_at),
            updated_at: to_bson_datetime(event.updated_at),
        }
    }
}

impl TryFrom<EventDocument> for Event {
    type Error = EventError;

    fn try_from(doc: EventDocument) -> EventResult<Self> {
        Ok(Self {
            id: doc.id.into(),
            title: doc.title,
            date: from_bson_datetime(doc.date)?,
            location: doc.location,
            participants: doc.participants,
            created_at: from_bson_datetime(doc.created_at)?,
            updated_at: from_bson_datetime(doc.updated_at)?,
        })
    }
}

/// Case-insensitive substring match on title; empty or absent matches all.
fn build_filter(title: Option<&str>) -> Document {
    match title.filter(|t| !t.is_empty()) {
        Some(title) => doc! {
            "title": { "$regex": regex::escape(title), "$options": "i" }
        },
        None => Document::new(),
    }
}

fn build_update(patch: &EventPatch, now: DateTime<Utc>) -> Document {
    let mut set = Document::new();

    if let Some(title) = &patch.title {
        set.insert("title", title);
    }
    if let Some(date) = patch.date {
        set.insert("date", to_bson_datetime(date));
    }
    if let Some(location) = &patch.location {
        set.insert("location", location);
    }
    if let Some(participants) = &patch.participants {
        set.insert("participants", participants.clone());
    }
    set.insert("updatedAt", to_bson_datetime(now));

    doc! { "$set": set }
}

/// Persistence gateway over the `events` collection.
///
/// Each call is bounded by the operation timeout. Connection tracking lives in
/// the supervisor; the gateway only reports what the driver says.
#[derive(Clone)]
pub struct MongoEventGateway {
    database: Database,
    collection: Collection<EventDocument>,
    operation_timeout: Duration,
}

impl MongoEventGateway {
    pub fn new(database: &Database) -> Self {
        Self {
            database: database.clone(),
            collection: database.collection(COLLECTION_NAME),
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Create indexes backing the default sort and the title filter
    pub async fn create_indexes(&self) -> EventResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "createdAt": -1, "_id": -1 })
                .build(),
            IndexModel::builder().keys(doc! { "title": 1 }).build(),
        ];

        self.timed("create_indexes", self.collection.create_indexes(indexes))
            .await?;
        Ok(())
    }

    async fn timed<T, F>(&self, operation: &'static str, fut: F) -> EventResult<T>
    where
        F: IntoFuture<Output = Result<T, mongodb::error::Error>>,
    {
        match tokio::time::timeout(self.operation_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => {
                error!(operation, error = %err, "MongoDB operation failed");
                Err(err.into())
            }
            Err(_) => {
                error!(operation, timeout = ?self.operation_timeout, "MongoDB operation timed out");
                Err(EventError::Timeout(self.operation_timeout))
            }
        }
    }
}

#[async_trait]
impl EventBackend for MongoEventGateway {
    #[instrument(skip(self, input), fields(title = %input.title))]
    async fn create(&self, input: NewEvent) -> EventResult<Event> {
        let document = EventDocument::from(&Event::new(EventId::generate(), input, Utc::now()));

        self.timed("insert_one", self.collection.insert_one(&document))
            .await?;

        let event = Event::try_from(document)?;
        info!(event_id = %event.id, "Event stored in MongoDB");
        Ok(event)
    }

    #[instrument(skip(self), fields(event_id = %id))]
    async fn get(&self, id: EventId) -> EventResult<Option<Event>> {
        let found = self
            .timed(
                "find_one",
                self.collection.find_one(doc! { "_id": id.object_id() }),
            )
            .await?;

        found.map(Event::try_from).transpose()
    }

    #[instrument(skip(self, options), fields(skip = options.skip, limit = options.limit))]
    async fn list(&self, options: ListOptions) -> EventResult<(Vec<Event>, u64)> {
        let filter = build_filter(options.title.as_deref());
        let limit = i64::try_from(options.limit).unwrap_or(i64::MAX);

        let (documents, total) = self
            .timed("find", async {
                let cursor = self
                    .collection
                    .find(filter.clone())
                    .sort(doc! { "createdAt": -1, "_id": -1 })
                    .skip(options.skip)
                    .limit(limit)
                    .await?;
                let documents: Vec<EventDocument> = cursor.try_collect().await?;
                let total = self.collection.count_documents(filter).await?;
                Ok::<_, mongodb::error::Error>((documents, total))
            })
            .await?;

        let events = documents
            .into_iter()
            .map(Event::try_from)
            .collect::<EventResult<Vec<_>>>()?;
        Ok((events, total))
    }

    #[instrument(skip(self, patch), fields(event_id = %id))]
    async fn update(&self, id: EventId, patch: EventPatch) -> EventResult<Option<Event>> {
        let update = build_update(&patch, Utc::now());

        let updated = self
            .timed(
                "find_one_and_update",
                self.collection
                    .find_one_and_update(doc! { "_id": id.object_id() }, update)
                    .return_document(ReturnDocument::After),
            )
            .await?;

        if updated.is_some() {
            info!("Event updated in MongoDB");
        }
        updated.map(Event::try_from).transpose()
    }

    #[instrument(skip(self), fields(event_id = %id))]
    async fn delete(&self, id: EventId) -> EventResult<Option<Event>> {
        let removed = self
            .timed(
                "find_one_and_delete",
                self.collection
                    .find_one_and_delete(doc! { "_id": id.object_id() }),
            )
            .await?;

        if removed.is_some() {
            info!("Event deleted from MongoDB");
        }
        removed.map(Event::try_from).transpose()
    }
}

#[async_trait]
impl Probe for MongoEventGateway {
    async fn ping(&self) -> EventResult<()> {
        database::mongodb::ping(&self.database).await?;
        Ok(())
    }

    async fn prepare(&self) {
        if let Err(err) = self.create_indexes().await {
            warn!(error = %err, "Failed to create event indexes");
        }
    }
}
