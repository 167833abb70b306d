//! Event domain models

use crate::id::EventId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;

/// Stored event record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "_id")]
    #[schema(value_type = String, example = "65a1f0c2e4b0a1b2c3d4e5f6")]
    pub id: EventId,
    pub title: String,
    pub date: DateTime<Utc>,
    pub location: String,
    #[serde(default)]
    pub participants: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Build a fresh record; `createdAt == updatedAt == now`.
    pub fn new(id: EventId, input: NewEvent, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: input.title,
            date: input.date,
            location: input.location,
            participants: input.participants,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge the supplied fields and refresh `updated_at`.
    pub fn apply_patch(&mut self, patch: EventPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(participants) = patch.participants {
            self.participants = participants;
        }
        self.updated_at = now.max(self.created_at);
    }
}

/// Create payload as received from clients
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateEvent {
    #[validate(required, length(min = 1))]
    #[schema(example = "Tech Conference 2023")]
    pub title: Option<String>,

    /// RFC 3339 timestamp, `YYYY-MM-DDTHH:MM:SS` (UTC) or `YYYY-MM-DD`
    #[validate(required, length(min = 1))]
    #[schema(example = "2023-11-25T09:00:00Z")]
    pub date: Option<String>,

    #[validate(required, length(min = 1))]
    #[schema(example = "New York")]
    pub location: Option<String>,

    #[serde(default)]
    pub participants: Option<Vec<String>>,
}

/// Update payload; only supplied fields are applied
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateEvent {
    #[validate(length(min = 1))]
    pub title: Option<String>,

    #[validate(length(min = 1))]
    pub date: Option<String>,

    #[validate(length(min = 1))]
    pub location: Option<String>,

    pub participants: Option<Vec<String>>,
}

impl UpdateEvent {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.date.is_none()
            && self.location.is_none()
            && self.participants.is_none()
    }
}

/// Validated create input handed to backends
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub title: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub participants: Vec<String>,
}

/// Validated, non-empty update handed to backends
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub participants: Option<Vec<String>>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.date.is_none()
            && self.location.is_none()
            && self.participants.is_none()
    }
}

/// Query string for listing events
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// 1-based page number
    #[serde(default = "default_page")]
    #[param(default = 1, minimum = 1)]
    pub page: i64,

    /// Page size
    #[serde(default = "default_limit")]
    #[param(default = 10, minimum = 1)]
    pub limit: i64,

    /// Case-insensitive substring match on title
    pub title: Option<String>,
}

fn default_page() -> i64 {
    DEFAULT_PAGE
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            title: None,
        }
    }
}

/// Backend-level listing window
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub title: Option<String>,
    pub skip: u64,
    pub limit: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_events: u64,
    pub limit: u64,
}

impl Pagination {
    /// `limit` must be non-zero; the service guarantees it.
    pub fn new(current_page: u64, limit: u64, total_events: u64) -> Self {
        Self {
            current_page,
            total_pages: total_events.div_ceil(limit.max(1)),
            total_events,
            limit,
        }
    }
}

/// One page of events plus its pagination metadata
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct EventPage {
    pub events: Vec<Event>,
    pub pagination: Pagination,
}
