//! Record validation: turns raw payloads into backend-ready inputs.
//!
//! Pure functions, no I/O. Every check here runs before any backend is touched.

use crate::error::{EventError, EventResult};
use crate::models::{CreateEvent, EventPatch, NewEvent, UpdateEvent};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use validator::{Validate, ValidationErrors};

const REQUIRED_FIELDS: [&str; 3] = ["title", "date", "location"];

pub fn validate_create(payload: CreateEvent) -> EventResult<NewEvent> {
    if let Err(errors) = payload.validate() {
        let missing = failing_fields(&errors);
        return Err(EventError::Validation(format!(
            "Title, date, and location are required fields (missing: {})",
            missing.join(", ")
        )));
    }

    // validate() guarantees all three are present and non-empty.
    let (Some(title), Some(raw_date), Some(location)) =
        (payload.title, payload.date, payload.location)
    else {
        return Err(EventError::Validation(
            "Title, date, and location are required fields".to_string(),
        ));
    };

    Ok(NewEvent {
        title,
        date: parse_date(&raw_date)?,
        location,
        participants: payload.participants.unwrap_or_default(),
    })
}

/// Reject empty patches, then check only the supplied fields.
pub fn validate_update(payload: UpdateEvent) -> EventResult<EventPatch> {
    if payload.is_empty() {
        return Err(EventError::EmptyPatch);
    }

    if let Err(errors) = payload.validate() {
        return Err(EventError::Validation(format!(
            "Fields must not be empty when provided: {}",
            failing_fields(&errors).join(", ")
        )));
    }

    Ok(EventPatch {
        title: payload.title,
        date: payload.date.as_deref().map(parse_date).transpose()?,
        location: payload.location,
        participants: payload.participants,
    })
}

/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS[.fff]` (UTC) and `YYYY-MM-DD` (midnight UTC).
pub fn parse_date(raw: &str) -> EventResult<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Some(midnight) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight.and_utc());
    }

    Err(EventError::Validation(format!("Invalid date: {raw}")))
}

/// Failing field names in a stable order.
fn failing_fields(errors: &ValidationErrors) -> Vec<&'static str> {
    let field_errors = errors.field_errors();
    REQUIRED_FIELDS
        .into_iter()
        .filter(|field| field_errors.contains_key(*field))
        .collect()
}
