//! Event domain error types

use crate::connection::TransitionError;
use crate::id::EventId;
use axum_helpers::AppError;
use std::time::Duration;
use strum::Display;
use thiserror::Error;

/// Result type for event operations
pub type EventResult<T> = std::result::Result<T, EventError>;

#[derive(Debug, Error)]
pub enum EventError {
    /// Missing, empty or malformed field in a create/update payload
    #[error("{0}")]
    Validation(String),

    #[error("At least one field must be provided for update")]
    EmptyPatch,

    /// Carries the rejected raw id for logging; never echoed to clients
    #[error("Invalid event ID format")]
    InvalidId(String),

    #[error("{0}")]
    InvalidQuery(String),

    #[error("Event not found")]
    NotFound(EventId),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Database operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification of [`EventError`], stable across variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    InvalidIdFormat,
    InvalidQuery,
    NotFound,
    Internal,
}

impl EventError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::EmptyPatch => ErrorKind::Validation,
            Self::InvalidId(_) => ErrorKind::InvalidIdFormat,
            Self::InvalidQuery(_) => ErrorKind::InvalidQuery,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Database(_) | Self::Timeout(_) | Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<mongodb::error::Error> for EventError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<database::DatabaseError> for EventError {
    fn from(err: database::DatabaseError) -> Self {
        match err {
            database::DatabaseError::Timeout(after) => Self::Timeout(after),
            other => Self::Database(other.to_string()),
        }
    }
}

impl From<TransitionError> for EventError {
    fn from(err: TransitionError) -> Self {
        Self::Internal(err.to_string())
    }
}

// Convert to axum_helpers::AppError for HTTP responses
impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        let message = err.to_string();
        match err {
            EventError::Validation(_) | EventError::EmptyPatch => AppError::BadRequest(message),
            EventError::InvalidId(_) => AppError::InvalidId(message),
            EventError::InvalidQuery(_) => AppError::InvalidQuery(message),
            EventError::NotFound(_) => AppError::NotFound(message),
            EventError::Database(_) => AppError::Database(message),
            EventError::Timeout(_) => AppError::DatabaseTimeout(message),
            EventError::Internal(_) => AppError::InternalServerError(message),
        }
    }
}

impl axum::response::IntoResponse for EventError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_kind_groups_internal_failures() {
        assert_eq!(EventError::Database("x".into()).kind(), ErrorKind::Internal);
        assert_eq!(
            EventError::Timeout(Duration::from_secs(1)).kind(),
            ErrorKind::Internal
        );
        assert_eq!(EventError::EmptyPatch.kind(), ErrorKind::Validation);
        assert_eq!(
            EventError::InvalidId("abc".into()).kind(),
            ErrorKind::InvalidIdFormat
        );
    }

    #[test]
    fn test_app_error_status_codes() {
        let cases = [
            (EventError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (EventError::EmptyPatch, StatusCode::BAD_REQUEST),
            (EventError::InvalidId("abc".into()), StatusCode::BAD_REQUEST),
            (EventError::InvalidQuery("bad".into()), StatusCode::BAD_REQUEST),
            (EventError::NotFound(EventId::generate()), StatusCode::NOT_FOUND),
            (
                EventError::Database("down".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                EventError::Timeout(Duration::from_secs(10)),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let app: AppError = err.into();
            assert_eq!(app.status(), expected);
        }
    }

    #[test]
    fn test_messages_match_public_wording() {
        assert_eq!(
            EventError::InvalidId("nope".into()).to_string(),
            "Invalid event ID format"
        );
        assert_eq!(
            EventError::NotFound(EventId::generate()).to_string(),
            "Event not found"
        );
    }

    #[test]
    fn test_database_timeout_maps_to_timeout() {
        let err: EventError = database::DatabaseError::Timeout(Duration::from_secs(3)).into();
        assert!(matches!(err, EventError::Timeout(d) if d == Duration::from_secs(3)));
    }
}
