//! Event identifiers.
//!
//! Both backends use the same 12-byte ObjectId shape, so an id minted by the
//! fallback store is indistinguishable from one minted by MongoDB and a single
//! format check serves both.

use crate::error::EventError;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Length of the hex form of an identifier.
pub const ID_HEX_LEN: usize = 24;

/// Format check shared by every backend: exactly 24 hex digits.
pub fn is_valid_id(raw: &str) -> bool {
    raw.len() == ID_HEX_LEN && raw.bytes().all(|b| b.is_ascii_hexdigit())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(ObjectId);

impl EventId {
    /// Mint a new id locally. Never consults external state.
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    pub fn parse(raw: &str) -> Result<Self, EventError> {
        if !is_valid_id(raw) {
            return Err(EventError::InvalidId(raw.to_string()));
        }
        ObjectId::parse_str(raw)
            .map(Self)
            .map_err(|_| EventError::InvalidId(raw.to_string()))
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl From<ObjectId> for EventId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

impl FromStr for EventId {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for EventId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_hex())
    }
}

impl<'de> Deserialize<'de> for EventId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_ids_pass_format_check() {
        let id = EventId::generate();
        assert!(is_valid_id(&id.to_string()));
        assert_eq!(EventId::parse(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let ids: HashSet<EventId> = (0..1000).map(|_| EventId::generate()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_format_check_rejects_malformed_input() {
        assert!(!is_valid_id("not-a-valid-id"));
        assert!(!is_valid_id(""));
        assert!(!is_valid_id("65a1f0c2e4b0a1b2c3d4e5f")); // 23 chars
        assert!(!is_valid_id("65a1f0c2e4b0a1b2c3d4e5f6a")); // 25 chars
        assert!(!is_valid_id("65a1f0c2e4b0a1b2c3d4e5fz"));
        assert!(is_valid_id("65A1F0C2E4B0A1B2C3D4E5F6"));
    }

    #[test]
    fn test_parse_invalid_is_invalid_id_error() {
        let err = EventId::parse("not-a-valid-id").unwrap_err();
        assert!(matches!(err, EventError::InvalidId(raw) if raw == "not-a-valid-id"));
    }

    #[test]
    fn test_serde_uses_hex_string() {
        let id = EventId::parse("65a1f0c2e4b0a1b2c3d4e5f6").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"65a1f0c2e4b0a1b2c3d4e5f6\"");

        let back: EventId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<EventId>("\"xyz\"").is_err());
    }
}
