//! Shared test utilities for domain testing
//!
//! This crate provides reusable test infrastructure for the domain crates:
//! - `TestMongo`: MongoDB container with automatic cleanup (feature: "mongodb")
//! - `TestDataBuilder`: Deterministic event payloads (always available)
//! - `assertions`: Custom assertion helpers (always available)
//!
//! # Features
//!
//! - `mongodb` (default): Enables MongoDB test infrastructure
//! - `all`: Enables all database test infrastructure
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::{TestDataBuilder, TestMongo};
//!
//! #[tokio::test]
//! #[ignore = "requires Docker"]
//! async fn my_mongo_test() {
//!     let mongo = TestMongo::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_mongo_test");
//!
//!     let payload = builder.event_payload("main");
//! }
//! ```

use serde_json::{Value, json};

#[cfg(feature = "mongodb")]
mod mongodb;

#[cfg(feature = "mongodb")]
pub use mongodb::TestMongo;

const LOCATIONS: [&str; 5] = ["New York", "San Francisco", "London", "Toronto", "Berlin"];

/// Builder for test data with deterministic randomization
///
/// This ensures tests are reproducible by using seeded data.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_event");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Unique event title, e.g. `"test-event-12345-main"`
    pub fn title(&self, suffix: &str) -> String {
        format!("test-event-{}-{}", self.seed, suffix)
    }

    pub fn location(&self) -> &'static str {
        LOCATIONS[(self.seed % LOCATIONS.len() as u64) as usize]
    }

    /// Midnight UTC date in 2024, as `YYYY-MM-DD`
    pub fn date(&self) -> String {
        let month = self.seed % 12 + 1;
        let day = (self.seed / 12) % 28 + 1;
        format!("2024-{month:02}-{day:02}")
    }

    pub fn participants(&self, count: usize) -> Vec<String> {
        (0..count)
            .map(|i| format!("participant-{}-{}", self.seed % 1000, i))
            .collect()
    }

    /// Complete create payload as a client would send it
    pub fn event_payload(&self, suffix: &str) -> Value {
        json!({
            "title": self.title(suffix),
            "date": self.date(),
            "location": self.location(),
            "participants": self.participants(2),
        })
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Assert that `id` has the 24-hex-digit identifier shape
    pub fn assert_hex_id(id: &str, context: &str) {
        assert!(
            id.len() == 24 && id.bytes().all(|b| b.is_ascii_hexdigit()),
            "{}: expected 24 hex characters, got {:?}",
            context,
            id
        );
    }

    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }
}
