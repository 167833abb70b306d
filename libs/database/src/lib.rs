//! Database connectors shared by the workspace services.
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB client construction, ping and health probes
//! - `config` - `core_config::FromEnv` support for [`mongodb::MongoConfig`]
//! - `all` - everything above
//!
//! # Example
//!
//! ```ignore
//! use database::mongodb::{MongoConfig, build_client, ping};
//!
//! let config = MongoConfig::with_database("mongodb://localhost:27017", "eventDB");
//! let client = build_client(&config).await?;
//! ping(&client.database(&config.database)).await?;
//! ```

pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use common::{Backoff, DatabaseError, DatabaseResult, RetryConfig};
