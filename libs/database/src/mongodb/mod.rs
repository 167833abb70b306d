//! MongoDB connection management and probes.

mod config;
mod connector;
mod health;

pub use config::{DEFAULT_DATABASE, DEFAULT_URL, MongoConfig, database_from_url};
pub use connector::{build_client, ping};
pub use health::{HealthStatus, check_health_detailed};

pub use mongodb::{Client, Collection, Database};
