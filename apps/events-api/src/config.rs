use core_config::{AppInfo, FromEnv, app_info, env_parse_or, server::ServerConfig};
use database::mongodb::MongoConfig;
use domain_events::SupervisorConfig;
use std::time::Duration;

pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    /// Bound on one connection attempt or health ping
    pub connect_timeout: Duration,
    /// Health ping cadence while connected
    pub health_interval: Duration,
    /// Preload the fallback store with the demo events
    pub seed_demo: bool,
}

impl Config {
    /// Extra variables on top of the shared MongoDB and server ones:
    /// - `EVENTS_CONNECT_TIMEOUT_SECS` (default: 5)
    /// - `EVENTS_HEALTH_INTERVAL_SECS` (default: 5)
    /// - `EVENTS_SEED_DEMO` (default: true)
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?;
        let server = ServerConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            mongodb,
            server,
            environment,
            connect_timeout: Duration::from_secs(env_parse_or("EVENTS_CONNECT_TIMEOUT_SECS", 5)?),
            health_interval: Duration::from_secs(env_parse_or("EVENTS_HEALTH_INTERVAL_SECS", 5)?),
            seed_demo: env_parse_or("EVENTS_SEED_DEMO", true)?,
        })
    }

    pub fn supervisor(&self) -> SupervisorConfig {
        SupervisorConfig {
            connect_timeout: self.connect_timeout,
            health_interval: self.health_interval,
            ..SupervisorConfig::default()
        }
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(self.mongodb.operation_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 6] = [
        "MONGODB_URI",
        "MONGODB_URL",
        "MONGO_URL",
        "EVENTS_CONNECT_TIMEOUT_SECS",
        "EVENTS_HEALTH_INTERVAL_SECS",
        "EVENTS_SEED_DEMO",
    ];

    #[test]
    fn test_defaults() {
        temp_env::with_vars_unset(VARS, || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.mongodb.url, "mongodb://localhost:27017/eventDB");
            assert_eq!(config.mongodb.database, "eventDB");
            assert_eq!(config.connect_timeout, Duration::from_secs(5));
            assert_eq!(config.health_interval, Duration::from_secs(5));
            assert_eq!(config.operation_timeout(), Duration::from_secs(10));
            assert!(config.seed_demo);
            assert_eq!(config.app.name, "events_api");
        });
    }

    #[test]
    fn test_overrides() {
        temp_env::with_vars(
            [
                ("MONGODB_URI", Some("mongodb://db:27017/events")),
                ("EVENTS_CONNECT_TIMEOUT_SECS", Some("2")),
                ("EVENTS_HEALTH_INTERVAL_SECS", Some("30")),
                ("EVENTS_SEED_DEMO", Some("false")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.mongodb.database, "events");

                let supervisor = config.supervisor();
                assert_eq!(supervisor.connect_timeout, Duration::from_secs(2));
                assert_eq!(supervisor.health_interval, Duration::from_secs(30));
                assert!(!config.seed_demo);
            },
        );
    }

    #[test]
    fn test_unparseable_value_is_error() {
        temp_env::with_var("EVENTS_SEED_DEMO", Some("sometimes"), || {
            assert!(Config::from_env().is_err());
        });
    }
}
