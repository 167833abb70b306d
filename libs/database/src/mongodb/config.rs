#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_first, env_parse_or};

pub const DEFAULT_URL: &str = "mongodb://localhost:27017/eventDB";
pub const DEFAULT_DATABASE: &str = "eventDB";

/// MongoDB connection settings
///
/// ```ignore
/// use database::mongodb::MongoConfig;
///
/// let config = MongoConfig::with_database("mongodb://localhost:27017", "eventDB")
///     .with_app_name("events-api");
///
/// // From environment variables (requires `config` feature)
/// let config = MongoConfig::from_env()?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoConfig {
    /// Format: mongodb://[username:password@]host[:port][/database][?options]
    pub url: String,

    pub database: String,

    /// Optional application name for server logs
    pub app_name: Option<String>,

    pub max_pool_size: u32,
    pub min_pool_size: u32,

    /// Socket connect timeout in seconds
    pub connect_timeout_secs: u64,

    /// Driver server selection timeout in seconds
    pub server_selection_timeout_secs: u64,

    /// Deadline applied by callers to each individual CRUD call
    pub operation_timeout_secs: u64,
}

impl MongoConfig {
    /// Database name is taken from the URL path, or `eventDB` when absent.
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let database = database_from_url(&url).unwrap_or_else(|| DEFAULT_DATABASE.to_string());
        Self::with_database(url, database)
    }

    pub fn with_database(url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: database.into(),
            app_name: None,
            max_pool_size: 100,
            min_pool_size: 0,
            connect_timeout_secs: 5,
            server_selection_timeout_secs: 5,
            operation_timeout_secs: 10,
        }
    }

    /// Set the application name for server logs
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn with_timeouts(mut self, connect_secs: u64, server_selection_secs: u64) -> Self {
        self.connect_timeout_secs = connect_secs;
        self.server_selection_timeout_secs = server_selection_secs;
        self
    }

    pub fn with_operation_timeout(mut self, secs: u64) -> Self {
        self.operation_timeout_secs = secs;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    /// URL with any `user:password@` credentials masked, for logging.
    pub fn redacted_url(&self) -> String {
        match (self.url.find("://"), self.url.rfind('@')) {
            (Some(scheme_end), Some(at)) if at > scheme_end => {
                format!("{}://***@{}", &self.url[..scheme_end], &self.url[at + 1..])
            }
            _ => self.url.clone(),
        }
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self::new(DEFAULT_URL)
    }
}

/// Extract the default database from a connection string path segment.
pub fn database_from_url(url: &str) -> Option<String> {
    let rest = &url[url.find("://")? + 3..];
    let path = &rest[rest.find('/')? + 1..];
    let name = path.split('?').next().unwrap_or_default();

    (!name.is_empty()).then(|| name.to_string())
}

/// Environment variables:
/// - `MONGODB_URI`, `MONGODB_URL` or `MONGO_URL` (default: `mongodb://localhost:27017/eventDB`)
/// - `MONGODB_DATABASE` (default: URL path, else `eventDB`)
/// - `MONGODB_APP_NAME` (optional)
/// - `MONGODB_MAX_POOL_SIZE` / `MONGODB_MIN_POOL_SIZE` (default: 100 / 0)
/// - `MONGODB_CONNECT_TIMEOUT_SECS` (default: 5)
/// - `MONGODB_SERVER_SELECTION_TIMEOUT_SECS` (default: 5)
/// - `MONGODB_OPERATION_TIMEOUT_SECS` (default: 10)
#[cfg(feature = "config")]
impl FromEnv for MongoConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = env_first(&["MONGODB_URI", "MONGODB_URL", "MONGO_URL"])
            .unwrap_or_else(|| DEFAULT_URL.to_string());

        let database = std::env::var("MONGODB_DATABASE")
            .ok()
            .or_else(|| database_from_url(&url))
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        Ok(Self {
            database,
            app_name: std::env::var("MONGODB_APP_NAME").ok(),
            max_pool_size: env_parse_or("MONGODB_MAX_POOL_SIZE", 100)?,
            min_pool_size: env_parse_or("MONGODB_MIN_POOL_SIZE", 0)?,
            connect_timeout_secs: env_parse_or("MONGODB_CONNECT_TIMEOUT_SECS", 5)?,
            server_selection_timeout_secs: env_parse_or("MONGODB_SERVER_SELECTION_TIMEOUT_SECS", 5)?,
            operation_timeout_secs: env_parse_or("MONGODB_OPERATION_TIMEOUT_SECS", 10)?,
            url,
        })
    }
}
