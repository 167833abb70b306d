use mongodb::{
    Client, Database,
    bson::doc,
    options::ClientOptions,
};
use std::time::Duration;
use tracing::debug;

use super::MongoConfig;
use crate::common::{DatabaseError, DatabaseResult};

/// Build a client from config without touching the network.
///
/// The driver connects lazily, so a client for an unreachable server is
/// still returned here. Use [`ping`] to verify.
pub async fn build_client(config: &MongoConfig) -> DatabaseResult<Client> {
    let mut options = ClientOptions::parse(&config.url).await?;

    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);
    options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
    options.server_selection_timeout =
        Some(Duration::from_secs(config.server_selection_timeout_secs));

    if let Some(ref app_name) = config.app_name {
        options.app_name = Some(app_name.clone());
    }

    debug!(url = %config.redacted_url(), "Built MongoDB client");
    Ok(Client::with_options(options)?)
}

/// Round-trip a `ping` command against `database`.
pub async fn ping(database: &Database) -> DatabaseResult<()> {
    database
        .run_command(doc! { "ping": 1 })
        .await
        .map(|_| ())
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))
}
