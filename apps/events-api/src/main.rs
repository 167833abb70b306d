use axum_helpers::server::{ShutdownCoordinator, create_production_app};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_events::{
    ConnectionState, ConnectionSupervisor, EventService, InMemoryEventStore, MongoEventGateway,
    StorageMode, health_router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{info, warn};

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.environment);

    info!(
        app = config.app.name,
        version = config.app.version,
        "Using MongoDB at {}",
        config.mongodb.redacted_url()
    );

    // The driver connects lazily; nothing here touches the network
    let mongo_client = database::mongodb::build_client(&config.mongodb).await?;
    let db = mongo_client.database(config.mongodb.database());

    let gateway = MongoEventGateway::new(&db).with_operation_timeout(config.operation_timeout());
    let fallback = if config.seed_demo {
        InMemoryEventStore::seeded()
    } else {
        InMemoryEventStore::new()
    };

    let connection = ConnectionState::new();
    let supervisor = ConnectionSupervisor::new(
        Arc::new(gateway.clone()),
        connection.clone(),
        config.supervisor(),
    );

    // Unreachable at startup is expected: serve demo data until it comes up
    if let Err(e) = supervisor.connect().await {
        warn!(error = %e, "MongoDB unavailable at startup, starting in demo mode");
    }

    let shutdown = ShutdownCoordinator::new();
    let supervisor_handle = tokio::spawn(supervisor.run(shutdown.subscribe()));
    tokio::spawn(log_mode_changes(connection.clone(), shutdown.subscribe()));

    let state = AppState {
        events: Arc::new(EventService::new(connection, fallback, gateway)),
        config,
        mongo_client,
        db,
    };

    // Build router with API routes
    let api_routes = api::routes(&state);

    // Create a router with OpenAPI docs
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes)?;

    // Liveness lives at the root, outside /api
    let app = router.merge(health_router(state.events.clone()));

    info!(
        mode = %state.events.mode(),
        "Starting events API with production-ready shutdown (30s timeout)"
    );

    let server_config = state.config.server.clone();
    let mongo_client = state.mongo_client.clone();

    create_production_app(
        app,
        &server_config,
        shutdown,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: stopping connection supervisor");
            supervisor_handle.await.ok();

            info!("Shutting down: closing MongoDB connections");
            mongo_client.shutdown().await;
            info!("MongoDB connection closed successfully");
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Events API shutdown complete");
    Ok(())
}

/// Log every switch between demo and live mode until shutdown.
async fn log_mode_changes(connection: ConnectionState, mut shutdown: watch::Receiver<bool>) {
    let mut status = connection.subscribe();
    let mut mode = connection.current_mode();

    loop {
        tokio::select! {
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                let next = StorageMode::from(*status.borrow_and_update());
                if next == mode {
                    continue;
                }

                match next {
                    StorageMode::External => info!(from = %mode, to = %next, "Switched to live mode"),
                    StorageMode::Fallback => warn!(from = %mode, to = %next, "Switched to demo mode"),
                }
                mode = next;
            }
            _ = shutdown.changed() => break,
        }
    }
}
