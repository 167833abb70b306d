//! Server infrastructure: router assembly with OpenAPI UIs and graceful shutdown.
//!
//! ```ignore
//! use axum_helpers::server::{ShutdownCoordinator, create_production_app, create_router};
//!
//! let router = create_router::<ApiDoc>(api_routes)?;
//! let shutdown = ShutdownCoordinator::new();
//! create_production_app(router, &config.server, shutdown, Duration::from_secs(30), cleanup).await?;
//! ```

pub mod app;
pub mod shutdown;

pub use app::{create_production_app, create_router};
pub use shutdown::{ShutdownCoordinator, shutdown_signal};
