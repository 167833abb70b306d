use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::not_found;
use crate::http::{cors_layer_from_env, security_headers};
use axum::{Router, middleware};
use core_config::server::ServerConfig;
use std::future::Future;
use std::io;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};
use utoipa::OpenApi;

/// Wrap domain routes with docs and cross-cutting middleware.
///
/// - OpenAPI UIs: `/scalar`, `/redoc`, `/rapidoc` (spec at `/api-docs/openapi.json`)
/// - `apis` nested under `/api`
/// - JSON 404 fallback
/// - tracing, security headers, CORS (`CORS_ALLOWED_ORIGIN`), compression
///
/// Routes merged into the returned router after this call (e.g. `/health`)
/// are not covered by the layers.
///
/// # Errors
/// Fails when `CORS_ALLOWED_ORIGIN` is set but empty or invalid.
pub fn create_router<T>(apis: Router) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    use utoipa_rapidoc::RapiDoc;
    use utoipa_redoc::{Redoc, Servable as RedocServable};
    use utoipa_scalar::{Scalar, Servable as ScalarServable};

    let cors_layer = cors_layer_from_env()?;

    let router = Router::new()
        .merge(Redoc::with_url("/redoc", T::openapi()))
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", T::openapi()).path("/rapidoc"))
        .merge(Scalar::with_url("/scalar", T::openapi()))
        .nest("/api", apis)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers))
        .layer(cors_layer)
        .layer(CompressionLayer::new());

    Ok(router)
}

/// Serve with coordinated shutdown and a bounded cleanup phase.
///
/// `shutdown` is triggered by SIGINT/SIGTERM (or by anyone holding a clone);
/// background tasks subscribed to it stop alongside the HTTP server. `cleanup`
/// runs once shutdown starts and is abandoned after `shutdown_timeout`.
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown: ShutdownCoordinator,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let signal_watcher = shutdown.clone();
    tokio::spawn(async move { signal_watcher.wait_for_signal().await });

    let cleanup_trigger = shutdown.clone();
    let cleanup_handle = tokio::spawn(async move {
        cleanup_trigger.wait().await;

        info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
        match tokio::time::timeout(shutdown_timeout, cleanup).await {
            Ok(_) => info!("Cleanup completed successfully"),
            Err(_) => warn!(
                "Cleanup exceeded timeout of {:?}, forcing shutdown",
                shutdown_timeout
            ),
        }
    });

    let server_shutdown = shutdown.clone();
    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move { server_shutdown.wait().await })
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        });

    // Server may also stop on its own error; make sure cleanup still runs.
    shutdown.shutdown();
    cleanup_handle.await.ok();

    serve_result
}
