//! # Axum Helpers
//!
//! Shared building blocks for the workspace's Axum services.
//!
//! - **[`server`]**: router assembly with OpenAPI UIs, graceful shutdown
//! - **[`http`]**: CORS and security-header middleware
//! - **[`errors`]**: [`AppError`] and the JSON [`ErrorResponse`] envelope
//! - **[`extractors`]**: JSON/query extractors that reject with [`AppError`]
//!
//! ```ignore
//! use axum_helpers::server::{ShutdownCoordinator, create_production_app, create_router};
//!
//! let router = create_router::<ApiDoc>(api_routes)?;
//! create_production_app(router, &config, ShutdownCoordinator::new(), timeout, async {}).await?;
//! ```

pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use server::{
    ShutdownCoordinator, create_production_app, create_router, shutdown_signal,
};

pub use http::{
    cors_layer_from_env, create_cors_layer, create_permissive_cors_layer, security_headers,
};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use errors::responses::{
    BadRequestIdResponse, BadRequestQueryResponse, BadRequestValidationResponse,
    InternalServerErrorResponse, NotFoundResponse,
};

pub use extractors::{ApiJson, ApiQuery};
