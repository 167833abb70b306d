//! OpenAPI documentation configuration

use utoipa::{Modify, OpenApi};

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Events API",
        version = "0.1.0",
        description = "Event management backed by MongoDB, with an in-memory demo mode while the database is unreachable. Event routes are served under `/api/events` (previously `/events`); liveness stays at `/health`.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    nest(
        (path = "/api/events", api = domain_events::ApiDoc)
    ),
    modifiers(&RootRoutes),
    tags(
        (name = "events", description = "Event management with MongoDB and an in-memory fallback"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

/// Adds `/health`, which is served at the root rather than under `/api`
struct RootRoutes;

impl Modify for RootRoutes {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.merge(domain_events::HealthApiDoc::openapi());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_are_documented() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert!(paths.iter().any(|p| p.as_str() == "/health"));
        assert!(paths.iter().any(|p| p.starts_with("/api/events")));
        assert!(paths.iter().any(|p| p.as_str() == "/api/events/{id}"));
        assert!(!paths.iter().any(|p| p.starts_with("/events")));
    }

    #[test]
    fn test_description_names_the_events_base_path() {
        let doc = ApiDoc::openapi();
        let description = doc.info.description.unwrap_or_default();

        assert!(description.contains("`/api/events`"));
        assert!(description.contains("previously `/events`"));
    }
}
