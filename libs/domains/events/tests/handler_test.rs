//! HTTP-level tests for the events router

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use domain_events::{
    ConnectionState, EventService, InMemoryEventStore, events_router, health_router,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use test_utils::TestDataBuilder;
use test_utils::assertions::assert_hex_id;
use tower::ServiceExt;

type Service = EventService<InMemoryEventStore, InMemoryEventStore>;

struct TestApp {
    router: Router,
    state: ConnectionState,
}

fn app_with(fallback: InMemoryEventStore) -> TestApp {
    let state = ConnectionState::new();
    let service: Arc<Service> = Arc::new(EventService::new(
        state.clone(),
        fallback,
        InMemoryEventStore::new(),
    ));

    let router = Router::new()
        .nest("/api/events", events_router(service.clone()))
        .merge(health_router(service));

    TestApp { router, state }
}

fn app() -> TestApp {
    app_with(InMemoryEventStore::new())
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn test_create_returns_201_with_envelope() {
    let app = app();
    let payload = TestDataBuilder::from_test_name("test_create_returns_201").event_payload("main");

    let (status, body) = send(&app.router, "POST", "/api/events", Some(payload.clone())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["mode"], "demo");
    assert_eq!(body["message"], "Event created successfully (demo mode)");
    assert_eq!(body["data"]["title"], payload["title"]);
    assert_eq!(body["data"]["createdAt"], body["data"]["updatedAt"]);
    assert_hex_id(body["data"]["_id"].as_str().unwrap(), "created id");
    assert!(body.get("pagination").is_none());
}

#[tokio::test]
async fn test_create_missing_location_is_400() {
    let app = app();

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/events",
        Some(json!({ "title": "Conf", "date": "2024-01-01" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(body["message"].as_str().unwrap().contains("location"));
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let app = app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/events")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_wrong_field_types_are_400() {
    let app = app();

    for payload in [
        json!({ "title": 123, "date": "2023-11-25", "location": "NYC" }),
        json!({ "title": "Conf", "date": "2023-11-25", "location": "NYC", "participants": "bob" }),
    ] {
        let (status, body) = send(&app.router, "POST", "/api/events", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }

    let (_, listed) = send(&app.router, "GET", "/api/events", None).await;
    assert_eq!(listed["pagination"]["totalEvents"], 0);

    let (_, created) = send(
        &app.router,
        "POST",
        "/api/events",
        Some(json!({ "title": "Conf", "date": "2023-11-25", "location": "NYC" })),
    )
    .await;
    let id = created["data"]["_id"].as_str().unwrap();

    let (status, body) = send(
        &app.router,
        "PUT",
        &format!("/api/events/{id}"),
        Some(json!({ "location": ["NYC"] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_get_round_trip_and_not_found() {
    let app = app();
    let (_, created) = send(
        &app.router,
        "POST",
        "/api/events",
        Some(json!({ "title": "Conf", "date": "2023-11-25", "location": "NYC" })),
    )
    .await;
    let id = created["data"]["_id"].as_str().unwrap();

    let (status, body) = send(&app.router, "GET", &format!("/api/events/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], created["data"]);
    assert_eq!(body["message"], "Event retrieved successfully (demo mode)");

    let (status, body) = send(
        &app.router,
        "GET",
        "/api/events/65a1f0c2e4b0a1b2c3d4e5f6",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Event not found");
}

#[tokio::test]
async fn test_invalid_id_is_400_on_every_id_route() {
    let app = app();

    for method in ["GET", "PUT", "DELETE"] {
        let body = (method == "PUT").then(|| json!({ "title": "x" }));
        let (status, body) = send(&app.router, method, "/api/events/abc", body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{method}");
        assert_eq!(body["error"], "INVALID_ID", "{method}");
        assert_eq!(body["message"], "Invalid event ID format", "{method}");
    }
}

#[tokio::test]
async fn test_update_merges_fields() {
    let app = app();
    let (_, created) = send(
        &app.router,
        "POST",
        "/api/events",
        Some(json!({ "title": "Conf", "date": "2023-11-25", "location": "NYC" })),
    )
    .await;
    let id = created["data"]["_id"].as_str().unwrap();

    let (status, body) = send(
        &app.router,
        "PUT",
        &format!("/api/events/{id}"),
        Some(json!({ "location": "Boston" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["location"], "Boston");
    assert_eq!(body["data"]["title"], "Conf");
    assert_eq!(body["message"], "Event updated successfully (demo mode)");
}

#[tokio::test]
async fn test_empty_update_is_400() {
    let app = app();
    let (_, created) = send(
        &app.router,
        "POST",
        "/api/events",
        Some(json!({ "title": "Conf", "date": "2023-11-25", "location": "NYC" })),
    )
    .await;
    let id = created["data"]["_id"].as_str().unwrap();

    let (status, body) = send(&app.router, "PUT", &format!("/api/events/{id}"), Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "At least one field must be provided for update"
    );
}

#[tokio::test]
async fn test_delete_returns_record_then_404() {
    let app = app();
    let (_, created) = send(
        &app.router,
        "POST",
        "/api/events",
        Some(json!({ "title": "Conf", "date": "2023-11-25", "location": "NYC" })),
    )
    .await;
    let uri = format!("/api/events/{}", created["data"]["_id"].as_str().unwrap());

    let (status, body) = send(&app.router, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], created["data"]);

    let (status, _) = send(&app.router, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_seeded_with_pagination() {
    let app = app_with(InMemoryEventStore::seeded());

    let (status, body) = send(&app.router, "GET", "/api/events?page=2&limit=2", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Events retrieved successfully (demo mode)");
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"][0]["title"], "Blockchain Summit");
    assert_eq!(
        body["pagination"],
        json!({ "currentPage": 2, "totalPages": 3, "totalEvents": 5, "limit": 2 })
    );
}

#[tokio::test]
async fn test_list_title_filter() {
    let app = app_with(InMemoryEventStore::seeded());

    let (_, body) = send(&app.router, "GET", "/api/events?title=work", None).await;

    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["title"], "AI/ML Workshop");
    assert_eq!(body["pagination"]["totalEvents"], 1);
}

#[tokio::test]
async fn test_list_rejects_bad_paging() {
    let app = app();

    for uri in ["/api/events?page=0", "/api/events?limit=0", "/api/events?page=abc"] {
        let (status, body) = send(&app.router, "GET", uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["error"], "INVALID_QUERY", "{uri}");
    }
}

#[tokio::test]
async fn test_health_reports_mode_and_connection() {
    let app = app();

    let (status, body) = send(&app.router, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "message": "Server is running",
            "mode": "demo",
            "connection": "disconnected"
        })
    );

    app.state.begin_connect().unwrap();
    app.state.connect_succeeded().unwrap();

    let (_, body) = send(&app.router, "GET", "/health", None).await;
    assert_eq!(body["mode"], "live");
    assert_eq!(body["connection"], "connected");
}

#[tokio::test]
async fn test_live_mode_messages_have_no_suffix() {
    let app = app();
    app.state.begin_connect().unwrap();
    app.state.connect_succeeded().unwrap();

    let (status, body) = send(
        &app.router,
        "POST",
        "/api/events",
        Some(json!({ "title": "Conf", "date": "2023-11-25", "location": "NYC" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["mode"], "live");
    assert_eq!(body["message"], "Event created successfully");
}
