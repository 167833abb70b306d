//! MongoEventGateway against a real MongoDB container.
//!
//! Run with `cargo test -p domain_events -- --ignored` (requires Docker).

use domain_events::{
    ConnectionState, ConnectionSupervisor, EventBackend, EventId, EventPatch, ListOptions,
    MongoEventGateway, NewEvent, Probe, StorageMode, SupervisorConfig,
};
use chrono::{TimeZone, Utc};
use std::sync::Arc;
use test_utils::{TestMongo, assertions};

fn new_event(title: &str) -> NewEvent {
    NewEvent {
        title: title.to_string(),
        date: Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap(),
        location: "London".to_string(),
        participants: vec!["Liam Johnson".to_string()],
    }
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_crud_round_trip() {
    let mongo = TestMongo::new().await;
    let gateway = MongoEventGateway::new(&mongo.database());
    gateway.create_indexes().await.unwrap();

    let created = gateway.create(new_event("Blockchain Summit")).await.unwrap();
    assert_eq!(gateway.get(created.id).await.unwrap(), Some(created.clone()));

    let updated = gateway
        .update(
            created.id,
            EventPatch {
                location: Some("Paris".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.location, "Paris");
    assert_eq!(updated.title, created.title);
    assert!(updated.updated_at >= updated.created_at);

    let deleted = assertions::assert_some(
        gateway.delete(created.id).await.unwrap(),
        "delete should return the removed event",
    );
    assert_eq!(deleted, updated);
    assert!(gateway.delete(created.id).await.unwrap().is_none());
    assert!(gateway.get(created.id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_list_filters_sorts_and_counts() {
    let mongo = TestMongo::new().await;
    let gateway = MongoEventGateway::new(&mongo.database());

    for title in ["Rust Meetup", "rust conf", "Go Meetup"] {
        gateway.create(new_event(title)).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let (page, total) = gateway
        .list(ListOptions {
            title: Some("RUST".into()),
            skip: 0,
            limit: 1,
        })
        .await
        .unwrap();
    assert_eq!(total, 2);
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].title, "rust conf");

    let (all, total) = gateway
        .list(ListOptions {
            title: None,
            skip: 1,
            limit: 10,
        })
        .await
        .unwrap();
    assert_eq!(total, 3);
    assert_eq!(all.len(), 2);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_unknown_id_is_none() {
    let mongo = TestMongo::new().await;
    let gateway = MongoEventGateway::new(&mongo.database());

    assert!(gateway.get(EventId::generate()).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_supervisor_connects_to_live_store() {
    let mongo = TestMongo::new().await;
    let gateway = Arc::new(MongoEventGateway::new(&mongo.database()));
    gateway.ping().await.unwrap();

    let state = ConnectionState::new();
    let supervisor = ConnectionSupervisor::new(gateway, state.clone(), SupervisorConfig::default());

    supervisor.connect().await.unwrap();
    assert_eq!(state.current_mode(), StorageMode::External);
}
