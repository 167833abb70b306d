//! MongoDB test infrastructure
//!
//! Provides a `TestMongo` helper that creates a MongoDB container for testing.

use mongodb::bson::doc;
use mongodb::{Client, Database};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::mongo::Mongo;

/// Test MongoDB wrapper that ensures proper cleanup
///
/// The container is automatically stopped and removed when this struct is dropped.
///
/// # Example
///
/// ```no_run
/// use test_utils::TestMongo;
///
/// # async fn example() {
/// let mongo = TestMongo::new().await;
/// let db = mongo.database();
///
/// db.collection::<mongodb::bson::Document>("events")
///     .insert_one(mongodb::bson::doc! { "title": "Conf" })
///     .await
///     .unwrap();
/// # }
/// ```
pub struct TestMongo {
    #[allow(dead_code)]
    container: ContainerAsync<Mongo>,
    client: Client,
    pub connection_string: String,
    pub database_name: String,
}

impl TestMongo {
    /// Create a new test MongoDB instance with a fresh database
    ///
    /// Uses the MongoDB 7 image.
    pub async fn new() -> Self {
        Self::with_database("eventDB_test").await
    }

    pub async fn with_database(database_name: &str) -> Self {
        let container = Mongo::default()
            .with_tag("7.0")
            .start()
            .await
            .expect("Failed to start MongoDB container");

        let host_port = container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get MongoDB port");

        let connection_string = format!("mongodb://127.0.0.1:{}/{}", host_port, database_name);

        let client = Client::with_uri_str(&connection_string)
            .await
            .expect("Failed to create MongoDB client");

        client
            .database(database_name)
            .run_command(doc! { "ping": 1 })
            .await
            .expect("Failed to ping MongoDB");

        tracing::info!(port = host_port, "Test MongoDB ready (mongo 7.0)");

        Self {
            container,
            client,
            connection_string,
            database_name: database_name.to_string(),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Handle to the test database
    pub fn database(&self) -> Database {
        self.client.database(&self.database_name)
    }

    /// Drop every collection in the test database
    pub async fn reset(&self) {
        self.database()
            .drop()
            .await
            .expect("Failed to drop test database");
    }
}
