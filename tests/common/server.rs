//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server with its own song database and its own
//! fake lookup service.

use super::constants::*;
use super::fixtures::create_test_library;
use super::lookup::{FakeLookupService, LookupBehavior};
use song_library_server::server::{make_app, RequestsLoggingLevel, ServerConfig};
use song_library_server::song_service::{HttpSongDetailsLookup, SongService};
use song_library_server::song_store::SqliteSongStore;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Timeout of the lookup HTTP client, longer than any delay tests configure.
const LOOKUP_TIMEOUT_SECS: u64 = 8;

/// Test server instance with an isolated song database
///
/// When dropped, the server gracefully shuts down and temp resources are cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// Store for direct database access in tests
    pub store: SqliteSongStore,

    /// Ids of the seeded songs, in insertion order
    pub song_ids: Vec<i64>,

    /// The fake lookup service this server enriches songs from
    pub lookup: FakeLookupService,

    // Private fields - keep resources alive until drop
    _temp_db_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a new test server on a random port with a well behaved lookup service
    pub async fn spawn() -> Self {
        Self::spawn_with_lookup(LookupBehavior::Answer).await
    }

    /// Spawns a new test server whose lookup service behaves as given
    ///
    /// # Panics
    ///
    /// Panics if the database cannot be seeded, binding fails, or the server
    /// doesn't become ready within timeout.
    pub async fn spawn_with_lookup(behavior: LookupBehavior) -> Self {
        let lookup = FakeLookupService::spawn(behavior).await;

        let (temp_db_dir, store, song_ids) =
            create_test_library().expect("Failed to create test library");

        let details_lookup = Arc::new(
            HttpSongDetailsLookup::new(lookup.url.clone(), LOOKUP_TIMEOUT_SECS)
                .expect("Failed to create lookup client"),
        );
        let song_service = Arc::new(SongService::new(Arc::new(store.clone()), details_lookup));

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
            request_timeout_sec: 10,
        };
        let app = make_app(config, song_service);

        // Spawn server in background task with graceful shutdown
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            store,
            song_ids,
            lookup,
            _temp_db_dir: temp_db_dir,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the / endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
        // TempDir will be cleaned up automatically
    }
}
