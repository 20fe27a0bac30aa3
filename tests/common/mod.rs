//! Common test utilities

use std::path::Path;
use std::sync::Arc;

use shelfd::api::{build_router, AppState};
use shelfd::catalog::CatalogRepository;
use shelfd::store::JsonFileStore;
use tempfile::TempDir;

/// Create a temporary directory for testing
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Start the daemon on an ephemeral port, backed by the given catalog
/// file, and return the base URL.
#[allow(dead_code)] // Test utility for integration tests
pub async fn spawn_app(store_path: &Path) -> String {
    let store = JsonFileStore::new(store_path);
    let repository = CatalogRepository::open(Box::new(store))
        .await
        .expect("Failed to open catalog");
    let app = build_router(AppState::new(Arc::new(repository)));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server error");
    });
    format!("http://{addr}")
}
