//! Fixtures for service and HTTP tests

use std::sync::Arc;

use axum_test::TestServer;

use crate::app::{api_routes, AppServices};
use crate::core::database::DocumentStores;
use crate::modules::storage::{MemoryObjectStorage, StorageService};

pub const TEST_CDN_URL: &str = "http://cdn.test/depot";

/// In-memory document stores, a storage proxy, and the bucket behind it
pub fn test_stores_with_bucket() -> (DocumentStores, Arc<StorageService>, Arc<MemoryObjectStorage>) {
    let bucket = Arc::new(MemoryObjectStorage::new("test-bucket"));
    let storage = StorageService::new(bucket.clone(), TEST_CDN_URL, 3600);
    (DocumentStores::in_memory(), Arc::new(storage), bucket)
}

/// In-memory document stores plus a storage proxy over an in-memory bucket
pub fn test_stores() -> (DocumentStores, Arc<StorageService>) {
    let (stores, storage, _) = test_stores_with_bucket();
    (stores, storage)
}

/// The full API router over in-memory backends, with the bucket exposed
pub fn test_server_with_bucket() -> (TestServer, Arc<MemoryObjectStorage>) {
    let (stores, storage, bucket) = test_stores_with_bucket();
    let services = AppServices::new(stores, storage);
    let server = TestServer::new(api_routes(services)).expect("failed to start test server");
    (server, bucket)
}

/// The full API router over in-memory backends
pub fn test_server() -> TestServer {
    test_server_with_bucket().0
}
