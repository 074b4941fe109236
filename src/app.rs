//! Service wiring and the API router, shared by `main` and the HTTP tests

use std::sync::Arc;

use axum::{http::StatusCode, routing::get, Router};

use crate::core::database::DocumentStores;
use crate::features::files::{routes as files_routes, FileService};
use crate::features::folders::{routes as folders_routes, FolderService};
use crate::features::repositories::{routes as repositories_routes, RepositoryService};
use crate::modules::storage::StorageService;

/// Feature services over one set of stores and one storage proxy
#[derive(Clone)]
pub struct AppServices {
    pub repositories: Arc<RepositoryService>,
    pub folders: Arc<FolderService>,
    pub files: Arc<FileService>,
}

impl AppServices {
    pub fn new(stores: DocumentStores, storage: Arc<StorageService>) -> Self {
        Self {
            repositories: Arc::new(RepositoryService::new(
                stores.clone(),
                Arc::clone(&storage),
            )),
            folders: Arc::new(FolderService::new(stores.clone(), Arc::clone(&storage))),
            files: Arc::new(FileService::new(stores, storage)),
        }
    }
}

// Simple health check endpoint
async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// All API routes plus `/health`, without docs or cross-cutting layers
pub fn api_routes(services: AppServices) -> Router {
    Router::new()
        .merge(repositories_routes::routes(services.repositories))
        .merge(folders_routes::routes(services.folders))
        .merge(files_routes::routes(services.files))
        .route("/health", get(health_check))
}
