use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::folders::handlers;
use crate::features::folders::services::FolderService;

/// Create routes for the folders feature
pub fn routes(service: Arc<FolderService>) -> Router {
    Router::new()
        .route(
            "/api/repositories/{repository_id}/folders",
            get(handlers::get_folders_by_repository).post(handlers::create_folder_in_repository),
        )
        .route(
            "/api/folders/{folder_id}/folders",
            post(handlers::create_folder_in_folder),
        )
        .route(
            "/api/folders/{folder_id}",
            get(handlers::get_folder)
                .put(handlers::update_folder)
                .delete(handlers::delete_folder),
        )
        .with_state(service)
}
