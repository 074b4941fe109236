use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::files::handlers;
use crate::features::files::services::FileService;
use crate::shared::constants::MAX_FILE_SIZE;

/// Base64 inflates content by a third; leave room for the JSON around it
const BASE64_BODY_LIMIT: usize = MAX_FILE_SIZE / 3 * 4 + 1024 * 1024;

/// Create routes for the files feature
pub fn routes(file_service: Arc<FileService>) -> Router {
    Router::new()
        .route(
            "/api/files/upload",
            // Allow body size up to MAX_FILE_SIZE + buffer for multipart overhead
            post(handlers::upload_file).layer(DefaultBodyLimit::max(MAX_FILE_SIZE + 1024 * 1024)),
        )
        .route(
            "/api/folders/{folder_id}/files",
            post(handlers::add_file_to_folder).layer(DefaultBodyLimit::max(BASE64_BODY_LIMIT)),
        )
        .route("/api/files", get(handlers::get_files))
        .route(
            "/api/files/{file_id}",
            get(handlers::get_file)
                .put(handlers::update_file)
                .delete(handlers::delete_file),
        )
        .route("/api/files/{file_id}/download", get(handlers::download_file))
        .route("/api/files/{file_id}/share", get(handlers::share_file))
        .with_state(file_service)
}
