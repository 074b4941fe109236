use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::features::repositories::handlers;
use crate::features::repositories::services::RepositoryService;

/// Create routes for the repositories feature
///
/// `/api/repositories/{repository_id}/folders` lives in the folders feature.
pub fn routes(service: Arc<RepositoryService>) -> Router {
    Router::new()
        .route(
            "/api/repositories",
            post(handlers::create_repository).get(handlers::get_repositories),
        )
        .route(
            "/api/repositories/{repository_id}",
            get(handlers::get_repository)
                .put(handlers::update_repository)
                .delete(handlers::delete_repository),
        )
        .route(
            "/api/repositories/{repository_id}/members",
            get(handlers::list_members).post(handlers::add_member),
        )
        .route(
            "/api/repositories/{repository_id}/members/{account_id}",
            delete(handlers::remove_member),
        )
        .route(
            "/api/events/project-created",
            post(handlers::project_created),
        )
        .with_state(service)
}
