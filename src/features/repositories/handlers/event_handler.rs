use std::sync::Arc;

use axum::{extract::State, Json};
use tracing::info;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::repositories::dtos::{ProjectCreatedEvent, RepositoryResponseDto};
use crate::features::repositories::services::RepositoryService;
use crate::shared::types::ApiResponse;

/// Consume a project-creation event
///
/// Provisions the project's repository and makes the creating account its
/// owner. Safe to deliver more than once.
#[utoipa::path(
    post,
    path = "/api/events/project-created",
    tag = "events",
    request_body = ProjectCreatedEvent,
    responses(
        (status = 200, description = "Repository provisioned", body = ApiResponse<RepositoryResponseDto>),
        (status = 400, description = "Malformed event")
    )
)]
pub async fn project_created(
    State(service): State<Arc<RepositoryService>>,
    AppJson(event): AppJson<ProjectCreatedEvent>,
) -> Result<Json<ApiResponse<RepositoryResponseDto>>> {
    event
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    info!(
        "Received project-created event: project={}, account={}",
        event.project_id, event.account_id
    );

    let repository = service.handle_project_created(event).await?;
    Ok(Json(ApiResponse::success(Some(repository), None)))
}
