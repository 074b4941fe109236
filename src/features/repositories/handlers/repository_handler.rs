use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{Actor, AppJson, AppQuery};
use crate::features::repositories::dtos::{
    AddMemberDto, CreateRepositoryDto, DeleteRepositoryResponseDto, MemberResponseDto,
    RepositoryDetailDto, RepositoryFilterParams, RepositoryResponseDto, UpdateRepositoryDto,
};
use crate::features::repositories::services::RepositoryService;
use crate::shared::audit::AuditableParams;
use crate::shared::pageable::PageableParams;
use crate::shared::types::{ApiResponse, PageableResponse};

/// Create a repository for an external project
#[utoipa::path(
    post,
    path = "/api/repositories",
    tag = "repositories",
    request_body = CreateRepositoryDto,
    responses(
        (status = 201, description = "Repository created", body = ApiResponse<RepositoryResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Repository already exists")
    )
)]
pub async fn create_repository(
    actor: Actor,
    State(service): State<Arc<RepositoryService>>,
    AppJson(dto): AppJson<CreateRepositoryDto>,
) -> Result<(StatusCode, Json<ApiResponse<RepositoryResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let repository = service.create_repository(dto, actor.account_id()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::created(repository))))
}

/// List repositories with filters, sorting and pagination
#[utoipa::path(
    get,
    path = "/api/repositories",
    tag = "repositories",
    params(RepositoryFilterParams, AuditableParams, PageableParams),
    responses(
        (status = 200, description = "Page of repositories", body = ApiResponse<PageableResponse<RepositoryResponseDto>>),
        (status = 400, description = "Invalid filter or sort field")
    )
)]
pub async fn get_repositories(
    State(service): State<Arc<RepositoryService>>,
    AppQuery(filter): AppQuery<RepositoryFilterParams>,
    AppQuery(audit): AppQuery<AuditableParams>,
    AppQuery(pageable): AppQuery<PageableParams>,
) -> Result<Json<ApiResponse<PageableResponse<RepositoryResponseDto>>>> {
    let page = service.get_repositories(&filter, &audit, &pageable).await?;
    Ok(Json(ApiResponse::success(Some(page), None)))
}

/// Get a repository with its root folders and members
#[utoipa::path(
    get,
    path = "/api/repositories/{repository_id}",
    tag = "repositories",
    params(
        ("repository_id" = String, Path, description = "Repository (project) id")
    ),
    responses(
        (status = 200, description = "Repository found", body = ApiResponse<RepositoryDetailDto>),
        (status = 404, description = "Repository not found")
    )
)]
pub async fn get_repository(
    State(service): State<Arc<RepositoryService>>,
    Path(repository_id): Path<String>,
) -> Result<Json<ApiResponse<RepositoryDetailDto>>> {
    let repository = service.get_repository_detail(&repository_id).await?;
    Ok(Json(ApiResponse::success(Some(repository), None)))
}

/// Update repository name and description
#[utoipa::path(
    put,
    path = "/api/repositories/{repository_id}",
    tag = "repositories",
    params(
        ("repository_id" = String, Path, description = "Repository (project) id")
    ),
    request_body = UpdateRepositoryDto,
    responses(
        (status = 200, description = "Repository updated", body = ApiResponse<RepositoryResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Repository not found")
    )
)]
pub async fn update_repository(
    actor: Actor,
    State(service): State<Arc<RepositoryService>>,
    Path(repository_id): Path<String>,
    AppJson(dto): AppJson<UpdateRepositoryDto>,
) -> Result<Json<ApiResponse<RepositoryResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let repository = service
        .update_repository(&repository_id, dto, actor.account_id())
        .await?;
    Ok(Json(ApiResponse::success(Some(repository), None)))
}

/// Delete a repository with all of its folders, files and members
#[utoipa::path(
    delete,
    path = "/api/repositories/{repository_id}",
    tag = "repositories",
    params(
        ("repository_id" = String, Path, description = "Repository (project) id")
    ),
    responses(
        (status = 200, description = "Repository deleted", body = ApiResponse<DeleteRepositoryResponseDto>),
        (status = 404, description = "Repository not found")
    )
)]
pub async fn delete_repository(
    State(service): State<Arc<RepositoryService>>,
    Path(repository_id): Path<String>,
) -> Result<Json<ApiResponse<DeleteRepositoryResponseDto>>> {
    let result = service.delete_repository(&repository_id).await?;
    Ok(Json(ApiResponse::success(
        Some(result),
        Some("Repository deleted successfully".to_string()),
    )))
}

/// List repository members
#[utoipa::path(
    get,
    path = "/api/repositories/{repository_id}/members",
    tag = "repositories",
    params(
        ("repository_id" = String, Path, description = "Repository (project) id")
    ),
    responses(
        (status = 200, description = "Members of the repository", body = ApiResponse<Vec<MemberResponseDto>>),
        (status = 404, description = "Repository not found")
    )
)]
pub async fn list_members(
    State(service): State<Arc<RepositoryService>>,
    Path(repository_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<MemberResponseDto>>>> {
    let members = service.list_members(&repository_id).await?;
    Ok(Json(ApiResponse::success(Some(members), None)))
}

/// Add an account to a repository
#[utoipa::path(
    post,
    path = "/api/repositories/{repository_id}/members",
    tag = "repositories",
    params(
        ("repository_id" = String, Path, description = "Repository (project) id")
    ),
    request_body = AddMemberDto,
    responses(
        (status = 201, description = "Member added", body = ApiResponse<MemberResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Repository not found"),
        (status = 409, description = "Account is already a member")
    )
)]
pub async fn add_member(
    actor: Actor,
    State(service): State<Arc<RepositoryService>>,
    Path(repository_id): Path<String>,
    AppJson(dto): AppJson<AddMemberDto>,
) -> Result<(StatusCode, Json<ApiResponse<MemberResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let member = service
        .add_member(&repository_id, dto, actor.account_id())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::created(member))))
}

/// Remove an account from a repository
#[utoipa::path(
    delete,
    path = "/api/repositories/{repository_id}/members/{account_id}",
    tag = "repositories",
    params(
        ("repository_id" = String, Path, description = "Repository (project) id"),
        ("account_id" = String, Path, description = "Member account id")
    ),
    responses(
        (status = 200, description = "Member removed"),
        (status = 404, description = "Repository or member not found")
    )
)]
pub async fn remove_member(
    State(service): State<Arc<RepositoryService>>,
    Path((repository_id, account_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<()>>> {
    service.remove_member(&repository_id, &account_id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Member removed successfully".to_string()),
    )))
}
