use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{Actor, AppJson, AppQuery};
use crate::features::folders::dtos::{
    CreateFolderDto, DeleteFolderResponseDto, FolderDetailDto, FolderFilterParams,
    FolderResponseDto, UpdateFolderDto,
};
use crate::features::folders::services::FolderService;
use crate::shared::audit::AuditableParams;
use crate::shared::pageable::PageableParams;
use crate::shared::types::{ApiResponse, PageableResponse};

/// Create a folder at the top level of a repository
#[utoipa::path(
    post,
    path = "/api/repositories/{repository_id}/folders",
    tag = "folders",
    params(
        ("repository_id" = String, Path, description = "Repository (project) id")
    ),
    request_body = CreateFolderDto,
    responses(
        (status = 201, description = "Folder created", body = ApiResponse<FolderResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Repository not found")
    )
)]
pub async fn create_folder_in_repository(
    actor: Actor,
    State(service): State<Arc<FolderService>>,
    Path(repository_id): Path<String>,
    AppJson(dto): AppJson<CreateFolderDto>,
) -> Result<(StatusCode, Json<ApiResponse<FolderResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let folder = service
        .create_folder_in_repository(&repository_id, dto, actor.account_id())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::created(folder))))
}

/// List the folders of a repository at any depth
#[utoipa::path(
    get,
    path = "/api/repositories/{repository_id}/folders",
    tag = "folders",
    params(
        ("repository_id" = String, Path, description = "Repository (project) id"),
        FolderFilterParams,
        AuditableParams,
        PageableParams
    ),
    responses(
        (status = 200, description = "Page of folders", body = ApiResponse<PageableResponse<FolderResponseDto>>),
        (status = 400, description = "Invalid filter or sort field"),
        (status = 404, description = "Repository not found")
    )
)]
pub async fn get_folders_by_repository(
    State(service): State<Arc<FolderService>>,
    Path(repository_id): Path<String>,
    AppQuery(filter): AppQuery<FolderFilterParams>,
    AppQuery(audit): AppQuery<AuditableParams>,
    AppQuery(pageable): AppQuery<PageableParams>,
) -> Result<Json<ApiResponse<PageableResponse<FolderResponseDto>>>> {
    let page = service
        .get_folders_by_repository(&repository_id, &filter, &audit, &pageable)
        .await?;
    Ok(Json(ApiResponse::success(Some(page), None)))
}

/// Create a folder inside another folder
#[utoipa::path(
    post,
    path = "/api/folders/{folder_id}/folders",
    tag = "folders",
    params(
        ("folder_id" = String, Path, description = "Parent folder id")
    ),
    request_body = CreateFolderDto,
    responses(
        (status = 201, description = "Folder created", body = ApiResponse<FolderResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Parent folder not found")
    )
)]
pub async fn create_folder_in_folder(
    actor: Actor,
    State(service): State<Arc<FolderService>>,
    Path(folder_id): Path<String>,
    AppJson(dto): AppJson<CreateFolderDto>,
) -> Result<(StatusCode, Json<ApiResponse<FolderResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let folder = service
        .create_folder_in_folder(&folder_id, dto, actor.account_id())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::created(folder))))
}

/// Get a folder with its direct subfolders and files
#[utoipa::path(
    get,
    path = "/api/folders/{folder_id}",
    tag = "folders",
    params(
        ("folder_id" = String, Path, description = "Folder id")
    ),
    responses(
        (status = 200, description = "Folder found", body = ApiResponse<FolderDetailDto>),
        (status = 404, description = "Folder not found")
    )
)]
pub async fn get_folder(
    State(service): State<Arc<FolderService>>,
    Path(folder_id): Path<String>,
) -> Result<Json<ApiResponse<FolderDetailDto>>> {
    let folder = service.get_folder_detail(&folder_id).await?;
    Ok(Json(ApiResponse::success(Some(folder), None)))
}

/// Rename a folder or change its description
#[utoipa::path(
    put,
    path = "/api/folders/{folder_id}",
    tag = "folders",
    params(
        ("folder_id" = String, Path, description = "Folder id")
    ),
    request_body = UpdateFolderDto,
    responses(
        (status = 200, description = "Folder updated", body = ApiResponse<FolderResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Folder not found")
    )
)]
pub async fn update_folder(
    actor: Actor,
    State(service): State<Arc<FolderService>>,
    Path(folder_id): Path<String>,
    AppJson(dto): AppJson<UpdateFolderDto>,
) -> Result<Json<ApiResponse<FolderResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let folder = service
        .update_folder(&folder_id, dto, actor.account_id())
        .await?;
    Ok(Json(ApiResponse::success(Some(folder), None)))
}

/// Delete a folder with everything below it
#[utoipa::path(
    delete,
    path = "/api/folders/{folder_id}",
    tag = "folders",
    params(
        ("folder_id" = String, Path, description = "Folder id")
    ),
    responses(
        (status = 200, description = "Folder deleted", body = ApiResponse<DeleteFolderResponseDto>),
        (status = 404, description = "Folder not found")
    )
)]
pub async fn delete_folder(
    State(service): State<Arc<FolderService>>,
    Path(folder_id): Path<String>,
) -> Result<Json<ApiResponse<DeleteFolderResponseDto>>> {
    let result = service.delete_folder(&folder_id).await?;
    Ok(Json(ApiResponse::success(
        Some(result),
        Some("Folder deleted successfully".to_string()),
    )))
}
