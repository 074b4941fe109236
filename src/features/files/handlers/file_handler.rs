use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::debug;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{Actor, AppJson, AppQuery};
use crate::features::files::dtos::{
    AddFileDto, DeleteFileResponseDto, FileFilterParams, FileResponseDto, ShareFileParams,
    ShareFileResponseDto, UpdateFileDto, UploadFileDto,
};
use crate::features::files::services::FileService;
use crate::modules::storage::UploadedObject;
use crate::shared::audit::AuditableParams;
use crate::shared::constants::DEFAULT_CONTENT_TYPE;
use crate::shared::pageable::PageableParams;
use crate::shared::types::{ApiResponse, PageableResponse};

/// Add a file to a folder from base64 content
#[utoipa::path(
    post,
    path = "/api/folders/{folder_id}/files",
    tag = "files",
    params(
        ("folder_id" = String, Path, description = "Parent folder id")
    ),
    request_body = AddFileDto,
    responses(
        (status = 201, description = "File added", body = ApiResponse<FileResponseDto>),
        (status = 400, description = "Invalid content or validation error"),
        (status = 404, description = "Folder not found")
    )
)]
pub async fn add_file_to_folder(
    actor: Actor,
    State(service): State<Arc<FileService>>,
    Path(folder_id): Path<String>,
    AppJson(dto): AppJson<AddFileDto>,
) -> Result<(StatusCode, Json<ApiResponse<FileResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let file = service
        .add_file_to_folder(&folder_id, dto, actor.account_id())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::created(file))))
}

/// Upload a file to storage without attaching it to a folder
///
/// Accepts multipart/form-data with a single `file` field. The content type
/// is inferred from the file name.
#[utoipa::path(
    post,
    path = "/api/files/upload",
    tag = "files",
    request_body(
        content = UploadFileDto,
        content_type = "multipart/form-data",
        description = "File upload form",
    ),
    responses(
        (status = 201, description = "File uploaded successfully", body = ApiResponse<UploadedObject>),
        (status = 400, description = "Invalid file"),
        (status = 413, description = "File too large")
    )
)]
pub async fn upload_file(
    State(service): State<Arc<FileService>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<UploadedObject>>)> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        if field_name == "file" {
            let fname = field
                .file_name()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "unnamed".to_string());

            let data = field.bytes().await.map_err(|e| {
                debug!("Failed to read file bytes: {}", e);
                AppError::BadRequest(format!("Failed to read file data: {}", e))
            })?;

            file_data = Some(data.to_vec());
            file_name = Some(fname);
        } else {
            debug!("Ignoring unknown field: {}", field_name);
        }
    }

    let file_data =
        file_data.ok_or_else(|| AppError::BadRequest("File is required".to_string()))?;
    let file_name =
        file_name.ok_or_else(|| AppError::BadRequest("Filename is required".to_string()))?;

    let uploaded = service.upload_raw(file_data, &file_name).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::created(uploaded))))
}

/// List files with filters, sorting and pagination
#[utoipa::path(
    get,
    path = "/api/files",
    tag = "files",
    params(FileFilterParams, AuditableParams, PageableParams),
    responses(
        (status = 200, description = "Page of files", body = ApiResponse<PageableResponse<FileResponseDto>>),
        (status = 400, description = "Invalid filter or sort field")
    )
)]
pub async fn get_files(
    State(service): State<Arc<FileService>>,
    AppQuery(filter): AppQuery<FileFilterParams>,
    AppQuery(audit): AppQuery<AuditableParams>,
    AppQuery(pageable): AppQuery<PageableParams>,
) -> Result<Json<ApiResponse<PageableResponse<FileResponseDto>>>> {
    let page = service.get_files(&filter, &audit, &pageable).await?;
    Ok(Json(ApiResponse::success(Some(page), None)))
}

/// Get file metadata
#[utoipa::path(
    get,
    path = "/api/files/{file_id}",
    tag = "files",
    params(
        ("file_id" = String, Path, description = "File id")
    ),
    responses(
        (status = 200, description = "File found", body = ApiResponse<FileResponseDto>),
        (status = 404, description = "File not found")
    )
)]
pub async fn get_file(
    State(service): State<Arc<FileService>>,
    Path(file_id): Path<String>,
) -> Result<Json<ApiResponse<FileResponseDto>>> {
    let file = service.get_file_detail(&file_id).await?;
    Ok(Json(ApiResponse::success(Some(file), None)))
}

/// Rename a file or change its description
#[utoipa::path(
    put,
    path = "/api/files/{file_id}",
    tag = "files",
    params(
        ("file_id" = String, Path, description = "File id")
    ),
    request_body = UpdateFileDto,
    responses(
        (status = 200, description = "File updated", body = ApiResponse<FileResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "File not found")
    )
)]
pub async fn update_file(
    actor: Actor,
    State(service): State<Arc<FileService>>,
    Path(file_id): Path<String>,
    AppJson(dto): AppJson<UpdateFileDto>,
) -> Result<Json<ApiResponse<FileResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let file = service
        .update_file(&file_id, dto, actor.account_id())
        .await?;
    Ok(Json(ApiResponse::success(Some(file), None)))
}

/// Delete a file and its stored content
#[utoipa::path(
    delete,
    path = "/api/files/{file_id}",
    tag = "files",
    params(
        ("file_id" = String, Path, description = "File id")
    ),
    responses(
        (status = 200, description = "File deleted successfully", body = ApiResponse<DeleteFileResponseDto>),
        (status = 404, description = "File not found")
    )
)]
pub async fn delete_file(
    State(service): State<Arc<FileService>>,
    Path(file_id): Path<String>,
) -> Result<Json<ApiResponse<DeleteFileResponseDto>>> {
    service.delete_file(&file_id).await?;

    Ok(Json(ApiResponse::success(
        Some(DeleteFileResponseDto { deleted: true }),
        Some("File deleted successfully".to_string()),
    )))
}

/// Download file content
#[utoipa::path(
    get,
    path = "/api/files/{file_id}/download",
    tag = "files",
    params(
        ("file_id" = String, Path, description = "File id")
    ),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream"),
        (status = 404, description = "File not found")
    )
)]
pub async fn download_file(
    State(service): State<Arc<FileService>>,
    Path(file_id): Path<String>,
) -> Result<Response> {
    let (file, data) = service.download_file(&file_id).await?;

    let content_type = HeaderValue::try_from(file.mime_type.as_str())
        .unwrap_or(HeaderValue::from_static(DEFAULT_CONTENT_TYPE));

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, content_disposition(&file.file_name)),
        ],
        data,
    )
        .into_response())
}

/// `attachment` disposition carrying the name as given and percent-encoded;
/// names a header cannot hold fall back to an ASCII rendition
fn content_disposition(file_name: &str) -> HeaderValue {
    let encoded = urlencoding::encode(file_name);
    let quoted = file_name.replace(['"', '\\'], "_");

    HeaderValue::try_from(format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        quoted, encoded
    ))
    .or_else(|_| {
        let ascii: String = quoted
            .chars()
            .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '_' })
            .collect();
        HeaderValue::try_from(format!(
            "attachment; filename=\"{}\"; filename*=UTF-8''{}",
            ascii, encoded
        ))
    })
    .unwrap_or(HeaderValue::from_static("attachment"))
}

/// Create a time-limited link to the file content
#[utoipa::path(
    get,
    path = "/api/files/{file_id}/share",
    tag = "files",
    params(
        ("file_id" = String, Path, description = "File id"),
        ShareFileParams
    ),
    responses(
        (status = 200, description = "Presigned URL", body = ApiResponse<ShareFileResponseDto>),
        (status = 400, description = "Invalid expiry"),
        (status = 404, description = "File not found")
    )
)]
pub async fn share_file(
    State(service): State<Arc<FileService>>,
    Path(file_id): Path<String>,
    AppQuery(params): AppQuery<ShareFileParams>,
) -> Result<Json<ApiResponse<ShareFileResponseDto>>> {
    let link = service.share_file(&file_id, params.expires_in).await?;
    Ok(Json(ApiResponse::success(Some(link), None)))
}
