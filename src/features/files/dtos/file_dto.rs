use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::files::models::File;
use crate::shared::audit::AuditDto;
use crate::shared::validation::{MIME_TYPE_REGEX, NAME_REGEX};

/// Request DTO for adding a file to a folder
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddFileDto {
    /// Display name; its extension drives content-type inference
    #[validate(
        length(min = 1, max = 255, message = "file_name must be 1-255 characters"),
        regex(path = *NAME_REGEX, message = "file_name must not contain path separators or control characters")
    )]
    #[schema(example = "report.pdf")]
    pub file_name: String,

    /// Base64 content, bare or as a `data:<mime>;base64,` URL
    #[validate(length(min = 1, message = "content is required"))]
    #[schema(example = "data:application/pdf;base64,JVBERi0xLjQK")]
    pub content: String,

    /// Overrides the inferred media type
    #[validate(
        length(min = 3, max = 255, message = "mime_type must be 3-255 characters"),
        regex(path = *MIME_TYPE_REGEX, message = "mime_type must look like 'type/subtype'")
    )]
    #[schema(example = "application/pdf")]
    pub mime_type: Option<String>,

    /// Expected decoded size in bytes; rejected if it does not match
    #[validate(range(min = 0, message = "size must not be negative"))]
    pub size: Option<i64>,

    #[validate(length(max = 1000, message = "description must not exceed 1000 characters"))]
    pub description: Option<String>,
}

/// Request DTO for updating file metadata
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateFileDto {
    #[validate(
        length(min = 1, max = 255, message = "file_name must be 1-255 characters"),
        regex(path = *NAME_REGEX, message = "file_name must not contain path separators or control characters")
    )]
    pub file_name: Option<String>,

    #[validate(length(max = 1000, message = "description must not exceed 1000 characters"))]
    pub description: Option<String>,
}

/// Upload file request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadFileDto {
    /// The file to upload
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

/// Response DTO for file operations
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FileResponseDto {
    pub file_id: String,
    pub folder_id: String,
    pub file_name: String,
    /// Object-store key of the content
    pub file_key: String,
    pub mime_type: String,
    /// Size of the file in bytes
    pub size: i64,
    /// Public (CDN) URL of the content
    pub url: String,
    pub description: Option<String>,
    #[serde(flatten)]
    pub audit: AuditDto,
}

impl FileResponseDto {
    pub fn from_model(file: File, url: String) -> Self {
        Self {
            file_id: file.id,
            folder_id: file.folder_id,
            file_name: file.file_name,
            file_key: file.file_key,
            mime_type: file.mime_type,
            size: file.size,
            url,
            description: file.description,
            audit: file.audit.into(),
        }
    }
}

/// Filters for the file list
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FileFilterParams {
    /// Exact file id
    pub file_id: Option<String>,
    /// Regular expression matched against the file name
    pub file_name: Option<String>,
    /// Regular expression matched against the description
    pub description: Option<String>,
    /// Exact parent folder id
    pub folder_id: Option<String>,
    /// Exact media type
    pub mime_type: Option<String>,
}

/// Query params for sharing a file
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ShareFileParams {
    /// Link lifetime in seconds (1..=604800, default: configured expiry)
    pub expires_in: Option<u32>,
}

/// Response DTO for a presigned share link
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ShareFileResponseDto {
    pub file_id: String,
    pub url: String,
    /// Requested lifetime in seconds, if one was given
    pub expires_in: Option<u32>,
}

/// Response DTO for delete operations
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteFileResponseDto {
    /// Confirmation that the file was deleted
    pub deleted: bool,
}
