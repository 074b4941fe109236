use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::files::dtos::FileResponseDto;
use crate::features::folders::models::Folder;
use crate::shared::audit::AuditDto;
use crate::shared::validation::NAME_REGEX;

/// Request DTO for creating a folder
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateFolderDto {
    #[validate(
        length(min = 1, max = 255, message = "folder_name must be 1-255 characters"),
        regex(path = *NAME_REGEX, message = "folder_name must not contain path separators or control characters")
    )]
    #[schema(example = "Designs")]
    pub folder_name: String,

    #[validate(length(max = 1000, message = "description must not exceed 1000 characters"))]
    pub description: Option<String>,
}

/// Request DTO for updating a folder
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateFolderDto {
    #[validate(
        length(min = 1, max = 255, message = "folder_name must be 1-255 characters"),
        regex(path = *NAME_REGEX, message = "folder_name must not contain path separators or control characters")
    )]
    pub folder_name: Option<String>,

    #[validate(length(max = 1000, message = "description must not exceed 1000 characters"))]
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FolderResponseDto {
    pub folder_id: String,
    pub repository_id: String,
    /// Parent folder, or null when the parent is the repository itself
    pub parent_folder_id: Option<String>,
    pub folder_name: String,
    pub description: Option<String>,
    #[serde(flatten)]
    pub audit: AuditDto,
}

impl From<Folder> for FolderResponseDto {
    fn from(f: Folder) -> Self {
        Self {
            folder_id: f.id,
            repository_id: f.repository_id,
            parent_folder_id: f.parent_folder_id,
            folder_name: f.folder_name,
            description: f.description,
            audit: f.audit.into(),
        }
    }
}

/// Folder with its direct children
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FolderDetailDto {
    #[serde(flatten)]
    pub folder: FolderResponseDto,
    pub folders: Vec<FolderResponseDto>,
    pub files: Vec<FileResponseDto>,
}

/// Filters for listing a repository's folders
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FolderFilterParams {
    /// Exact folder id
    pub folder_id: Option<String>,
    /// Regular expression matched against the folder name
    pub folder_name: Option<String>,
    /// Regular expression matched against the description
    pub description: Option<String>,
    /// Exact parent folder id
    pub parent_folder_id: Option<String>,
    /// Only folders created directly in the repository
    #[serde(default)]
    pub root_only: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteFolderResponseDto {
    pub deleted: bool,
    /// Folders removed, including the addressed one
    pub deleted_folders: u64,
    pub deleted_files: u64,
}
