use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::folders::dtos::FolderResponseDto;
use crate::features::repositories::models::{MemberInfo, MemberRole, Repository};
use crate::shared::audit::AuditDto;
use crate::shared::validation::{EXTERNAL_ID_REGEX, NAME_REGEX};

/// Request DTO for creating a repository
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRepositoryDto {
    /// External project id; becomes the repository id
    #[validate(regex(
        path = *EXTERNAL_ID_REGEX,
        message = "repository_id must be 1-128 letters, digits, '.', '_' or '-', starting with a letter or digit"
    ))]
    #[schema(example = "proj-123")]
    pub repository_id: String,

    #[validate(
        length(min = 1, max = 255, message = "repository_name must be 1-255 characters"),
        regex(path = *NAME_REGEX, message = "repository_name must not contain path separators or control characters")
    )]
    pub repository_name: Option<String>,

    #[validate(length(max = 1000, message = "description must not exceed 1000 characters"))]
    pub description: Option<String>,
}

/// Request DTO for updating a repository
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRepositoryDto {
    #[validate(
        length(min = 1, max = 255, message = "repository_name must be 1-255 characters"),
        regex(path = *NAME_REGEX, message = "repository_name must not contain path separators or control characters")
    )]
    pub repository_name: Option<String>,

    #[validate(length(max = 1000, message = "description must not exceed 1000 characters"))]
    pub description: Option<String>,
}

/// Project-creation notification that provisions a repository
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCreatedEvent {
    #[validate(regex(path = *EXTERNAL_ID_REGEX, message = "projectId is not a valid id"))]
    #[schema(example = "proj-123")]
    pub project_id: String,

    #[validate(regex(path = *EXTERNAL_ID_REGEX, message = "accountId is not a valid id"))]
    #[schema(example = "acc-42")]
    pub account_id: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RepositoryResponseDto {
    pub repository_id: String,
    pub repository_name: Option<String>,
    pub description: Option<String>,
    /// Object-store key of the repository folder
    pub original_path: String,
    #[serde(flatten)]
    pub audit: AuditDto,
}

impl From<Repository> for RepositoryResponseDto {
    fn from(r: Repository) -> Self {
        Self {
            repository_id: r.id,
            repository_name: r.repository_name,
            description: r.description,
            original_path: r.original_path,
            audit: r.audit.into(),
        }
    }
}

/// Repository with its root folders and members
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RepositoryDetailDto {
    #[serde(flatten)]
    pub repository: RepositoryResponseDto,
    pub folders: Vec<FolderResponseDto>,
    pub members: Vec<MemberResponseDto>,
}

/// Request DTO for adding a member
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddMemberDto {
    #[validate(regex(path = *EXTERNAL_ID_REGEX, message = "account_id is not a valid id"))]
    #[schema(example = "acc-42")]
    pub account_id: String,

    /// Defaults to MEMBER
    #[serde(default)]
    pub role: MemberRole,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MemberResponseDto {
    pub member_id: String,
    pub repository_id: String,
    pub account_id: String,
    pub role: MemberRole,
    #[serde(flatten)]
    pub audit: AuditDto,
}

impl From<MemberInfo> for MemberResponseDto {
    fn from(m: MemberInfo) -> Self {
        Self {
            role: MemberRole::from_db(&m.role),
            member_id: m.id,
            repository_id: m.repository_id,
            account_id: m.account_id,
            audit: m.audit.into(),
        }
    }
}

/// Filters for the repository list
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RepositoryFilterParams {
    /// Exact repository id
    pub repository_id: Option<String>,
    /// Regular expression matched against the repository name
    pub repository_name: Option<String>,
    /// Regular expression matched against the description
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteRepositoryResponseDto {
    pub deleted: bool,
    pub deleted_folders: u64,
    pub deleted_files: u64,
}
