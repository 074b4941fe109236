use utoipa::{Modify, OpenApi};

use crate::features::files::{dtos as files_dtos, handlers as files_handlers};
use crate::features::folders::{dtos as folders_dtos, handlers as folders_handlers};
use crate::features::repositories::{
    dtos as repositories_dtos, handlers as repositories_handlers,
    models::MemberRole,
};
use crate::modules::documents::SortDirection;
use crate::modules::storage::UploadedObject;
use crate::shared::audit::AuditDto;
use crate::shared::types::{ApiResponse, PageableResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Repositories
        repositories_handlers::create_repository,
        repositories_handlers::get_repositories,
        repositories_handlers::get_repository,
        repositories_handlers::update_repository,
        repositories_handlers::delete_repository,
        repositories_handlers::list_members,
        repositories_handlers::add_member,
        repositories_handlers::remove_member,
        // Events
        repositories_handlers::project_created,
        // Folders
        folders_handlers::create_folder_in_repository,
        folders_handlers::get_folders_by_repository,
        folders_handlers::create_folder_in_folder,
        folders_handlers::get_folder,
        folders_handlers::update_folder,
        folders_handlers::delete_folder,
        // Files
        files_handlers::add_file_to_folder,
        files_handlers::upload_file,
        files_handlers::get_files,
        files_handlers::get_file,
        files_handlers::update_file,
        files_handlers::delete_file,
        files_handlers::download_file,
        files_handlers::share_file,
    ),
    components(
        schemas(
            SortDirection,
            AuditDto,
            UploadedObject,
            ApiResponse<UploadedObject>,
            // Repositories
            MemberRole,
            repositories_dtos::CreateRepositoryDto,
            repositories_dtos::UpdateRepositoryDto,
            repositories_dtos::ProjectCreatedEvent,
            repositories_dtos::RepositoryResponseDto,
            repositories_dtos::RepositoryDetailDto,
            repositories_dtos::AddMemberDto,
            repositories_dtos::MemberResponseDto,
            repositories_dtos::DeleteRepositoryResponseDto,
            ApiResponse<repositories_dtos::RepositoryResponseDto>,
            ApiResponse<repositories_dtos::RepositoryDetailDto>,
            ApiResponse<repositories_dtos::MemberResponseDto>,
            ApiResponse<Vec<repositories_dtos::MemberResponseDto>>,
            ApiResponse<repositories_dtos::DeleteRepositoryResponseDto>,
            ApiResponse<PageableResponse<repositories_dtos::RepositoryResponseDto>>,
            // Folders
            folders_dtos::CreateFolderDto,
            folders_dtos::UpdateFolderDto,
            folders_dtos::FolderResponseDto,
            folders_dtos::FolderDetailDto,
            folders_dtos::DeleteFolderResponseDto,
            ApiResponse<folders_dtos::FolderResponseDto>,
            ApiResponse<folders_dtos::FolderDetailDto>,
            ApiResponse<folders_dtos::DeleteFolderResponseDto>,
            ApiResponse<PageableResponse<folders_dtos::FolderResponseDto>>,
            // Files
            files_dtos::AddFileDto,
            files_dtos::UpdateFileDto,
            files_dtos::UploadFileDto,
            files_dtos::FileResponseDto,
            files_dtos::ShareFileResponseDto,
            files_dtos::DeleteFileResponseDto,
            ApiResponse<files_dtos::FileResponseDto>,
            ApiResponse<files_dtos::ShareFileResponseDto>,
            ApiResponse<files_dtos::DeleteFileResponseDto>,
            ApiResponse<PageableResponse<files_dtos::FileResponseDto>>,
        )
    ),
    tags(
        (name = "repositories", description = "Repositories and their members"),
        (name = "events", description = "Notifications from other services"),
        (name = "folders", description = "Folder hierarchy within a repository"),
        (name = "files", description = "File upload, download and sharing"),
    ),
    info(
        title = "Depot API",
        version = "0.1.0",
        description = "Repository, folder and file management. Send `X-Account-Id` to record the acting account.",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/repositories",
            "/api/repositories/{repository_id}",
            "/api/repositories/{repository_id}/members",
            "/api/repositories/{repository_id}/members/{account_id}",
            "/api/repositories/{repository_id}/folders",
            "/api/events/project-created",
            "/api/folders/{folder_id}",
            "/api/folders/{folder_id}/folders",
            "/api/folders/{folder_id}/files",
            "/api/files",
            "/api/files/upload",
            "/api/files/{file_id}",
            "/api/files/{file_id}/download",
            "/api/files/{file_id}/share",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_info_modifier() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Custom".to_string(),
            version: "9.9.9".to_string(),
            description: "desc".to_string(),
        }
        .modify(&mut doc);
        assert_eq!(doc.info.title, "Custom");
        assert_eq!(doc.info.version, "9.9.9");
    }
}
