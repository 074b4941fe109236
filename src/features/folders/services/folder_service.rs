use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::core::database::DocumentStores;
use crate::core::error::{AppError, Result};
use crate::features::files::dtos::FileResponseDto;
use crate::features::folders::dtos::{
    CreateFolderDto, DeleteFolderResponseDto, FolderDetailDto, FolderFilterParams,
    FolderResponseDto, UpdateFolderDto,
};
use crate::features::folders::models::Folder;
use crate::features::folders::services::{collect_subtree, purge_folders};
use crate::modules::documents::{DocumentQuery, Sort, SortDirection};
use crate::modules::storage::StorageService;
use crate::shared::audit::{Audit, AuditableParams};
use crate::shared::pageable::{fetch_page, PageableParams};
use crate::shared::types::PageableResponse;

const OLDEST_FIRST: Sort = Sort {
    field: "created_date",
    direction: SortDirection::Asc,
};

/// Service for folder operations
pub struct FolderService {
    stores: DocumentStores,
    storage: Arc<StorageService>,
}

impl FolderService {
    pub fn new(stores: DocumentStores, storage: Arc<StorageService>) -> Self {
        Self { stores, storage }
    }

    async fn find_folder(&self, folder_id: &str) -> Result<Folder> {
        self.stores
            .folders
            .find_by_id(folder_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Folder id not found".to_string()))
    }

    async fn insert_folder(
        &self,
        repository_id: String,
        parent_folder_id: Option<String>,
        dto: CreateFolderDto,
        actor: Option<String>,
    ) -> Result<FolderResponseDto> {
        let folder = Folder {
            id: Uuid::new_v4().to_string(),
            repository_id,
            parent_folder_id,
            folder_name: dto.folder_name,
            description: dto.description,
            audit: Audit::new(actor),
        };

        self.stores
            .folders
            .insert(&folder)
            .await
            .map_err(|e| e.context("Can't save folder to database"))?;

        info!(
            "Folder created: id={}, repository={}, parent={:?}",
            folder.id, folder.repository_id, folder.parent_folder_id
        );
        Ok(folder.into())
    }

    /// Create a folder directly under a repository
    pub async fn create_folder_in_repository(
        &self,
        repository_id: &str,
        dto: CreateFolderDto,
        actor: Option<String>,
    ) -> Result<FolderResponseDto> {
        if !self.stores.repositories.exists(repository_id).await? {
            return Err(AppError::NotFound("Repository id not found".to_string()));
        }

        self.insert_folder(repository_id.to_string(), None, dto, actor)
            .await
    }

    /// Create a folder under another folder of the same repository
    pub async fn create_folder_in_folder(
        &self,
        parent_folder_id: &str,
        dto: CreateFolderDto,
        actor: Option<String>,
    ) -> Result<FolderResponseDto> {
        let parent = self
            .stores
            .folders
            .find_by_id(parent_folder_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Parent folder id not found".to_string()))?;

        self.insert_folder(parent.repository_id, Some(parent.id), dto, actor)
            .await
    }

    pub async fn update_folder(
        &self,
        folder_id: &str,
        dto: UpdateFolderDto,
        actor: Option<String>,
    ) -> Result<FolderResponseDto> {
        let mut folder = self.find_folder(folder_id).await?;

        if let Some(name) = dto.folder_name {
            folder.folder_name = name;
        }
        if let Some(description) = dto.description {
            folder.description = Some(description);
        }
        folder.audit.touch(actor);

        let saved = self
            .stores
            .folders
            .save(&folder)
            .await
            .map_err(|e| e.context("Can't save folder to database"))?;
        if !saved {
            return Err(AppError::NotFound("Folder id not found".to_string()));
        }

        info!("Folder updated: id={}", folder.id);
        Ok(folder.into())
    }

    /// Delete a folder, every folder below it and all of their files
    pub async fn delete_folder(&self, folder_id: &str) -> Result<DeleteFolderResponseDto> {
        let folder = self.find_folder(folder_id).await?;

        let subtree = collect_subtree(&self.stores, vec![folder.id.clone()]).await?;
        let summary = purge_folders(&self.stores, subtree).await?;

        self.storage.delete_quietly(&summary.object_keys).await;

        info!(
            "Folder deleted: id={}, folders={}, files={}",
            folder.id, summary.folders, summary.files
        );

        Ok(DeleteFolderResponseDto {
            deleted: true,
            deleted_folders: summary.folders,
            deleted_files: summary.files,
        })
    }

    pub async fn get_folder_detail(&self, folder_id: &str) -> Result<FolderDetailDto> {
        let folder = self.find_folder(folder_id).await?;

        let folders = self
            .stores
            .folders
            .find(
                &DocumentQuery::new()
                    .eq("parent_folder_id", folder_id)
                    .sorted(OLDEST_FIRST),
            )
            .await?
            .into_iter()
            .map(FolderResponseDto::from)
            .collect();

        let files = self
            .stores
            .files
            .find(
                &DocumentQuery::new()
                    .eq("folder_id", folder_id)
                    .sorted(OLDEST_FIRST),
            )
            .await?
            .into_iter()
            .map(|file| {
                let url = self.storage.public_url(&file.file_key);
                FileResponseDto::from_model(file, url)
            })
            .collect();

        debug!("Loaded folder detail: id={}", folder_id);

        Ok(FolderDetailDto {
            folder: folder.into(),
            folders,
            files,
        })
    }

    /// Page through every folder of a repository, at any depth
    pub async fn get_folders_by_repository(
        &self,
        repository_id: &str,
        filter: &FolderFilterParams,
        audit: &AuditableParams,
        pageable: &PageableParams,
    ) -> Result<PageableResponse<FolderResponseDto>> {
        if !self.stores.repositories.exists(repository_id).await? {
            return Err(AppError::NotFound("Repository id not found".to_string()));
        }

        let mut query = DocumentQuery::new()
            .eq("repository_id", repository_id)
            .eq_opt("id", filter.folder_id.clone())
            .eq_opt("parent_folder_id", filter.parent_folder_id.clone())
            .regex_opt("folder_name", filter.folder_name.as_deref())?
            .regex_opt("description", filter.description.as_deref())?;
        if filter.root_only {
            query = query.is_null("parent_folder_id");
        }
        let query = audit.apply(query);

        let page = fetch_page(self.stores.folders.as_ref(), query, pageable).await?;
        Ok(page.map(FolderResponseDto::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::files::dtos::AddFileDto;
    use crate::features::files::FileService;
    use crate::features::repositories::models::Repository;
    use crate::modules::storage::MemoryObjectStorage;
    use crate::shared::test_helpers::test_stores_with_bucket;

    async fn setup() -> (FolderService, DocumentStores, Arc<MemoryObjectStorage>) {
        let (stores, storage, bucket) = test_stores_with_bucket();
        for id in ["repo-a", "repo-b"] {
            stores
                .repositories
                .insert(&Repository {
                    id: id.to_string(),
                    repository_name: None,
                    description: None,
                    original_path: format!("repositories/{}/", id),
                    audit: Audit::new(None),
                })
                .await
                .unwrap();
        }
        (FolderService::new(stores.clone(), storage), stores, bucket)
    }

    fn named(name: &str) -> CreateFolderDto {
        CreateFolderDto {
            folder_name: name.to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_nested_folder_inherits_repository() {
        let (svc, _, _) = setup().await;
        let root = svc
            .create_folder_in_repository("repo-a", named("root"), None)
            .await
            .unwrap();
        let child = svc
            .create_folder_in_folder(&root.folder_id, named("child"), None)
            .await
            .unwrap();

        assert_eq!(root.parent_folder_id, None);
        assert_eq!(child.parent_folder_id.as_deref(), Some(root.folder_id.as_str()));
        assert_eq!(child.repository_id, "repo-a");
    }

    #[tokio::test]
    async fn test_by_repository_returns_only_that_repository() {
        let (svc, _, _) = setup().await;
        let a = svc
            .create_folder_in_repository("repo-a", named("a"), None)
            .await
            .unwrap();
        svc.create_folder_in_folder(&a.folder_id, named("a1"), None)
            .await
            .unwrap();
        svc.create_folder_in_repository("repo-b", named("b"), None)
            .await
            .unwrap();

        let page = svc
            .get_folders_by_repository(
                "repo-a",
                &FolderFilterParams::default(),
                &AuditableParams::default(),
                &PageableParams::default(),
            )
            .await
            .unwrap();
        assert_eq!(page.total_elements, 2);
        assert!(page.items.iter().all(|f| f.repository_id == "repo-a"));

        let roots = svc
            .get_folders_by_repository(
                "repo-a",
                &FolderFilterParams {
                    root_only: true,
                    ..Default::default()
                },
                &AuditableParams::default(),
                &PageableParams::default(),
            )
            .await
            .unwrap();
        assert_eq!(roots.total_elements, 1);
        assert_eq!(roots.items[0].folder_id, a.folder_id);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_descendants() {
        let (svc, stores, _) = setup().await;
        let top = svc
            .create_folder_in_repository("repo-a", named("top"), None)
            .await
            .unwrap();
        let mid = svc
            .create_folder_in_folder(&top.folder_id, named("mid"), None)
            .await
            .unwrap();
        svc.create_folder_in_folder(&mid.folder_id, named("leaf"), None)
            .await
            .unwrap();
        let sibling = svc
            .create_folder_in_repository("repo-a", named("sibling"), None)
            .await
            .unwrap();

        let result = svc.delete_folder(&top.folder_id).await.unwrap();
        assert_eq!(result.deleted_folders, 3);

        let remaining = stores.folders.count(&DocumentQuery::new()).await.unwrap();
        assert_eq!(remaining, 1);
        assert!(svc.get_folder_detail(&sibling.folder_id).await.is_ok());
        assert!(matches!(
            svc.get_folder_detail(&mid.folder_id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_persists_changes() {
        let (svc, _, _) = setup().await;
        let folder = svc
            .create_folder_in_repository("repo-a", named("old"), Some("acc-1".to_string()))
            .await
            .unwrap();

        let updated = svc
            .update_folder(
                &folder.folder_id,
                UpdateFolderDto {
                    folder_name: Some("new".to_string()),
                    description: Some("notes".to_string()),
                },
                Some("acc-4".to_string()),
            )
            .await
            .unwrap();
        assert_eq!(updated.folder_name, "new");

        let stored = svc.get_folder_detail(&folder.folder_id).await.unwrap().folder;
        assert_eq!(stored.folder_name, "new");
        assert_eq!(stored.description.as_deref(), Some("notes"));
        assert_eq!(stored.repository_id, "repo-a");
        assert_eq!(stored.audit.created_by.as_deref(), Some("acc-1"));
        assert_eq!(stored.audit.last_modified_by.as_deref(), Some("acc-4"));
    }

    #[tokio::test]
    async fn test_delete_removes_file_content_below() {
        let (svc, stores, bucket) = setup().await;
        let files = FileService::new(stores.clone(), svc.storage.clone());

        let top = svc
            .create_folder_in_repository("repo-a", named("top"), None)
            .await
            .unwrap();
        let inner = svc
            .create_folder_in_folder(&top.folder_id, named("inner"), None)
            .await
            .unwrap();

        let mut keys = Vec::new();
        for (folder_id, name) in [(&top.folder_id, "a.txt"), (&inner.folder_id, "b.txt")] {
            let file = files
                .add_file_to_folder(
                    folder_id,
                    AddFileDto {
                        file_name: name.to_string(),
                        content: "YQ==".to_string(),
                        mime_type: None,
                        size: None,
                        description: None,
                    },
                    None,
                )
                .await
                .unwrap();
            assert!(bucket.contains(&file.file_key).await);
            keys.push(file.file_key);
        }

        let result = svc.delete_folder(&top.folder_id).await.unwrap();
        assert_eq!(result.deleted_folders, 2);
        assert_eq!(result.deleted_files, 2);
        assert_eq!(stores.files.count(&DocumentQuery::new()).await.unwrap(), 0);
        for key in &keys {
            assert!(!bucket.contains(key).await, "{} still stored", key);
        }
    }

    #[tokio::test]
    async fn test_missing_parents_are_not_found() {
        let (svc, _, _) = setup().await;
        assert!(matches!(
            svc.create_folder_in_repository("nope", named("x"), None).await,
            Err(AppError::NotFound(msg)) if msg == "Repository id not found"
        ));
        assert!(matches!(
            svc.create_folder_in_folder("nope", named("x"), None).await,
            Err(AppError::NotFound(msg)) if msg == "Parent folder id not found"
        ));
        assert!(matches!(
            svc.delete_folder("nope").await,
            Err(AppError::NotFound(_))
        ));
    }
}
