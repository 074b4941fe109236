use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::core::database::DocumentStores;
use crate::core::error::{AppError, Result};
use crate::features::folders::dtos::FolderResponseDto;
use crate::features::folders::services::purge_folders;
use crate::features::repositories::dtos::{
    AddMemberDto, CreateRepositoryDto, DeleteRepositoryResponseDto, MemberResponseDto,
    ProjectCreatedEvent, RepositoryDetailDto, RepositoryFilterParams, RepositoryResponseDto,
    UpdateRepositoryDto,
};
use crate::features::repositories::models::{MemberInfo, MemberRole, Repository};
use crate::modules::documents::{DocumentQuery, Sort, SortDirection};
use crate::modules::storage::{folder_key, StorageService};
use crate::shared::audit::{Audit, AuditableParams};
use crate::shared::pageable::{fetch_page, PageableParams};
use crate::shared::types::PageableResponse;

/// Prefix of every repository folder in the object store
const REPOSITORY_ROOT: &str = "repositories";

/// Children and members are listed oldest first
const OLDEST_FIRST: Sort = Sort {
    field: "created_date",
    direction: SortDirection::Asc,
};

/// Service for repository and member operations
pub struct RepositoryService {
    stores: DocumentStores,
    storage: Arc<StorageService>,
}

impl RepositoryService {
    pub fn new(stores: DocumentStores, storage: Arc<StorageService>) -> Self {
        Self { stores, storage }
    }

    async fn find_repository(&self, repository_id: &str) -> Result<Repository> {
        self.stores
            .repositories
            .find_by_id(repository_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Repository id not found".to_string()))
    }

    /// Write the folder marker and persist a new repository document
    async fn provision(
        &self,
        repository_id: &str,
        repository_name: Option<String>,
        description: Option<String>,
        actor: Option<String>,
    ) -> Result<Repository> {
        if self.stores.repositories.exists(repository_id).await? {
            return Err(AppError::Conflict(format!(
                "Repository '{}' already exists",
                repository_id
            )));
        }

        let original_path = self
            .storage
            .create_folder_marker(&repository_path(repository_id))
            .await?;

        let repository = Repository {
            id: repository_id.to_string(),
            repository_name,
            description,
            original_path,
            audit: Audit::new(actor),
        };

        self.stores
            .repositories
            .insert(&repository)
            .await
            .map_err(|e| e.context("Can't save repository to database"))?;

        info!(
            "Repository created: id={}, path={}",
            repository.id, repository.original_path
        );
        Ok(repository)
    }

    pub async fn create_repository(
        &self,
        dto: CreateRepositoryDto,
        actor: Option<String>,
    ) -> Result<RepositoryResponseDto> {
        let repository = self
            .provision(
                &dto.repository_id,
                dto.repository_name,
                dto.description,
                actor,
            )
            .await?;
        Ok(repository.into())
    }

    /// Provision the repository for a newly created project and make the
    /// creating account its owner
    ///
    /// Deliveries may repeat or overlap. Whichever copy loses the insert sees
    /// a conflict, takes the stored repository, and only ensures the owner.
    pub async fn handle_project_created(
        &self,
        event: ProjectCreatedEvent,
    ) -> Result<RepositoryResponseDto> {
        let actor = Some(event.account_id.clone());

        let repository = match self
            .provision(&event.project_id, None, None, actor.clone())
            .await
        {
            Ok(created) => created,
            Err(AppError::Conflict(_)) => {
                debug!(
                    "Repository {} already provisioned, ensuring owner",
                    event.project_id
                );
                self.find_repository(&event.project_id).await?
            }
            Err(e) => return Err(e),
        };

        let owner_query = DocumentQuery::new()
            .eq("repository_id", repository.id.as_str())
            .eq("account_id", event.account_id.as_str());

        if self.stores.members.count(&owner_query).await? == 0 {
            let member = MemberInfo {
                id: Uuid::new_v4().to_string(),
                repository_id: repository.id.clone(),
                account_id: event.account_id.clone(),
                role: MemberRole::Owner.as_str().to_string(),
                audit: Audit::new(actor),
            };
            match self.stores.members.insert(&member).await {
                Ok(()) => info!(
                    "Owner {} added to repository {}",
                    member.account_id, member.repository_id
                ),
                // A concurrent delivery added the same owner first
                Err(AppError::Conflict(_)) => {
                    debug!("Owner {} already present", member.account_id)
                }
                Err(e) => return Err(e.context("Can't save member to database")),
            }
        }

        Ok(repository.into())
    }

    pub async fn update_repository(
        &self,
        repository_id: &str,
        dto: UpdateRepositoryDto,
        actor: Option<String>,
    ) -> Result<RepositoryResponseDto> {
        let mut repository = self.find_repository(repository_id).await?;

        if let Some(name) = dto.repository_name {
            repository.repository_name = Some(name);
        }
        if let Some(description) = dto.description {
            repository.description = Some(description);
        }
        repository.audit.touch(actor);

        let saved = self
            .stores
            .repositories
            .save(&repository)
            .await
            .map_err(|e| e.context("Can't save repository to database"))?;
        if !saved {
            return Err(AppError::NotFound("Repository id not found".to_string()));
        }

        info!("Repository updated: id={}", repository.id);
        Ok(repository.into())
    }

    /// Delete a repository with all of its folders, files and members
    pub async fn delete_repository(
        &self,
        repository_id: &str,
    ) -> Result<DeleteRepositoryResponseDto> {
        let repository = self.find_repository(repository_id).await?;

        // Every folder records its repository, however deep it is nested
        let folder_ids = self
            .stores
            .folders
            .find(&DocumentQuery::new().eq("repository_id", repository_id))
            .await?
            .into_iter()
            .map(|f| f.id)
            .collect();

        let summary = purge_folders(&self.stores, folder_ids).await?;

        self.stores
            .members
            .delete_where(&DocumentQuery::new().eq("repository_id", repository_id))
            .await
            .map_err(|e| e.context("Can't delete members from database"))?;

        self.stores
            .repositories
            .delete_by_id(repository_id)
            .await
            .map_err(|e| e.context("Can't delete repository from database"))?;

        let mut keys = summary.object_keys;
        keys.push(repository.original_path.clone());
        self.storage.delete_quietly(&keys).await;

        info!(
            "Repository deleted: id={}, folders={}, files={}",
            repository_id, summary.folders, summary.files
        );

        Ok(DeleteRepositoryResponseDto {
            deleted: true,
            deleted_folders: summary.folders,
            deleted_files: summary.files,
        })
    }

    pub async fn get_repository_detail(&self, repository_id: &str) -> Result<RepositoryDetailDto> {
        let repository = self.find_repository(repository_id).await?;

        let folders = self
            .stores
            .folders
            .find(
                &DocumentQuery::new()
                    .eq("repository_id", repository_id)
                    .is_null("parent_folder_id")
                    .sorted(OLDEST_FIRST),
            )
            .await?
            .into_iter()
            .map(FolderResponseDto::from)
            .collect();

        let members = self.find_members(repository_id).await?;

        Ok(RepositoryDetailDto {
            repository: repository.into(),
            folders,
            members,
        })
    }

    pub async fn get_repositories(
        &self,
        filter: &RepositoryFilterParams,
        audit: &AuditableParams,
        pageable: &PageableParams,
    ) -> Result<PageableResponse<RepositoryResponseDto>> {
        let query = DocumentQuery::new()
            .eq_opt("id", filter.repository_id.clone())
            .regex_opt("repository_name", filter.repository_name.as_deref())?
            .regex_opt("description", filter.description.as_deref())?;
        let query = audit.apply(query);

        let page = fetch_page(self.stores.repositories.as_ref(), query, pageable).await?;
        Ok(page.map(RepositoryResponseDto::from))
    }

    async fn find_members(&self, repository_id: &str) -> Result<Vec<MemberResponseDto>> {
        Ok(self
            .stores
            .members
            .find(
                &DocumentQuery::new()
                    .eq("repository_id", repository_id)
                    .sorted(OLDEST_FIRST),
            )
            .await?
            .into_iter()
            .map(MemberResponseDto::from)
            .collect())
    }

    pub async fn list_members(&self, repository_id: &str) -> Result<Vec<MemberResponseDto>> {
        self.find_repository(repository_id).await?;
        self.find_members(repository_id).await
    }

    pub async fn add_member(
        &self,
        repository_id: &str,
        dto: AddMemberDto,
        actor: Option<String>,
    ) -> Result<MemberResponseDto> {
        self.find_repository(repository_id).await?;

        let existing = DocumentQuery::new()
            .eq("repository_id", repository_id)
            .eq("account_id", dto.account_id.as_str());
        if self.stores.members.count(&existing).await? > 0 {
            return Err(AppError::Conflict(format!(
                "Account '{}' is already a member of repository '{}'",
                dto.account_id, repository_id
            )));
        }

        let member = MemberInfo {
            id: Uuid::new_v4().to_string(),
            repository_id: repository_id.to_string(),
            account_id: dto.account_id,
            role: dto.role.as_str().to_string(),
            audit: Audit::new(actor),
        };
        self.stores
            .members
            .insert(&member)
            .await
            .map_err(|e| e.context("Can't save member to database"))?;

        info!(
            "Member added: repository={}, account={}, role={}",
            member.repository_id, member.account_id, member.role
        );
        Ok(member.into())
    }

    pub async fn remove_member(&self, repository_id: &str, account_id: &str) -> Result<()> {
        self.find_repository(repository_id).await?;

        let removed = self
            .stores
            .members
            .delete_where(
                &DocumentQuery::new()
                    .eq("repository_id", repository_id)
                    .eq("account_id", account_id),
            )
            .await
            .map_err(|e| e.context("Can't delete member from database"))?;

        if removed == 0 {
            return Err(AppError::NotFound("Member not found".to_string()));
        }

        info!(
            "Member removed: repository={}, account={}",
            repository_id, account_id
        );
        Ok(())
    }
}

/// Object-store folder key of a repository
pub fn repository_path(repository_id: &str) -> String {
    folder_key(&format!("{}/{}", REPOSITORY_ROOT, repository_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::files::dtos::AddFileDto;
    use crate::features::files::FileService;
    use crate::features::folders::dtos::CreateFolderDto;
    use crate::features::folders::FolderService;
    use crate::shared::test_helpers::{test_stores, test_stores_with_bucket};

    fn service() -> RepositoryService {
        let (stores, storage) = test_stores();
        RepositoryService::new(stores, storage)
    }

    fn create_dto(id: &str) -> CreateRepositoryDto {
        CreateRepositoryDto {
            repository_id: id.to_string(),
            repository_name: Some("Project".to_string()),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_create_uses_supplied_id_and_path() {
        let svc = service();
        let repo = svc
            .create_repository(create_dto("proj-123"), Some("acc-1".to_string()))
            .await
            .unwrap();

        assert_eq!(repo.repository_id, "proj-123");
        assert_eq!(repo.original_path, repository_path("proj-123"));
        assert_eq!(repo.audit.created_by.as_deref(), Some("acc-1"));
    }

    #[tokio::test]
    async fn test_duplicate_create_conflicts() {
        let svc = service();
        svc.create_repository(create_dto("dup"), None).await.unwrap();
        assert!(matches!(
            svc.create_repository(create_dto("dup"), None).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_project_created_event_is_idempotent() {
        let svc = service();
        let event = ProjectCreatedEvent {
            project_id: "proj-9".to_string(),
            account_id: "acc-9".to_string(),
        };

        svc.handle_project_created(event.clone()).await.unwrap();
        svc.handle_project_created(event).await.unwrap();

        let members = svc.list_members("proj-9").await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].account_id, "acc-9");
        assert_eq!(members[0].role, MemberRole::Owner);
    }

    #[tokio::test]
    async fn test_overlapping_project_events_both_succeed() {
        let svc = service();
        let event = ProjectCreatedEvent {
            project_id: "proj-race".to_string(),
            account_id: "acc-1".to_string(),
        };

        let (first, second) = tokio::join!(
            svc.handle_project_created(event.clone()),
            svc.handle_project_created(event.clone())
        );
        assert_eq!(first.unwrap().repository_id, "proj-race");
        assert_eq!(second.unwrap().repository_id, "proj-race");
        assert_eq!(svc.list_members("proj-race").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_project_event_adopts_existing_repository() {
        let svc = service();
        svc.create_repository(create_dto("pre-made"), None)
            .await
            .unwrap();

        let repo = svc
            .handle_project_created(ProjectCreatedEvent {
                project_id: "pre-made".to_string(),
                account_id: "acc-3".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(repo.repository_name.as_deref(), Some("Project"));
        let members = svc.list_members("pre-made").await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].role, MemberRole::Owner);
    }

    #[tokio::test]
    async fn test_member_lifecycle() {
        let svc = service();
        svc.create_repository(create_dto("team"), None).await.unwrap();

        let dto = || AddMemberDto {
            account_id: "acc-2".to_string(),
            role: MemberRole::Member,
        };
        svc.add_member("team", dto(), None).await.unwrap();
        assert!(matches!(
            svc.add_member("team", dto(), None).await,
            Err(AppError::Conflict(_))
        ));

        svc.remove_member("team", "acc-2").await.unwrap();
        assert!(matches!(
            svc.remove_member("team", "acc-2").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_persists_changes() {
        let svc = service();
        svc.create_repository(create_dto("upd"), Some("acc-1".to_string()))
            .await
            .unwrap();

        svc.update_repository(
            "upd",
            UpdateRepositoryDto {
                repository_name: Some("Renamed".to_string()),
                description: Some("About".to_string()),
            },
            Some("acc-5".to_string()),
        )
        .await
        .unwrap();

        let stored = svc.get_repository_detail("upd").await.unwrap().repository;
        assert_eq!(stored.repository_name.as_deref(), Some("Renamed"));
        assert_eq!(stored.description.as_deref(), Some("About"));
        assert_eq!(stored.audit.created_by.as_deref(), Some("acc-1"));
        assert_eq!(stored.audit.last_modified_by.as_deref(), Some("acc-5"));
    }

    #[tokio::test]
    async fn test_delete_removes_everything_below() {
        let (stores, storage, bucket) = test_stores_with_bucket();
        let svc = RepositoryService::new(stores.clone(), storage.clone());
        let folders = FolderService::new(stores.clone(), storage.clone());
        let files = FileService::new(stores.clone(), storage);

        for id in ["doomed", "kept"] {
            svc.create_repository(create_dto(id), None).await.unwrap();
        }
        svc.add_member(
            "doomed",
            AddMemberDto {
                account_id: "acc-2".to_string(),
                role: MemberRole::Member,
            },
            None,
        )
        .await
        .unwrap();

        let folder = |name: &str| CreateFolderDto {
            folder_name: name.to_string(),
            description: None,
        };
        let root = folders
            .create_folder_in_repository("doomed", folder("root"), None)
            .await
            .unwrap();
        let nested = folders
            .create_folder_in_folder(&root.folder_id, folder("nested"), None)
            .await
            .unwrap();
        let file = files
            .add_file_to_folder(
                &nested.folder_id,
                AddFileDto {
                    file_name: "deep.txt".to_string(),
                    content: "ZGVlcA==".to_string(),
                    mime_type: None,
                    size: None,
                    description: None,
                },
                None,
            )
            .await
            .unwrap();
        let survivor = folders
            .create_folder_in_repository("kept", folder("other"), None)
            .await
            .unwrap();
        assert!(bucket.contains(&file.file_key).await);

        let result = svc.delete_repository("doomed").await.unwrap();
        assert_eq!(result.deleted_folders, 2);
        assert_eq!(result.deleted_files, 1);

        let in_doomed = || DocumentQuery::new().eq("repository_id", "doomed");
        assert_eq!(stores.folders.count(&in_doomed()).await.unwrap(), 0);
        assert_eq!(stores.members.count(&in_doomed()).await.unwrap(), 0);
        assert_eq!(stores.files.count(&DocumentQuery::new()).await.unwrap(), 0);
        assert!(!bucket.contains(&file.file_key).await);
        assert!(!bucket.contains(&repository_path("doomed")).await);

        assert!(bucket.contains(&repository_path("kept")).await);
        assert!(folders.get_folder_detail(&survivor.folder_id).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_repository_is_not_found() {
        let svc = service();
        assert!(matches!(
            svc.delete_repository("nope").await,
            Err(AppError::NotFound(msg)) if msg == "Repository id not found"
        ));
        assert!(matches!(
            svc.update_repository(
                "nope",
                UpdateRepositoryDto {
                    repository_name: None,
                    description: None
                },
                None
            )
            .await,
            Err(AppError::NotFound(_))
        ));
    }
}
