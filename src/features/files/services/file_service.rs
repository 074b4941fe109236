use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::database::DocumentStores;
use crate::core::error::{AppError, Result};
use crate::features::files::dtos::{
    AddFileDto, FileFilterParams, FileResponseDto, ShareFileResponseDto, UpdateFileDto,
};
use crate::features::files::models::File;
use crate::modules::documents::DocumentQuery;
use crate::modules::storage::{
    decode_base64_payload, infer_content_type, StorageService, UploadedObject,
};
use crate::shared::audit::{Audit, AuditableParams};
use crate::shared::constants::MAX_FILE_SIZE;
use crate::shared::pageable::{fetch_page, PageableParams};
use crate::shared::types::PageableResponse;

/// Service for file operations
pub struct FileService {
    stores: DocumentStores,
    storage: Arc<StorageService>,
}

impl FileService {
    pub fn new(stores: DocumentStores, storage: Arc<StorageService>) -> Self {
        Self { stores, storage }
    }

    async fn find_file(&self, file_id: &str) -> Result<File> {
        self.stores
            .files
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::NotFound("File id not found".to_string()))
    }

    fn to_dto(&self, file: File) -> FileResponseDto {
        let url = self.storage.public_url(&file.file_key);
        FileResponseDto::from_model(file, url)
    }

    fn check_size(size: usize) -> Result<()> {
        if size > MAX_FILE_SIZE {
            return Err(AppError::BadRequest(format!(
                "File too large. Maximum size is {} bytes ({} MB)",
                MAX_FILE_SIZE,
                MAX_FILE_SIZE / 1024 / 1024
            )));
        }
        Ok(())
    }

    /// Upload base64 content into a folder and record its metadata
    ///
    /// The object key is the repository folder followed by a random UUID.
    /// The media type is the explicit one, else the data URL's, else the one
    /// inferred from the file name.
    pub async fn add_file_to_folder(
        &self,
        folder_id: &str,
        dto: AddFileDto,
        actor: Option<String>,
    ) -> Result<FileResponseDto> {
        let folder = self
            .stores
            .folders
            .find_by_id(folder_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Folder id not found".to_string()))?;
        let repository = self
            .stores
            .repositories
            .find_by_id(&folder.repository_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Repository id not found".to_string()))?;

        let payload = decode_base64_payload(&dto.content)?;
        Self::check_size(payload.data.len())?;
        if let Some(expected) = dto.size {
            if expected != payload.size() {
                return Err(AppError::BadRequest(format!(
                    "Declared size {} does not match decoded content length {}",
                    expected,
                    payload.size()
                )));
            }
        }

        let mime_type = dto
            .mime_type
            .clone()
            .or_else(|| payload.mime_type.clone())
            .unwrap_or_else(|| infer_content_type(&dto.file_name));

        let file_key = format!("{}{}", repository.original_path, Uuid::new_v4());
        let size = self
            .storage
            .upload_base64(payload, &file_key, &mime_type)
            .await?;

        debug!("File content stored: key={}", file_key);

        let file = File {
            id: Uuid::new_v4().to_string(),
            folder_id: folder.id,
            file_name: dto.file_name,
            file_key,
            mime_type,
            size,
            description: dto.description,
            audit: Audit::new(actor),
        };

        if let Err(e) = self.stores.files.insert(&file).await {
            // Do not leave unreferenced content behind
            self.storage.delete_quietly(&[file.file_key.clone()]).await;
            return Err(e.context("Can't save file to database"));
        }

        info!(
            "File metadata saved: id={}, key={}, mime_type={}, size={}",
            file.id, file.file_key, file.mime_type, file.size
        );

        Ok(self.to_dto(file))
    }

    pub async fn update_file(
        &self,
        file_id: &str,
        dto: UpdateFileDto,
        actor: Option<String>,
    ) -> Result<FileResponseDto> {
        let mut file = self.find_file(file_id).await?;

        if let Some(name) = dto.file_name {
            file.file_name = name;
        }
        if let Some(description) = dto.description {
            file.description = Some(description);
        }
        file.audit.touch(actor);

        let saved = self
            .stores
            .files
            .save(&file)
            .await
            .map_err(|e| e.context("Can't save file to database"))?;
        if !saved {
            return Err(AppError::NotFound("File id not found".to_string()));
        }

        info!("File updated: id={}", file.id);
        Ok(self.to_dto(file))
    }

    /// Remove the metadata, then the stored content (best effort)
    pub async fn delete_file(&self, file_id: &str) -> Result<()> {
        let file = self.find_file(file_id).await?;

        let removed = self
            .stores
            .files
            .delete_by_id(&file.id)
            .await
            .map_err(|e| e.context("Can't delete file from database"))?;
        if !removed {
            return Err(AppError::NotFound("File id not found".to_string()));
        }

        self.storage.delete_quietly(&[file.file_key.clone()]).await;

        info!("File deleted: id={}, key={}", file.id, file.file_key);
        Ok(())
    }

    pub async fn get_file_detail(&self, file_id: &str) -> Result<FileResponseDto> {
        let file = self.find_file(file_id).await?;
        Ok(self.to_dto(file))
    }

    pub async fn get_files(
        &self,
        filter: &FileFilterParams,
        audit: &AuditableParams,
        pageable: &PageableParams,
    ) -> Result<PageableResponse<FileResponseDto>> {
        let query = DocumentQuery::new()
            .eq_opt("id", filter.file_id.clone())
            .eq_opt("folder_id", filter.folder_id.clone())
            .eq_opt("mime_type", filter.mime_type.clone())
            .regex_opt("file_name", filter.file_name.as_deref())?
            .regex_opt("description", filter.description.as_deref())?;
        let query = audit.apply(query);

        let page = fetch_page(self.stores.files.as_ref(), query, pageable).await?;
        Ok(page.map(|file| self.to_dto(file)))
    }

    /// Stored content with its metadata
    pub async fn download_file(&self, file_id: &str) -> Result<(File, Vec<u8>)> {
        let file = self.find_file(file_id).await?;
        let data = self.storage.download(&file.file_key).await?;

        debug!("File downloaded: id={}, bytes={}", file.id, data.len());
        Ok((file, data))
    }

    /// Presigned link to the stored content
    pub async fn share_file(
        &self,
        file_id: &str,
        expires_in: Option<u32>,
    ) -> Result<ShareFileResponseDto> {
        let file = self.find_file(file_id).await?;
        let url = self.storage.presigned_url(&file.file_key, expires_in).await?;

        Ok(ShareFileResponseDto {
            file_id: file.id,
            url,
            expires_in,
        })
    }

    /// Store raw bytes without attaching them to a folder
    pub async fn upload_raw(&self, data: Vec<u8>, file_name: &str) -> Result<UploadedObject> {
        if data.is_empty() {
            return Err(AppError::BadRequest("File is empty".to_string()));
        }
        Self::check_size(data.len())?;

        self.storage.upload(data, file_name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::folders::models::Folder;
    use crate::features::repositories::models::Repository;
    use crate::modules::storage::MemoryObjectStorage;
    use crate::shared::test_helpers::test_stores_with_bucket;

    async fn setup() -> FileService {
        setup_with_bucket().await.0
    }

    async fn setup_with_bucket() -> (FileService, Arc<MemoryObjectStorage>) {
        let (stores, storage, bucket) = test_stores_with_bucket();
        stores
            .repositories
            .insert(&Repository {
                id: "proj".to_string(),
                repository_name: None,
                description: None,
                original_path: "repositories/proj/".to_string(),
                audit: Audit::new(None),
            })
            .await
            .unwrap();
        stores
            .folders
            .insert(&Folder {
                id: "docs".to_string(),
                repository_id: "proj".to_string(),
                parent_folder_id: None,
                folder_name: "Docs".to_string(),
                description: None,
                audit: Audit::new(None),
            })
            .await
            .unwrap();
        (FileService::new(stores, storage), bucket)
    }

    fn add_dto(file_name: &str, content: &str) -> AddFileDto {
        AddFileDto {
            file_name: file_name.to_string(),
            content: content.to_string(),
            mime_type: None,
            size: None,
            description: None,
        }
    }

    #[tokio::test]
    async fn test_add_file_keys_under_repository_path() {
        let svc = setup().await;
        let file = svc
            .add_file_to_folder("docs", add_dto("notes.txt", "aGVsbG8="), None)
            .await
            .unwrap();

        assert!(file.file_key.starts_with("repositories/proj/"));
        assert_eq!(file.mime_type, "text/plain");
        assert_eq!(file.size, 5);
        assert_eq!(file.folder_id, "docs");
    }

    #[tokio::test]
    async fn test_data_url_mime_wins_over_name() {
        let svc = setup().await;
        let file = svc
            .add_file_to_folder(
                "docs",
                add_dto("blob", "data:image/png;base64,iVBORw0KGgo="),
                None,
            )
            .await
            .unwrap();
        assert_eq!(file.mime_type, "image/png");

        let (meta, data) = svc.download_file(&file.file_id).await.unwrap();
        assert_eq!(meta.mime_type, "image/png");
        assert_eq!(data.len() as i64, meta.size);
    }

    #[tokio::test]
    async fn test_declared_size_must_match() {
        let svc = setup().await;
        let mut dto = add_dto("a.bin", "aGVsbG8=");
        dto.size = Some(4);
        assert!(matches!(
            svc.add_file_to_folder("docs", dto, None).await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_then_lookup_is_not_found() {
        let svc = setup().await;
        let file = svc
            .add_file_to_folder("docs", add_dto("a.txt", "YQ=="), None)
            .await
            .unwrap();

        svc.delete_file(&file.file_id).await.unwrap();
        assert!(matches!(
            svc.get_file_detail(&file.file_id).await,
            Err(AppError::NotFound(msg)) if msg == "File id not found"
        ));
        assert!(matches!(
            svc.delete_file(&file.file_id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_persists_changes() {
        let svc = setup().await;
        let file = svc
            .add_file_to_folder("docs", add_dto("draft.txt", "YQ=="), None)
            .await
            .unwrap();

        svc.update_file(
            &file.file_id,
            UpdateFileDto {
                file_name: Some("final.txt".to_string()),
                description: Some("v2".to_string()),
            },
            Some("acc-8".to_string()),
        )
        .await
        .unwrap();

        let stored = svc.get_file_detail(&file.file_id).await.unwrap();
        assert_eq!(stored.file_name, "final.txt");
        assert_eq!(stored.description.as_deref(), Some("v2"));
        assert_eq!(stored.file_key, file.file_key);
        assert_eq!(stored.mime_type, "text/plain");
        assert_eq!(stored.audit.last_modified_by.as_deref(), Some("acc-8"));
    }

    #[tokio::test]
    async fn test_delete_removes_stored_content() {
        let (svc, bucket) = setup_with_bucket().await;
        let file = svc
            .add_file_to_folder("docs", add_dto("gone.txt", "YQ=="), None)
            .await
            .unwrap();
        assert!(bucket.contains(&file.file_key).await);

        svc.delete_file(&file.file_id).await.unwrap();
        assert!(!bucket.contains(&file.file_key).await);
    }

    #[tokio::test]
    async fn test_rejects_unsafe_data_url_media_type() {
        let svc = setup().await;
        assert!(matches!(
            svc.add_file_to_folder(
                "docs",
                add_dto("a.txt", "data:text/plain\nX-Evil: 1;base64,YQ=="),
                None
            )
            .await,
            Err(AppError::BadRequest(_))
        ));
        assert_eq!(
            svc.get_files(
                &FileFilterParams::default(),
                &AuditableParams::default(),
                &PageableParams::default()
            )
            .await
            .unwrap()
            .total_elements,
            0
        );
    }

    #[tokio::test]
    async fn test_unknown_folder_is_not_found() {
        let svc = setup().await;
        assert!(matches!(
            svc.add_file_to_folder("missing", add_dto("a.txt", "YQ=="), None)
                .await,
            Err(AppError::NotFound(msg)) if msg == "Folder id not found"
        ));
    }

    #[tokio::test]
    async fn test_upload_raw_rejects_empty() {
        let svc = setup().await;
        assert!(matches!(
            svc.upload_raw(Vec::new(), "empty.txt").await,
            Err(AppError::BadRequest(_))
        ));
        let uploaded = svc.upload_raw(b"{}".to_vec(), "a.json").await.unwrap();
        assert_eq!(uploaded.content_type, "application/json");
    }
}
