//! Storage module for file content
//!
//! `ObjectStorage` is the raw put/get/presign seam; `StorageService` is the
//! proxy the features talk to (key generation, content types, base64
//! payloads, public and presigned URLs).

mod memory_storage;
mod minio_client;
mod service;

use async_trait::async_trait;

use crate::core::error::Result;

pub use memory_storage::MemoryObjectStorage;
pub use minio_client::MinIOClient;
pub use service::{
    decode_base64_payload, folder_key, infer_content_type, StorageService, UploadedObject,
};

/// S3-style object store primitives
///
/// Every failure surfaces as `AppError::Storage` with the backend's message.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn put_object(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<()>;

    async fn get_object(&self, key: &str) -> Result<Vec<u8>>;

    async fn delete_object(&self, key: &str) -> Result<()>;

    /// Time-limited GET URL for `key`
    async fn presign_get(&self, key: &str, expiry_secs: u32) -> Result<String>;

    /// Bucket (or equivalent) name, for logs
    fn bucket_name(&self) -> String;
}
