use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::core::error::{AppError, Result};
use crate::modules::storage::ObjectStorage;

/// Process-local object store for development and tests
///
/// Media types are not kept; downloads take theirs from file metadata.
pub struct MemoryObjectStorage {
    bucket: String,
    objects: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryObjectStorage {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    #[cfg(test)]
    pub async fn contains(&self, key: &str) -> bool {
        self.objects.read().await.contains_key(key)
    }
}

#[async_trait]
impl ObjectStorage for MemoryObjectStorage {
    async fn put_object(&self, key: &str, data: Vec<u8>, _content_type: &str) -> Result<()> {
        self.objects.write().await.insert(key.to_string(), data);
        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<Vec<u8>> {
        self.objects
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| AppError::Storage(format!("The specified key does not exist: {}", key)))
    }

    async fn delete_object(&self, key: &str) -> Result<()> {
        // S3 semantics: deleting a missing key succeeds
        self.objects.write().await.remove(key);
        Ok(())
    }

    async fn presign_get(&self, key: &str, expiry_secs: u32) -> Result<String> {
        Ok(format!(
            "memory://{}/{}?X-Amz-Expires={}",
            self.bucket, key, expiry_secs
        ))
    }

    fn bucket_name(&self) -> String {
        self.bucket.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_delete() {
        let storage = MemoryObjectStorage::new("test-bucket");

        storage
            .put_object("a/b.txt", b"hello".to_vec(), "text/plain")
            .await
            .unwrap();
        assert_eq!(storage.get_object("a/b.txt").await.unwrap(), b"hello");

        storage.delete_object("a/b.txt").await.unwrap();
        assert!(matches!(
            storage.get_object("a/b.txt").await,
            Err(AppError::Storage(_))
        ));
        // Second delete is still fine
        storage.delete_object("a/b.txt").await.unwrap();
    }
}
