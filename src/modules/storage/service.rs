use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::core::config::StorageConfig;
use crate::core::error::{AppError, Result};
use crate::modules::storage::ObjectStorage;
use crate::shared::constants::{DEFAULT_CONTENT_TYPE, DEFAULT_PRESIGNED_URL_EXPIRY_SECS};
use crate::shared::validation::MIME_TYPE_REGEX;

/// Content type written on folder marker objects
const FOLDER_MARKER_CONTENT_TYPE: &str = "application/x-directory";

/// Result of a raw upload through the proxy
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UploadedObject {
    /// Object-store key assigned to the upload
    pub file_key: String,
    /// Public (CDN) URL of the object
    pub url: String,
    pub content_type: String,
    /// Size in bytes
    pub size: i64,
}

/// Decoded base64 upload body
#[derive(Debug, Clone, PartialEq)]
pub struct Base64Payload {
    pub data: Vec<u8>,
    /// Media type declared by a `data:` URL prefix, if any
    pub mime_type: Option<String>,
}

impl Base64Payload {
    pub fn size(&self) -> i64 {
        self.data.len() as i64
    }
}

/// Decode a bare base64 string or a `data:<mime>;base64,<payload>` URL
pub fn decode_base64_payload(payload: &str) -> Result<Base64Payload> {
    let payload = payload.trim();

    let (mime_type, encoded) = match payload.strip_prefix("data:") {
        Some(rest) => {
            let (header, encoded) = rest.split_once(',').ok_or_else(|| {
                AppError::BadRequest("Malformed data URL: missing ',' separator".to_string())
            })?;
            let mime = header
                .split(';')
                .next()
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string);
            if let Some(mime) = &mime {
                if !MIME_TYPE_REGEX.is_match(mime) {
                    return Err(AppError::BadRequest(format!(
                        "Malformed data URL: invalid media type '{}'",
                        mime.escape_default()
                    )));
                }
            }
            (mime, encoded)
        }
        None => (None, payload),
    };

    // Tolerate line-wrapped base64
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();

    let data = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| AppError::BadRequest(format!("Invalid base64 content: {}", e)))?;

    Ok(Base64Payload { data, mime_type })
}

/// Media type for a file name, from its last extension
pub fn infer_content_type(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_raw()
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string()
}

/// Object key of a folder marker: the path with exactly one trailing `/`
pub fn folder_key(path: &str) -> String {
    format!("{}/", path.trim_end_matches('/'))
}

/// Proxy in front of the object store
///
/// Owns key generation, content-type resolution and URL building so the
/// feature services never see backend details.
pub struct StorageService {
    backend: Arc<dyn ObjectStorage>,
    cdn_url: String,
    presigned_url_expiry_secs: u32,
}

impl StorageService {
    pub fn new(
        backend: Arc<dyn ObjectStorage>,
        cdn_url: impl Into<String>,
        presigned_url_expiry_secs: u32,
    ) -> Self {
        Self {
            backend,
            cdn_url: cdn_url.into().trim_end_matches('/').to_string(),
            presigned_url_expiry_secs,
        }
    }

    pub fn from_config(backend: Arc<dyn ObjectStorage>, config: &StorageConfig) -> Self {
        Self::new(backend, &config.cdn_url, config.presigned_url_expiry_secs)
    }

    pub fn bucket_name(&self) -> String {
        self.backend.bucket_name()
    }

    /// Store raw bytes under a fresh random key
    pub async fn upload(&self, data: Vec<u8>, file_name: &str) -> Result<UploadedObject> {
        let file_key = Uuid::new_v4().to_string();
        let content_type = infer_content_type(file_name);
        let size = data.len() as i64;

        self.backend
            .put_object(&file_key, data, &content_type)
            .await?;

        info!(
            "Uploaded '{}' as key={}, content_type={}, size={}",
            file_name, file_key, content_type, size
        );

        Ok(UploadedObject {
            url: self.public_url(&file_key),
            file_key,
            content_type,
            size,
        })
    }

    /// Store a decoded base64 payload under `key`; returns the byte length
    pub async fn upload_base64(
        &self,
        payload: Base64Payload,
        key: &str,
        content_type: &str,
    ) -> Result<i64> {
        let size = payload.size();
        self.backend.put_object(key, payload.data, content_type).await?;

        debug!(
            "Stored base64 payload at key={}, content_type={}, size={}",
            key, content_type, size
        );
        Ok(size)
    }

    /// Write an empty object whose key ends in `/`; returns that key
    pub async fn create_folder_marker(&self, path: &str) -> Result<String> {
        let key = folder_key(path);
        self.backend
            .put_object(&key, Vec::new(), FOLDER_MARKER_CONTENT_TYPE)
            .await?;

        debug!("Created folder marker {}", key);
        Ok(key)
    }

    pub async fn download(&self, key: &str) -> Result<Vec<u8>> {
        self.backend.get_object(key).await
    }

    pub async fn delete(&self, key: &str) -> Result<()> {
        self.backend.delete_object(key).await
    }

    /// Delete objects whose metadata is already gone; failures are only logged
    pub async fn delete_quietly(&self, keys: &[String]) {
        for key in keys {
            if let Err(e) = self.delete(key).await {
                warn!("Failed to delete stored object '{}': {}", key, e);
            }
        }
    }

    /// Time-limited GET URL; `ttl_secs` defaults to the configured expiry
    pub async fn presigned_url(&self, key: &str, ttl_secs: Option<u32>) -> Result<String> {
        let ttl = ttl_secs.unwrap_or(self.presigned_url_expiry_secs);
        if !(1..=DEFAULT_PRESIGNED_URL_EXPIRY_SECS).contains(&ttl) {
            return Err(AppError::BadRequest(format!(
                "Presigned URL expiry must be between 1 and {} seconds",
                DEFAULT_PRESIGNED_URL_EXPIRY_SECS
            )));
        }

        self.backend.presign_get(key, ttl).await
    }

    /// CDN prefix followed by the key, one encoded segment at a time
    pub fn public_url(&self, key: &str) -> String {
        let encoded = key
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!("{}/{}", self.cdn_url, encoded)
    }
}
