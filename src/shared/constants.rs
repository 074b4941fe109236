/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// STORAGE
// =============================================================================

/// Presigned URL lifetime: 7 days, the longest S3 accepts
pub const DEFAULT_PRESIGNED_URL_EXPIRY_SECS: u32 = 7 * 24 * 60 * 60;

/// Fallback content type when the file name carries no usable extension
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Maximum raw upload size in bytes (20MB)
pub const MAX_FILE_SIZE: usize = 20 * 1024 * 1024;

/// Header carrying the acting account, recorded in audit fields
pub const ACCOUNT_ID_HEADER: &str = "x-account-id";
