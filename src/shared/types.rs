use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Uniform envelope around every response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    /// HTTP status code mirrored into the body
    pub status: u16,
    pub message: Option<String>,
    pub data: Option<T>,
    pub errors: Option<Vec<String>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>) -> Self {
        Self::with_status(StatusCode::OK, data, message)
    }

    pub fn created(data: T) -> Self {
        Self::with_status(StatusCode::CREATED, Some(data), None)
    }

    fn with_status(status: StatusCode, data: Option<T>, message: Option<String>) -> Self {
        Self {
            success: true,
            status: status.as_u16(),
            message,
            data,
            errors: None,
        }
    }

    pub fn error(
        status: StatusCode,
        message: Option<String>,
        errors: Option<Vec<String>>,
    ) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            status: status.as_u16(),
            message,
            data: None,
            errors,
        }
    }
}

// =============================================================================
// PAGINATION
// =============================================================================

/// One page of a filtered, sorted collection
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PageableResponse<T> {
    /// Zero-based page index
    pub page: i64,
    pub size: i64,
    /// Number of documents matching the filters, independent of paging
    pub total_elements: i64,
    pub total_pages: i64,
    pub items: Vec<T>,
}

impl<T> PageableResponse<T> {
    pub fn new(page: i64, size: i64, total_elements: i64, items: Vec<T>) -> Self {
        let total_pages = if size > 0 {
            (total_elements + size - 1) / size
        } else {
            0
        };

        Self {
            page,
            size,
            total_elements,
            total_pages,
            items,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageableResponse<U> {
        PageableResponse {
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}
