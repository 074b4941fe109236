use serde::Deserialize;
use utoipa::IntoParams;

use crate::core::error::Result;
use crate::modules::documents::{Document, DocumentQuery, DocumentStore, Sort, SortDirection};
use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::shared::types::PageableResponse;

/// Field every collection sorts by when the client names none
pub const DEFAULT_SORT_FIELD: &str = "created_date";

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

/// Paging and sorting query parameters shared by all list endpoints
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageableParams {
    /// Page number (0-indexed, default: 0)
    #[serde(default)]
    #[param(minimum = 0)]
    pub page: i64,

    /// Number of items per page (default: 10, max: 100)
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub size: i64,

    /// Field to sort by (default: created_date)
    pub sort_by: Option<String>,

    /// Sort direction (default: desc)
    #[serde(default)]
    pub sort: SortDirection,
}

impl Default for PageableParams {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort_by: None,
            sort: SortDirection::default(),
        }
    }
}

impl PageableParams {
    pub fn page(&self) -> i64 {
        self.page.max(0)
    }

    /// Get clamped size (respects MAX_PAGE_SIZE)
    pub fn size(&self) -> i64 {
        self.size.clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        self.page().saturating_mul(self.size())
    }

    pub fn sort_spec<D: Document>(&self) -> Result<Sort> {
        let field = self.sort_by.as_deref().unwrap_or(DEFAULT_SORT_FIELD);
        Sort::resolve::<D>(field, self.sort)
    }
}

/// Count the filtered collection, then fetch one sorted page of it
pub async fn fetch_page<D: Document>(
    store: &dyn DocumentStore<D>,
    query: DocumentQuery,
    params: &PageableParams,
) -> Result<PageableResponse<D>> {
    let sort = params.sort_spec::<D>()?;

    let total_elements = store.count(&query).await?;

    let query = query.sorted(sort).paged(params.offset(), params.size());
    let items = store.find(&query).await?;

    Ok(PageableResponse::new(
        params.page(),
        params.size(),
        total_elements,
        items,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_is_clamped() {
        let params = PageableParams {
            size: 1000,
            ..Default::default()
        };
        assert_eq!(params.size(), MAX_PAGE_SIZE);

        let params = PageableParams {
            size: 0,
            ..Default::default()
        };
        assert_eq!(params.size(), 1);
    }

    #[test]
    fn test_negative_page_starts_at_zero() {
        let params = PageableParams {
            page: -3,
            size: 20,
            ..Default::default()
        };
        assert_eq!(params.page(), 0);
        assert_eq!(params.offset(), 0);

        let params = PageableParams {
            page: 2,
            size: 20,
            ..Default::default()
        };
        assert_eq!(params.offset(), 40);
    }
}
