//! Document store for repository metadata
//!
//! Collections of typed documents addressed by string ids, with
//! filter/sort/page reads. Backed by PostgreSQL in production and by an
//! in-memory map for local development and tests.

mod memory_store;
mod postgres_store;
pub mod query;

use async_trait::async_trait;

use crate::core::error::Result;

pub use memory_store::MemoryDocumentStore;
pub use postgres_store::PgDocumentStore;
pub use query::{DocumentQuery, FieldValue, Sort, SortDirection};

/// A record stored in one collection
pub trait Document: Clone + Send + Sync + 'static {
    /// Collection (table) name
    const COLLECTION: &'static str;
    /// Persisted fields, `id` first
    const FIELDS: &'static [&'static str];
    /// Fields clients may sort by
    const SORTABLE: &'static [&'static str];
    /// Field groups that must be unique across the collection
    const UNIQUE: &'static [&'static [&'static str]] = &[];

    fn id(&self) -> &str;

    fn field(&self, name: &str) -> FieldValue;
}

#[async_trait]
pub trait DocumentStore<D: Document>: Send + Sync {
    /// Insert a new document; an existing id or unique key is a conflict
    async fn insert(&self, document: &D) -> Result<()>;

    /// Replace a stored document. Returns `false` when the id is unknown.
    async fn save(&self, document: &D) -> Result<bool>;

    async fn find_by_id(&self, id: &str) -> Result<Option<D>>;

    async fn delete_by_id(&self, id: &str) -> Result<bool>;

    /// Remove every document matching the query's criteria
    async fn delete_where(&self, query: &DocumentQuery) -> Result<u64>;

    async fn count(&self, query: &DocumentQuery) -> Result<i64>;

    async fn find(&self, query: &DocumentQuery) -> Result<Vec<D>>;

    async fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.find_by_id(id).await?.is_some())
    }
}
