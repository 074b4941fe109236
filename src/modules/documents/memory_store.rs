use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::core::error::{AppError, Result};
use crate::modules::documents::{Document, DocumentQuery, DocumentStore};

/// Process-local document store keyed by id
pub struct MemoryDocumentStore<D> {
    documents: RwLock<BTreeMap<String, D>>,
}

impl<D: Document> MemoryDocumentStore<D> {
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(BTreeMap::new()),
        }
    }

    /// Reject `candidate` if another document shares one of its unique keys
    fn check_unique(documents: &BTreeMap<String, D>, candidate: &D) -> Result<()> {
        for fields in D::UNIQUE {
            let clash = documents.values().any(|existing| {
                existing.id() != candidate.id()
                    && fields.iter().all(|field| {
                        let value = candidate.field(field);
                        !value.is_null() && existing.field(field) == value
                    })
            });

            if clash {
                return Err(AppError::Conflict(format!(
                    "Duplicate value for ({}) in {}",
                    fields.join(", "),
                    D::COLLECTION
                )));
            }
        }
        Ok(())
    }
}

impl<D: Document> Default for MemoryDocumentStore<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<D: Document> DocumentStore<D> for MemoryDocumentStore<D> {
    async fn insert(&self, document: &D) -> Result<()> {
        let mut documents = self.documents.write().await;
        if documents.contains_key(document.id()) {
            return Err(AppError::Conflict(format!(
                "Document '{}' already exists in {}",
                document.id(),
                D::COLLECTION
            )));
        }
        Self::check_unique(&documents, document)?;
        documents.insert(document.id().to_string(), document.clone());
        Ok(())
    }

    async fn save(&self, document: &D) -> Result<bool> {
        let mut documents = self.documents.write().await;
        if !documents.contains_key(document.id()) {
            return Ok(false);
        }
        Self::check_unique(&documents, document)?;
        documents.insert(document.id().to_string(), document.clone());
        Ok(true)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<D>> {
        Ok(self.documents.read().await.get(id).cloned())
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool> {
        Ok(self.documents.write().await.remove(id).is_some())
    }

    async fn delete_where(&self, query: &DocumentQuery) -> Result<u64> {
        let mut documents = self.documents.write().await;
        let before = documents.len();
        documents.retain(|_, document| !query.matches(document));
        Ok((before - documents.len()) as u64)
    }

    async fn count(&self, query: &DocumentQuery) -> Result<i64> {
        let documents = self.documents.read().await;
        Ok(documents.values().filter(|d| query.matches(*d)).count() as i64)
    }

    async fn find(&self, query: &DocumentQuery) -> Result<Vec<D>> {
        let documents = self.documents.read().await;
        let mut matched: Vec<D> = documents
            .values()
            .filter(|d| query.matches(*d))
            .cloned()
            .collect();
        matched.sort_by(|a, b| query.compare(a, b));

        let offset = usize::try_from(query.offset).unwrap_or(0);
        let limit = query
            .limit
            .and_then(|l| usize::try_from(l).ok())
            .unwrap_or(usize::MAX);

        Ok(matched.into_iter().skip(offset).take(limit).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::documents::FieldValue;

    #[derive(Debug, Clone)]
    struct Tag {
        id: String,
        slug: String,
        weight: i64,
    }

    impl Document for Tag {
        const COLLECTION: &'static str = "tags";
        const FIELDS: &'static [&'static str] = &["id", "slug", "weight"];
        const SORTABLE: &'static [&'static str] = &["weight"];
        const UNIQUE: &'static [&'static [&'static str]] = &[&["slug"]];

        fn id(&self) -> &str {
            &self.id
        }

        fn field(&self, name: &str) -> FieldValue {
            match name {
                "id" => FieldValue::from(self.id.as_str()),
                "slug" => FieldValue::from(self.slug.as_str()),
                "weight" => FieldValue::from(self.weight),
                _ => FieldValue::Text(None),
            }
        }
    }

    fn tag(id: &str, slug: &str, weight: i64) -> Tag {
        Tag {
            id: id.into(),
            slug: slug.into(),
            weight,
        }
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_id_and_unique_key() {
        let store = MemoryDocumentStore::<Tag>::new();
        store.insert(&tag("1", "rust", 1)).await.unwrap();

        let dup_id = store.insert(&tag("1", "go", 1)).await;
        assert!(matches!(dup_id, Err(AppError::Conflict(_))));

        let dup_slug = store.insert(&tag("2", "rust", 1)).await;
        assert!(matches!(dup_slug, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_save_unknown_id_returns_false() {
        let store = MemoryDocumentStore::<Tag>::new();
        assert!(!store.save(&tag("missing", "x", 0)).await.unwrap());

        store.insert(&tag("1", "x", 0)).await.unwrap();
        assert!(store.save(&tag("1", "x", 5)).await.unwrap());
        assert_eq!(store.find_by_id("1").await.unwrap().unwrap().weight, 5);
    }

    #[tokio::test]
    async fn test_find_windows_sorted_results() {
        let store = MemoryDocumentStore::<Tag>::new();
        for i in 0..5 {
            store
                .insert(&tag(&i.to_string(), &format!("t{}", i), 10 - i))
                .await
                .unwrap();
        }

        let sort = crate::modules::documents::Sort::resolve::<Tag>(
            "weight",
            crate::modules::documents::SortDirection::Asc,
        )
        .unwrap();
        let query = DocumentQuery::new().sorted(sort).paged(1, 2);
        let page = store.find(&query).await.unwrap();
        let ids: Vec<_> = page.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "2"]);
        assert_eq!(store.count(&query).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_delete_where_removes_matches_only() {
        let store = MemoryDocumentStore::<Tag>::new();
        store.insert(&tag("1", "a", 1)).await.unwrap();
        store.insert(&tag("2", "b", 1)).await.unwrap();
        store.insert(&tag("3", "c", 2)).await.unwrap();

        let removed = store
            .delete_where(&DocumentQuery::new().eq("weight", 1_i64))
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert!(store.exists("3").await.unwrap());
        assert!(!store.exists("1").await.unwrap());
    }
}
