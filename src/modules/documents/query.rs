//! Backend-neutral query description
//!
//! A `DocumentQuery` is a conjunction of criteria plus an optional sort and
//! window. The PostgreSQL store compiles it to SQL; the in-memory store
//! evaluates it directly against `Document::field`.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::core::error::{AppError, Result};
use crate::modules::documents::Document;

/// Typed value of a single document field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(Option<String>),
    Integer(Option<i64>),
    Timestamp(Option<DateTime<Utc>>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(
            self,
            FieldValue::Text(None) | FieldValue::Integer(None) | FieldValue::Timestamp(None)
        )
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(Some(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Ordering between two non-null values of the same kind
    pub fn compare(&self, other: &FieldValue) -> Option<Ordering> {
        match (self, other) {
            (FieldValue::Text(Some(a)), FieldValue::Text(Some(b))) => Some(a.cmp(b)),
            (FieldValue::Integer(Some(a)), FieldValue::Integer(Some(b))) => Some(a.cmp(b)),
            (FieldValue::Timestamp(Some(a)), FieldValue::Timestamp(Some(b))) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(Some(value))
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(Some(value.to_string()))
    }
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(Some(value))
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(Some(value))
    }
}

impl From<Option<DateTime<Utc>>> for FieldValue {
    fn from(value: Option<DateTime<Utc>>) -> Self {
        FieldValue::Timestamp(value)
    }
}

/// A single filter condition on one field
#[derive(Debug, Clone)]
pub enum Criterion {
    Eq {
        field: &'static str,
        value: FieldValue,
    },
    Regex {
        field: &'static str,
        pattern: Regex,
    },
    Gte {
        field: &'static str,
        value: FieldValue,
    },
    Lte {
        field: &'static str,
        value: FieldValue,
    },
    IsNull {
        field: &'static str,
    },
    AnyOf {
        field: &'static str,
        values: Vec<String>,
    },
}

impl Criterion {
    pub fn field(&self) -> &'static str {
        match self {
            Criterion::Eq { field, .. }
            | Criterion::Regex { field, .. }
            | Criterion::Gte { field, .. }
            | Criterion::Lte { field, .. }
            | Criterion::IsNull { field }
            | Criterion::AnyOf { field, .. } => field,
        }
    }

    /// Null fields never match a comparison, mirroring SQL three-valued logic
    pub fn matches(&self, actual: &FieldValue) -> bool {
        match self {
            Criterion::Eq { value, .. } => {
                if value.is_null() {
                    actual.is_null()
                } else {
                    actual == value
                }
            }
            Criterion::Regex { pattern, .. } => {
                actual.as_text().is_some_and(|text| pattern.is_match(text))
            }
            Criterion::Gte { value, .. } => {
                matches!(actual.compare(value), Some(Ordering::Greater | Ordering::Equal))
            }
            Criterion::Lte { value, .. } => {
                matches!(actual.compare(value), Some(Ordering::Less | Ordering::Equal))
            }
            Criterion::IsNull { .. } => actual.is_null(),
            Criterion::AnyOf { values, .. } => actual
                .as_text()
                .is_some_and(|text| values.iter().any(|v| v == text)),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Desc,
    Asc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    /// NULL placement matching PostgreSQL defaults
    pub fn nulls_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "NULLS LAST",
            SortDirection::Desc => "NULLS FIRST",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: &'static str,
    pub direction: SortDirection,
}

impl Sort {
    /// Resolve a client-supplied field name against the document's sortable fields
    pub fn resolve<D: Document>(field: &str, direction: SortDirection) -> Result<Self> {
        D::SORTABLE
            .iter()
            .find(|candidate| **candidate == field)
            .map(|field| Sort {
                field: *field,
                direction,
            })
            .ok_or_else(|| {
                AppError::BadRequest(format!(
                    "Cannot sort by '{}'. Sortable fields: {}",
                    field,
                    D::SORTABLE.join(", ")
                ))
            })
    }

    /// Compare two documents by this sort, NULLs last ascending and first descending
    pub fn compare<D: Document>(&self, a: &D, b: &D) -> Ordering {
        let left = a.field(self.field);
        let right = b.field(self.field);

        let ordering = match (left.is_null(), right.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => left.compare(&right).unwrap_or(Ordering::Equal),
        };

        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Filters, ordering and window for a collection read
#[derive(Debug, Clone, Default)]
pub struct DocumentQuery {
    pub criteria: Vec<Criterion>,
    pub sort: Option<Sort>,
    pub offset: i64,
    pub limit: Option<i64>,
}

impl DocumentQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: &'static str, value: impl Into<FieldValue>) -> Self {
        self.criteria.push(Criterion::Eq {
            field,
            value: value.into(),
        });
        self
    }

    pub fn eq_opt<V: Into<FieldValue>>(self, field: &'static str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.eq(field, value),
            None => self,
        }
    }

    /// Add a regex match; an invalid pattern is the caller's fault
    pub fn regex_opt(mut self, field: &'static str, pattern: Option<&str>) -> Result<Self> {
        if let Some(pattern) = pattern.filter(|p| !p.is_empty()) {
            let pattern = Regex::new(pattern).map_err(|e| {
                AppError::BadRequest(format!("Invalid pattern for '{}': {}", field, e))
            })?;
            self.criteria.push(Criterion::Regex { field, pattern });
        }
        Ok(self)
    }

    pub fn gte_opt<V: Into<FieldValue>>(mut self, field: &'static str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.criteria.push(Criterion::Gte {
                field,
                value: value.into(),
            });
        }
        self
    }

    pub fn lte_opt<V: Into<FieldValue>>(mut self, field: &'static str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.criteria.push(Criterion::Lte {
                field,
                value: value.into(),
            });
        }
        self
    }

    pub fn is_null(mut self, field: &'static str) -> Self {
        self.criteria.push(Criterion::IsNull { field });
        self
    }

    pub fn any_of(mut self, field: &'static str, values: Vec<String>) -> Self {
        self.criteria.push(Criterion::AnyOf { field, values });
        self
    }

    pub fn sorted(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn paged(mut self, offset: i64, limit: i64) -> Self {
        self.offset = offset.max(0);
        self.limit = Some(limit.max(0));
        self
    }

    pub fn matches<D: Document>(&self, document: &D) -> bool {
        self.criteria
            .iter()
            .all(|criterion| criterion.matches(&document.field(criterion.field())))
    }

    /// Total order used by every backend: the sort spec, then id ascending
    pub fn compare<D: Document>(&self, a: &D, b: &D) -> Ordering {
        self.sort
            .map(|sort| sort.compare(a, b))
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.id().cmp(b.id()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[derive(Debug, Clone)]
    struct Note {
        id: String,
        title: Option<String>,
        created_date: DateTime<Utc>,
    }

    impl Document for Note {
        const COLLECTION: &'static str = "notes";
        const FIELDS: &'static [&'static str] = &["id", "title", "created_date"];
        const SORTABLE: &'static [&'static str] = &["id", "title", "created_date"];

        fn id(&self) -> &str {
            &self.id
        }

        fn field(&self, name: &str) -> FieldValue {
            match name {
                "id" => FieldValue::from(self.id.as_str()),
                "title" => FieldValue::from(self.title.clone()),
                "created_date" => FieldValue::from(self.created_date),
                _ => FieldValue::Text(None),
            }
        }
    }

    fn note(id: &str, title: Option<&str>, day: u32) -> Note {
        Note {
            id: id.to_string(),
            title: title.map(str::to_string),
            created_date: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_regex_criterion_skips_null_fields() {
        let query = DocumentQuery::new()
            .regex_opt("title", Some("^rep"))
            .unwrap();

        assert!(query.matches(&note("a", Some("report"), 1)));
        assert!(!query.matches(&note("b", Some("draft"), 1)));
        assert!(!query.matches(&note("c", None, 1)));
    }

    #[test]
    fn test_invalid_regex_is_bad_request() {
        let err = DocumentQuery::new()
            .regex_opt("title", Some("(unclosed"))
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_empty_regex_adds_no_criterion() {
        let query = DocumentQuery::new().regex_opt("title", Some("")).unwrap();
        assert!(query.criteria.is_empty());
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let from = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap();
        let query = DocumentQuery::new()
            .gte_opt("created_date", Some(from))
            .lte_opt("created_date", Some(to));

        assert!(!query.matches(&note("a", None, 1)));
        assert!(query.matches(&note("b", None, 2)));
        assert!(query.matches(&note("c", None, 3)));
        assert!(!query.matches(&note("d", None, 4)));
    }

    #[test]
    fn test_any_of_and_is_null() {
        let query = DocumentQuery::new().any_of("id", vec!["a".into(), "c".into()]);
        assert!(query.matches(&note("a", None, 1)));
        assert!(!query.matches(&note("b", None, 1)));

        let query = DocumentQuery::new().is_null("title");
        assert!(query.matches(&note("a", None, 1)));
        assert!(!query.matches(&note("b", Some("x"), 1)));
    }

    #[test]
    fn test_sort_resolve_rejects_unknown_fields() {
        assert!(Sort::resolve::<Note>("title", SortDirection::Asc).is_ok());
        assert!(matches!(
            Sort::resolve::<Note>("password", SortDirection::Asc),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_compare_places_nulls_and_breaks_ties_by_id() {
        let sort = Sort::resolve::<Note>("title", SortDirection::Asc).unwrap();
        let query = DocumentQuery::new().sorted(sort);

        let mut notes = vec![
            note("d", None, 1),
            note("c", Some("b"), 1),
            note("b", Some("a"), 1),
            note("a", Some("b"), 1),
        ];
        notes.sort_by(|x, y| query.compare(x, y));
        let ids: Vec<_> = notes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c", "d"]);

        let sort = Sort::resolve::<Note>("title", SortDirection::Desc).unwrap();
        let query = DocumentQuery::new().sorted(sort);
        notes.sort_by(|x, y| query.compare(x, y));
        let ids: Vec<_> = notes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["d", "a", "c", "b"]);
    }
}
