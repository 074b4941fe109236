use std::borrow::Cow;
use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::modules::documents::query::Criterion;
use crate::modules::documents::{Document, DocumentQuery, DocumentStore, FieldValue};

/// Document store over one PostgreSQL table per collection
///
/// Column names come from `Document::FIELDS`/`SORTABLE` and criteria built in
/// code, never from request input; every value is bound.
pub struct PgDocumentStore<D> {
    pool: PgPool,
    _document: PhantomData<fn() -> D>,
}

impl<D> PgDocumentStore<D> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _document: PhantomData,
        }
    }
}

/// Convert database error to more specific AppError with user-friendly messages
fn handle_db_error(collection: &str, e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        // Unique constraint violation
        if db_err.code() == Some(Cow::Borrowed("23505")) {
            return AppError::Conflict(format!(
                "Duplicate value in {} ({})",
                collection,
                db_err.constraint().unwrap_or("unique key")
            ));
        }

        // Foreign key violation
        if db_err.code() == Some(Cow::Borrowed("23503")) {
            return AppError::BadRequest("Referenced record does not exist.".to_string());
        }

        // Invalid regular expression
        if db_err.code() == Some(Cow::Borrowed("2201B")) {
            return AppError::BadRequest(format!("Invalid pattern: {}", db_err.message()));
        }
    }

    AppError::Database(e)
}

fn push_value(builder: &mut QueryBuilder<'_, Postgres>, value: FieldValue) {
    match value {
        FieldValue::Text(v) => {
            builder.push_bind(v);
        }
        FieldValue::Integer(v) => {
            builder.push_bind(v);
        }
        FieldValue::Timestamp(v) => {
            builder.push_bind(v);
        }
    }
}

fn push_criteria(builder: &mut QueryBuilder<'_, Postgres>, criteria: &[Criterion]) {
    for (i, criterion) in criteria.iter().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });

        match criterion {
            Criterion::Eq { field, value } if value.is_null() => {
                builder.push(*field).push(" IS NULL");
            }
            Criterion::Eq { field, value } => {
                builder.push(*field).push(" = ");
                push_value(builder, value.clone());
            }
            Criterion::Regex { field, pattern } => {
                builder
                    .push(*field)
                    .push(" ~ ")
                    .push_bind(pattern.as_str().to_string());
            }
            Criterion::Gte { field, value } => {
                builder.push(*field).push(" >= ");
                push_value(builder, value.clone());
            }
            Criterion::Lte { field, value } => {
                builder.push(*field).push(" <= ");
                push_value(builder, value.clone());
            }
            Criterion::IsNull { field } => {
                builder.push(*field).push(" IS NULL");
            }
            Criterion::AnyOf { values, .. } if values.is_empty() => {
                builder.push("FALSE");
            }
            Criterion::AnyOf { field, values } => {
                builder
                    .push(*field)
                    .push(" = ANY(")
                    .push_bind(values.clone())
                    .push(")");
            }
        }
    }
}

fn select_clause<D: Document>() -> String {
    format!("SELECT {} FROM {}", D::FIELDS.join(", "), D::COLLECTION)
}

#[async_trait]
impl<D> DocumentStore<D> for PgDocumentStore<D>
where
    D: Document + Unpin + for<'r> FromRow<'r, PgRow>,
{
    async fn insert(&self, document: &D) -> Result<()> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "INSERT INTO {} ({}) VALUES (",
            D::COLLECTION,
            D::FIELDS.join(", ")
        ));
        for (i, field) in D::FIELDS.iter().enumerate() {
            if i > 0 {
                builder.push(", ");
            }
            push_value(&mut builder, document.field(field));
        }
        builder.push(")");

        builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| handle_db_error(D::COLLECTION, e))?;

        debug!("Inserted {} document '{}'", D::COLLECTION, document.id());
        Ok(())
    }

    async fn save(&self, document: &D) -> Result<bool> {
        let mut builder =
            QueryBuilder::<Postgres>::new(format!("UPDATE {} SET ", D::COLLECTION));
        for (i, field) in D::FIELDS.iter().filter(|f| **f != "id").enumerate() {
            if i > 0 {
                builder.push(", ");
            }
            builder.push(*field).push(" = ");
            push_value(&mut builder, document.field(field));
        }
        builder
            .push(" WHERE id = ")
            .push_bind(document.id().to_string());

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| handle_db_error(D::COLLECTION, e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<D>> {
        let mut builder = QueryBuilder::<Postgres>::new(select_clause::<D>());
        builder.push(" WHERE id = ").push_bind(id.to_string());

        builder
            .build_query_as::<D>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| handle_db_error(D::COLLECTION, e))
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool> {
        let mut builder =
            QueryBuilder::<Postgres>::new(format!("DELETE FROM {}", D::COLLECTION));
        builder.push(" WHERE id = ").push_bind(id.to_string());

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| handle_db_error(D::COLLECTION, e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_where(&self, query: &DocumentQuery) -> Result<u64> {
        let mut builder =
            QueryBuilder::<Postgres>::new(format!("DELETE FROM {}", D::COLLECTION));
        push_criteria(&mut builder, &query.criteria);

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| handle_db_error(D::COLLECTION, e))?;

        Ok(result.rows_affected())
    }

    async fn count(&self, query: &DocumentQuery) -> Result<i64> {
        let mut builder =
            QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {}", D::COLLECTION));
        push_criteria(&mut builder, &query.criteria);

        builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| handle_db_error(D::COLLECTION, e))
    }

    async fn find(&self, query: &DocumentQuery) -> Result<Vec<D>> {
        let mut builder = QueryBuilder::<Postgres>::new(select_clause::<D>());
        push_criteria(&mut builder, &query.criteria);

        // id breaks ties so consecutive pages never overlap
        builder.push(" ORDER BY ");
        if let Some(sort) = query.sort {
            builder.push(format!(
                "{} {} {}, ",
                sort.field,
                sort.direction.as_sql(),
                sort.direction.nulls_sql()
            ));
        }
        builder.push("id ASC");

        if let Some(limit) = query.limit {
            builder.push(" LIMIT ").push_bind(limit);
        }
        if query.offset > 0 {
            builder.push(" OFFSET ").push_bind(query.offset);
        }

        builder
            .build_query_as::<D>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| handle_db_error(D::COLLECTION, e))
    }
}
