use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::modules::documents::{DocumentQuery, FieldValue};

/// Audit columns shared by every collection
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Audit {
    pub created_by: Option<String>,
    pub created_date: DateTime<Utc>,
    pub last_modified_by: Option<String>,
    pub last_modified_date: DateTime<Utc>,
}

impl Audit {
    pub fn new(actor: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            created_by: actor.clone(),
            created_date: now,
            last_modified_by: actor,
            last_modified_date: now,
        }
    }

    /// Record a modification by `actor`
    pub fn touch(&mut self, actor: Option<String>) {
        self.last_modified_by = actor;
        self.last_modified_date = Utc::now();
    }

    /// Value of an audit column, or `None` if `name` is not one
    pub fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "created_by" => Some(FieldValue::from(self.created_by.clone())),
            "created_date" => Some(FieldValue::from(self.created_date)),
            "last_modified_by" => Some(FieldValue::from(self.last_modified_by.clone())),
            "last_modified_date" => Some(FieldValue::from(self.last_modified_date)),
            _ => None,
        }
    }
}

/// Audit fields as exposed in responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuditDto {
    pub created_by: Option<String>,
    pub created_date: DateTime<Utc>,
    pub last_modified_by: Option<String>,
    pub last_modified_date: DateTime<Utc>,
}

impl From<Audit> for AuditDto {
    fn from(a: Audit) -> Self {
        Self {
            created_by: a.created_by,
            created_date: a.created_date,
            last_modified_by: a.last_modified_by,
            last_modified_date: a.last_modified_date,
        }
    }
}

/// Audit filters accepted by every list endpoint
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AuditableParams {
    /// Exact creator account id
    pub created_by: Option<String>,
    /// Created at or after (RFC 3339)
    pub created_date_from: Option<DateTime<Utc>>,
    /// Created at or before (RFC 3339)
    pub created_date_to: Option<DateTime<Utc>>,
    /// Exact last modifier account id
    pub last_modified_by: Option<String>,
    /// Last modified at or after (RFC 3339)
    pub last_modified_date_from: Option<DateTime<Utc>>,
    /// Last modified at or before (RFC 3339)
    pub last_modified_date_to: Option<DateTime<Utc>>,
}

impl AuditableParams {
    pub fn apply(&self, query: DocumentQuery) -> DocumentQuery {
        query
            .eq_opt("created_by", self.created_by.clone())
            .gte_opt("created_date", self.created_date_from)
            .lte_opt("created_date", self.created_date_to)
            .eq_opt("last_modified_by", self.last_modified_by.clone())
            .gte_opt("last_modified_date", self.last_modified_date_from)
            .lte_opt("last_modified_date", self.last_modified_date_to)
    }
}
