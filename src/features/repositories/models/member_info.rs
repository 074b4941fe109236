use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::modules::documents::{Document, FieldValue};
use crate::shared::audit::Audit;

/// Role of an account within one repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberRole {
    Owner,
    #[default]
    Member,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Owner => "OWNER",
            MemberRole::Member => "MEMBER",
        }
    }

    /// Parse a stored role; unknown values read as plain members
    pub fn from_db(value: &str) -> Self {
        match value {
            "OWNER" => MemberRole::Owner,
            _ => MemberRole::Member,
        }
    }
}

/// Database model for repository members
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct MemberInfo {
    pub id: String,
    pub repository_id: String,
    pub account_id: String,
    pub role: String,
    #[sqlx(flatten)]
    pub audit: Audit,
}

impl Document for MemberInfo {
    const COLLECTION: &'static str = "member_infos";
    const FIELDS: &'static [&'static str] = &[
        "id",
        "repository_id",
        "account_id",
        "role",
        "created_by",
        "created_date",
        "last_modified_by",
        "last_modified_date",
    ];
    const SORTABLE: &'static [&'static str] = &["account_id", "role", "created_date"];
    const UNIQUE: &'static [&'static [&'static str]] = &[&["repository_id", "account_id"]];

    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> FieldValue {
        match name {
            "id" => FieldValue::from(self.id.as_str()),
            "repository_id" => FieldValue::from(self.repository_id.as_str()),
            "account_id" => FieldValue::from(self.account_id.as_str()),
            "role" => FieldValue::from(self.role.as_str()),
            other => self.audit.field(other).unwrap_or(FieldValue::Text(None)),
        }
    }
}
