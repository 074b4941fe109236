use sqlx::FromRow;

use crate::modules::documents::{Document, FieldValue};
use crate::shared::audit::Audit;

/// Database model for repositories
///
/// `id` is the external project id the repository was provisioned for.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Repository {
    pub id: String,
    pub repository_name: Option<String>,
    pub description: Option<String>,
    /// Object-store key of the repository's folder marker
    pub original_path: String,
    #[sqlx(flatten)]
    pub audit: Audit,
}

impl Document for Repository {
    const COLLECTION: &'static str = "repositories";
    const FIELDS: &'static [&'static str] = &[
        "id",
        "repository_name",
        "description",
        "original_path",
        "created_by",
        "created_date",
        "last_modified_by",
        "last_modified_date",
    ];
    const SORTABLE: &'static [&'static str] = &[
        "id",
        "repository_name",
        "created_by",
        "created_date",
        "last_modified_by",
        "last_modified_date",
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> FieldValue {
        match name {
            "id" => FieldValue::from(self.id.as_str()),
            "repository_name" => FieldValue::from(self.repository_name.clone()),
            "description" => FieldValue::from(self.description.clone()),
            "original_path" => FieldValue::from(self.original_path.as_str()),
            other => self.audit.field(other).unwrap_or(FieldValue::Text(None)),
        }
    }
}
