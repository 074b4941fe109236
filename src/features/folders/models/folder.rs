use sqlx::FromRow;

use crate::modules::documents::{Document, FieldValue};
use crate::shared::audit::Audit;

/// Database model for folders
///
/// Every folder records the repository at the root of its parent chain.
/// `parent_folder_id` is `None` for folders created directly in the repository.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Folder {
    pub id: String,
    pub repository_id: String,
    pub parent_folder_id: Option<String>,
    pub folder_name: String,
    pub description: Option<String>,
    #[sqlx(flatten)]
    pub audit: Audit,
}

impl Document for Folder {
    const COLLECTION: &'static str = "folders";
    const FIELDS: &'static [&'static str] = &[
        "id",
        "repository_id",
        "parent_folder_id",
        "folder_name",
        "description",
        "created_by",
        "created_date",
        "last_modified_by",
        "last_modified_date",
    ];
    const SORTABLE: &'static [&'static str] = &[
        "id",
        "folder_name",
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
            "repository_id" => FieldValue::from(self.repository_id.as_str()),
            "parent_folder_id" => FieldValue::from(self.parent_folder_id.clone()),
            "folder_name" => FieldValue::from(self.folder_name.as_str()),
            "description" => FieldValue::from(self.description.clone()),
            other => self.audit.field(other).unwrap_or(FieldValue::Text(None)),
        }
    }
}
