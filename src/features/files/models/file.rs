use sqlx::FromRow;

use crate::modules::documents::{Document, FieldValue};
use crate::shared::audit::Audit;

/// Database model for files
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct File {
    pub id: String,
    pub folder_id: String,
    pub file_name: String,
    /// Object-store key of the content, unique across the bucket
    pub file_key: String,
    pub mime_type: String,
    /// Content length in bytes
    pub size: i64,
    pub description: Option<String>,
    #[sqlx(flatten)]
    pub audit: Audit,
}

impl Document for File {
    const COLLECTION: &'static str = "files";
    const FIELDS: &'static [&'static str] = &[
        "id",
        "folder_id",
        "file_name",
        "file_key",
        "mime_type",
        "size",
        "description",
        "created_by",
        "created_date",
        "last_modified_by",
        "last_modified_date",
    ];
    const SORTABLE: &'static [&'static str] = &[
        "id",
        "file_name",
        "mime_type",
        "size",
        "created_by",
        "created_date",
        "last_modified_by",
        "last_modified_date",
    ];
    const UNIQUE: &'static [&'static [&'static str]] = &[&["file_key"]];

    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, name: &str) -> FieldValue {
        match name {
            "id" => FieldValue::from(self.id.as_str()),
            "folder_id" => FieldValue::from(self.folder_id.as_str()),
            "file_name" => FieldValue::from(self.file_name.as_str()),
            "file_key" => FieldValue::from(self.file_key.as_str()),
            "mime_type" => FieldValue::from(self.mime_type.as_str()),
            "size" => FieldValue::from(self.size),
            "description" => FieldValue::from(self.description.clone()),
            other => self.audit.field(other).unwrap_or(FieldValue::Text(None)),
        }
    }
}
