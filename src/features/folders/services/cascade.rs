use std::collections::HashSet;

use tracing::debug;

use crate::core::database::DocumentStores;
use crate::core::error::Result;
use crate::modules::documents::DocumentQuery;

/// What a cascading folder delete removed
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PurgeSummary {
    pub folders: u64,
    pub files: u64,
    /// Object-store keys of the removed files, still to be deleted
    pub object_keys: Vec<String>,
}

/// Ids of `roots` and every folder below them, parents before children
pub async fn collect_subtree(stores: &DocumentStores, roots: Vec<String>) -> Result<Vec<String>> {
    let mut seen: HashSet<String> = roots.iter().cloned().collect();
    let mut all = roots.clone();
    let mut frontier = roots;

    while !frontier.is_empty() {
        let children = stores
            .folders
            .find(&DocumentQuery::new().any_of("parent_folder_id", frontier))
            .await?;

        frontier = children
            .into_iter()
            .map(|f| f.id)
            .filter(|id| seen.insert(id.clone()))
            .collect();
        all.extend(frontier.iter().cloned());
    }

    Ok(all)
}

/// Remove the given folders and all files inside them from the document store
pub async fn purge_folders(stores: &DocumentStores, folder_ids: Vec<String>) -> Result<PurgeSummary> {
    if folder_ids.is_empty() {
        return Ok(PurgeSummary::default());
    }

    let in_folders = DocumentQuery::new().any_of("folder_id", folder_ids.clone());
    let object_keys = stores
        .files
        .find(&in_folders)
        .await?
        .into_iter()
        .map(|f| f.file_key)
        .collect();

    let files = stores
        .files
        .delete_where(&in_folders)
        .await
        .map_err(|e| e.context("Can't delete files from database"))?;

    let folders = stores
        .folders
        .delete_where(&DocumentQuery::new().any_of("id", folder_ids))
        .await
        .map_err(|e| e.context("Can't delete folders from database"))?;

    debug!("Purged {} folders and {} files", folders, files);

    Ok(PurgeSummary {
        folders,
        files,
        object_keys,
    })
}
