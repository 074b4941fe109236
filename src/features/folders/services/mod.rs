mod cascade;
mod folder_service;

pub use cascade::{collect_subtree, purge_folders};
pub use folder_service::FolderService;
