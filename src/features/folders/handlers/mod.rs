pub mod folder_handler;

pub use folder_handler::{
    __path_create_folder_in_folder, __path_create_folder_in_repository, __path_delete_folder,
    __path_get_folder, __path_get_folders_by_repository, __path_update_folder,
    create_folder_in_folder, create_folder_in_repository, delete_folder, get_folder,
    get_folders_by_repository, update_folder,
};
