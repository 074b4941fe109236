pub mod file_handler;

pub use file_handler::{
    __path_add_file_to_folder, __path_delete_file, __path_download_file, __path_get_file,
    __path_get_files, __path_share_file, __path_update_file, __path_upload_file,
    add_file_to_folder, delete_file, download_file, get_file, get_files, share_file,
    update_file, upload_file,
};
