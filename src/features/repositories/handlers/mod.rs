pub mod event_handler;
pub mod repository_handler;

pub use event_handler::{__path_project_created, project_created};
pub use repository_handler::{
    __path_add_member, __path_create_repository, __path_delete_repository,
    __path_get_repositories, __path_get_repository, __path_list_members, __path_remove_member,
    __path_update_repository, add_member, create_repository, delete_repository,
    get_repositories, get_repository, list_members, remove_member, update_repository,
};
