mod folder_dto;

pub use folder_dto::{
    CreateFolderDto, DeleteFolderResponseDto, FolderDetailDto, FolderFilterParams,
    FolderResponseDto, UpdateFolderDto,
};
