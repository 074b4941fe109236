mod file_dto;

pub use file_dto::{
    AddFileDto, DeleteFileResponseDto, FileFilterParams, FileResponseDto, ShareFileParams,
    ShareFileResponseDto, UpdateFileDto, UploadFileDto,
};
