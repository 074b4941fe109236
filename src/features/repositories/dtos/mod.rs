mod repository_dto;

pub use repository_dto::{
    AddMemberDto, CreateRepositoryDto, DeleteRepositoryResponseDto, MemberResponseDto,
    ProjectCreatedEvent, RepositoryDetailDto, RepositoryFilterParams, RepositoryResponseDto,
    UpdateRepositoryDto,
};
