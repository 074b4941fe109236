mod member_info;
mod repository;

pub use member_info::{MemberInfo, MemberRole};
pub use repository::Repository;
