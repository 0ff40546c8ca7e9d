pub mod mapper;
pub mod resume;
