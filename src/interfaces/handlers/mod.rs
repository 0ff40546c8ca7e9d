pub mod json_error;
pub mod resume;
pub mod system;
