pub mod limiter;
pub mod renderer;
pub mod utils;
