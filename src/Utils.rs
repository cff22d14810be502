pub mod errors;
pub mod grid;
pub mod logger;
pub mod task_config;
