//! Configuration domain module

mod app_config;

pub use app_config::{AppConfig, DEFAULT_CHUNK_SIZE, DEFAULT_LOG_LEVEL, VALID_LOG_LEVELS};
