//! Configuration module
//!
//! TOML file + environment variable configuration with merge priority:
//! CLI args > environment variables > config file > defaults.

pub mod app_config;
pub mod path_resolver;

pub use app_config::AppConfig;
