//! Settings store port

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

/// Persistent home of the user's capture settings (device, chunk size,
/// output directory, ...)
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Read the stored settings. A store with no file yields
    /// [`AppConfig::empty`], so merging falls through to the defaults.
    async fn load(&self) -> Result<AppConfig, ConfigError>;

    /// Replace the stored settings with `config`
    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError>;

    /// Where the settings live
    fn path(&self) -> PathBuf;

    fn exists(&self) -> bool;

    /// Write [`AppConfig::defaults`], refusing to overwrite an existing file
    async fn init(&self) -> Result<(), ConfigError>;
}
