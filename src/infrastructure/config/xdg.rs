//! XDG config store adapter

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;

/// Directory name under the user config dir
const APP_DIR: &str = "fleet-voice";

/// XDG-compliant config store
pub struct XdgConfigStore {
    path: PathBuf,
}

impl XdgConfigStore {
    /// Create a store at `$XDG_CONFIG_HOME/fleet-voice/config.toml`
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join(APP_DIR);

        Self {
            path: config_dir.join("config.toml"),
        }
    }

    /// Create with custom path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parse_toml(content: &str) -> Result<AppConfig, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    fn to_toml(config: &AppConfig) -> Result<String, ConfigError> {
        toml::to_string_pretty(config).map_err(|e| ConfigError::WriteError(e.to_string()))
    }
}

impl Default for XdgConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigStore for XdgConfigStore {
    async fn load(&self) -> Result<AppConfig, ConfigError> {
        if !self.exists() {
            debug!(path = %self.path.display(), "no config file, using defaults");
            return Ok(AppConfig::empty());
        }

        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| ConfigError::ReadError(e.to_string()))?;

        Self::parse_toml(&content)
    }

    async fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let content = Self::to_toml(config)?;

        fs::write(&self.path, content)
            .await
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        debug!(path = %self.path.display(), "config saved");
        Ok(())
    }

    fn path(&self) -> PathBuf {
        self.path.clone()
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }

    async fn init(&self) -> Result<(), ConfigError> {
        if self.exists() {
            return Err(ConfigError::AlreadyExists(
                self.path.to_string_lossy().to_string(),
            ));
        }

        self.save(&AppConfig::defaults()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_is_xdg() {
        let path = XdgConfigStore::new().path();
        assert!(path.to_string_lossy().contains("fleet-voice"));
        assert!(path.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn custom_path() {
        let store = XdgConfigStore::with_path("/custom/path/config.toml");
        assert_eq!(store.path(), PathBuf::from("/custom/path/config.toml"));
    }

    #[test]
    fn parse_toml_flat_format() {
        let content = r#"
duration = "30s"
device = "USB Audio"
chunk_size = 4096
log_level = "debug"
"#;

        let config = XdgConfigStore::parse_toml(content).unwrap();
        assert_eq!(config.duration, Some("30s".to_string()));
        assert_eq!(config.device, Some("USB Audio".to_string()));
        assert_eq!(config.chunk_size, Some(4096));
        assert_eq!(config.log_level, Some("debug".to_string()));
        assert!(config.output_dir.is_none());
    }

    #[test]
    fn parse_toml_rejects_wrong_types() {
        let result = XdgConfigStore::parse_toml("chunk_size = \"big\"");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = XdgConfigStore::with_path(dir.path().join("config.toml"));
        assert_eq!(store.load().await.unwrap(), AppConfig::empty());
    }

    #[tokio::test]
    async fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = XdgConfigStore::with_path(dir.path().join("nested").join("config.toml"));
        let config = AppConfig {
            duration: Some("5s".to_string()),
            output_dir: Some("/tmp/clips".to_string()),
            ..Default::default()
        };

        store.save(&config).await.unwrap();
        assert_eq!(store.load().await.unwrap(), config);
    }

    #[tokio::test]
    async fn init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let store = XdgConfigStore::with_path(dir.path().join("config.toml"));

        store.init().await.unwrap();
        assert_eq!(store.load().await.unwrap(), AppConfig::defaults());
        assert!(matches!(
            store.init().await,
            Err(ConfigError::AlreadyExists(_))
        ));
    }
}
