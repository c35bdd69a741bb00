//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::{AppConfig, VALID_LOG_LEVELS};
use crate::domain::error::ConfigError;
use crate::domain::recording::Duration;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let mut config = store.load().await?;
    apply_config_value(&mut config, key, value)?;

    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let config = store.load().await?;
    let value = config_value(&config, key);
    presenter.output(value.as_deref().unwrap_or(NOT_SET));

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        let value = config_value(&config, key);
        presenter.key_value(key, value.as_deref().unwrap_or(NOT_SET));
    }

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn check_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        return Ok(());
    }
    Err(ConfigError::ValidationError {
        key: key.to_string(),
        message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
    })
}

/// Read a key from the config as a display string
fn config_value(config: &AppConfig, key: &str) -> Option<String> {
    match key {
        "duration" => config.duration.clone(),
        "device" => config.device.clone(),
        "output_dir" => config.output_dir.clone(),
        "chunk_size" => config.chunk_size.map(|n| n.to_string()),
        "log_level" => config.log_level.clone(),
        _ => None,
    }
}

/// Validate `value` for `key` and store it in the config
fn apply_config_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::ValidationError {
        key: key.to_string(),
        message,
    };

    match key {
        "duration" => {
            let duration: Duration = value.parse().map_err(|e| invalid(format!("{}", e)))?;
            config.duration = Some(duration.to_string());
        }
        "device" => config.device = Some(value.to_string()),
        "output_dir" => {
            if value.trim().is_empty() {
                return Err(invalid("Value must not be empty".to_string()));
            }
            config.output_dir = Some(value.to_string());
        }
        "chunk_size" => {
            let size = value
                .parse::<usize>()
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| invalid("Value must be a positive number of bytes".to_string()))?;
            config.chunk_size = Some(size);
        }
        "log_level" => {
            let level = value.to_lowercase();
            if !VALID_LOG_LEVELS.contains(&level.as_str()) {
                return Err(invalid(format!(
                    "Invalid value '{}'. Valid options: {}",
                    value,
                    VALID_LOG_LEVELS.join(", ")
                )));
            }
            config.log_level = Some(level);
        }
        _ => return Err(invalid("Unknown key".to_string())),
    }
    Ok(())
}
