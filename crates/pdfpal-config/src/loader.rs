//! TOML settings loading: read from path or platform default.

use std::path::Path;

use pdfpal_common::ConfigError;
use tracing::info;

use crate::schema::Settings;

/// Get the platform-specific default config file path.
///
/// On macOS: `~/Library/Application Support/pdfpal/config.toml`
/// On Linux: `~/.config/pdfpal/config.toml`
pub fn default_config_path() -> Result<std::path::PathBuf, ConfigError> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::ParseError("could not determine config directory".into()))?;
    Ok(config_dir.join("pdfpal").join("config.toml"))
}

/// Load settings from a specific TOML file path. Missing fields are filled
/// with serde defaults.
pub fn load_from_path(path: &Path) -> Result<Settings, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let settings: Settings = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    info!("loaded settings from {}", path.display());
    Ok(settings)
}

/// Load settings from the platform default path. If the file does not exist,
/// a default config file is created and defaults are returned.
pub fn load_default() -> Result<Settings, ConfigError> {
    let path = default_config_path()?;

    match load_from_path(&path) {
        Ok(settings) => Ok(settings),
        Err(ConfigError::ParseError(msg)) if msg.contains("failed to read") => {
            info!("no settings found at {}, creating default", path.display());
            let settings = Settings::default();
            save_to_path(&path, &settings)?;
            Ok(settings)
        }
        Err(e) => Err(e),
    }
}

/// Write settings back to a TOML file, creating parent directories as needed.
pub fn save_to_path(path: &Path, settings: &Settings) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::WriteError(format!(
                "failed to create config directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    let content = toml::to_string_pretty(settings)
        .map_err(|e| ConfigError::WriteError(format!("failed to serialize settings: {e}")))?;

    std::fs::write(path, content)
        .map_err(|e| ConfigError::WriteError(format!("failed to write {}: {e}", path.display())))?;

    Ok(())
}
