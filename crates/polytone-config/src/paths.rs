//! Platform-specific configuration paths.
//!
//! - Linux: `~/.config/polytone/config.toml`
//! - macOS: `~/Library/Application Support/polytone/config.toml`
//! - Windows: `%APPDATA%\polytone\config.toml`

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::settings::Settings;

/// Application name used for directory paths.
const APP_NAME: &str = "polytone";

/// File name of the settings file.
const CONFIG_FILE: &str = "config.toml";

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the default settings file path.
pub fn default_config_path() -> PathBuf {
    user_config_dir().join(CONFIG_FILE)
}

/// Load settings from `path`, or defaults if the file doesn't exist.
///
/// A file that exists but can't be read or parsed is still an error.
pub fn load_or_default(path: impl AsRef<Path>) -> Result<Settings, ConfigError> {
    let path = path.as_ref();
    if path.exists() {
        Settings::load(path)
    } else {
        Ok(Settings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_user_config_dir() {
        let dir = user_config_dir();
        assert!(dir.ends_with(APP_NAME));
    }

    #[test]
    fn test_default_config_path() {
        let path = default_config_path();
        assert!(path.ends_with("polytone/config.toml"));
        assert_eq!(path.parent(), Some(user_config_dir().as_path()));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_broken_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "velocity = \"loud\"").unwrap();
        assert!(matches!(
            load_or_default(&path),
            Err(ConfigError::TomlParse(_))
        ));
    }
}
