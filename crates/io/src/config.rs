//! Saver configuration with precedence and validation
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use toolbox_core::{Error, IoResultExt, Result, ResultExt};
use toolbox_utils::SwapOrder;

pub const ENV_SYNC: &str = "TOOLBOX_SAVE_SYNC";
pub const ENV_SWAP_ORDER: &str = "TOOLBOX_SAVE_SWAP_ORDER";
pub const ENV_TEMP_PREFIX: &str = "TOOLBOX_SAVE_TEMP_PREFIX";

/// Keeps scratch names under `NAME_MAX` together with the embedded file name
pub const MAX_TEMP_PREFIX: usize = 64;

/// Settings for the persistence engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaverConfig {
    /// fsync written files before a save returns
    pub sync: bool,
    /// How the atomic swap replaces the original
    pub swap_order: SwapOrder,
    /// Extra prefix for scratch file names
    pub temp_prefix: String,
    /// Configuration source for debugging
    #[serde(skip)]
    pub source: ConfigSource,
}

impl SaverConfig {
    /// Reject prefixes that would place scratch files outside the destination
    /// directory or push their names past `NAME_MAX`
    pub fn validate(&self) -> Result<()> {
        if self
            .temp_prefix
            .chars()
            .any(|c| std::path::is_separator(c) || c == '\0')
        {
            return Err(Error::configuration(format!(
                "temp_prefix '{}' must not contain path separators",
                self.temp_prefix
            )));
        }
        if self.temp_prefix.len() > MAX_TEMP_PREFIX {
            return Err(Error::configuration(format!(
                "temp_prefix is {} bytes, at most {MAX_TEMP_PREFIX} allowed",
                self.temp_prefix.len()
            )));
        }
        Ok(())
    }
}

/// Highest-precedence source that contributed to a loaded configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Default configuration
    #[default]
    Default,
    /// Configuration file
    ConfigFile(PathBuf),
    /// Environment variable
    EnvironmentVariable(String),
}

/// Builder for creating saver configurations
#[derive(Debug, Default)]
pub struct SaverConfigBuilder {
    config: SaverConfig,
}

impl SaverConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sync(mut self, sync: bool) -> Self {
        self.config.sync = sync;
        self
    }

    pub fn with_swap_order(mut self, order: SwapOrder) -> Self {
        self.config.swap_order = order;
        self
    }

    pub fn with_temp_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.temp_prefix = prefix.into();
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<SaverConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Partial settings as they appear in a file or the environment
#[derive(Debug, Default, Deserialize)]
struct SaverOverrides {
    sync: Option<bool>,
    swap_order: Option<SwapOrder>,
    temp_prefix: Option<String>,
}

impl SaverOverrides {
    fn is_empty(&self) -> bool {
        self.sync.is_none() && self.swap_order.is_none() && self.temp_prefix.is_none()
    }

    fn apply(self, config: &mut SaverConfig) {
        if let Some(sync) = self.sync {
            config.sync = sync;
        }
        if let Some(order) = self.swap_order {
            config.swap_order = order;
        }
        if let Some(prefix) = self.temp_prefix {
            config.temp_prefix = prefix;
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    save: Option<SaverOverrides>,
}

/// Configuration loader that handles precedence:
/// defaults, then the config file, then environment variables
pub struct SaverConfigLoader;

impl SaverConfigLoader {
    /// Load configuration with full precedence handling
    pub fn load() -> Result<SaverConfig> {
        let path = Self::get_config_file_path()?;
        Self::load_with_file(&path)
    }

    /// Load configuration reading the config file from `path`
    pub fn load_with_file(path: &Path) -> Result<SaverConfig> {
        let mut config = SaverConfig::default();

        if let Some(file_overrides) = Self::load_from_config_file(path)? {
            file_overrides.apply(&mut config);
            config.source = ConfigSource::ConfigFile(path.to_path_buf());
        }

        let env_overrides = Self::load_from_env()?;
        if !env_overrides.is_empty() {
            env_overrides.apply(&mut config);
            config.source = ConfigSource::EnvironmentVariable("TOOLBOX_SAVE_*".to_string());
        }

        config.validate()?;
        tracing::debug!(?config, "loaded saver configuration");
        Ok(config)
    }

    fn load_from_config_file(path: &Path) -> Result<Option<SaverOverrides>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).fs_context(path, "read config file")?;
        let file: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("invalid config file '{}'", path.display()))?;

        Ok(file.save)
    }

    fn load_from_env() -> Result<SaverOverrides> {
        let mut overrides = SaverOverrides::default();

        if let Ok(value) = std::env::var(ENV_SYNC) {
            overrides.sync = Some(parse_bool(ENV_SYNC, &value)?);
        }

        if let Ok(value) = std::env::var(ENV_SWAP_ORDER) {
            overrides.swap_order = Some(value.parse()?);
        }

        if let Ok(value) = std::env::var(ENV_TEMP_PREFIX) {
            overrides.temp_prefix = Some(value);
        }

        Ok(overrides)
    }

    /// Get the configuration file path
    pub fn get_config_file_path() -> Result<PathBuf> {
        let config_dir = if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(xdg_config_home)
        } else {
            dirs::config_dir().ok_or_else(|| {
                Error::configuration("Could not determine config directory")
            })?
        };

        Ok(config_dir.join("toolbox").join("config.json"))
    }
}

fn parse_bool(variable: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::configuration(format!(
            "{variable} must be a boolean, got '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn clear_env() {
        for var in [ENV_SYNC, ENV_SWAP_ORDER, ENV_TEMP_PREFIX] {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_saver_config_builder() {
        let config = SaverConfigBuilder::new()
            .with_sync(true)
            .with_swap_order(SwapOrder::RenameOver)
            .with_temp_prefix("st-")
            .build()
            .unwrap();

        assert!(config.sync);
        assert_eq!(config.swap_order, SwapOrder::RenameOver);
        assert_eq!(config.temp_prefix, "st-");
    }

    #[test]
    fn test_builder_rejects_separator_prefix() {
        let err = SaverConfigBuilder::new()
            .with_temp_prefix("../escape")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_builder_rejects_oversized_prefix() {
        let err = SaverConfigBuilder::new()
            .with_temp_prefix("p".repeat(MAX_TEMP_PREFIX + 1))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("at most 64"));

        assert!(SaverConfigBuilder::new()
            .with_temp_prefix("p".repeat(MAX_TEMP_PREFIX))
            .build()
            .is_ok());
    }

    #[test]
    #[serial]
    fn test_defaults_without_file_or_env() {
        clear_env();
        let temp_dir = TempDir::new().unwrap();
        let config =
            SaverConfigLoader::load_with_file(&temp_dir.path().join("config.json")).unwrap();
        assert_eq!(config, SaverConfig::default());
        assert_eq!(config.source, ConfigSource::Default);
        assert_eq!(config.swap_order, SwapOrder::DeleteThenRename);
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        clear_env();
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "save": { "sync": true, "swap_order": "rename-over", "temp_prefix": "file-" } }"#,
        )
        .unwrap();

        let config = SaverConfigLoader::load_with_file(&path).unwrap();
        assert!(config.sync);
        assert_eq!(config.swap_order, SwapOrder::RenameOver);
        assert_eq!(config.temp_prefix, "file-");
        assert_eq!(config.source, ConfigSource::ConfigFile(path.clone()));

        std::env::set_var(ENV_SYNC, "off");
        std::env::set_var(ENV_TEMP_PREFIX, "env-");
        let config = SaverConfigLoader::load_with_file(&path).unwrap();
        clear_env();

        assert!(!config.sync);
        assert_eq!(config.swap_order, SwapOrder::RenameOver);
        assert_eq!(config.temp_prefix, "env-");
        assert!(matches!(config.source, ConfigSource::EnvironmentVariable(_)));
    }

    #[test]
    #[serial]
    fn test_invalid_env_value() {
        clear_env();
        std::env::set_var(ENV_SWAP_ORDER, "copy-then-pray");
        let temp_dir = TempDir::new().unwrap();
        let result = SaverConfigLoader::load_with_file(&temp_dir.path().join("config.json"));
        clear_env();

        assert!(matches!(result, Err(Error::Configuration { .. })));
    }

    #[test]
    #[serial]
    fn test_malformed_config_file() {
        clear_env();
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, "{ save: nope").unwrap();

        let err = SaverConfigLoader::load_with_file(&path).unwrap_err();
        assert!(err.to_string().contains("invalid config file"));
    }

    #[test]
    #[serial]
    fn test_config_path_honours_xdg() {
        let temp_dir = TempDir::new().unwrap();
        let previous = std::env::var_os("XDG_CONFIG_HOME");
        std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());

        let path = SaverConfigLoader::get_config_file_path().unwrap();

        match previous {
            Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }
        assert_eq!(path, temp_dir.path().join("toolbox").join("config.json"));
    }
}
