//! Configuration File Loading
//!
//! Handles loading and saving configuration files from various locations
//! with support for multiple formats and fallback mechanisms.

use super::Config;
use crate::error::{Error, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit configuration file
pub const CONFIG_ENV_VAR: &str = "SHELLWRAP_CONFIG";

/// Configuration file loader
pub struct ConfigLoader {
    /// Search paths for configuration files (without extension)
    search_paths: Vec<PathBuf>,
    /// Supported configuration file formats
    supported_formats: Vec<ConfigFormat>,
    /// Current configuration file path (if loaded)
    current_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    fn extension(self) -> &'static str {
        match self {
            ConfigFormat::Toml => "toml",
            ConfigFormat::Json => "json",
        }
    }

    fn name(self) -> &'static str {
        match self {
            ConfigFormat::Toml => "TOML",
            ConfigFormat::Json => "JSON",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Whether to fall back to the default config if none exists
    pub create_default: bool,
    /// Whether to validate configuration after loading
    pub validate: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            create_default: true,
            validate: true,
        }
    }
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            search_paths: Self::get_search_paths(),
            supported_formats: vec![ConfigFormat::Toml, ConfigFormat::Json],
            current_path: None,
        }
    }

    /// Load configuration with default options
    pub fn load() -> Result<Config> {
        Self::load_with_options(LoadOptions::default())
    }

    /// Load configuration with custom options
    pub fn load_with_options(options: LoadOptions) -> Result<Config> {
        let mut loader = Self::new();

        if let Ok(explicit) = env::var(CONFIG_ENV_VAR) {
            debug!("Loading config from ${}: {}", CONFIG_ENV_VAR, explicit);
            return loader.load_from_path(Path::new(&explicit));
        }

        if let Some((path, config)) = loader.find_and_load_config()? {
            info!("Loaded configuration from {}", path.display());
            loader.current_path = Some(path);

            if options.validate {
                loader.validate_config(&config)?;
            }

            return Ok(config);
        }

        if options.create_default {
            debug!("No configuration file found, using defaults");
            let config = Config::default();
            if options.validate {
                loader.validate_config(&config)?;
            }
            Ok(config)
        } else {
            Err(Error::ConfigNotFound)
        }
    }

    /// Load and validate a specific file; format follows the extension
    pub fn load_from_path(&mut self, path: &Path) -> Result<Config> {
        let format = super::utils::get_config_format(path).unwrap_or(ConfigFormat::Toml);
        let config = self.load_config_file(path, format)?;
        self.validate_config(&config)?;
        self.current_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Save configuration to the current path or default location
    pub fn save(&self, config: &Config) -> Result<PathBuf> {
        let path = self
            .current_path
            .clone()
            .unwrap_or_else(Self::get_default_config_path);

        self.save_to_path(config, &path)?;
        Ok(path)
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, config: &Config, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let format = super::utils::get_config_format(path).unwrap_or(ConfigFormat::Toml);
        let content = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(config).map_err(|e| {
                Error::ConfigSerializationFailed {
                    format: format.name().to_string(),
                    reason: e.to_string(),
                }
            })?,
            ConfigFormat::Toml => {
                toml::to_string_pretty(config).map_err(|e| Error::ConfigSerializationFailed {
                    format: format.name().to_string(),
                    reason: e.to_string(),
                })?
            }
        };

        fs::write(path, content)?;
        Ok(())
    }

    /// Find and load configuration from search paths
    fn find_and_load_config(&self) -> Result<Option<(PathBuf, Config)>> {
        for path in &self.search_paths {
            for format in &self.supported_formats {
                let config_path = path.with_extension(format.extension());

                if config_path.exists() {
                    match self.load_config_file(&config_path, *format) {
                        Ok(config) => return Ok(Some((config_path, config))),
                        Err(e) => {
                            // Keep searching; a broken file should not block startup
                            warn!("Failed to load config from {}: {}", config_path.display(), e);
                            continue;
                        }
                    }
                }
            }
        }

        Ok(None)
    }

    /// Load a specific configuration file
    fn load_config_file(&self, path: &Path, format: ConfigFormat) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| Error::ConfigLoadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        match format {
            ConfigFormat::Toml => toml::from_str(&content).map_err(|e| Error::ConfigParseFailed {
                format: format.name().to_string(),
                reason: e.to_string(),
            }),
            ConfigFormat::Json => {
                serde_json::from_str(&content).map_err(|e| Error::ConfigParseFailed {
                    format: format.name().to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Get default search paths for configuration files
    fn get_search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(cwd) = env::current_dir() {
            paths.push(cwd.join("shellwrap"));
        }

        if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
            paths.push(PathBuf::from(xdg_config).join("shellwrap").join("config"));
        }

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("shellwrap").join("config"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".shellwrap"));
        }

        paths
    }

    /// Get the default configuration path
    fn get_default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("shellwrap")
            .join("config.toml")
    }

    /// Validate configuration
    pub fn validate_config(&self, config: &Config) -> Result<()> {
        if config.alerts.interval_ms == 0 {
            return Err(Error::ConfigValidationFailed {
                field: "alerts.interval_ms".to_string(),
                reason: "Alert interval must be greater than 0".to_string(),
            });
        }

        if config.alerts.interval_ms > 10_000 {
            return Err(Error::ConfigValidationFailed {
                field: "alerts.interval_ms".to_string(),
                reason: "Alert interval cannot exceed 10 seconds".to_string(),
            });
        }

        if config.process.exit_poll_interval_ms == 0 {
            return Err(Error::ConfigValidationFailed {
                field: "process.exit_poll_interval_ms".to_string(),
                reason: "Exit poll interval must be greater than 0".to_string(),
            });
        }

        if config.process.read_buffer_size == 0 {
            return Err(Error::ConfigValidationFailed {
                field: "process.read_buffer_size".to_string(),
                reason: "Read buffer size must be greater than 0".to_string(),
            });
        }

        if let Some(flag) = &config.process.command_flag {
            if flag.trim().is_empty() {
                return Err(Error::ConfigValidationFailed {
                    field: "process.command_flag".to_string(),
                    reason: "Command flag cannot be empty".to_string(),
                });
            }
        }

        if config.shell.prompt_suffix.is_empty() {
            return Err(Error::ConfigValidationFailed {
                field: "shell.prompt_suffix".to_string(),
                reason: "Prompt suffix cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Get the current configuration file path
    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    /// List all search paths
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Clear all search paths and add a single path
    pub fn set_search_path(&mut self, path: PathBuf) {
        self.search_paths = vec![path];
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
