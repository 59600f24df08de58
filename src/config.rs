/*!
 * Configuration support for the cdpload pipeline
 *
 * Provides runtime configuration options for customizing loader and cleaner
 * behavior.
 */

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::batch::DEFAULT_BATCH_SIZE;
use crate::clean::DEFAULT_PHONE_COLUMN;
use crate::reader::{columns, CustomerColumns};

/// Global configuration for the cdpload pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CdpConfig {
    /// Number of customers per insert batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Whether to show progress output during long operations
    #[serde(default = "default_enable_progress_bar")]
    pub enable_progress_bar: bool,

    /// Name of the phone column for the clean path
    #[serde(default = "default_phone_column")]
    pub phone_column: String,

    /// Name of the identifier column for the load path
    #[serde(default = "default_id_column")]
    pub id_column: String,

    /// Name of the email column for the load path
    #[serde(default = "default_email_column")]
    pub email_column: String,

    /// Name of the first name column for the load path
    #[serde(default = "default_first_name_column")]
    pub first_name_column: String,

    /// Name of the last name column for the load path
    #[serde(default = "default_last_name_column")]
    pub last_name_column: String,
}

impl Default for CdpConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            enable_progress_bar: default_enable_progress_bar(),
            phone_column: default_phone_column(),
            id_column: default_id_column(),
            email_column: default_email_column(),
            first_name_column: default_first_name_column(),
            last_name_column: default_last_name_column(),
        }
    }
}

// Default value functions for serde
fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_enable_progress_bar() -> bool {
    true
}

fn default_phone_column() -> String {
    DEFAULT_PHONE_COLUMN.to_string()
}

fn default_id_column() -> String {
    columns::ID.to_string()
}

fn default_email_column() -> String {
    columns::EMAIL.to_string()
}

fn default_first_name_column() -> String {
    columns::FIRST_NAME.to_string()
}

fn default_last_name_column() -> String {
    columns::LAST_NAME.to_string()
}

impl CdpConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Column names derived from this configuration
    pub fn customer_columns(&self) -> CustomerColumns {
        CustomerColumns {
            id: self.id_column.clone(),
            email: self.email_column.clone(),
            first_name: self.first_name_column.clone(),
            last_name: self.last_name_column.clone(),
            phone: self.phone_column.clone(),
        }
    }

    /// Load configuration from environment variables
    ///
    /// Supported environment variables:
    /// - `CDPLOAD_BATCH_SIZE`: number
    /// - `CDPLOAD_PROGRESS_BAR`: "true" or "false"
    /// - `CDPLOAD_PHONE_COLUMN`: column name
    /// - `CDPLOAD_ID_COLUMN`: column name
    /// - `CDPLOAD_EMAIL_COLUMN`: column name
    /// - `CDPLOAD_FIRST_NAME_COLUMN`: column name
    /// - `CDPLOAD_LAST_NAME_COLUMN`: column name
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("CDPLOAD_BATCH_SIZE") {
            if let Ok(size) = val.parse::<usize>() {
                config.batch_size = size.max(1);
            }
        }

        if let Ok(val) = std::env::var("CDPLOAD_PROGRESS_BAR") {
            config.enable_progress_bar = val.to_lowercase() == "true";
        }

        if let Ok(val) = std::env::var("CDPLOAD_PHONE_COLUMN") {
            config.phone_column = val;
        }

        if let Ok(val) = std::env::var("CDPLOAD_ID_COLUMN") {
            config.id_column = val;
        }

        if let Ok(val) = std::env::var("CDPLOAD_EMAIL_COLUMN") {
            config.email_column = val;
        }

        if let Ok(val) = std::env::var("CDPLOAD_FIRST_NAME_COLUMN") {
            config.first_name_column = val;
        }

        if let Ok(val) = std::env::var("CDPLOAD_LAST_NAME_COLUMN") {
            config.last_name_column = val;
        }

        config
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&contents).map_err(|e| crate::CdpError::Configuration {
            message: format!("Failed to parse config file: {}", e),
            suggestion: Some("Check that the file is valid TOML format".to_string()),
        })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| crate::CdpError::Configuration {
            message: format!("Failed to serialize config: {}", e),
            suggestion: None,
        })?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the default configuration file path
    ///
    /// Returns `~/.config/cdpload/config.toml` on Unix-like systems
    /// or `%APPDATA%\cdpload\config.toml` on Windows
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "cdpload")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from the default location, environment, or defaults
    ///
    /// Priority order:
    /// 1. Default config file (if exists)
    /// 2. Environment variables
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Some(config_path) = Self::default_config_path() {
            if config_path.exists() {
                if let Ok(config) = Self::from_file(&config_path) {
                    return config;
                }
            }
        }

        Self::from_env()
    }
}

// Global configuration support
use std::sync::RwLock;

lazy_static::lazy_static! {
    static ref GLOBAL_CONFIG: RwLock<Option<CdpConfig>> = RwLock::new(None);
}

/// Set the global configuration
pub fn set_global_config(config: CdpConfig) {
    *GLOBAL_CONFIG.write().unwrap() = Some(config);
}

/// Get the global configuration (or default if not set)
pub fn global_config() -> CdpConfig {
    GLOBAL_CONFIG
        .read()
        .unwrap()
        .as_ref()
        .cloned()
        .unwrap_or_else(CdpConfig::load)
}

/// Clear the global configuration
pub fn clear_global_config() {
    *GLOBAL_CONFIG.write().unwrap() = None;
}

/// Builder for customizing configuration
pub struct ConfigBuilder {
    config: CdpConfig,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    /// Start building a new configuration
    pub fn new() -> Self {
        Self {
            config: CdpConfig::default(),
        }
    }

    /// Set batch size (clamped to at least 1)
    pub fn batch_size(mut self, size: usize) -> Self {
        self.config.batch_size = size.max(1);
        self
    }

    /// Set progress bar enabled
    pub fn progress_bar(mut self, enabled: bool) -> Self {
        self.config.enable_progress_bar = enabled;
        self
    }

    /// Set the phone column name
    pub fn phone_column<S: Into<String>>(mut self, name: S) -> Self {
        self.config.phone_column = name.into();
        self
    }

    /// Set the identifier column name
    pub fn id_column<S: Into<String>>(mut self, name: S) -> Self {
        self.config.id_column = name.into();
        self
    }

    /// Build the configuration
    pub fn build(self) -> CdpConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = CdpConfig::default();
        assert_eq!(config.batch_size, 50);
        assert!(config.enable_progress_bar);
        assert_eq!(config.phone_column, "Cell_Number");
        assert_eq!(config.id_column, "Indiv_ID");
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .batch_size(100)
            .progress_bar(false)
            .phone_column("Phone")
            .id_column("CustomerId")
            .build();

        assert_eq!(config.batch_size, 100);
        assert!(!config.enable_progress_bar);
        assert_eq!(config.phone_column, "Phone");
        assert_eq!(config.id_column, "CustomerId");
    }

    #[test]
    fn test_builder_clamps_zero_batch_size() {
        let config = ConfigBuilder::new().batch_size(0).build();
        assert_eq!(config.batch_size, 1);
    }

    #[test]
    fn test_customer_columns_follow_config() {
        let config = ConfigBuilder::new().id_column("CustomerId").build();
        let columns = config.customer_columns();
        assert_eq!(columns.id, "CustomerId");
        assert_eq!(columns.phone, "Cell_Number");
    }
}
