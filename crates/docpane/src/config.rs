//! Configuration management for docpane.
//!
//! Settings are merged from three TOML sources, later ones winning:
//! 1. Bundled defaults (include_str! from docpane.toml)
//! 2. ~/.config/docpane/docpane.toml
//! 3. ./docpane.toml

use config::{Config, File, FileFormat};
use derive_getters::Getters;
use docpane_error::{ConfigError, DocpaneError, DocpaneResult};
use docpane_explorer::TabSettings;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../docpane.toml");

/// Explorer behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Documents requested per page.
    page_size: usize,
    /// Whether queries may span partitions.
    enable_cross_partition_query: bool,
    /// Title given to browsing tabs.
    tab_title: String,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            page_size: 100,
            enable_cross_partition_query: true,
            tab_title: "Documents".to_string(),
        }
    }
}

impl ExplorerConfig {
    /// Tab settings derived from this configuration.
    pub fn tab_settings(&self) -> DocpaneResult<TabSettings> {
        TabSettings::builder()
            .tab_title(self.tab_title.clone())
            .cross_partition_enabled(self.enable_cross_partition_query)
            .build()
            .map_err(|e| ConfigError::new(format!("Invalid tab settings: {}", e)).into())
    }
}

/// Log output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    level: String,
    /// Emit JSON lines instead of human-readable text.
    json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl LoggingConfig {
    /// Replaces the filter directive.
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }
}

/// Complete docpane configuration.
///
/// # Example
///
/// ```no_run
/// use docpane::DocpaneConfig;
///
/// let config = DocpaneConfig::load().expect("configuration");
/// println!("page size: {}", config.explorer().page_size());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct DocpaneConfig {
    /// Explorer behaviour.
    explorer: ExplorerConfig,
    /// Log output.
    logging: LoggingConfig,
}

impl DocpaneConfig {
    /// Loads configuration from a single TOML file layered over the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> DocpaneResult<Self> {
        debug!("Loading configuration from file");

        let builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()).format(FileFormat::Toml));
        Self::build(builder, &path.as_ref().display().to_string())
    }

    /// Loads configuration with precedence: current dir > home dir > bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a present file cannot be parsed.
    #[instrument]
    pub fn load() -> DocpaneResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/docpane/docpane.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("docpane").required(false));
        Self::build(builder, "docpane.toml")
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        origin: &str,
    ) -> DocpaneResult<Self> {
        let config: Self = builder
            .build()
            .map_err(|e| {
                DocpaneError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    origin, e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                DocpaneError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        if config.explorer.page_size == 0 {
            return Err(ConfigError::new("explorer.page_size must be at least 1").into());
        }
        debug!(
            page_size = config.explorer.page_size,
            cross_partition = config.explorer.enable_cross_partition_query,
            "Configuration loaded"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_defaults_match_code_defaults() {
        let config: DocpaneConfig = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config, DocpaneConfig::default());
    }
}
