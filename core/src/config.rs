//! TOML Configuration File Support
//!
//! Settings for the tips CLI, loaded from `~/.config/tips/config.toml`.
//!
//! # Configuration Priority
//!
//! Values are resolved with the following priority (highest first):
//! 1. CLI arguments (applied by the caller through [`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [storage]
//! tips_file = "/home/me/.tips.json"
//!
//! [display]
//! refresh_minutes = 30
//!
//! [generate]
//! model = "anthropic/claude-3-5-haiku-latest"
//! count = 10
//! request_timeout_secs = 60
//!
//! [logging]
//! log_file = "/tmp/tips.log"
//! ```

use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::default_tips_path;

/// Default model spec (`provider/model`)
pub const DEFAULT_MODEL: &str = "openai/gpt-4o";

/// Default refresh interval in minutes
pub const DEFAULT_REFRESH_MINUTES: u32 = 60;

/// Default number of tips generated per request
pub const DEFAULT_COUNT: u32 = 20;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// `[storage]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageToml {
    /// Path of the tips JSON file
    pub tips_file: Option<PathBuf>,
}

/// `[display]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayToml {
    /// Refresh interval of the interactive display, in minutes
    pub refresh_minutes: Option<u32>,
}

/// `[generate]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateToml {
    /// Model spec, `provider/model`
    pub model: Option<String>,
    /// Tips requested per call
    pub count: Option<u32>,
    /// HTTP timeout for generation requests
    pub request_timeout_secs: Option<u64>,
}

/// `[logging]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingToml {
    /// Write logs to this file instead of stderr
    pub log_file: Option<PathBuf>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TipsToml {
    /// Storage section
    pub storage: StorageToml,
    /// Display section
    pub display: DisplayToml,
    /// Generation section
    pub generate: GenerateToml,
    /// Logging section
    pub logging: LoggingToml,
}

// =============================================================================
// Resolved Configuration
// =============================================================================

/// Fully resolved settings for one CLI invocation
#[derive(Clone, Debug)]
pub struct TipsConfig {
    /// Tips JSON file (`None` if the home directory is unknown)
    pub tips_file: Option<PathBuf>,
    /// Display refresh interval in minutes
    pub refresh_minutes: NonZeroU32,
    /// Model spec for generation
    pub model: String,
    /// Tips requested per generation call
    pub count: NonZeroU32,
    /// HTTP timeout for generation requests
    pub request_timeout: Duration,
    /// Log file, if logs should not go to stderr
    pub log_file: Option<PathBuf>,
    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,
    source: ConfigSource,
}

impl Default for TipsConfig {
    fn default() -> Self {
        Self {
            tips_file: default_tips_path(),
            refresh_minutes: NonZeroU32::new(DEFAULT_REFRESH_MINUTES).unwrap_or(NonZeroU32::MIN),
            model: DEFAULT_MODEL.to_string(),
            count: NonZeroU32::new(DEFAULT_COUNT).unwrap_or(NonZeroU32::MIN),
            request_timeout: Duration::from_secs(120),
            log_file: None,
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl TipsConfig {
    /// Create a configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest-priority source that contributed a value
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// `$XDG_CONFIG_HOME/tips/config.toml`
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tips").join("config.toml"))
}

/// Load configuration from a specific path, then the environment
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if a value from
/// the file or the environment is out of range.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<TipsConfig, ConfigError> {
    let mut config = TipsConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: TipsToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config)?;
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(path = %config_path.display(), "Loaded configuration from file");
        } else {
            tracing::debug!(path = %config_path.display(), "Config file not found, using defaults");
        }
    }

    apply_env_config(&mut config)?;

    Ok(config)
}

fn positive(name: &str, value: u32) -> Result<NonZeroU32, ConfigError> {
    NonZeroU32::new(value)
        .ok_or_else(|| ConfigError::ValidationError(format!("{name} must be greater than 0")))
}

fn parse_positive(name: &str, raw: &str) -> Result<NonZeroU32, ConfigError> {
    let value = raw.trim().parse::<u32>().map_err(|_| {
        ConfigError::ValidationError(format!("{name} must be a positive integer, got {raw:?}"))
    })?;
    positive(name, value)
}

fn apply_toml_config(config: &mut TipsConfig, toml: &TipsToml) -> Result<(), ConfigError> {
    if let Some(ref path) = toml.storage.tips_file {
        config.tips_file = Some(path.clone());
    }
    if let Some(minutes) = toml.display.refresh_minutes {
        config.refresh_minutes = positive("display.refresh_minutes", minutes)?;
    }
    if let Some(ref model) = toml.generate.model {
        config.model.clone_from(model);
    }
    if let Some(count) = toml.generate.count {
        config.count = positive("generate.count", count)?;
    }
    if let Some(secs) = toml.generate.request_timeout_secs {
        config.request_timeout = Duration::from_secs(secs);
    }
    if let Some(ref path) = toml.logging.log_file {
        config.log_file = Some(path.clone());
    }
    Ok(())
}

fn apply_env_config(config: &mut TipsConfig) -> Result<(), ConfigError> {
    if let Ok(path) = std::env::var("TIPS_FILE") {
        config.tips_file = Some(PathBuf::from(path));
        config.source = ConfigSource::Env;
    }
    if let Ok(model) = std::env::var("TIPS_MODEL") {
        if !model.trim().is_empty() {
            config.model = model;
            config.source = ConfigSource::Env;
        }
    }
    if let Ok(minutes) = std::env::var("TIPS_REFRESH_MINUTES") {
        config.refresh_minutes = parse_positive("TIPS_REFRESH_MINUTES", &minutes)?;
        config.source = ConfigSource::Env;
    }
    if let Ok(count) = std::env::var("TIPS_COUNT") {
        config.count = parse_positive("TIPS_COUNT", &count)?;
        config.source = ConfigSource::Env;
    }
    if let Ok(path) = std::env::var("TIPS_LOG_FILE") {
        config.log_file = Some(PathBuf::from(path));
        config.source = ConfigSource::Env;
    }
    Ok(())
}

// =============================================================================
// CLI Overrides
// =============================================================================

/// Values given on the command line, applied last
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Tips file override
    pub tips_file: Option<PathBuf>,
    /// Refresh interval override
    pub refresh_minutes: Option<NonZeroU32>,
    /// Generation count override
    pub count: Option<NonZeroU32>,
}

impl ConfigOverrides {
    /// Create empty overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the tips file
    #[must_use]
    pub fn with_tips_file(mut self, path: PathBuf) -> Self {
        self.tips_file = Some(path);
        self
    }

    /// Override the refresh interval
    #[must_use]
    pub fn with_refresh_minutes(mut self, minutes: NonZeroU32) -> Self {
        self.refresh_minutes = Some(minutes);
        self
    }

    /// Override the generation count
    #[must_use]
    pub fn with_count(mut self, count: NonZeroU32) -> Self {
        self.count = Some(count);
        self
    }

    /// Whether any override is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tips_file.is_none() && self.refresh_minutes.is_none() && self.count.is_none()
    }

    /// Apply these overrides to `config`
    pub fn apply(&self, config: &mut TipsConfig) {
        if let Some(ref path) = self.tips_file {
            config.tips_file = Some(path.clone());
        }
        if let Some(minutes) = self.refresh_minutes {
            config.refresh_minutes = minutes;
        }
        if let Some(count) = self.count {
            config.count = count;
        }
        if !self.is_empty() {
            config.source = ConfigSource::Cli;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    /// Environment variables are process-global; tests touching them take this lock
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_config_env_vars() {
        for var in [
            "TIPS_FILE",
            "TIPS_MODEL",
            "TIPS_REFRESH_MINUTES",
            "TIPS_COUNT",
            "TIPS_LOG_FILE",
        ] {
            std::env::remove_var(var);
        }
    }

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = TipsConfig::default();

        assert_eq!(config.refresh_minutes.get(), 60);
        assert_eq!(config.count.get(), 20);
        assert_eq!(config.model, "openai/gpt-4o");
        assert_eq!(config.request_timeout, Duration::from_secs(120));
        assert!(config.log_file.is_none());
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_default_config_path() {
        if let Some(p) = default_config_path() {
            assert!(p.ends_with("tips/config.toml"));
        }
    }

    #[test]
    fn test_parse_valid_toml() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_config_env_vars();

        let file = write_config(
            r#"
[storage]
tips_file = "/tmp/my-tips.json"

[display]
refresh_minutes = 15

[generate]
model = "google/gemini-1.5-flash"
count = 5
request_timeout_secs = 30

[logging]
log_file = "/tmp/tips.log"
"#,
        );

        let config = load_config_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.tips_file, Some(PathBuf::from("/tmp/my-tips.json")));
        assert_eq!(config.refresh_minutes.get(), 15);
        assert_eq!(config.model, "google/gemini-1.5-flash");
        assert_eq!(config.count.get(), 5);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/tips.log")));
        assert_eq!(config.source(), ConfigSource::File);
        assert_eq!(config.config_file_path, Some(file.path().to_path_buf()));
    }

    #[test]
    fn test_parse_partial_toml() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_config_env_vars();

        let file = write_config("[display]\nrefresh_minutes = 5\n");
        let config = load_config_from_path(Some(file.path().to_path_buf())).unwrap();

        assert_eq!(config.refresh_minutes.get(), 5);
        assert_eq!(config.count.get(), DEFAULT_COUNT);
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_missing_file_graceful() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_config_env_vars();

        let config =
            load_config_from_path(Some(PathBuf::from("/nonexistent/tips/config.toml"))).unwrap();
        assert_eq!(config.source(), ConfigSource::Default);
        assert!(config.config_file_path.is_none());
    }

    #[test]
    fn test_malformed_toml_error() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_config_env_vars();

        let file = write_config("[display\nrefresh_minutes = ");
        let err = load_config_from_path(Some(file.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_zero_refresh_rejected() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_config_env_vars();

        let file = write_config("[display]\nrefresh_minutes = 0\n");
        let err = load_config_from_path(Some(file.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(err.to_string().contains("greater than 0"));
    }

    #[test]
    fn test_env_overrides_file() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_config_env_vars();

        let file = write_config("[generate]\nmodel = \"openai/gpt-4o-mini\"\ncount = 3\n");
        std::env::set_var("TIPS_MODEL", "anthropic/claude-3-5-haiku-latest");
        std::env::set_var("TIPS_COUNT", "7");

        let result = load_config_from_path(Some(file.path().to_path_buf()));
        clear_config_env_vars();

        let config = result.unwrap();
        assert_eq!(config.model, "anthropic/claude-3-5-haiku-latest");
        assert_eq!(config.count.get(), 7);
        assert_eq!(config.source(), ConfigSource::Env);
    }

    #[test]
    fn test_invalid_env_value() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_config_env_vars();

        std::env::set_var("TIPS_REFRESH_MINUTES", "-5");
        let result = load_config_from_path(None);
        clear_config_env_vars();

        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_cli_overrides_env() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_config_env_vars();

        std::env::set_var("TIPS_REFRESH_MINUTES", "10");
        let result = load_config_from_path(None);
        clear_config_env_vars();

        let mut config = result.unwrap();
        assert_eq!(config.refresh_minutes.get(), 10);

        ConfigOverrides::new()
            .with_refresh_minutes(NonZeroU32::new(2).unwrap())
            .with_tips_file(PathBuf::from("/tmp/cli.json"))
            .apply(&mut config);

        assert_eq!(config.refresh_minutes.get(), 2);
        assert_eq!(config.tips_file, Some(PathBuf::from("/tmp/cli.json")));
        assert_eq!(config.source(), ConfigSource::Cli);
    }

    #[test]
    fn test_config_overrides_empty_no_change() {
        let mut config = TipsConfig::default();
        let overrides = ConfigOverrides::new();
        assert!(overrides.is_empty());

        overrides.apply(&mut config);
        assert_eq!(config.source(), ConfigSource::Default);
        assert_eq!(config.refresh_minutes.get(), DEFAULT_REFRESH_MINUTES);
    }

    #[test]
    fn test_config_source_display() {
        assert_eq!(ConfigSource::Cli.to_string(), "CLI");
        assert_eq!(ConfigSource::Env.to_string(), "environment");
        assert_eq!(ConfigSource::File.to_string(), "config file");
        assert_eq!(ConfigSource::Default.to_string(), "default");
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_config = TipsToml {
            display: DisplayToml {
                refresh_minutes: Some(45),
            },
            generate: GenerateToml {
                model: Some("openai/gpt-4o".to_string()),
                count: Some(12),
                request_timeout_secs: None,
            },
            ..Default::default()
        };

        let text = toml::to_string(&toml_config).unwrap();
        let parsed: TipsToml = toml::from_str(&text).unwrap();
        assert_eq!(parsed.display.refresh_minutes, Some(45));
        assert_eq!(parsed.generate.count, Some(12));
        assert_eq!(parsed.generate.model.as_deref(), Some("openai/gpt-4o"));
    }
}
