//! Configuration management for QRKit.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Smallest accepted `generator.width`, the edge of a version 1 symbol.
pub const MIN_QR_WIDTH: u32 = 21;

/// Largest accepted `generator.width` in pixels.
pub const MAX_QR_WIDTH: u32 = 4096;

/// Largest accepted `generator.margin` in modules.
pub const MAX_QR_MARGIN: u32 = 64;

/// Main application configuration.
///
/// This is loaded from `~/.config/qrkit/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// QR generation settings
    pub generator: GeneratorConfig,
    /// History persistence settings
    pub history: HistoryConfig,
    /// Diagnostic battery settings
    pub diagnostics: DiagnosticsConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, falling back to defaults if
    /// the file does not exist.
    pub fn load_from(config_path: &Path) -> ConfigResult<Self> {
        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(config_path)?;
            let config: Self = toml::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `QRKIT_QR_WIDTH`: Override the rendered QR image width in pixels
    /// - `QRKIT_MAX_ATTEMPTS`: Override the encode retry attempt count
    /// - `QRKIT_HISTORY_PATH`: Override the history store file location
    ///
    /// `config_path` replaces the platform config file when given.
    pub fn load_with_env(config_path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match config_path {
            Some(path) => Self::load_from(path)?,
            None => Self::load()?,
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides in place.
    ///
    /// Unparseable values are ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("QRKIT_QR_WIDTH") {
            if let Ok(width) = val.parse() {
                self.generator.width = width;
                tracing::debug!("Override generator.width from env: {}", width);
            }
        }

        if let Ok(val) = std::env::var("QRKIT_MAX_ATTEMPTS") {
            if let Ok(attempts) = val.parse() {
                self.generator.max_attempts = attempts;
                tracing::debug!("Override generator.max_attempts from env: {}", attempts);
            }
        }

        if let Ok(val) = std::env::var("QRKIT_HISTORY_PATH") {
            tracing::debug!("Override history.path from env: {}", val);
            self.history.path = Some(PathBuf::from(val));
        }
    }

    /// Check value ranges that TOML typing alone cannot express.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(MIN_QR_WIDTH..=MAX_QR_WIDTH).contains(&self.generator.width) {
            return Err(ConfigError::InvalidValue {
                field: "generator.width".to_string(),
                reason: format!("must be between {MIN_QR_WIDTH} and {MAX_QR_WIDTH} pixels"),
            });
        }

        if self.generator.margin > MAX_QR_MARGIN {
            return Err(ConfigError::InvalidValue {
                field: "generator.margin".to_string(),
                reason: format!("must be at most {MAX_QR_MARGIN} modules"),
            });
        }

        if !matches!(
            self.generator.error_correction.to_ascii_uppercase().as_str(),
            "L" | "M" | "Q" | "H"
        ) {
            return Err(ConfigError::InvalidValue {
                field: "generator.error_correction".to_string(),
                reason: format!(
                    "expected one of L, M, Q, H, got '{}'",
                    self.generator.error_correction
                ),
            });
        }

        if self.diagnostics.timing_samples < 2 {
            return Err(ConfigError::InvalidValue {
                field: "diagnostics.timing_samples".to_string(),
                reason: "at least two samples are needed to compute a variance".to_string(),
            });
        }

        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/qrkit/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("com", "qrkit", "qrkit").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Get the data directory path.
    ///
    /// Uses XDG base directories: `~/.local/share/qrkit`
    pub fn data_dir() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("com", "qrkit", "qrkit").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.data_dir().to_path_buf())
    }

    /// Resolve where the key/value store file lives.
    ///
    /// The `history.path` override wins; otherwise `store.json` in the data dir.
    pub fn store_path(&self) -> ConfigResult<PathBuf> {
        match &self.history.path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::data_dir()?.join("store.json")),
        }
    }
}

/// QR generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Rendered image width in pixels
    pub width: u32,
    /// Quiet zone width in modules
    pub margin: u32,
    /// Error correction level: `L`, `M`, `Q` or `H`
    pub error_correction: String,
    /// Encode attempts before giving up
    pub max_attempts: u32,
    /// Base delay for exponential backoff in milliseconds
    pub base_delay_ms: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            width: 256,
            margin: 4,
            error_correction: "M".to_string(),
            max_attempts: 3,
            base_delay_ms: 1000,
        }
    }
}

/// History persistence settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Explicit store file location; defaults to the data directory
    pub path: Option<PathBuf>,
}

/// Diagnostic battery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Delay the shell inserts between printed check results
    pub display_delay_ms: u64,
    /// Fixed wait during which timer jitter is sampled
    pub timing_probe_ms: u64,
    /// Number of timer samples taken during the probe
    pub timing_samples: usize,
    /// Minimum sample variance (ms²) counted as human-like jitter
    pub timing_variance_threshold: f64,
    /// Window in which pointer movement must be observed
    pub pointer_window_ms: u64,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            display_delay_ms: 300,
            timing_probe_ms: 100,
            timing_samples: 10,
            timing_variance_threshold: 0.01,
            pointer_window_ms: 2000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.generator.width, 256);
        assert_eq!(config.generator.margin, 4);
        assert_eq!(config.generator.max_attempts, 3);
        assert_eq!(config.generator.base_delay_ms, 1000);
        assert_eq!(config.diagnostics.display_delay_ms, 300);
        assert!(config.history.path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("[generator]"));
        assert!(toml_str.contains("[diagnostics]"));

        let parsed: AppConfig = toml::from_str(&toml_str).expect("parse serialized config");
        assert_eq!(parsed.generator.width, config.generator.width);
    }

    #[test]
    fn test_config_load_from_file() {
        let tmp = TempDir::new().expect("create temp dir");
        let config_path = tmp.path().join("config.toml");

        let mut config = AppConfig::default();
        config.generator.width = 512;
        config.generator.error_correction = "H".to_string();

        let contents = toml::to_string_pretty(&config).expect("serialize config");
        fs::write(&config_path, contents).expect("write config file");

        let loaded = AppConfig::load_from(&config_path).expect("load config");
        assert_eq!(loaded.generator.width, 512);
        assert_eq!(loaded.generator.error_correction, "H");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let tmp = TempDir::new().expect("create temp dir");
        let loaded =
            AppConfig::load_from(&tmp.path().join("absent.toml")).expect("load defaults");
        assert_eq!(loaded.generator.width, 256);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[generator]
width = 300

[diagnostics]
display_delay_ms = 0
"#;

        let config: AppConfig = toml::from_str(toml_str).expect("parse partial config");
        assert_eq!(config.generator.width, 300);
        assert_eq!(config.diagnostics.display_delay_ms, 0);
        // These should be defaults
        assert_eq!(config.generator.margin, 4);
        assert_eq!(config.diagnostics.timing_samples, 10);
    }

    #[test]
    fn test_invalid_error_correction_rejected() {
        let mut config = AppConfig::default();
        config.generator.error_correction = "X".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_generator_bounds_rejected() {
        let mut config = AppConfig::default();
        config.generator.margin = u32::MAX;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "generator.margin"
        ));

        let mut config = AppConfig::default();
        config.generator.width = 4_000_000_000;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field, .. }) if field == "generator.width"
        ));

        let mut config = AppConfig::default();
        config.generator.width = MAX_QR_WIDTH;
        config.generator.margin = MAX_QR_MARGIN;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_with_env_from_explicit_path() {
        let tmp = TempDir::new().expect("create temp dir");
        let config_path = tmp.path().join("config.toml");
        fs::write(&config_path, "[generator]\nmargin = 2\n").expect("write config file");

        let loaded = AppConfig::load_with_env(Some(&config_path)).expect("load config");
        assert_eq!(loaded.generator.margin, 2);

        fs::write(&config_path, "[generator]\nmargin = 1000\n").expect("write config file");
        assert!(AppConfig::load_with_env(Some(&config_path)).is_err());
    }

    #[test]
    fn test_history_path_override() {
        let mut config = AppConfig::default();
        config.history.path = Some(PathBuf::from("/tmp/qrkit-store.json"));
        assert_eq!(
            config.store_path().expect("resolve store path"),
            PathBuf::from("/tmp/qrkit-store.json")
        );
    }
}
