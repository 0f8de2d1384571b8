//! Configuration module for `DegreeAudit`

use crate::core::audit::AuditOptions;
use crate::core::catalog::YearFallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Variable expanded to the configuration directory in path values
pub const DIR_VARIABLE: &str = "$DEGREE_AUDIT";

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Audit behavior configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Requirement catalog used when `--catalog` is not given
    #[serde(default)]
    pub catalog_file: String,
    /// Fall back to the nearest earlier catalog year
    #[serde(default)]
    pub allow_year_fallback: bool,
    /// Count in-progress courses
    #[serde(default)]
    pub allow_in_progress: bool,
    /// Allow credit sharing within requirement pools
    #[serde(default)]
    pub enable_pooling: bool,
}

/// Paths configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory for report output files
    #[serde(default)]
    pub reports_dir: String,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Audit settings
    #[serde(default)]
    pub audit: AuditConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override catalog file
    pub catalog_file: Option<String>,
    /// Override year fallback
    pub allow_year_fallback: Option<bool>,
    /// Override in-progress handling
    pub allow_in_progress: Option<bool>,
    /// Override credit pooling
    pub enable_pooling: Option<bool>,
    /// Override reports output directory
    pub reports_dir: Option<String>,
}

impl Config {
    /// Get the `$DEGREE_AUDIT` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/degreeaudit`
    /// - macOS: `~/Library/Application Support/degreeaudit`
    /// - Windows: `%APPDATA%\degreeaudit`
    #[must_use]
    pub fn get_degreeaudit_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("degreeaudit")
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Only string fields that are empty here and non-empty in `defaults` are
    /// filled in; booleans keep whatever the file says.
    ///
    /// # Returns
    ///
    /// `true` if any fields were added/changed, `false` otherwise
    #[allow(clippy::useless_let_if_seq)]
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let mut changed = false;

        if self.logging.level.is_empty() && !defaults.logging.level.is_empty() {
            self.logging.level.clone_from(&defaults.logging.level);
            changed = true;
        }
        if self.logging.file.is_empty() && !defaults.logging.file.is_empty() {
            self.logging.file.clone_from(&defaults.logging.file);
            changed = true;
        }
        if self.audit.catalog_file.is_empty() && !defaults.audit.catalog_file.is_empty() {
            self.audit
                .catalog_file
                .clone_from(&defaults.audit.catalog_file);
            changed = true;
        }
        if self.paths.reports_dir.is_empty() && !defaults.paths.reports_dir.is_empty() {
            self.paths
                .reports_dir
                .clone_from(&defaults.paths.reports_dir);
            changed = true;
        }

        changed
    }

    /// Apply CLI-provided overrides onto the loaded configuration
    ///
    /// Overrides affect this run only; the configuration file is untouched.
    /// Only non-`None` values replace config values.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file.clone_from(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }

        if let Some(catalog_file) = &overrides.catalog_file {
            self.audit.catalog_file.clone_from(catalog_file);
        }
        if let Some(fallback) = overrides.allow_year_fallback {
            self.audit.allow_year_fallback = fallback;
        }
        if let Some(in_progress) = overrides.allow_in_progress {
            self.audit.allow_in_progress = in_progress;
        }
        if let Some(pooling) = overrides.enable_pooling {
            self.audit.enable_pooling = pooling;
        }

        if let Some(reports_dir) = &overrides.reports_dir {
            self.paths.reports_dir.clone_from(reports_dir);
        }
    }

    /// Engine options described by the `[audit]` section
    #[must_use]
    pub const fn audit_options(&self) -> AuditOptions {
        AuditOptions {
            allow_in_progress: self.audit.allow_in_progress,
            enable_pooling: self.audit.enable_pooling,
            year_fallback: if self.audit.allow_year_fallback {
                YearFallback::NearestEarlier
            } else {
                YearFallback::Strict
            },
        }
    }

    /// Get the user config file path
    ///
    /// `config.toml` for release builds, `dconfig.toml` for debug builds,
    /// inside [`get_degreeaudit_dir`](Self::get_degreeaudit_dir).
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_degreeaudit_dir().join(CONFIG_FILE_NAME)
    }

    /// Expand `$DEGREE_AUDIT` in a string to the config directory
    fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let dir = Self::get_degreeaudit_dir();
            value.replace(DIR_VARIABLE, dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// Parses a TOML configuration string and expands any `$DEGREE_AUDIT`
    /// variables in path values. Missing fields use their serde defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.audit.catalog_file = Self::expand_variables(&config.audit.catalog_file);
        config.paths.reports_dir = Self::expand_variables(&config.paths.reports_dir);

        Ok(config)
    }

    /// Load configuration from embedded defaults
    ///
    /// # Panics
    /// Panics if the embedded default configuration is invalid TOML. The
    /// defaults are compiled into the binary and covered by tests.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).expect("Failed to parse compiled-in default configuration")
    }

    /// Load configuration from file, or create from defaults if not found
    ///
    /// - If the config file exists: load it, merge missing fields from
    ///   defaults, and save it back when anything was added
    /// - On first run: create the config directory and write the defaults
    ///
    /// Falls back to defaults if the file cannot be read or parsed.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if config_file.exists() {
            match fs::read_to_string(&config_file).map(|content| Self::from_toml(&content)) {
                Ok(Ok(mut config)) => {
                    if config.merge_defaults(&defaults) {
                        let _ = config.save();
                    }
                    return config;
                }
                Ok(Err(e)) => crate::warn!(
                    "Ignoring invalid config file {}: {e}",
                    config_file.display()
                ),
                Err(e) => crate::warn!("Could not read {}: {e}", config_file.display()),
            }
        } else {
            if let Some(parent) = config_file.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = defaults.save();
            return defaults;
        }

        defaults
    }

    /// Save configuration to file
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized, the config
    /// directory cannot be created, or the file cannot be written
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_file = Self::get_config_file_path();
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&config_file, toml_str)?;
        Ok(())
    }

    /// Get a configuration value by key
    ///
    /// Supported keys: `level`, `file`, `verbose`, `catalog_file`,
    /// `allow_year_fallback`, `allow_in_progress`, `enable_pooling`,
    /// `reports_dir` (dashes are accepted in place of underscores).
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key.replace('-', "_").as_str() {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "catalog_file" | "catalog" => Some(self.audit.catalog_file.clone()),
            "allow_year_fallback" => Some(self.audit.allow_year_fallback.to_string()),
            "allow_in_progress" => Some(self.audit.allow_in_progress.to_string()),
            "enable_pooling" | "pooling" => Some(self.audit.enable_pooling.to_string()),
            "reports_dir" => Some(self.paths.reports_dir.clone()),
            _ => None,
        }
    }

    /// Set a configuration value by key
    ///
    /// Updates the in-memory config; call [`save()`](Config::save) to persist.
    ///
    /// # Errors
    /// Returns an error if the key is not recognized or a boolean value cannot be parsed
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        let parse_bool = |name: &str| {
            value
                .parse::<bool>()
                .map_err(|_| format!("Invalid boolean value for '{name}': '{value}'"))
        };

        match key.replace('-', "_").as_str() {
            "level" => self.logging.level = value.to_string(),
            "file" => self.logging.file = value.to_string(),
            "verbose" => self.logging.verbose = parse_bool("verbose")?,
            "catalog_file" | "catalog" => self.audit.catalog_file = value.to_string(),
            "allow_year_fallback" => self.audit.allow_year_fallback = parse_bool(key)?,
            "allow_in_progress" => self.audit.allow_in_progress = parse_bool(key)?,
            "enable_pooling" | "pooling" => self.audit.enable_pooling = parse_bool(key)?,
            "reports_dir" => self.paths.reports_dir = value.to_string(),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Unset a configuration value by key (reset to its default)
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match key.replace('-', "_").as_str() {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "catalog_file" | "catalog" => self
                .audit
                .catalog_file
                .clone_from(&defaults.audit.catalog_file),
            "allow_year_fallback" => {
                self.audit.allow_year_fallback = defaults.audit.allow_year_fallback;
            }
            "allow_in_progress" => self.audit.allow_in_progress = defaults.audit.allow_in_progress,
            "enable_pooling" | "pooling" => self.audit.enable_pooling = defaults.audit.enable_pooling,
            "reports_dir" => self
                .paths
                .reports_dir
                .clone_from(&defaults.paths.reports_dir),
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset all configuration to defaults by deleting the config file
    ///
    /// Succeeds without doing anything if the file does not exist.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be deleted
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[audit]")?;
        writeln!(f, "  catalog_file = \"{}\"", self.audit.catalog_file)?;
        writeln!(f, "  allow_year_fallback = {}", self.audit.allow_year_fallback)?;
        writeln!(f, "  allow_in_progress = {}", self.audit.allow_in_progress)?;
        writeln!(f, "  enable_pooling = {}", self.audit.enable_pooling)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  reports_dir = \"{}\"", self.paths.reports_dir)?;

        Ok(())
    }
}
