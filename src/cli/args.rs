//! CLI argument definitions for `DegreeAudit`

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use degree_audit::config::ConfigOverrides;
use degree_audit::logger::Level;
use degree_audit::report::ReportFormat;

/// CLI log level argument
///
/// Converts to lowercase strings for config storage and to `Level` for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Level::from(*self))
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `catalog_file`, `reports_dir`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum CatalogSubcommand {
    /// List every (major, year) table with its row count.
    List {
        /// Catalog file (defaults to config `catalog_file`)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
    /// Print the merged requirement table for a major and year.
    Show {
        /// Major name (case-insensitive)
        #[arg(value_name = "MAJOR")]
        major: String,
        /// Catalog year
        #[arg(value_name = "YEAR")]
        year: u16,
        /// Catalog file (defaults to config `catalog_file`)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
}

/// Arguments of the `audit` subcommand
#[derive(Debug, clap::Args)]
pub struct AuditArgs {
    /// Transcript CSV files (supports multiple)
    #[arg(value_name = "TRANSCRIPTS", num_args = 1.., required = true)]
    pub transcripts: Vec<PathBuf>,

    /// Requirement catalog TOML (defaults to config `catalog_file`)
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Major to audit against (defaults to the transcript's `Major` row)
    #[arg(long, value_name = "MAJOR")]
    pub major: Option<String>,

    /// Admission year (defaults to the transcript's `Admission Year` row)
    #[arg(long, value_name = "YEAR")]
    pub year: Option<u16>,

    /// Output format: csv, json, md, html
    #[arg(short, long, value_name = "FORMAT", default_value_t = ReportFormat::Csv)]
    pub format: ReportFormat,

    /// Output file paths (optional; defaults to config `reports_dir`)
    ///
    /// When provided, must match the number of transcripts 1:1. Use `-` for stdout.
    #[arg(short, long, value_name = "FILES", num_args = 1..)]
    pub output: Vec<PathBuf>,

    /// Use the nearest earlier catalog year when the admission year has no table
    #[arg(long)]
    pub allow_year_fallback: bool,

    /// Count in-progress courses toward requirements
    #[arg(long)]
    pub allow_in_progress: bool,

    /// Let leftover credit flow between requirements sharing a pool
    #[arg(long)]
    pub pooling: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Audit transcripts against a major's graduation requirements.
    Audit(AuditArgs),
    /// Inspect a requirement catalog.
    Catalog {
        #[command(subcommand)]
        subcommand: CatalogSubcommand,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "degreeaudit",
    about = "Degree audit command-line interface",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override config catalog file
    #[arg(long = "config-catalog", value_name = "FILE")]
    pub config_catalog: Option<PathBuf>,

    /// Override config reports directory
    #[arg(long = "config-reports-dir", value_name = "DIR")]
    pub config_reports_dir: Option<PathBuf>,

    /// Override config reports directory (short form)
    #[arg(long = "reports-dir", value_name = "DIR")]
    pub reports_dir: Option<PathBuf>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// The short form `--reports-dir` takes precedence over
    /// `--config-reports-dir`. The audit switches only ever turn a setting on;
    /// leaving them off defers to the config file.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: self.config_log_file.as_deref().map(path_string),
            verbose: self.config_verbose,
            catalog_file: self.config_catalog.as_deref().map(path_string),
            reports_dir: self
                .reports_dir
                .as_deref()
                .or(self.config_reports_dir.as_deref())
                .map(path_string),
            ..ConfigOverrides::default()
        };

        if let Command::Audit(audit) = &self.command {
            if let Some(catalog) = &audit.catalog {
                overrides.catalog_file = Some(path_string(catalog));
            }
            overrides.allow_year_fallback = audit.allow_year_fallback.then_some(true);
            overrides.allow_in_progress = audit.allow_in_progress.then_some(true);
            overrides.enable_pooling = audit.pooling.then_some(true);
        }

        overrides
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("degreeaudit").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevelArg::Error.to_string(), "error");
        assert_eq!(LogLevelArg::Warn.to_string(), "warn");
        assert_eq!(LogLevelArg::Info.to_string(), "info");
        assert_eq!(LogLevelArg::Debug.to_string(), "debug");
    }

    #[test]
    fn test_log_level_to_logger_level() {
        assert_eq!(Level::from(LogLevelArg::Error), Level::Error);
        assert_eq!(Level::from(LogLevelArg::Debug), Level::Debug);
    }

    #[test]
    fn test_to_config_overrides_empty() {
        let overrides = parse(&["config"]).to_config_overrides();
        assert!(overrides.level.is_none());
        assert!(overrides.file.is_none());
        assert!(overrides.verbose.is_none());
        assert!(overrides.catalog_file.is_none());
        assert!(overrides.reports_dir.is_none());
        assert!(overrides.enable_pooling.is_none());
    }

    #[test]
    fn test_reports_dir_short_form_wins() {
        let overrides = parse(&[
            "--config-reports-dir",
            "/long",
            "--reports-dir",
            "/short",
            "config",
        ])
        .to_config_overrides();
        assert_eq!(overrides.reports_dir.as_deref(), Some("/short"));
    }

    #[test]
    fn test_audit_flags_become_overrides() {
        let cli = parse(&[
            "--config-level",
            "debug",
            "audit",
            "jane.csv",
            "--catalog",
            "cat.toml",
            "--pooling",
            "-f",
            "md",
        ]);
        let overrides = cli.to_config_overrides();
        assert_eq!(overrides.level.as_deref(), Some("debug"));
        assert_eq!(overrides.catalog_file.as_deref(), Some("cat.toml"));
        assert_eq!(overrides.enable_pooling, Some(true));
        assert!(overrides.allow_in_progress.is_none());

        let Command::Audit(args) = cli.command else {
            panic!("expected audit command");
        };
        assert_eq!(args.format, ReportFormat::Markdown);
        assert_eq!(args.transcripts, vec![PathBuf::from("jane.csv")]);
    }

    #[test]
    fn test_catalog_show_parses_year() {
        let cli = parse(&["catalog", "show", "Computer Science", "2021"]);
        let Command::Catalog {
            subcommand: CatalogSubcommand::Show { major, year, file },
        } = cli.command
        else {
            panic!("expected catalog show");
        };
        assert_eq!(major, "Computer Science");
        assert_eq!(year, 2021);
        assert!(file.is_none());
    }
}
