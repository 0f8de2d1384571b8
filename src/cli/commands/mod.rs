//! CLI command handlers for `DegreeAudit`.
//!
//! Each command is implemented in its own submodule.

pub mod audit;
pub mod catalog;
pub mod config;

use degree_audit::catalog::RequirementCatalog;
use degree_audit::config::Config;
use degree_audit::parser::load_catalog;
use std::path::{Path, PathBuf};

/// Resolve the catalog file: explicit path first, then config `catalog_file`
fn catalog_path(explicit: Option<&Path>, config: &Config) -> Result<PathBuf, String> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if config.audit.catalog_file.is_empty() {
        return Err(
            "✗ No catalog given; pass --catalog or run `degreeaudit config set catalog_file <FILE>`"
                .to_string(),
        );
    }
    Ok(PathBuf::from(&config.audit.catalog_file))
}

/// Load and validate a catalog, formatting failures for the terminal
fn open_catalog(explicit: Option<&Path>, config: &Config) -> Result<RequirementCatalog, String> {
    let path = catalog_path(explicit, config)?;
    load_catalog(&path).map_err(|e| {
        degree_audit::error!("Failed to load catalog {}: {e}", path.display());
        format!("✗ Failed to load catalog {}: {e}", path.display())
    })
}
