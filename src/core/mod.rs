//! Core audit functionality: models, catalog, matching engine, parsers and reports

pub mod audit;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod parser;
pub mod report;

/// Returns the current version of the `DegreeAudit` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
