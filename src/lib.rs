//! Library for `DegreeAudit`
//!
//! Checks a student's transcript against a major's graduation requirements
//! and reports which requirements are met, by which courses, and what
//! remains outstanding.

pub mod core;
pub mod logger;

pub use self::core::{audit, catalog, config, error, models, parser, report};

/// Returns the current version of the `DegreeAudit` crate
#[must_use]
pub const fn get_version() -> &'static str {
    self::core::get_version()
}
