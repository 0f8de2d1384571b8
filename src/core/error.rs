//! Error taxonomy for audits
//!
//! Both error kinds are fatal: an audit that hits either produces no
//! results. Unmet requirements and advisories are data, not errors.

use super::models::ParseCreditsError;
use thiserror::Error;

/// Problems with requirement tables or catalog loading
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// No table exists for the requested major and admission year
    #[error("No requirement table for major '{major}' (admission year {year})")]
    CatalogNotFound {
        /// Requested major
        major: String,
        /// Requested admission year
        year: u16,
    },

    /// A row's minimum grade has no rank
    #[error("{major} {year}, row {row} ({course_code}): min_grade '{value}' is not a known grade rank")]
    UnknownMinGrade {
        /// Table major
        major: String,
        /// Table year
        year: u16,
        /// 1-based row number within the table
        row: usize,
        /// Row course code
        course_code: String,
        /// Offending value
        value: String,
    },

    /// The same course code appears twice in one non-elective category
    #[error("{major} {year}, row {row}: duplicate course_code '{course_code}' in category '{category}' (mark the row as an alternative)")]
    DuplicateRequirement {
        /// Table major
        major: String,
        /// Table year
        year: u16,
        /// 1-based row number of the repeated row
        row: usize,
        /// Duplicated code
        course_code: String,
        /// Category the duplicate occurred in
        category: String,
    },

    /// A row's credits are missing, malformed or not positive
    #[error("{major} {year}, row {row} ({course_code}): invalid credits_need '{value}'")]
    InvalidCredits {
        /// Table major
        major: String,
        /// Table year
        year: u16,
        /// 1-based row number
        row: usize,
        /// Row course code
        course_code: String,
        /// Offending value
        value: String,
    },

    /// A row lacks a required field
    #[error("{major} {year}, row {row}: missing required field '{field}'")]
    MissingField {
        /// Table major
        major: String,
        /// Table year
        year: u16,
        /// 1-based row number
        row: usize,
        /// Field name
        field: &'static str,
    },

    /// A special override row names a course code the base table lacks
    #[error("{major} {year}: override row '{course_code}' has no base row to replace")]
    OverrideWithoutBase {
        /// Table major
        major: String,
        /// Table year
        year: u16,
        /// Override row code
        course_code: String,
    },

    /// A special table was given for a (major, year) with no base table
    #[error("Special table for '{major}' {year} has no base table")]
    SpecialWithoutBase {
        /// Table major
        major: String,
        /// Table year
        year: u16,
    },

    /// Two base tables share a (major, year)
    #[error("Duplicate requirement table for '{major}' {year}")]
    DuplicateTable {
        /// Table major
        major: String,
        /// Table year
        year: u16,
    },

    /// The catalog file could not be read
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog file is not valid TOML for the catalog schema
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Problems with a transcript
#[derive(Error, Debug)]
pub enum InputError {
    /// Grade symbol not in the grade table
    #[error("{code} ({term}): unparseable grade '{value}'")]
    UnparseableGrade {
        /// Course code
        code: String,
        /// Term label
        term: String,
        /// Offending value
        value: String,
    },

    /// Credit value could not be parsed
    #[error("{code} ({term}): unparseable credits '{value}': {reason}")]
    UnparseableCredits {
        /// Course code
        code: String,
        /// Term label
        term: String,
        /// Offending value
        value: String,
        /// Parser diagnosis
        reason: ParseCreditsError,
    },

    /// A row lacks a required field
    #[error("Line {line}: missing required field '{field}'")]
    MissingField {
        /// 1-based line number
        line: usize,
        /// Field name
        field: &'static str,
    },

    /// Structural problem with the transcript document
    #[error("Line {line}: {message}")]
    Malformed {
        /// 1-based line number
        line: usize,
        /// Description
        message: String,
    },

    /// The transcript could not be read
    #[error("Failed to read transcript: {0}")]
    Io(#[from] std::io::Error),
}

/// Any fatal audit failure
#[derive(Error, Debug)]
pub enum AuditError {
    /// Catalog or requirement problem
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Transcript problem
    #[error(transparent)]
    Input(#[from] InputError),
}
