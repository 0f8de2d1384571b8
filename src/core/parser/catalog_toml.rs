//! TOML loader for requirement catalogs
//!
//! ```toml
//! [[cross_listing]]
//! codes = ["PSYC 210", "NEUR 210"]
//!
//! [[table]]
//! major = "Computer Science"
//! year = 2021
//!
//! [[table.requirement]]
//! course_code = "MATH 101"
//! course_name = "Calculus I"
//! credits = 4
//! min_grade = "C"
//!
//! [[special]]
//! major = "Computer Science"
//! year = 2021
//!
//! [[special.requirement]]
//! course_code = "MATH 101"
//! credits = 4
//! min_grade = "B"
//! override = true
//! ```

use crate::core::catalog::{RequirementCatalog, RequirementTable};
use crate::core::error::ConfigurationError;
use crate::core::models::{Credits, Grade, Requirement};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Minimum grade applied when a row does not name one
pub const DEFAULT_MIN_GRADE: Grade = Grade::DMinus;

#[derive(Debug, Deserialize)]
struct RawCatalog {
    #[serde(default, rename = "cross_listing")]
    cross_listings: Vec<RawCrossListing>,
    #[serde(default, rename = "table")]
    tables: Vec<RawTable>,
    #[serde(default)]
    special: Vec<RawTable>,
}

#[derive(Debug, Deserialize)]
struct RawCrossListing {
    codes: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawTable {
    major: String,
    year: u16,
    #[serde(default, rename = "requirement")]
    requirements: Vec<RawRow>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRow {
    course_code: Option<String>,
    #[serde(default)]
    course_name: String,
    #[serde(alias = "credits_need")]
    credits: Option<toml::Value>,
    min_grade: Option<String>,
    #[serde(default)]
    comments: String,
    category: Option<String>,
    #[serde(default)]
    accepts: Vec<String>,
    pool: Option<String>,
    #[serde(default = "default_allow_transfer")]
    allow_transfer: bool,
    #[serde(default)]
    alternative: bool,
    #[serde(default, rename = "override")]
    override_base: bool,
}

const fn default_allow_transfer() -> bool {
    true
}

/// Load and validate a catalog file
///
/// # Arguments
/// * `path` - Path to the catalog TOML
///
/// # Errors
/// Returns `ConfigurationError` if the file cannot be read or parsed, or
/// any table fails validation
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<RequirementCatalog, ConfigurationError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let catalog = parse_catalog_toml(&content)?;
    crate::info!(
        "Loaded catalog {} ({} tables, {} cross-listing groups)",
        path.display(),
        catalog.len(),
        catalog.cross_listings().len()
    );
    Ok(catalog)
}

/// Parse and validate catalog TOML text
///
/// # Errors
/// See [`load_catalog`]
pub fn parse_catalog_toml(content: &str) -> Result<RequirementCatalog, ConfigurationError> {
    let raw: RawCatalog = toml::from_str(content)?;
    let mut builder = RequirementCatalog::builder();

    for group in raw.cross_listings {
        builder.add_cross_listing(group.codes.iter().map(String::as_str));
    }

    for table in raw.tables {
        let requirements = convert_rows(&table)?;
        builder.add_table(RequirementTable::new(&table.major, table.year, requirements))?;
    }

    for table in raw.special {
        let requirements = convert_rows(&table)?;
        builder.add_special(&table.major, table.year, requirements);
    }

    builder.build()
}

fn convert_rows(table: &RawTable) -> Result<Vec<Requirement>, ConfigurationError> {
    table
        .requirements
        .iter()
        .enumerate()
        .map(|(idx, row)| convert_row(table, idx + 1, row))
        .collect()
}

fn convert_row(table: &RawTable, row_number: usize, row: &RawRow) -> Result<Requirement, ConfigurationError> {
    let course_code = row
        .course_code
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ConfigurationError::MissingField {
            major: table.major.clone(),
            year: table.year,
            row: row_number,
            field: "course_code",
        })?;

    let credits = match &row.credits {
        Some(value) => parse_credits(value).ok_or_else(|| ConfigurationError::InvalidCredits {
            major: table.major.clone(),
            year: table.year,
            row: row_number,
            course_code: course_code.to_string(),
            value: value.to_string(),
        })?,
        None => {
            return Err(ConfigurationError::MissingField {
                major: table.major.clone(),
                year: table.year,
                row: row_number,
                field: "credits",
            })
        }
    };

    let min_grade = match row.min_grade.as_deref() {
        None => DEFAULT_MIN_GRADE,
        Some(value) => value
            .parse::<Grade>()
            .ok()
            .filter(|g| g.is_valid_minimum())
            .ok_or_else(|| ConfigurationError::UnknownMinGrade {
                major: table.major.clone(),
                year: table.year,
                row: row_number,
                course_code: course_code.to_string(),
                value: value.to_string(),
            })?,
    };

    let mut requirement =
        Requirement::new(course_code, &row.course_name, credits, min_grade).with_comments(&row.comments);
    if let Some(category) = row.category.as_deref().filter(|c| !c.trim().is_empty()) {
        requirement = requirement.with_category(category);
    }
    for accepted in &row.accepts {
        requirement = requirement.accepting(accepted);
    }
    if let Some(pool) = row.pool.as_deref().filter(|p| !p.trim().is_empty()) {
        requirement = requirement.in_pool(pool);
    }
    if !row.allow_transfer {
        requirement = requirement.disallow_transfer();
    }
    if row.alternative {
        requirement = requirement.as_alternative();
    }
    if row.override_base {
        requirement = requirement.overriding_base();
    }
    Ok(requirement)
}

/// Interpret a TOML credit value (integer, float or decimal string)
fn parse_credits(value: &toml::Value) -> Option<Credits> {
    match value {
        toml::Value::Integer(n) => u32::try_from(*n)
            .ok()
            .and_then(|whole| whole.checked_mul(100))
            .map(Credits::from_hundredths),
        toml::Value::Float(f) => Credits::from_f64(*f),
        toml::Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
