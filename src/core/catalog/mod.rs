//! Requirement catalog: graduation requirements keyed by (major, admission year)

pub mod builder;

pub use builder::{merge_special, validate_table, CatalogBuilder};

use crate::core::error::ConfigurationError;
use crate::core::models::{Credits, CrossListings, Requirement};
use std::collections::BTreeMap;

/// Lookup key for a requirement table
///
/// Majors compare case-insensitively with whitespace collapsed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CatalogKey {
    /// Normalized major name
    pub major: String,
    /// Admission year
    pub year: u16,
}

impl CatalogKey {
    /// Build a key from a display major name and year
    #[must_use]
    pub fn new(major: &str, year: u16) -> Self {
        Self {
            major: normalize_major(major),
            year,
        }
    }
}

/// Normalize a major name for lookup
fn normalize_major(major: &str) -> String {
    major
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Whether a lookup may fall back to an earlier catalog year
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum YearFallback {
    /// Only the exact admission year is accepted
    #[default]
    Strict,
    /// Use the nearest earlier year's table when the exact year is missing
    NearestEarlier,
}

/// The ordered requirements for one major and admission year
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementTable {
    /// Major as written in the catalog
    pub major: String,
    /// Admission year
    pub year: u16,
    /// Requirements in catalog order
    pub requirements: Vec<Requirement>,
}

impl RequirementTable {
    /// Create a table
    #[must_use]
    pub fn new(major: &str, year: u16, requirements: Vec<Requirement>) -> Self {
        Self {
            major: major.trim().to_string(),
            year,
            requirements,
        }
    }

    /// Lookup key for this table
    #[must_use]
    pub fn key(&self) -> CatalogKey {
        CatalogKey::new(&self.major, self.year)
    }

    /// Total credits demanded by the table
    #[must_use]
    pub fn total_credits(&self) -> Credits {
        self.requirements.iter().map(|r| r.credits_need).sum()
    }
}

/// A validated, immutable set of requirement tables
#[derive(Debug, Clone, Default)]
pub struct RequirementCatalog {
    tables: BTreeMap<CatalogKey, RequirementTable>,
    cross_listings: CrossListings,
}

impl RequirementCatalog {
    /// Start building a catalog
    #[must_use]
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    pub(crate) fn from_parts(
        tables: BTreeMap<CatalogKey, RequirementTable>,
        cross_listings: CrossListings,
    ) -> Self {
        Self {
            tables,
            cross_listings,
        }
    }

    /// Look up the table for an exact (major, year)
    ///
    /// # Errors
    /// Returns `ConfigurationError::CatalogNotFound` when no table exists
    pub fn lookup(&self, major: &str, admission_year: u16) -> Result<&RequirementTable, ConfigurationError> {
        self.lookup_with(major, admission_year, YearFallback::Strict)
    }

    /// Look up a table, optionally falling back to the nearest earlier year
    ///
    /// # Errors
    /// Returns `ConfigurationError::CatalogNotFound` when neither the exact
    /// year nor (if allowed) any earlier year has a table for the major
    pub fn lookup_with(
        &self,
        major: &str,
        admission_year: u16,
        fallback: YearFallback,
    ) -> Result<&RequirementTable, ConfigurationError> {
        let key = CatalogKey::new(major, admission_year);
        if let Some(table) = self.tables.get(&key) {
            return Ok(table);
        }

        if fallback == YearFallback::NearestEarlier {
            let floor = CatalogKey {
                major: key.major.clone(),
                year: 0,
            };
            if let Some((_, table)) = self.tables.range(floor..key).next_back() {
                crate::info!(
                    "No {admission_year} table for '{major}'; falling back to {}",
                    table.year
                );
                return Ok(table);
            }
        }

        Err(ConfigurationError::CatalogNotFound {
            major: major.trim().to_string(),
            year: admission_year,
        })
    }

    /// All tables ordered by major then year
    pub fn tables(&self) -> impl Iterator<Item = &RequirementTable> {
        self.tables.values()
    }

    /// Cross-listing equivalences shared by every table
    #[must_use]
    pub const fn cross_listings(&self) -> &CrossListings {
        &self.cross_listings
    }

    /// Number of tables
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether the catalog has no tables
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
