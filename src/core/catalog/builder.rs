//! Catalog builder: collects base and special tables, merges and validates them.
//!
//! Special tables are merged with a fixed precedence: a special row flagged
//! `override_base` replaces the first base row sharing its course code, in
//! place; every other special row is appended after the base rows, in
//! special-table order.

use super::{CatalogKey, RequirementCatalog, RequirementTable};
use crate::core::error::ConfigurationError;
use crate::core::models::{CourseCode, CrossListings, Requirement};
use std::collections::{BTreeMap, HashSet};

/// Accumulates tables before producing a validated [`RequirementCatalog`]
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    base: BTreeMap<CatalogKey, RequirementTable>,
    special: BTreeMap<CatalogKey, Vec<Requirement>>,
    cross_listings: CrossListings,
}

impl CatalogBuilder {
    /// Create an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a base requirement table
    ///
    /// # Errors
    /// Returns `ConfigurationError::DuplicateTable` if a table for the same
    /// (major, year) was already added
    pub fn add_table(&mut self, table: RequirementTable) -> Result<&mut Self, ConfigurationError> {
        let key = table.key();
        if self.base.contains_key(&key) {
            return Err(ConfigurationError::DuplicateTable {
                major: table.major,
                year: table.year,
            });
        }
        self.base.insert(key, table);
        Ok(self)
    }

    /// Add special rows for a (major, year); several calls accumulate in order
    pub fn add_special(&mut self, major: &str, year: u16, rows: Vec<Requirement>) -> &mut Self {
        self.special
            .entry(CatalogKey::new(major, year))
            .or_default()
            .extend(rows);
        self
    }

    /// Register a set of cross-listed course codes
    pub fn add_cross_listing<I, C>(&mut self, codes: I) -> &mut Self
    where
        I: IntoIterator<Item = C>,
        C: Into<CourseCode>,
    {
        self.cross_listings.add_group(codes);
        self
    }

    /// Merge special tables into their base tables and validate every table
    ///
    /// # Errors
    /// Returns the first `ConfigurationError` found: a special table with no
    /// base, an override with nothing to replace, an invalid minimum grade,
    /// non-positive credits, or a duplicate non-alternative course code
    pub fn build(self) -> Result<RequirementCatalog, ConfigurationError> {
        let Self {
            mut base,
            special,
            cross_listings,
        } = self;

        for (key, rows) in special {
            let Some(table) = base.get_mut(&key) else {
                return Err(ConfigurationError::SpecialWithoutBase {
                    major: key.major,
                    year: key.year,
                });
            };
            *table = merge_special(table, &rows)?;
        }

        for table in base.values() {
            validate_table(table)?;
        }

        crate::debug!(
            "Catalog built with {} tables and {} cross-listing groups",
            base.len(),
            cross_listings.len()
        );
        Ok(RequirementCatalog::from_parts(base, cross_listings))
    }
}

/// Merge special rows into a base table.
///
/// Override rows replace the first base row with the same course code in
/// place; remaining special rows are appended after the base rows. The
/// merged rows have their `override_base` flag cleared.
///
/// # Errors
/// Returns `ConfigurationError::OverrideWithoutBase` when an override row has
/// no base row to replace
pub fn merge_special(
    base: &RequirementTable,
    special: &[Requirement],
) -> Result<RequirementTable, ConfigurationError> {
    let mut merged = base.requirements.clone();
    let mut appended = Vec::new();
    let mut replaced: HashSet<usize> = HashSet::new();

    for row in special {
        let mut row = row.clone();
        if row.override_base {
            row.override_base = false;
            let slot = merged
                .iter()
                .enumerate()
                .position(|(idx, r)| r.course_code == row.course_code && !replaced.contains(&idx));
            let Some(idx) = slot else {
                return Err(ConfigurationError::OverrideWithoutBase {
                    major: base.major.clone(),
                    year: base.year,
                    course_code: row.course_code.to_string(),
                });
            };
            crate::debug!(
                "{} {}: special row overrides {}",
                base.major,
                base.year,
                row.course_code
            );
            merged[idx] = row;
            replaced.insert(idx);
        } else {
            appended.push(row);
        }
    }

    merged.extend(appended);
    Ok(RequirementTable::new(&base.major, base.year, merged))
}

/// Validate one table's rows
///
/// # Errors
/// Returns `ConfigurationError` naming the first offending row (1-based)
pub fn validate_table(table: &RequirementTable) -> Result<(), ConfigurationError> {
    let mut seen: HashSet<(String, CourseCode)> = HashSet::new();

    for (idx, req) in table.requirements.iter().enumerate() {
        let row = idx + 1;

        if req.course_code.is_empty() {
            return Err(ConfigurationError::MissingField {
                major: table.major.clone(),
                year: table.year,
                row,
                field: "course_code",
            });
        }

        if !req.min_grade.is_valid_minimum() {
            return Err(ConfigurationError::UnknownMinGrade {
                major: table.major.clone(),
                year: table.year,
                row,
                course_code: req.course_code.to_string(),
                value: req.min_grade.to_string(),
            });
        }

        if req.credits_need.is_zero() {
            return Err(ConfigurationError::InvalidCredits {
                major: table.major.clone(),
                year: table.year,
                row,
                course_code: req.course_code.to_string(),
                value: req.credits_need.to_string(),
            });
        }

        if req.is_elective() {
            continue;
        }
        let key = (req.category.to_ascii_lowercase(), req.course_code.clone());
        if !seen.insert(key) && !req.alternative {
            return Err(ConfigurationError::DuplicateRequirement {
                major: table.major.clone(),
                year: table.year,
                row,
                course_code: req.course_code.to_string(),
                category: req.category.clone(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Credits, Grade};

    fn req(code: &str) -> Requirement {
        Requirement::new(code, code, Credits::whole(3), Grade::C)
    }

    fn base() -> RequirementTable {
        RequirementTable::new("Physics", 2022, vec![req("PHYS 101"), req("PHYS 102")])
    }

    #[test]
    fn test_merge_appends_plain_rows() {
        let merged = merge_special(&base(), &[req("PHYS 300")]).unwrap();
        let codes: Vec<_> = merged
            .requirements
            .iter()
            .map(|r| r.course_code.to_string())
            .collect();
        assert_eq!(codes, vec!["PHYS 101", "PHYS 102", "PHYS 300"]);
    }

    #[test]
    fn test_merge_override_replaces_in_place() {
        let replacement = Requirement::new("PHYS 101", "Honors Physics", Credits::whole(4), Grade::B)
            .overriding_base();
        let merged = merge_special(&base(), &[req("PHYS 300"), replacement]).unwrap();

        assert_eq!(merged.requirements.len(), 3);
        assert_eq!(merged.requirements[0].course_name, "Honors Physics");
        assert_eq!(merged.requirements[0].credits_need, Credits::whole(4));
        assert!(!merged.requirements[0].override_base);
        assert_eq!(merged.requirements[2].course_code.as_str(), "PHYS 300");
    }

    #[test]
    fn test_merge_override_without_base_fails() {
        let orphan = req("PHYS 999").overriding_base();
        let err = merge_special(&base(), &[orphan]).unwrap_err();
        assert!(matches!(err, ConfigurationError::OverrideWithoutBase { .. }));
    }

    #[test]
    fn test_validate_duplicate_requires_alternative_flag() {
        let table = RequirementTable::new("Physics", 2022, vec![req("PHYS 101"), req("phys101")]);
        let err = validate_table(&table).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::DuplicateRequirement { row: 2, .. }
        ));

        let table = RequirementTable::new(
            "Physics",
            2022,
            vec![req("PHYS 101"), req("PHYS 101").as_alternative()],
        );
        assert!(validate_table(&table).is_ok());
    }

    #[test]
    fn test_validate_duplicates_allowed_across_categories_and_electives() {
        let table = RequirementTable::new(
            "Physics",
            2022,
            vec![
                req("PHYS 101"),
                req("PHYS 101").with_category("general-ed"),
                req("PHYS *").with_category("elective"),
                req("PHYS *").with_category("elective"),
            ],
        );
        assert!(validate_table(&table).is_ok());
    }

    #[test]
    fn test_validate_rejects_unranked_minimum() {
        let mut bad = req("PHYS 101");
        bad.min_grade = Grade::TransferCredit;
        let table = RequirementTable::new("Physics", 2022, vec![req("PHYS 100"), bad]);
        let err = validate_table(&table).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::UnknownMinGrade { row: 2, ref value, .. } if value == "TC"
        ));
        assert!(err.to_string().contains("row 2"));
    }

    #[test]
    fn test_validate_rejects_zero_credits() {
        let table = RequirementTable::new(
            "Physics",
            2022,
            vec![Requirement::new("PHYS 101", "", Credits::ZERO, Grade::C)],
        );
        assert!(matches!(
            validate_table(&table),
            Err(ConfigurationError::InvalidCredits { row: 1, .. })
        ));
    }

    #[test]
    fn test_build_rejects_special_without_base() {
        let mut builder = CatalogBuilder::new();
        builder.add_table(base()).unwrap();
        builder.add_special("Chemistry", 2022, vec![req("CHEM 101")]);
        assert!(matches!(
            builder.build(),
            Err(ConfigurationError::SpecialWithoutBase { .. })
        ));
    }

    #[test]
    fn test_build_rejects_duplicate_table() {
        let mut builder = CatalogBuilder::new();
        builder.add_table(base()).unwrap();
        assert!(matches!(
            builder.add_table(base()),
            Err(ConfigurationError::DuplicateTable { .. })
        ));
    }

    #[test]
    fn test_build_merges_specials() {
        let mut builder = CatalogBuilder::new();
        builder.add_table(base()).unwrap();
        builder.add_special("physics", 2022, vec![req("PHYS 300")]);
        builder.add_cross_listing(["PHYS 101", "ASTR 101"]);
        let catalog = builder.build().unwrap();

        let table = catalog.lookup("Physics", 2022).unwrap();
        assert_eq!(table.requirements.len(), 3);
        assert_eq!(catalog.cross_listings().len(), 1);
    }
}
