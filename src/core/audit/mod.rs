//! Degree audit: transcript + requirement catalog → satisfaction report

pub mod engine;
pub mod result;
pub mod summary;

pub use engine::{AuditOptions, EngineOutcome, MatchingEngine};
pub use result::{Advisory, AdvisoryKind, MatchResult, MatchStatus, UnusedCourse, UsedCourse};
pub use summary::CreditSummary;

use crate::core::catalog::RequirementCatalog;
use crate::core::error::AuditError;
use crate::core::models::Transcript;
use serde::Serialize;

/// Complete outcome of auditing one transcript
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    /// Student name from the transcript, if known
    pub student: Option<String>,
    /// Major as named in the requirement table
    pub major: String,
    /// Admission year that was requested
    pub admission_year: u16,
    /// Catalog year whose table was applied
    pub catalog_year: u16,
    /// One result per requirement, in catalog order
    pub results: Vec<MatchResult>,
    /// Degree-level totals
    pub summary: CreditSummary,
    /// Every advisory raised, in requirement order
    pub advisories: Vec<Advisory>,
    /// Transcript courses that matched no requirement
    pub unused_courses: Vec<UnusedCourse>,
}

impl AuditReport {
    /// Whether every requirement is satisfied
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.summary.pending_count == 0
    }
}

/// Audit a transcript against a major's requirements for an admission year
///
/// # Arguments
/// * `transcript` - Parsed transcript
/// * `catalog` - Validated requirement catalog
/// * `major` - Major name (case-insensitive)
/// * `admission_year` - Catalog year governing the student
/// * `options` - In-progress, pooling and year-fallback switches
///
/// # Errors
/// Returns `AuditError::Configuration` when no table applies or the table is
/// invalid. No partial results are produced on error.
pub fn audit(
    transcript: &Transcript,
    catalog: &RequirementCatalog,
    major: &str,
    admission_year: u16,
    options: AuditOptions,
) -> Result<AuditReport, AuditError> {
    let table = catalog.lookup_with(major, admission_year, options.year_fallback)?;
    let engine = MatchingEngine::new(transcript, table, catalog.cross_listings(), options)?;
    let outcome = engine.run();

    let summary = CreditSummary::compute(transcript, &table.requirements, &outcome.results);
    let advisories = outcome
        .results
        .iter()
        .flat_map(|r| r.warnings.iter().cloned())
        .collect();

    crate::info!(
        "Audited {} {} ({} catalog): {} satisfied, {} pending",
        table.major,
        admission_year,
        table.year,
        summary.satisfied_count,
        summary.pending_count
    );

    Ok(AuditReport {
        student: transcript.student.clone(),
        major: table.major.clone(),
        admission_year,
        catalog_year: table.year,
        results: outcome.results,
        summary,
        advisories,
        unused_courses: outcome.unused_courses,
    })
}
