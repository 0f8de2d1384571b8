//! Report generation for audit results
//!
//! Every format renders the same flat row model ([`AuditRow`]) built from the
//! engine's results. The presentation ordering (satisfied first, then course
//! code) is applied to copies of the rows and never feeds back into the
//! report itself.

pub mod formats;

use crate::core::audit::{AuditReport, MatchResult, MatchStatus};
use crate::core::models::{Credits, Grade};
use serde::Serialize;
use std::error::Error;
use std::path::Path;

pub use formats::{CsvReporter, HtmlReporter, JsonReporter, MarkdownReporter, ReportFormat};

/// Column headers of the tabular output, in order
pub const COLUMNS: [&str; 9] = [
    "course_code",
    "course_name",
    "credits_required",
    "min_grade",
    "status",
    "used_courses",
    "credits_applied",
    "credits_remaining",
    "note",
];

/// Separator between used course codes in one cell
pub const USED_COURSE_SEPARATOR: &str = ";";

/// One requirement flattened for tabular output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditRow {
    /// Requirement course code or pattern
    pub course_code: String,
    /// Requirement display name
    pub course_name: String,
    /// Credits the requirement demands
    pub credits_required: Credits,
    /// Minimum grade
    pub min_grade: Grade,
    /// Satisfied or Pending
    pub status: MatchStatus,
    /// Used course codes joined by `;`
    pub used_courses: String,
    /// Credits applied
    pub credits_applied: Credits,
    /// Credits still needed
    pub credits_remaining: Credits,
    /// Explanation
    pub note: String,
}

impl AuditRow {
    /// Flatten one match result
    #[must_use]
    pub fn from_result(result: &MatchResult) -> Self {
        Self {
            course_code: result.requirement.course_code.to_string(),
            course_name: result.requirement.course_name.clone(),
            credits_required: result.requirement.credits_need,
            min_grade: result.requirement.min_grade,
            status: result.status,
            used_courses: result.used_codes(USED_COURSE_SEPARATOR),
            credits_applied: result.credits_applied,
            credits_remaining: result.credits_remaining,
            note: result.note.clone(),
        }
    }

    /// Cell values in [`COLUMNS`] order
    #[must_use]
    pub fn cells(&self) -> [String; 9] {
        [
            self.course_code.clone(),
            self.course_name.clone(),
            self.credits_required.to_string(),
            self.min_grade.to_string(),
            self.status.to_string(),
            self.used_courses.clone(),
            self.credits_applied.to_string(),
            self.credits_remaining.to_string(),
            self.note.clone(),
        ]
    }

    /// CSS class for HTML styling
    #[must_use]
    pub const fn status_class(&self) -> &'static str {
        match self.status {
            MatchStatus::Satisfied => "satisfied",
            MatchStatus::Pending => "pending",
        }
    }
}

/// Rows in presentation order: satisfied before pending, then course code.
///
/// The sort is stable, so rows with equal keys keep catalog order.
#[must_use]
pub fn presentation_rows(results: &[MatchResult]) -> Vec<AuditRow> {
    let mut rows: Vec<AuditRow> = results.iter().map(AuditRow::from_result).collect();
    rows.sort_by(|a, b| {
        a.status
            .cmp(&b.status)
            .then_with(|| a.course_code.cmp(&b.course_code))
    });
    rows
}

/// Data context for report generation
#[derive(Debug, Clone, Copy)]
pub struct ReportContext<'a> {
    /// The audit being reported
    pub report: &'a AuditReport,
    /// Transcript file the audit was run on, if any
    pub source: Option<&'a str>,
}

impl<'a> ReportContext<'a> {
    /// Create a new report context
    #[must_use]
    pub const fn new(report: &'a AuditReport, source: Option<&'a str>) -> Self {
        Self { report, source }
    }

    /// Student name or a placeholder
    #[must_use]
    pub fn student_name(&self) -> &str {
        self.report.student.as_deref().unwrap_or("Unknown student")
    }

    /// Catalog year description, noting any fallback
    #[must_use]
    pub fn catalog_label(&self) -> String {
        if self.report.catalog_year == self.report.admission_year {
            self.report.catalog_year.to_string()
        } else {
            format!(
                "{} (no {} table; nearest earlier year used)",
                self.report.catalog_year, self.report.admission_year
            )
        }
    }

    /// Rows in presentation order
    #[must_use]
    pub fn rows(&self) -> Vec<AuditRow> {
        presentation_rows(&self.report.results)
    }

    /// Applied/required progress as a whole percentage
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn progress_percent(&self) -> u8 {
        (self.report.summary.progress() * 100.0).floor() as u8
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Generate a report to a file
    ///
    /// # Errors
    /// Returns an error if report generation or file writing fails
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), Box<dyn Error>> {
        let content = self.render(ctx)?;
        std::fs::write(output_path, content)?;
        crate::info!("Wrote report to {}", output_path.display());
        Ok(())
    }

    /// Generate report content as a string
    ///
    /// # Errors
    /// Returns an error if report generation fails
    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Requirement;

    fn result(code: &str, status: MatchStatus) -> MatchResult {
        let need = Credits::whole(3);
        let applied = if status == MatchStatus::Satisfied {
            need
        } else {
            Credits::ZERO
        };
        MatchResult {
            requirement: Requirement::new(code, code, need, Grade::C),
            status,
            used_courses: Vec::new(),
            credits_applied: applied,
            credits_remaining: need.saturating_sub(applied),
            note: String::new(),
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_presentation_order() {
        let results = vec![
            result("MATH 201", MatchStatus::Pending),
            result("HIST 200", MatchStatus::Satisfied),
            result("ART 100", MatchStatus::Pending),
            result("MATH 101", MatchStatus::Satisfied),
        ];
        let codes: Vec<_> = presentation_rows(&results)
            .into_iter()
            .map(|r| r.course_code)
            .collect();
        assert_eq!(codes, vec!["HIST 200", "MATH 101", "ART 100", "MATH 201"]);
        // source order untouched
        assert_eq!(results[0].requirement.course_code.as_str(), "MATH 201");
    }

    #[test]
    fn test_row_cells() {
        let row = AuditRow::from_result(&result("MATH 101", MatchStatus::Satisfied));
        assert_eq!(
            row.cells(),
            [
                "MATH 101", "MATH 101", "3.0", "C", "Satisfied", "", "3.0", "0.0", ""
            ]
            .map(String::from)
        );
        assert_eq!(row.status_class(), "satisfied");
    }
}
