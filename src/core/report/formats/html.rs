//! HTML report generator
//!
//! Renders a self-contained page (embedded CSS, no scripts) from the
//! `templates/audit_report.html` askama template.

use crate::core::audit::{CreditSummary, UnusedCourse};
use crate::core::report::{AuditRow, ReportContext, ReportGenerator};
use askama::Template;
use std::error::Error;

#[derive(Template)]
#[template(path = "audit_report.html")]
struct AuditPage<'a> {
    student: &'a str,
    major: &'a str,
    admission_year: u16,
    catalog_label: String,
    source: Option<&'a str>,
    summary: &'a CreditSummary,
    progress: u8,
    rows: Vec<AuditRow>,
    advisories: Vec<String>,
    unused: &'a [UnusedCourse],
    version: &'static str,
}

/// HTML report generator
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlReporter;

impl HtmlReporter {
    /// Create a new HTML reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ReportGenerator for HtmlReporter {
    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>> {
        let page = AuditPage {
            student: ctx.student_name(),
            major: &ctx.report.major,
            admission_year: ctx.report.admission_year,
            catalog_label: ctx.catalog_label(),
            source: ctx.source,
            summary: &ctx.report.summary,
            progress: ctx.progress_percent(),
            rows: ctx.rows(),
            advisories: ctx.report.advisories.iter().map(ToString::to_string).collect(),
            unused: &ctx.report.unused_courses,
            version: crate::core::get_version(),
        };
        Ok(page.render()?)
    }
}
