//! Markdown report generator
//!
//! Generates audit reports in Markdown. These render well in GitHub, GitLab,
//! and VS Code.

use crate::core::report::{ReportContext, ReportGenerator, COLUMNS};
use std::error::Error;
use std::fmt::Write;

/// Embedded Markdown report template
const MARKDOWN_TEMPLATE: &str = include_str!("../templates/audit_report.md");

/// Markdown report generator
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Create a new Markdown reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render the report using template substitution
    #[allow(clippy::unused_self)]
    fn render_template(&self, ctx: &ReportContext) -> String {
        let report = ctx.report;
        let summary = &report.summary;
        let mut output = MARKDOWN_TEMPLATE.to_string();

        // Header metadata
        output = output.replace("{{student}}", &escape_cell(ctx.student_name()));
        output = output.replace("{{major}}", &escape_cell(&report.major));
        output = output.replace("{{admission_year}}", &report.admission_year.to_string());
        output = output.replace("{{catalog_year}}", &ctx.catalog_label());
        output = output.replace("{{source}}", &escape_cell(ctx.source.unwrap_or("-")));

        // Summary
        output = output.replace("{{total_taken}}", &summary.total_taken.to_string());
        output = output.replace("{{total_required}}", &summary.total_required.to_string());
        output = output.replace("{{total_applied}}", &summary.total_applied.to_string());
        output = output.replace("{{total_remaining}}", &summary.total_remaining.to_string());
        output = output.replace("{{satisfied_count}}", &summary.satisfied_count.to_string());
        output = output.replace("{{pending_count}}", &summary.pending_count.to_string());
        output = output.replace("{{progress}}", &ctx.progress_percent().to_string());

        output = output.replace("{{requirements}}", &Self::generate_requirements_table(ctx));
        output = output.replace("{{advisories}}", &Self::generate_advisories(ctx));
        output = output.replace("{{unused_courses}}", &Self::generate_unused(ctx));
        output = output.replace("{{version}}", crate::core::get_version());

        output
    }

    fn generate_requirements_table(ctx: &ReportContext) -> String {
        let mut table = String::new();
        let _ = writeln!(table, "| {} |", COLUMNS.join(" | "));
        let _ = writeln!(table, "|{}", "---|".repeat(COLUMNS.len()));

        for row in ctx.rows() {
            let cells: Vec<String> = row.cells().iter().map(|c| escape_cell(c)).collect();
            let _ = writeln!(table, "| {} |", cells.join(" | "));
        }
        table
    }

    fn generate_advisories(ctx: &ReportContext) -> String {
        if ctx.report.advisories.is_empty() {
            return "None.\n".to_string();
        }
        let mut list = String::new();
        for advisory in &ctx.report.advisories {
            let _ = writeln!(list, "- {}", escape_cell(&advisory.to_string()));
        }
        list
    }

    fn generate_unused(ctx: &ReportContext) -> String {
        if ctx.report.unused_courses.is_empty() {
            return "None.\n".to_string();
        }
        let mut table = String::from("| Course | Title | Term | Grade | Credits |\n|---|---|---|---|---:|\n");
        for unused in &ctx.report.unused_courses {
            let course = &unused.course;
            let _ = writeln!(
                table,
                "| {} | {} | {} | {} | {} |",
                course.code,
                escape_cell(&course.title),
                escape_cell(&course.term),
                course.grade,
                course.credits
            );
        }
        table
    }
}

impl ReportGenerator for MarkdownReporter {
    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>> {
        Ok(self.render_template(ctx))
    }
}

/// Make text safe inside a Markdown table cell
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\n', '\r'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_cell() {
        assert_eq!(escape_cell("a|b\nc"), "a\\|b c");
    }

    #[test]
    fn test_template_placeholders_present() {
        for placeholder in ["{{student}}", "{{requirements}}", "{{advisories}}", "{{unused_courses}}"] {
            assert!(MARKDOWN_TEMPLATE.contains(placeholder), "missing {placeholder}");
        }
    }
}
