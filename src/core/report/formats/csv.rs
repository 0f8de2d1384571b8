//! CSV report generator
//!
//! One header row with the fixed columns, then one row per requirement in
//! presentation order. Fields are quoted only when they need to be.

use crate::core::report::{AuditRow, ReportContext, ReportGenerator, COLUMNS};
use std::error::Error;
use std::fmt::Write;

/// CSV report generator
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvReporter;

impl CsvReporter {
    /// Create a new CSV reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render rows (already ordered) as CSV text
    ///
    /// # Errors
    /// Returns an error if formatting fails
    pub fn render_rows(rows: &[AuditRow]) -> Result<String, std::fmt::Error> {
        let mut out = String::new();
        writeln!(out, "{}", COLUMNS.join(","))?;
        for row in rows {
            let cells: Vec<String> = row.cells().iter().map(|c| escape_field(c)).collect();
            writeln!(out, "{}", cells.join(","))?;
        }
        Ok(out)
    }
}

impl ReportGenerator for CsvReporter {
    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>> {
        Ok(Self::render_rows(&ctx.rows())?)
    }
}

/// Quote a field when it contains a delimiter, quote, line break or
/// surrounding whitespace
#[must_use]
pub fn escape_field(field: &str) -> String {
    let needs_quotes = field.contains([',', '"', '\n', '\r']) || field.trim() != field;
    if needs_quotes {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("MATH 101"), "MATH 101");
        assert_eq!(escape_field("a, b"), "\"a, b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field(" padded"), "\" padded\"");
        assert_eq!(escape_field(""), "");
    }

    #[test]
    fn test_header_only_for_no_rows() {
        let out = CsvReporter::render_rows(&[]).unwrap();
        assert_eq!(
            out,
            "course_code,course_name,credits_required,min_grade,status,used_courses,credits_applied,credits_remaining,note\n"
        );
    }
}
