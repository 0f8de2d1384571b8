//! JSON report generator
//!
//! Serializes the whole audit report (results in catalog order, summary,
//! advisories and unused courses) for API consumers.

use crate::core::report::{ReportContext, ReportGenerator};
use std::error::Error;

/// JSON report generator
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReporter;

impl JsonReporter {
    /// Create a new JSON reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ReportGenerator for JsonReporter {
    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>> {
        let mut out = serde_json::to_string_pretty(ctx.report)?;
        out.push('\n');
        Ok(out)
    }
}
