//! Credit summary aggregation

use super::result::MatchResult;
use crate::core::models::{Credits, Requirement, Transcript};
use serde::Serialize;

/// Degree-level credit totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CreditSummary {
    /// Credits of every credit-bearing transcript course
    pub total_taken: Credits,
    /// Sum of `credits_need` over the requirement table
    pub total_required: Credits,
    /// Sum of `credits_applied` over the results
    pub total_applied: Credits,
    /// `max(0, total_required - total_applied)`
    pub total_remaining: Credits,
    /// Number of satisfied requirements
    pub satisfied_count: usize,
    /// Number of pending requirements
    pub pending_count: usize,
}

impl CreditSummary {
    /// Aggregate totals from a finished match
    #[must_use]
    pub fn compute(transcript: &Transcript, requirements: &[Requirement], results: &[MatchResult]) -> Self {
        let total_required: Credits = requirements.iter().map(|r| r.credits_need).sum();
        let total_applied: Credits = results.iter().map(|r| r.credits_applied).sum();
        let satisfied_count = results.iter().filter(|r| r.is_satisfied()).count();

        Self {
            total_taken: transcript.earned_credits(),
            total_required,
            total_applied,
            total_remaining: total_required.saturating_sub(total_applied),
            satisfied_count,
            pending_count: results.len() - satisfied_count,
        }
    }

    /// Fraction of required credit applied, in `0.0..=1.0`
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.total_required.is_zero() {
            return 1.0;
        }
        (self.total_applied.as_f64() / self.total_required.as_f64()).min(1.0)
    }
}
