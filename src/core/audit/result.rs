//! Per-requirement match results and advisories

use crate::core::models::{CourseCode, CourseId, CourseRecord, Credits, Requirement};
use serde::Serialize;
use std::fmt;

/// Whether a requirement slot has been met
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum MatchStatus {
    /// `credits_applied == credits_need`
    Satisfied,
    /// Some credit is still outstanding
    Pending,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Satisfied => write!(f, "Satisfied"),
            Self::Pending => write!(f, "Pending"),
        }
    }
}

/// A transcript course consumed by a requirement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsedCourse {
    /// Transcript position of the course instance
    pub id: CourseId,
    /// Code as it appears on the transcript
    pub code: CourseCode,
    /// Term the course was taken in
    pub term: String,
    /// Credits this course contributed to the requirement
    pub credits_applied: Credits,
}

/// What an advisory is about
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdvisoryKind {
    /// Transfer credit applied to a slot that discourages it
    TransferCreditDiscouraged,
    /// The course matched through a cross-listed code
    CrossListedAlias {
        /// Code the requirement recognized
        listed_as: CourseCode,
    },
    /// An in-progress course was counted
    InProgressCounted,
    /// Leftover credit from a course already used in the same pool
    SharedPoolCredit {
        /// Pool identifier
        pool: String,
    },
}

/// A non-fatal observation raised while matching
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advisory {
    /// Requirement the advisory belongs to
    pub requirement: CourseCode,
    /// Transcript course involved
    pub course: CourseCode,
    /// Advisory details
    #[serde(flatten)]
    pub kind: AdvisoryKind,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            AdvisoryKind::TransferCreditDiscouraged => write!(
                f,
                "{}: transfer credit {} applied where transfer is discouraged",
                self.requirement, self.course
            ),
            AdvisoryKind::CrossListedAlias { listed_as } => write!(
                f,
                "{}: {} counted as cross-listed {}",
                self.requirement, self.course, listed_as
            ),
            AdvisoryKind::InProgressCounted => write!(
                f,
                "{}: in-progress course {} counted",
                self.requirement, self.course
            ),
            AdvisoryKind::SharedPoolCredit { pool } => write!(
                f,
                "{}: leftover credit from {} shared within pool '{}'",
                self.requirement, self.course, pool
            ),
        }
    }
}

/// Outcome of matching one requirement
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// The requirement this result belongs to
    pub requirement: Requirement,
    /// Satisfied or Pending
    pub status: MatchStatus,
    /// Consumed courses, in selection order
    pub used_courses: Vec<UsedCourse>,
    /// Credits counted toward the requirement (never above `credits_need`)
    pub credits_applied: Credits,
    /// `credits_need - credits_applied`
    pub credits_remaining: Credits,
    /// Human-readable explanation
    pub note: String,
    /// Advisories raised for this slot
    pub warnings: Vec<Advisory>,
}

impl MatchResult {
    /// Whether the requirement is met
    #[must_use]
    pub fn is_satisfied(&self) -> bool {
        self.status == MatchStatus::Satisfied
    }

    /// Used course codes joined for tabular output (e.g. `"MATH 101;MATH 102"`)
    #[must_use]
    pub fn used_codes(&self, separator: &str) -> String {
        self.used_courses
            .iter()
            .map(|c| c.code.as_str())
            .collect::<Vec<_>>()
            .join(separator)
    }
}

/// A transcript course no requirement consumed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnusedCourse {
    /// Transcript position
    pub id: CourseId,
    /// The course
    #[serde(flatten)]
    pub course: CourseRecord,
}
