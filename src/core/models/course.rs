//! Course record model

use super::{CourseCode, Credits, Grade, Term};
use crate::core::error::InputError;
use serde::{Deserialize, Serialize};

/// A course as it appears on a student's transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRecord {
    /// Normalized course code (e.g., "MATH 101")
    pub code: CourseCode,

    /// Course title (e.g., "Calculus I")
    pub title: String,

    /// Grade received
    pub grade: Grade,

    /// Credit hours attempted
    pub credits: Credits,

    /// Term label the course was taken in (e.g., "Fall 2021")
    pub term: String,
}

impl CourseRecord {
    /// Create a new course record
    ///
    /// # Arguments
    /// * `code` - Course code, normalized on construction
    /// * `title` - Course title
    /// * `grade` - Grade received
    /// * `credits` - Credit hours
    /// * `term` - Term label
    #[must_use]
    pub fn new(code: &str, title: &str, grade: Grade, credits: Credits, term: &str) -> Self {
        Self {
            code: CourseCode::new(code),
            title: title.trim().to_string(),
            grade,
            credits,
            term: term.trim().to_string(),
        }
    }

    /// Build a record from raw transcript text, validating grade and credits
    ///
    /// # Errors
    /// Returns `InputError::UnparseableGrade` or `InputError::UnparseableCredits`
    /// when the corresponding value cannot be interpreted.
    pub fn parse(
        code: &str,
        title: &str,
        grade: &str,
        credits: &str,
        term: &str,
    ) -> Result<Self, InputError> {
        let parsed_grade: Grade = grade.parse().map_err(|_| InputError::UnparseableGrade {
            code: code.trim().to_string(),
            term: term.trim().to_string(),
            value: grade.trim().to_string(),
        })?;

        let parsed_credits: Credits =
            credits
                .parse()
                .map_err(|reason| InputError::UnparseableCredits {
                    code: code.trim().to_string(),
                    term: term.trim().to_string(),
                    value: credits.trim().to_string(),
                    reason,
                })?;

        Ok(Self::new(code, title, parsed_grade, parsed_credits, term))
    }

    /// Credits this course contributes to the transcript total
    ///
    /// Failing, withdrawn, incomplete and in-progress courses contribute nothing.
    #[must_use]
    pub const fn earned_credits(&self) -> Credits {
        if self.grade.earns_credit() {
            self.credits
        } else {
            Credits::ZERO
        }
    }
}

/// One term's worth of courses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Semester {
    /// Term identifier
    pub term: Term,

    /// Courses taken in this term, in transcript order
    pub courses: Vec<CourseRecord>,
}

impl Semester {
    /// Create a semester
    #[must_use]
    pub fn new(term: &str, courses: Vec<CourseRecord>) -> Self {
        Self {
            term: Term::new(term),
            courses,
        }
    }

    /// Total credits earned this term
    #[must_use]
    pub fn earned_credits(&self) -> Credits {
        self.courses.iter().map(CourseRecord::earned_credits).sum()
    }
}
