//! Requirement model

use super::{CourseCode, Credits, Grade};
use serde::{Deserialize, Serialize};

/// Default category for requirement rows that do not name one
pub const DEFAULT_CATEGORY: &str = "core";

/// How a transcript course code relates to a requirement
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum RequirementMatch {
    /// The course carries the requirement's own code
    Exact,
    /// The course is accepted through the elective group or a code pattern
    Accepted,
    /// The course is cross-listed with a code the requirement accepts
    Alias(CourseCode),
}

impl RequirementMatch {
    /// Selection priority, lower is preferred
    #[must_use]
    pub const fn priority(&self) -> u8 {
        match self {
            Self::Exact => 0,
            Self::Accepted => 1,
            Self::Alias(_) => 2,
        }
    }
}

/// One slot in a major's graduation requirements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// Code of the required course, a pattern (`CS 3XXX`), or a group marker
    pub course_code: CourseCode,

    /// Display name (e.g., "Calculus I" or "Upper-division CS elective")
    pub course_name: String,

    /// Credits this slot demands
    pub credits_need: Credits,

    /// Lowest acceptable grade
    pub min_grade: Grade,

    /// Free-text substitution notes
    pub comments: String,

    /// Category tag (e.g., "core", "elective", "general-ed")
    pub category: String,

    /// Further codes or patterns that satisfy this slot
    pub accepts: Vec<CourseCode>,

    /// Credit pool shared with sibling requirements, if any
    pub pool_id: Option<String>,

    /// Whether transfer credit is acceptable without an advisory
    pub allow_transfer: bool,

    /// Marks a deliberate duplicate of another row's course code
    pub alternative: bool,

    /// On special-table rows: replace the base row with the same code
    pub override_base: bool,
}

impl Requirement {
    /// Create a requirement with default flags (core category, transfer allowed)
    ///
    /// # Arguments
    /// * `course_code` - Required course code or pattern
    /// * `course_name` - Display name
    /// * `credits_need` - Credits demanded
    /// * `min_grade` - Lowest acceptable grade
    #[must_use]
    pub fn new(course_code: &str, course_name: &str, credits_need: Credits, min_grade: Grade) -> Self {
        Self {
            course_code: CourseCode::new(course_code),
            course_name: course_name.trim().to_string(),
            credits_need,
            min_grade,
            comments: String::new(),
            category: DEFAULT_CATEGORY.to_string(),
            accepts: Vec::new(),
            pool_id: None,
            allow_transfer: true,
            alternative: false,
            override_base: false,
        }
    }

    /// Set the category tag
    #[must_use]
    pub fn with_category(mut self, category: &str) -> Self {
        self.category = category.trim().to_string();
        self
    }

    /// Set the comments text
    #[must_use]
    pub fn with_comments(mut self, comments: &str) -> Self {
        self.comments = comments.trim().to_string();
        self
    }

    /// Add an accepted code or pattern
    #[must_use]
    pub fn accepting(mut self, code: &str) -> Self {
        let code = CourseCode::new(code);
        if !code.is_empty() && !self.accepts.contains(&code) {
            self.accepts.push(code);
        }
        self
    }

    /// Place the requirement in a credit pool
    #[must_use]
    pub fn in_pool(mut self, pool_id: &str) -> Self {
        self.pool_id = Some(pool_id.trim().to_string());
        self
    }

    /// Flag transfer credit as discouraged for this slot
    #[must_use]
    pub const fn disallow_transfer(mut self) -> Self {
        self.allow_transfer = false;
        self
    }

    /// Mark the row as a deliberate alternative
    #[must_use]
    pub const fn as_alternative(mut self) -> Self {
        self.alternative = true;
        self
    }

    /// Mark the row as overriding the base row with the same code
    #[must_use]
    pub const fn overriding_base(mut self) -> Self {
        self.override_base = true;
        self
    }

    /// Whether the category is an elective group (exempt from duplicate checks)
    #[must_use]
    pub fn is_elective(&self) -> bool {
        self.category.to_ascii_lowercase().contains("elective")
    }

    /// Match a course code directly against this requirement (no aliases)
    #[must_use]
    pub fn match_code(&self, code: &CourseCode) -> Option<RequirementMatch> {
        if !self.course_code.is_pattern() && self.course_code == *code {
            return Some(RequirementMatch::Exact);
        }
        if self.course_code.is_pattern() && self.course_code.matches(code) {
            return Some(RequirementMatch::Accepted);
        }
        self.accepts
            .iter()
            .any(|accepted| accepted.matches(code))
            .then_some(RequirementMatch::Accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requirement_defaults() {
        let req = Requirement::new("math101", "Calculus I", Credits::whole(4), Grade::C);
        assert_eq!(req.course_code.as_str(), "MATH 101");
        assert_eq!(req.category, DEFAULT_CATEGORY);
        assert!(req.allow_transfer);
        assert!(!req.alternative);
        assert!(!req.override_base);
        assert!(req.pool_id.is_none());
    }

    #[test]
    fn test_builder_flags() {
        let req = Requirement::new("CS 3XXX", "Upper CS", Credits::whole(3), Grade::C)
            .with_category("CS Elective")
            .accepting("MATH 3500")
            .accepting("math 3500")
            .in_pool("upper")
            .disallow_transfer();
        assert!(req.is_elective());
        assert_eq!(req.accepts.len(), 1);
        assert_eq!(req.pool_id.as_deref(), Some("upper"));
        assert!(!req.allow_transfer);
    }

    #[test]
    fn test_match_code() {
        let req = Requirement::new("CS 2500", "Fundies", Credits::whole(4), Grade::C)
            .accepting("CS 2501")
            .accepting("HONR 2*");

        assert_eq!(
            req.match_code(&CourseCode::new("CS 2500")),
            Some(RequirementMatch::Exact)
        );
        assert_eq!(
            req.match_code(&CourseCode::new("CS 2501")),
            Some(RequirementMatch::Accepted)
        );
        assert_eq!(
            req.match_code(&CourseCode::new("HONR 2100")),
            Some(RequirementMatch::Accepted)
        );
        assert_eq!(req.match_code(&CourseCode::new("CS 2510")), None);
    }

    #[test]
    fn test_pattern_requirement_is_accepted_match() {
        let req = Requirement::new("CS 3XXX", "Upper CS", Credits::whole(3), Grade::C);
        assert_eq!(
            req.match_code(&CourseCode::new("CS 3500")),
            Some(RequirementMatch::Accepted)
        );
    }

    #[test]
    fn test_match_priority() {
        assert!(RequirementMatch::Exact.priority() < RequirementMatch::Accepted.priority());
        assert!(
            RequirementMatch::Accepted.priority()
                < RequirementMatch::Alias(CourseCode::new("X 1")).priority()
        );
    }
}
