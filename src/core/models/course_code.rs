//! Normalized course codes and code patterns

use serde::{Deserialize, Serialize};
use std::fmt;

/// A normalized course code such as `MATH 101`.
///
/// Normalization upper-cases, drops anything from the first `(`, and puts
/// exactly one space between an alphabetic subject and the rest of the code,
/// so `math101`, ` Math  101 ` and `MATH 101 (lab)` all become `MATH 101`.
/// Codes that do not start with a subject (e.g. `FREE ELECTIVE`) keep their
/// words, upper-cased and single-spaced.
///
/// A code whose number part contains `X` (any digit) or ends in `*` (any
/// suffix) acts as a pattern when used by a requirement: `CS 3XXX` matches
/// `CS 3500`, `HIST *` matches any HIST course.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct CourseCode(String);

impl CourseCode {
    /// Normalize a raw code
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(normalize_course_code(raw))
    }

    /// The normalized text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether normalization left nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Subject part (`MATH` in `MATH 101`)
    #[must_use]
    pub fn subject(&self) -> &str {
        self.0.split_once(' ').map_or(self.0.as_str(), |(s, _)| s)
    }

    /// Number part (`101` in `MATH 101`), empty when there is none
    #[must_use]
    pub fn number(&self) -> &str {
        self.0.split_once(' ').map_or("", |(_, n)| n)
    }

    /// Whether this code is a wildcard pattern rather than a single course
    #[must_use]
    pub fn is_pattern(&self) -> bool {
        let number = self.number();
        number.ends_with('*')
            || (number.contains('X')
                && number.starts_with(|c: char| c.is_ascii_digit() || c == 'X'))
    }

    /// Check whether `code` is matched by this code.
    ///
    /// A plain code matches only itself; a pattern matches per the rules in
    /// the type documentation.
    #[must_use]
    pub fn matches(&self, code: &Self) -> bool {
        if !self.is_pattern() {
            return self == code;
        }
        if self.subject() != code.subject() {
            return false;
        }

        let pattern = self.number();
        let number = code.number();
        if let Some(prefix) = pattern.strip_suffix('*') {
            return number.starts_with(prefix) && !number.is_empty();
        }

        pattern.len() == number.len()
            && pattern
                .chars()
                .zip(number.chars())
                .all(|(p, n)| p == n || (p == 'X' && n.is_ascii_digit()))
    }
}

impl From<String> for CourseCode {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<&str> for CourseCode {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<CourseCode> for String {
    fn from(code: CourseCode) -> Self {
        code.0
    }
}

impl fmt::Display for CourseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize a course code to `SUBJ NUM` form
fn normalize_course_code(input: &str) -> String {
    // Remove parentheses and anything after them
    let cleaned = input.split('(').next().unwrap_or(input);

    let words: Vec<String> = cleaned
        .split_whitespace()
        .map(str::to_ascii_uppercase)
        .collect();
    let compact = words.concat();

    let boundary = compact.find(|c: char| c.is_ascii_digit() || c == '*');
    match boundary {
        Some(idx) if idx > 0 && compact[..idx].chars().all(char::is_alphabetic) => {
            format!("{} {}", &compact[..idx], &compact[idx..])
        }
        _ => words.join(" "),
    }
}
