//! Transcript model

use super::{CourseCode, CourseRecord, Credits, CrossListings, Semester};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of one course instance on a transcript.
///
/// The value is the course's position in the flattened, chronologically
/// ordered course list, so it never changes once the transcript is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CourseId(pub usize);

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A course together with its place on the transcript
#[derive(Debug, Clone, Copy)]
pub struct TranscriptEntry<'a> {
    /// Identifier of this course instance
    pub id: CourseId,
    /// Index of the owning semester (higher is more recent)
    pub semester_index: usize,
    /// The course itself
    pub course: &'a CourseRecord,
}

/// How a transcript course was found for a queried code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeMatch {
    /// The course carries the queried code
    Exact,
    /// The course carries a code cross-listed with the queried one
    CrossListed(CourseCode),
}

/// A student's academic history: semesters in chronological order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    /// Student name, when the source document provides one
    pub student: Option<String>,

    /// Declared major, when the source document provides one
    pub major: Option<String>,

    /// Admission (catalog) year, when the source document provides one
    pub admission_year: Option<u16>,

    semesters: Vec<Semester>,
}

impl Transcript {
    /// Build a transcript from semesters.
    ///
    /// When every semester's term has a recognizable year the semesters are
    /// stably sorted chronologically; otherwise the given order is kept.
    #[must_use]
    pub fn new(mut semesters: Vec<Semester>) -> Self {
        if semesters.iter().all(|s| s.term.sort_key().is_some()) {
            semesters.sort_by_key(|s| s.term.sort_key());
        } else if semesters.len() > 1 {
            crate::warn!("Transcript has unrecognized term labels; keeping document order");
        }

        Self {
            student: None,
            major: None,
            admission_year: None,
            semesters,
        }
    }

    /// Set the student name
    #[must_use]
    pub fn with_student(mut self, student: Option<String>) -> Self {
        self.student = student;
        self
    }

    /// Set the declared major
    #[must_use]
    pub fn with_major(mut self, major: Option<String>) -> Self {
        self.major = major;
        self
    }

    /// Set the admission year
    #[must_use]
    pub const fn with_admission_year(mut self, year: Option<u16>) -> Self {
        self.admission_year = year;
        self
    }

    /// Semesters in chronological order
    #[must_use]
    pub fn semesters(&self) -> &[Semester] {
        &self.semesters
    }

    /// All courses across semesters, flattened with semester order preserved
    pub fn courses(&self) -> impl Iterator<Item = TranscriptEntry<'_>> {
        self.semesters
            .iter()
            .enumerate()
            .flat_map(|(semester_index, semester)| {
                semester
                    .courses
                    .iter()
                    .map(move |course| (semester_index, course))
            })
            .enumerate()
            .map(|(position, (semester_index, course))| TranscriptEntry {
                id: CourseId(position),
                semester_index,
                course,
            })
    }

    /// Number of course instances on the transcript
    #[must_use]
    pub fn course_count(&self) -> usize {
        self.semesters.iter().map(|s| s.courses.len()).sum()
    }

    /// Look up a course instance by identifier
    #[must_use]
    pub fn get(&self, id: CourseId) -> Option<TranscriptEntry<'_>> {
        self.courses().nth(id.0)
    }

    /// Find courses by code, case/whitespace-insensitive and cross-listing aware
    ///
    /// # Arguments
    /// * `code` - Raw or normalized course code
    /// * `cross_listings` - Equivalence table used to resolve aliases
    ///
    /// # Returns
    /// Matching entries in transcript order with how each one matched
    #[must_use]
    pub fn find<'a>(
        &'a self,
        code: &str,
        cross_listings: &CrossListings,
    ) -> Vec<(TranscriptEntry<'a>, CodeMatch)> {
        let wanted = CourseCode::new(code);
        self.courses()
            .filter_map(|entry| {
                if entry.course.code == wanted {
                    Some((entry, CodeMatch::Exact))
                } else if cross_listings.are_equivalent(&entry.course.code, &wanted) {
                    Some((entry, CodeMatch::CrossListed(entry.course.code.clone())))
                } else {
                    None
                }
            })
            .collect()
    }

    /// Total credits earned across the transcript
    #[must_use]
    pub fn earned_credits(&self) -> Credits {
        self.semesters.iter().map(Semester::earned_credits).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Grade;

    fn course(code: &str, grade: Grade, credits: u32, term: &str) -> CourseRecord {
        CourseRecord::new(code, "", grade, Credits::whole(credits), term)
    }

    fn sample() -> Transcript {
        Transcript::new(vec![
            Semester::new(
                "Spring 2022",
                vec![course("CS 2510", Grade::A, 4, "Spring 2022")],
            ),
            Semester::new(
                "Fall 2021",
                vec![
                    course("MATH 101", Grade::B, 4, "Fall 2021"),
                    course("PSYC 210", Grade::C, 3, "Fall 2021"),
                ],
            ),
        ])
    }

    #[test]
    fn test_semesters_sorted_chronologically() {
        let transcript = sample();
        let terms: Vec<_> = transcript
            .semesters()
            .iter()
            .map(|s| s.term.label.as_str())
            .collect();
        assert_eq!(terms, vec!["Fall 2021", "Spring 2022"]);
    }

    #[test]
    fn test_unrecognized_terms_keep_order() {
        let transcript = Transcript::new(vec![
            Semester::new("Second", vec![]),
            Semester::new("First", vec![]),
        ]);
        assert_eq!(transcript.semesters()[0].term.label, "Second");
    }

    #[test]
    fn test_flattened_courses() {
        let transcript = sample();
        let codes: Vec<_> = transcript
            .courses()
            .map(|e| (e.id.0, e.semester_index, e.course.code.to_string()))
            .collect();
        assert_eq!(
            codes,
            vec![
                (0, 0, "MATH 101".to_string()),
                (1, 0, "PSYC 210".to_string()),
                (2, 1, "CS 2510".to_string()),
            ]
        );
        assert_eq!(transcript.course_count(), 3);
        assert_eq!(
            transcript.get(CourseId(2)).map(|e| e.course.code.to_string()),
            Some("CS 2510".to_string())
        );
        assert!(transcript.get(CourseId(3)).is_none());
    }

    #[test]
    fn test_find_normalizes_query() {
        let transcript = sample();
        let found = transcript.find(" math101 ", &CrossListings::new());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].1, CodeMatch::Exact);
    }

    #[test]
    fn test_find_cross_listed() {
        let transcript = sample();
        let mut cross = CrossListings::new();
        cross.add_group(["PSYC 210", "NEUR 210"]);

        let found = transcript.find("NEUR 210", &cross);
        assert_eq!(found.len(), 1);
        assert_eq!(
            found[0].1,
            CodeMatch::CrossListed(CourseCode::new("PSYC 210"))
        );
    }

    #[test]
    fn test_earned_credits() {
        assert_eq!(sample().earned_credits(), Credits::whole(11));
    }
}
