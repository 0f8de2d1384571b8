//! CSV parser for student transcripts
//!
//! Layout:
//!
//! ```text
//! Student,Jane Doe
//! Major,Computer Science
//! Admission Year,2021
//! Courses
//! Term,Course Code,Title,Grade,Credits
//! Fall 2021,MATH 101,Calculus I,B,4
//! ```
//!
//! The metadata rows and the `Courses` marker are optional; the course table
//! starts at the first row containing a `Course Code` column.

use crate::core::error::InputError;
use crate::core::models::{CourseRecord, Semester, Transcript};
use std::fs;
use std::path::Path;

/// Metadata found above the course table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranscriptMetadata {
    /// Student name
    pub student: Option<String>,
    /// Declared major
    pub major: Option<String>,
    /// Admission year
    pub admission_year: Option<u16>,
}

/// Column positions of the course table
struct Columns {
    term: usize,
    code: usize,
    title: Option<usize>,
    grade: usize,
    credits: usize,
}

impl Columns {
    fn locate(headers: &[String], line: usize) -> Result<Self, InputError> {
        let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
        let require = |name: &'static str| find(name).ok_or(InputError::MissingField { line, field: name });

        Ok(Self {
            term: require("Term")?,
            code: require("Course Code")?,
            title: find("Title"),
            grade: require("Grade")?,
            credits: require("Credits")?,
        })
    }
}

/// Parse a transcript CSV file
///
/// # Arguments
/// * `path` - Path to the CSV file
///
/// # Errors
/// Returns `InputError` if the file cannot be read, lacks the course table
/// or a required field, or contains an unparseable grade or credit value
pub fn parse_transcript_csv<P: AsRef<Path>>(path: P) -> Result<Transcript, InputError> {
    let path = path.as_ref();
    crate::debug!("Reading transcript {}", path.display());
    let content = fs::read_to_string(path)?;
    parse_transcript_str(&content)
}

/// Parse transcript CSV text
///
/// # Errors
/// See [`parse_transcript_csv`]
pub fn parse_transcript_str(content: &str) -> Result<Transcript, InputError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut metadata = TranscriptMetadata::default();
    let mut columns: Option<Columns> = None;
    let mut semesters: Vec<(String, Vec<CourseRecord>)> = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let line = idx + 1;
        if raw.trim().is_empty() || raw.trim_start().starts_with('#') {
            continue;
        }
        let fields = split_csv_line(raw).map_err(|message| InputError::Malformed { line, message })?;

        if let Some(cols) = &columns {
            let course = parse_course_row(&fields, cols, line)?;
            match semesters.iter_mut().find(|(term, _)| *term == course.term) {
                Some((_, courses)) => courses.push(course),
                None => semesters.push((course.term.clone(), vec![course])),
            }
        } else if fields.iter().any(|f| f.eq_ignore_ascii_case("Course Code")) {
            columns = Some(Columns::locate(&fields, line)?);
        } else {
            read_metadata(&fields, line, &mut metadata)?;
        }
    }

    if columns.is_none() {
        return Err(InputError::Malformed {
            line: 1,
            message: "no course table header (Term,Course Code,Title,Grade,Credits) found".to_string(),
        });
    }

    let semesters = semesters
        .into_iter()
        .map(|(term, courses)| Semester::new(&term, courses))
        .collect();
    let transcript = Transcript::new(semesters)
        .with_student(metadata.student)
        .with_major(metadata.major)
        .with_admission_year(metadata.admission_year);

    crate::debug!(
        "Parsed transcript: {} semesters, {} courses",
        transcript.semesters().len(),
        transcript.course_count()
    );
    Ok(transcript)
}

fn read_metadata(fields: &[String], line: usize, metadata: &mut TranscriptMetadata) -> Result<(), InputError> {
    let Some(key) = fields.first() else {
        return Ok(());
    };
    let value = fields
        .get(1)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match key.trim().to_lowercase().as_str() {
        "student" | "name" => metadata.student = value,
        "major" => metadata.major = value,
        "admission year" | "catalog year" => {
            metadata.admission_year = value
                .map(|v| {
                    v.parse::<u16>().map_err(|_| InputError::Malformed {
                        line,
                        message: format!("admission year '{v}' is not a year"),
                    })
                })
                .transpose()?;
        }
        "courses" => {}
        other => {
            crate::verbose!("Ignoring transcript metadata row '{other}' on line {line}");
        }
    }
    Ok(())
}

fn parse_course_row(fields: &[String], cols: &Columns, line: usize) -> Result<CourseRecord, InputError> {
    let get = |idx: usize| fields.get(idx).map_or("", |f| f.trim());
    let require = |idx: usize, field: &'static str| {
        let value = get(idx);
        if value.is_empty() {
            Err(InputError::MissingField { line, field })
        } else {
            Ok(value)
        }
    };

    let term = require(cols.term, "Term")?;
    let code = require(cols.code, "Course Code")?;
    let grade = require(cols.grade, "Grade")?;
    let credits = require(cols.credits, "Credits")?;
    let title = cols.title.map_or("", get);

    CourseRecord::parse(code, title, grade, credits, term)
}

/// Split one CSV line into fields, honoring double-quoted fields and `""`
/// escapes
///
/// # Errors
/// Returns a message if a quoted field is not terminated
pub fn split_csv_line(line: &str) -> Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            ('"', true) => in_quotes = false,
            ('"', false) if current.trim().is_empty() => {
                current.clear();
                in_quotes = true;
            }
            (',', false) => fields.push(std::mem::take(&mut current).trim().to_string()),
            _ => current.push(c),
        }
    }

    if in_quotes {
        return Err("unterminated quoted field".to_string());
    }
    fields.push(current.trim().to_string());
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Credits, Grade};

    const SAMPLE: &str = "\
Student,Jane Doe
Major,Computer Science
Admission Year,2021
Courses
Term,Course Code,Title,Grade,Credits
Spring 2022,CS 2500,\"Fundamentals of Computer Science, I\",A-,4
Fall 2021,math101,Calculus I,B,4
Fall 2021,ENGL 1111,First-Year Writing,TC,3.5
";

    #[test]
    fn test_parse_sample() {
        let transcript = parse_transcript_str(SAMPLE).unwrap();
        assert_eq!(transcript.student.as_deref(), Some("Jane Doe"));
        assert_eq!(transcript.major.as_deref(), Some("Computer Science"));
        assert_eq!(transcript.admission_year, Some(2021));

        let semesters = transcript.semesters();
        assert_eq!(semesters.len(), 2);
        assert_eq!(semesters[0].term.label, "Fall 2021");
        assert_eq!(semesters[0].courses[0].code.as_str(), "MATH 101");
        assert_eq!(semesters[0].courses[1].grade, Grade::TransferCredit);
        assert_eq!(semesters[0].courses[1].credits, Credits::from_hundredths(350));
        assert_eq!(
            semesters[1].courses[0].title,
            "Fundamentals of Computer Science, I"
        );
    }

    #[test]
    fn test_header_only_input() {
        let transcript = parse_transcript_str("Term,Course Code,Title,Grade,Credits\n").unwrap();
        assert_eq!(transcript.course_count(), 0);
        assert!(transcript.major.is_none());
    }

    #[test]
    fn test_missing_header_is_malformed() {
        let err = parse_transcript_str("Student,Jane\n").unwrap_err();
        assert!(matches!(err, InputError::Malformed { .. }));
    }

    #[test]
    fn test_missing_column_is_reported() {
        let err = parse_transcript_str("Term,Course Code,Title,Credits\n").unwrap_err();
        assert!(matches!(
            err,
            InputError::MissingField { line: 1, field: "Grade" }
        ));
    }

    #[test]
    fn test_unparseable_grade_names_course() {
        let input = "Term,Course Code,Title,Grade,Credits\nFall 2021,MATH 101,Calc,Q,4\n";
        let err = parse_transcript_str(input).unwrap_err();
        assert!(matches!(err, InputError::UnparseableGrade { ref value, .. } if value == "Q"));
        assert!(err.to_string().contains("MATH 101"));
    }

    #[test]
    fn test_unparseable_credits() {
        let input = "Term,Course Code,Title,Grade,Credits\nFall 2021,MATH 101,Calc,A,four\n";
        assert!(matches!(
            parse_transcript_str(input),
            Err(InputError::UnparseableCredits { .. })
        ));
    }

    #[test]
    fn test_missing_value_reports_line() {
        let input = "Term,Course Code,Title,Grade,Credits\nFall 2021,,Calc,A,4\n";
        assert!(matches!(
            parse_transcript_str(input),
            Err(InputError::MissingField { line: 2, field: "Course Code" })
        ));
    }

    #[test]
    fn test_bad_admission_year() {
        let input = "Admission Year,twenty\nTerm,Course Code,Title,Grade,Credits\n";
        assert!(matches!(
            parse_transcript_str(input),
            Err(InputError::Malformed { line: 1, .. })
        ));
    }

    #[test]
    fn test_split_csv_line() {
        assert_eq!(
            split_csv_line(r#"a, "b, c" ,"say ""hi""","#).unwrap(),
            vec!["a", "b, c", "say \"hi\"", ""]
        );
        assert!(split_csv_line("\"open").is_err());
    }
}
