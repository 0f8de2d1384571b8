//! Data models for `DegreeAudit`

pub mod course;
pub mod course_code;
pub mod credits;
pub mod cross_listing;
pub mod grade;
pub mod requirement;
pub mod term;
pub mod transcript;

pub use course::{CourseRecord, Semester};
pub use course_code::CourseCode;
pub use credits::{Credits, ParseCreditsError};
pub use cross_listing::CrossListings;
pub use grade::{Grade, Ineligibility, PASS_THRESHOLD};
pub use requirement::{Requirement, RequirementMatch};
pub use term::{Season, Term};
pub use transcript::{CodeMatch, CourseId, Transcript, TranscriptEntry};
