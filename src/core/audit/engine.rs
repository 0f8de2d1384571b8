//! Requirement matching engine
//!
//! Requirements are processed in catalog order. Each one gathers candidate
//! courses, filters them by grade, and then selects:
//!
//! 1. the best-ranked single course that covers the whole need, if any;
//! 2. otherwise every eligible course in rank order until the need is met.
//!
//! Rank order is: exact code match, then accepted/pattern match, then
//! cross-listed alias; then most recent term; then course code; then
//! transcript position.
//!
//! A credit ledger tracks what each course has left to give. A course is
//! consumed by its first requirement unless pooling is enabled and that
//! requirement has a `pool_id`, in which case the leftover credit stays
//! available to later requirements in the same pool only.

use super::result::{Advisory, AdvisoryKind, MatchResult, MatchStatus, UnusedCourse, UsedCourse};
use crate::core::catalog::{validate_table, RequirementTable, YearFallback};
use crate::core::error::ConfigurationError;
use crate::core::models::{
    CourseCode, CourseId, Credits, CrossListings, Grade, Ineligibility, Requirement,
    RequirementMatch, Transcript, TranscriptEntry,
};
use std::cmp::Reverse;

/// Switches that change how an audit treats borderline coursework
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuditOptions {
    /// Count in-progress courses (with an advisory)
    pub allow_in_progress: bool,
    /// Let requirements sharing a `pool_id` share leftover credit
    pub enable_pooling: bool,
    /// Catalog year lookup policy
    pub year_fallback: YearFallback,
}

#[derive(Debug, Clone)]
struct LedgerEntry {
    remaining: Credits,
    pool: Option<String>,
    claimed: bool,
}

enum Availability {
    Fresh(Credits),
    Pooled(Credits, String),
    Consumed,
}

/// Credit left on each transcript course, indexed by [`CourseId`]
#[derive(Debug, Clone)]
struct CreditLedger {
    entries: Vec<LedgerEntry>,
    pooling: bool,
}

impl CreditLedger {
    fn new(transcript: &Transcript, pooling: bool) -> Self {
        let entries = transcript
            .courses()
            .map(|entry| LedgerEntry {
                remaining: entry.course.credits,
                pool: None,
                claimed: false,
            })
            .collect();
        Self { entries, pooling }
    }

    fn available(&self, id: CourseId, pool_id: Option<&str>) -> Availability {
        let Some(entry) = self.entries.get(id.0) else {
            return Availability::Consumed;
        };
        if !entry.claimed {
            return Availability::Fresh(entry.remaining);
        }
        match (self.pooling, pool_id, entry.pool.as_deref()) {
            (true, Some(wanted), Some(owner)) if wanted == owner && !entry.remaining.is_zero() => {
                Availability::Pooled(entry.remaining, owner.to_string())
            }
            _ => Availability::Consumed,
        }
    }

    fn draw(&mut self, id: CourseId, amount: Credits, pool_id: Option<&str>) {
        let pooling = self.pooling;
        let Some(entry) = self.entries.get_mut(id.0) else {
            return;
        };
        if !entry.claimed {
            entry.claimed = true;
            entry.pool = pool_id.filter(|_| pooling).map(str::to_string);
        }
        entry.remaining = if entry.pool.is_some() {
            entry.remaining.saturating_sub(amount)
        } else {
            Credits::ZERO
        };
    }

    fn is_claimed(&self, id: CourseId) -> bool {
        self.entries.get(id.0).is_some_and(|e| e.claimed)
    }
}

struct Candidate<'a> {
    entry: TranscriptEntry<'a>,
    how: RequirementMatch,
    available: Credits,
    shared_pool: Option<String>,
    in_progress: bool,
}

impl Candidate<'_> {
    fn rank_key(&self) -> (u8, Reverse<usize>, &CourseCode, CourseId) {
        (
            self.how.priority(),
            Reverse(self.entry.semester_index),
            &self.entry.course.code,
            self.entry.id,
        )
    }
}

/// Why a matching course was passed over
fn describe_rejection(code: &CourseCode, grade: Grade, min_grade: Grade, why: Ineligibility) -> String {
    match why {
        Ineligibility::BelowMinimum => format!("{code} grade {grade} below minimum {min_grade}"),
        Ineligibility::NoCredit => format!("{code} grade {grade} earns no credit"),
        Ineligibility::InProgress => format!("{code} in progress"),
    }
}

/// Everything a run produces
#[derive(Debug, Clone)]
pub struct EngineOutcome {
    /// One result per requirement, in catalog order
    pub results: Vec<MatchResult>,
    /// Transcript courses that no requirement consumed
    pub unused_courses: Vec<UnusedCourse>,
}

/// Matches one transcript against one requirement table
#[derive(Debug, Clone, Copy)]
pub struct MatchingEngine<'a> {
    transcript: &'a Transcript,
    table: &'a RequirementTable,
    cross_listings: &'a CrossListings,
    options: AuditOptions,
}

impl<'a> MatchingEngine<'a> {
    /// Create an engine, validating the table first
    ///
    /// # Errors
    /// Returns `ConfigurationError` if the table has an unknown minimum grade,
    /// a non-positive credit amount, or a duplicate non-alternative code
    pub fn new(
        transcript: &'a Transcript,
        table: &'a RequirementTable,
        cross_listings: &'a CrossListings,
        options: AuditOptions,
    ) -> Result<Self, ConfigurationError> {
        validate_table(table)?;
        Ok(Self {
            transcript,
            table,
            cross_listings,
            options,
        })
    }

    /// Match every requirement in catalog order
    #[must_use]
    pub fn run(&self) -> EngineOutcome {
        let mut ledger = CreditLedger::new(self.transcript, self.options.enable_pooling);

        let results = self
            .table
            .requirements
            .iter()
            .map(|req| self.match_requirement(req, &mut ledger))
            .collect();

        let unused_courses = self
            .transcript
            .courses()
            .filter(|entry| !ledger.is_claimed(entry.id))
            .map(|entry| UnusedCourse {
                id: entry.id,
                course: entry.course.clone(),
            })
            .collect();

        EngineOutcome {
            results,
            unused_courses,
        }
    }

    /// How (if at all) a transcript code relates to a requirement
    fn match_kind(&self, req: &Requirement, code: &CourseCode) -> Option<RequirementMatch> {
        req.match_code(code).or_else(|| {
            self.cross_listings
                .equivalents(code)
                .find(|alias| req.match_code(alias).is_some())
                .map(|alias| RequirementMatch::Alias(alias.clone()))
        })
    }

    fn collect_candidates(
        &self,
        req: &Requirement,
        ledger: &CreditLedger,
    ) -> (Vec<Candidate<'a>>, Vec<String>) {
        let mut candidates = Vec::new();
        let mut reasons: Vec<String> = Vec::new();
        let mut reject = |reason: String| {
            if !reasons.contains(&reason) {
                reasons.push(reason);
            }
        };

        for entry in self.transcript.courses() {
            let code = &entry.course.code;
            let Some(how) = self.match_kind(req, code) else {
                continue;
            };

            let grade = entry.course.grade;
            let in_progress = match grade.check_against(req.min_grade) {
                Ok(()) => false,
                Err(Ineligibility::InProgress) if self.options.allow_in_progress => true,
                Err(why) => {
                    reject(describe_rejection(code, grade, req.min_grade, why));
                    continue;
                }
            };

            let (available, shared_pool) = match ledger.available(entry.id, req.pool_id.as_deref()) {
                Availability::Fresh(credits) => (credits, None),
                Availability::Pooled(credits, pool) => (credits, Some(pool)),
                Availability::Consumed => {
                    reject(format!("{code} already applied"));
                    continue;
                }
            };
            if available.is_zero() {
                reject(format!("{code} carries no credit"));
                continue;
            }

            candidates.push(Candidate {
                entry,
                how,
                available,
                shared_pool,
                in_progress,
            });
        }

        candidates.sort_by(|a, b| a.rank_key().cmp(&b.rank_key()));
        (candidates, reasons)
    }

    fn match_requirement(&self, req: &Requirement, ledger: &mut CreditLedger) -> MatchResult {
        let need = req.credits_need;
        let (candidates, reasons) = self.collect_candidates(req, ledger);

        let chosen: Vec<&Candidate<'_>> = match candidates.iter().find(|c| c.available >= need) {
            Some(single) => vec![single],
            None => candidates.iter().collect(),
        };

        let mut applied = Credits::ZERO;
        let mut used_courses = Vec::new();
        let mut warnings = Vec::new();
        let mut notes = Vec::new();

        for candidate in chosen {
            let outstanding = need.saturating_sub(applied);
            if outstanding.is_zero() {
                break;
            }
            let amount = candidate.available.min(outstanding);
            ledger.draw(candidate.entry.id, amount, req.pool_id.as_deref());
            applied += amount;

            used_courses.push(UsedCourse {
                id: candidate.entry.id,
                code: candidate.entry.course.code.clone(),
                term: candidate.entry.course.term.clone(),
                credits_applied: amount,
            });
            annotate(req, candidate, &mut notes, &mut warnings);
        }

        let credits_remaining = need.saturating_sub(applied);
        let status = if credits_remaining.is_zero() {
            MatchStatus::Satisfied
        } else {
            MatchStatus::Pending
        };

        let note = match status {
            MatchStatus::Satisfied => notes.join("; "),
            MatchStatus::Pending if applied.is_zero() => {
                if reasons.is_empty() {
                    "no matching coursework found".to_string()
                } else {
                    format!("no matching coursework found ({})", reasons.join(", "))
                }
            }
            MatchStatus::Pending => {
                let mut parts =
                    vec![format!("partial credit: {applied} of {need} applied, {credits_remaining} remaining")];
                parts.extend(notes);
                parts.join("; ")
            }
        };

        crate::debug!(
            "{} [{}]: {} with {} of {} credits from {} course(s)",
            req.course_code,
            req.category,
            status,
            applied,
            need,
            used_courses.len()
        );

        MatchResult {
            requirement: req.clone(),
            status,
            used_courses,
            credits_applied: applied,
            credits_remaining,
            note,
            warnings,
        }
    }
}

/// Record notes and advisories for a consumed course
fn annotate(req: &Requirement, candidate: &Candidate<'_>, notes: &mut Vec<String>, warnings: &mut Vec<Advisory>) {
    let code = &candidate.entry.course.code;
    let mut advise = |kind: AdvisoryKind| {
        warnings.push(Advisory {
            requirement: req.course_code.clone(),
            course: code.clone(),
            kind,
        });
    };

    match &candidate.how {
        RequirementMatch::Exact => {}
        RequirementMatch::Accepted => {
            if !req.course_code.is_pattern() {
                if req.comments.is_empty() {
                    notes.push(format!("substituted {code}"));
                } else {
                    notes.push(format!("substituted {code} ({})", req.comments));
                }
            }
        }
        RequirementMatch::Alias(listed_as) => {
            notes.push(format!("{code} cross-listed as {listed_as}"));
            advise(AdvisoryKind::CrossListedAlias {
                listed_as: listed_as.clone(),
            });
        }
    }

    if candidate.entry.course.grade.is_transfer() {
        if req.allow_transfer {
            notes.push(format!("{code} transfer credit"));
        } else {
            notes.push(format!("{code} transfer credit (discouraged for this requirement)"));
            advise(AdvisoryKind::TransferCreditDiscouraged);
        }
    }

    if candidate.in_progress {
        notes.push(format!("{code} in progress"));
        advise(AdvisoryKind::InProgressCounted);
    }

    if let Some(pool) = &candidate.shared_pool {
        notes.push(format!("{code} leftover credit from pool '{pool}'"));
        advise(AdvisoryKind::SharedPoolCredit { pool: pool.clone() });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{CourseRecord, Semester};

    fn course(code: &str, grade: Grade, credits: u32, term: &str) -> CourseRecord {
        CourseRecord::new(code, "", grade, Credits::whole(credits), term)
    }

    fn transcript(semesters: Vec<(&str, Vec<CourseRecord>)>) -> Transcript {
        Transcript::new(
            semesters
                .into_iter()
                .map(|(term, courses)| Semester::new(term, courses))
                .collect(),
        )
    }

    fn run(transcript: &Transcript, rows: Vec<Requirement>, options: AuditOptions) -> EngineOutcome {
        run_with(transcript, rows, &CrossListings::new(), options)
    }

    fn run_with(
        transcript: &Transcript,
        rows: Vec<Requirement>,
        cross: &CrossListings,
        options: AuditOptions,
    ) -> EngineOutcome {
        let table = RequirementTable::new("Test", 2024, rows);
        MatchingEngine::new(transcript, &table, cross, options)
            .unwrap()
            .run()
    }

    fn req(code: &str, credits: u32, min: Grade) -> Requirement {
        Requirement::new(code, code, Credits::whole(credits), min)
    }

    #[test]
    fn test_single_cover_preferred_over_accumulation() {
        // Two 2-credit electives rank ahead of the 4-credit one, but the
        // 4-credit course covers the slot alone.
        let t = transcript(vec![
            ("Fall 2021", vec![course("CS 3100", Grade::A, 4, "Fall 2021")]),
            (
                "Fall 2022",
                vec![
                    course("CS 3200", Grade::A, 2, "Fall 2022"),
                    course("CS 3300", Grade::A, 2, "Fall 2022"),
                ],
            ),
        ]);
        let out = run(&t, vec![req("CS 3XXX", 4, Grade::C)], AuditOptions::default());
        let result = &out.results[0];
        assert_eq!(result.status, MatchStatus::Satisfied);
        assert_eq!(result.used_codes(";"), "CS 3100");
        assert_eq!(out.unused_courses.len(), 2);
    }

    #[test]
    fn test_accumulation_order_most_recent_first() {
        let t = transcript(vec![
            ("Fall 2021", vec![course("CS 3300", Grade::A, 2, "Fall 2021")]),
            (
                "Spring 2022",
                vec![
                    course("CS 3200", Grade::B, 2, "Spring 2022"),
                    course("CS 3100", Grade::B, 2, "Spring 2022"),
                ],
            ),
        ]);
        let out = run(&t, vec![req("CS 3XXX", 3, Grade::C)], AuditOptions::default());
        let result = &out.results[0];
        assert_eq!(result.status, MatchStatus::Satisfied);
        assert_eq!(result.used_codes(";"), "CS 3100;CS 3200");
        assert_eq!(result.used_courses[1].credits_applied, Credits::whole(1));
        assert_eq!(result.credits_applied, Credits::whole(3));
    }

    #[test]
    fn test_exact_match_ranks_before_accepted() {
        let t = transcript(vec![(
            "Fall 2021",
            vec![
                course("CS 2501", Grade::A, 4, "Fall 2021"),
                course("CS 2500", Grade::C, 4, "Fall 2021"),
            ],
        )]);
        let row = req("CS 2500", 4, Grade::C).accepting("CS 2501");
        let out = run(&t, vec![row], AuditOptions::default());
        assert_eq!(out.results[0].used_codes(";"), "CS 2500");
        assert_eq!(out.results[0].note, "");
    }

    #[test]
    fn test_partial_credit_note() {
        let t = transcript(vec![("Fall 2021", vec![course("ART 150", Grade::A, 3, "Fall 2021")])]);
        let row = req("ART *", 4, Grade::C);
        let out = run(&t, vec![row], AuditOptions::default());
        let result = &out.results[0];
        assert_eq!(result.status, MatchStatus::Pending);
        assert_eq!(result.credits_applied, Credits::whole(3));
        assert_eq!(result.credits_remaining, Credits::whole(1));
        assert_eq!(result.note, "partial credit: 3.0 of 4.0 applied, 1.0 remaining");
    }

    #[test]
    fn test_no_match_note_lists_reasons() {
        let t = transcript(vec![(
            "Fall 2021",
            vec![
                course("MATH 101", Grade::D, 4, "Fall 2021"),
                course("MATH 101", Grade::Withdrawn, 4, "Fall 2021"),
            ],
        )]);
        let out = run(&t, vec![req("MATH 101", 4, Grade::C)], AuditOptions::default());
        assert_eq!(
            out.results[0].note,
            "no matching coursework found (MATH 101 grade D below minimum C, MATH 101 grade W earns no credit)"
        );
    }

    #[test]
    fn test_in_progress_requires_option() {
        let t = transcript(vec![("Spring 2024", vec![course("CS 4500", Grade::InProgress, 4, "Spring 2024")])]);

        let strict = run(&t, vec![req("CS 4500", 4, Grade::C)], AuditOptions::default());
        assert_eq!(strict.results[0].status, MatchStatus::Pending);
        assert!(strict.results[0].note.contains("CS 4500 in progress"));

        let lenient = AuditOptions {
            allow_in_progress: true,
            ..AuditOptions::default()
        };
        let out = run(&t, vec![req("CS 4500", 4, Grade::C)], lenient);
        assert_eq!(out.results[0].status, MatchStatus::Satisfied);
        assert_eq!(out.results[0].warnings[0].kind, AdvisoryKind::InProgressCounted);
    }

    #[test]
    fn test_cross_listed_alias_advisory() {
        let t = transcript(vec![("Fall 2022", vec![course("NEUR 210", Grade::B, 3, "Fall 2022")])]);
        let mut cross = CrossListings::new();
        cross.add_group(["PSYC 210", "NEUR 210"]);

        let out = run_with(&t, vec![req("PSYC 210", 3, Grade::C)], &cross, AuditOptions::default());
        let result = &out.results[0];
        assert!(result.is_satisfied());
        assert_eq!(result.note, "NEUR 210 cross-listed as PSYC 210");
        assert_eq!(
            result.warnings[0].kind,
            AdvisoryKind::CrossListedAlias {
                listed_as: CourseCode::new("PSYC 210")
            }
        );
    }

    #[test]
    fn test_pooling_shares_leftover_within_pool_only() {
        let t = transcript(vec![("Fall 2022", vec![course("ENGL 300", Grade::A, 6, "Fall 2022")])]);
        let rows = vec![
            req("ENGL 3*", 3, Grade::C).with_category("elective").in_pool("writing"),
            req("ENGL 3*", 3, Grade::C).with_category("elective").in_pool("writing"),
            req("ENGL 3*", 3, Grade::C).with_category("elective").in_pool("other"),
        ];

        let pooled = AuditOptions {
            enable_pooling: true,
            ..AuditOptions::default()
        };
        let out = run(&t, rows.clone(), pooled);
        assert!(out.results[0].is_satisfied());
        assert!(out.results[1].is_satisfied());
        assert_eq!(
            out.results[1].warnings[0].kind,
            AdvisoryKind::SharedPoolCredit {
                pool: "writing".to_string()
            }
        );
        assert_eq!(out.results[2].status, MatchStatus::Pending);
        assert!(out.results[2].note.contains("ENGL 300 already applied"));

        let out = run(&t, rows, AuditOptions::default());
        assert!(out.results[0].is_satisfied());
        assert_eq!(out.results[1].status, MatchStatus::Pending);
    }

    #[test]
    fn test_invalid_table_rejected() {
        let t = transcript(vec![]);
        let table = RequirementTable::new("Test", 2024, vec![req("MATH 101", 0, Grade::C)]);
        assert!(MatchingEngine::new(&t, &table, &CrossListings::new(), AuditOptions::default()).is_err());
    }
}
