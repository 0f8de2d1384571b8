//! Grade model and the grade-rank table

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Rank that `P`/`S` grades are treated as when compared against a minimum.
///
/// A pass satisfies any minimum at or below `C`.
pub const PASS_THRESHOLD: Grade = Grade::C;

/// A transcript grade symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grade {
    /// A+
    APlus,
    /// A
    A,
    /// A-
    AMinus,
    /// B+
    BPlus,
    /// B
    B,
    /// B-
    BMinus,
    /// C+
    CPlus,
    /// C
    C,
    /// C-
    CMinus,
    /// D+
    DPlus,
    /// D
    D,
    /// D-
    DMinus,
    /// F
    F,
    /// Pass (`P`)
    Pass,
    /// Satisfactory (`S`)
    Satisfactory,
    /// No pass (`NP`)
    NoPass,
    /// Unsatisfactory (`U`)
    Unsatisfactory,
    /// Transfer credit (`TC`)
    TransferCredit,
    /// Course still in progress (`IP`)
    InProgress,
    /// Withdrawn (`W`)
    Withdrawn,
    /// Incomplete (`I`)
    Incomplete,
}

/// Why a grade cannot be used against a requirement's minimum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ineligibility {
    /// The grade ranks strictly below the minimum
    BelowMinimum,
    /// The grade earns no credit (F, NP, U, W, I)
    NoCredit,
    /// The course has not finished yet
    InProgress,
}

impl Grade {
    /// Every grade, highest letter first
    pub const ALL: [Self; 21] = [
        Self::APlus,
        Self::A,
        Self::AMinus,
        Self::BPlus,
        Self::B,
        Self::BMinus,
        Self::CPlus,
        Self::C,
        Self::CMinus,
        Self::DPlus,
        Self::D,
        Self::DMinus,
        Self::F,
        Self::Pass,
        Self::Satisfactory,
        Self::NoPass,
        Self::Unsatisfactory,
        Self::TransferCredit,
        Self::InProgress,
        Self::Withdrawn,
        Self::Incomplete,
    ];

    /// Canonical transcript symbol for the grade
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::AMinus => "A-",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::BMinus => "B-",
            Self::CPlus => "C+",
            Self::C => "C",
            Self::CMinus => "C-",
            Self::DPlus => "D+",
            Self::D => "D",
            Self::DMinus => "D-",
            Self::F => "F",
            Self::Pass => "P",
            Self::Satisfactory => "S",
            Self::NoPass => "NP",
            Self::Unsatisfactory => "U",
            Self::TransferCredit => "TC",
            Self::InProgress => "IP",
            Self::Withdrawn => "W",
            Self::Incomplete => "I",
        }
    }

    /// Position of a letter grade in the total order (`F` = 0, `A+` = 12)
    #[must_use]
    pub const fn letter_rank(self) -> Option<u8> {
        match self {
            Self::APlus => Some(12),
            Self::A => Some(11),
            Self::AMinus => Some(10),
            Self::BPlus => Some(9),
            Self::B => Some(8),
            Self::BMinus => Some(7),
            Self::CPlus => Some(6),
            Self::C => Some(5),
            Self::CMinus => Some(4),
            Self::DPlus => Some(3),
            Self::D => Some(2),
            Self::DMinus => Some(1),
            Self::F => Some(0),
            _ => None,
        }
    }

    /// Rank used when this grade is a requirement minimum.
    ///
    /// Letters rank by [`letter_rank`](Self::letter_rank); `P`/`S` as a minimum
    /// means "pass", i.e. [`PASS_THRESHOLD`]. Every other symbol has no rank
    /// and is rejected as a minimum.
    #[must_use]
    pub const fn minimum_rank(self) -> Option<u8> {
        match self {
            Self::Pass | Self::Satisfactory => PASS_THRESHOLD.letter_rank(),
            _ => self.letter_rank(),
        }
    }

    /// Whether the grade may be used as a requirement's `min_grade`
    #[must_use]
    pub const fn is_valid_minimum(self) -> bool {
        self.minimum_rank().is_some()
    }

    /// Whether a course with this grade earns credit toward the degree
    #[must_use]
    pub const fn earns_credit(self) -> bool {
        !matches!(
            self,
            Self::F
                | Self::NoPass
                | Self::Unsatisfactory
                | Self::InProgress
                | Self::Withdrawn
                | Self::Incomplete
        )
    }

    /// Whether the grade marks transfer credit
    #[must_use]
    pub const fn is_transfer(self) -> bool {
        matches!(self, Self::TransferCredit)
    }

    /// Whether the grade marks a course still in progress
    #[must_use]
    pub const fn is_in_progress(self) -> bool {
        matches!(self, Self::InProgress)
    }

    /// Check this grade against a requirement minimum.
    ///
    /// # Errors
    /// Returns the reason the grade cannot count toward the minimum. An
    /// unranked `minimum` is treated as unsatisfiable (`BelowMinimum`); the
    /// catalog rejects such rows before an audit runs.
    pub fn check_against(self, minimum: Self) -> Result<(), Ineligibility> {
        let Some(required) = minimum.minimum_rank() else {
            return Err(Ineligibility::BelowMinimum);
        };

        match self {
            Self::InProgress => Err(Ineligibility::InProgress),
            Self::TransferCredit => Ok(()),
            Self::Pass | Self::Satisfactory => {
                match PASS_THRESHOLD.letter_rank() {
                    Some(pass) if pass >= required => Ok(()),
                    _ => Err(Ineligibility::BelowMinimum),
                }
            }
            _ if !self.earns_credit() => Err(Ineligibility::NoCredit),
            _ => match self.letter_rank() {
                Some(rank) if rank >= required => Ok(()),
                _ => Err(Ineligibility::BelowMinimum),
            },
        }
    }

    /// Convenience wrapper over [`check_against`](Self::check_against)
    #[must_use]
    pub fn satisfies(self, minimum: Self) -> bool {
        self.check_against(minimum).is_ok()
    }
}

impl FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned: String = s
            .trim()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_uppercase();

        let grade = match cleaned.as_str() {
            "A+" => Self::APlus,
            "A" => Self::A,
            "A-" => Self::AMinus,
            "B+" => Self::BPlus,
            "B" => Self::B,
            "B-" => Self::BMinus,
            "C+" => Self::CPlus,
            "C" => Self::C,
            "C-" => Self::CMinus,
            "D+" => Self::DPlus,
            "D" => Self::D,
            "D-" => Self::DMinus,
            "F" | "E" => Self::F,
            "P" | "PASS" | "CR" => Self::Pass,
            "S" => Self::Satisfactory,
            "NP" | "NC" => Self::NoPass,
            "U" => Self::Unsatisfactory,
            "TC" | "TR" | "T" | "TRANSFER" => Self::TransferCredit,
            "IP" | "INPROGRESS" => Self::InProgress,
            "W" => Self::Withdrawn,
            "I" | "INC" => Self::Incomplete,
            _ => return Err(format!("Unknown grade: '{}'", s.trim())),
        };
        Ok(grade)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl Serialize for Grade {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

impl<'de> Deserialize<'de> for Grade {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_symbols() {
        assert_eq!("A-".parse::<Grade>(), Ok(Grade::AMinus));
        assert_eq!(" b+ ".parse::<Grade>(), Ok(Grade::BPlus));
        assert_eq!("tc".parse::<Grade>(), Ok(Grade::TransferCredit));
        assert_eq!("IP".parse::<Grade>(), Ok(Grade::InProgress));
        assert_eq!("In Progress".parse::<Grade>(), Ok(Grade::InProgress));
        assert!("Z".parse::<Grade>().is_err());
        assert!("".parse::<Grade>().is_err());
    }

    #[test]
    fn test_letter_order_is_total() {
        let letters: Vec<Grade> = Grade::ALL
            .iter()
            .copied()
            .filter(|g| g.letter_rank().is_some())
            .collect();
        assert_eq!(letters.len(), 13);
        for pair in letters.windows(2) {
            assert!(pair[0].letter_rank() > pair[1].letter_rank());
        }
    }

    #[test]
    fn test_symbol_round_trip() {
        for grade in Grade::ALL {
            assert_eq!(grade.symbol().parse::<Grade>(), Ok(grade));
        }
    }

    #[test]
    fn test_letters_against_minimum() {
        assert!(Grade::B.satisfies(Grade::C));
        assert!(Grade::C.satisfies(Grade::C));
        assert_eq!(
            Grade::CMinus.check_against(Grade::C),
            Err(Ineligibility::BelowMinimum)
        );
        assert_eq!(
            Grade::D.check_against(Grade::C),
            Err(Ineligibility::BelowMinimum)
        );
        assert_eq!(Grade::F.check_against(Grade::DMinus), Err(Ineligibility::NoCredit));
    }

    #[test]
    fn test_pass_threshold() {
        assert!(Grade::Pass.satisfies(Grade::C));
        assert!(Grade::Satisfactory.satisfies(Grade::DMinus));
        assert!(!Grade::Pass.satisfies(Grade::CPlus));
        assert!(!Grade::Pass.satisfies(Grade::B));
        assert!(Grade::B.satisfies(Grade::Pass));
        assert!(!Grade::CMinus.satisfies(Grade::Pass));
    }

    #[test]
    fn test_transfer_and_in_progress() {
        assert!(Grade::TransferCredit.satisfies(Grade::A));
        assert_eq!(
            Grade::InProgress.check_against(Grade::DMinus),
            Err(Ineligibility::InProgress)
        );
        assert_eq!(
            Grade::Withdrawn.check_against(Grade::DMinus),
            Err(Ineligibility::NoCredit)
        );
    }

    #[test]
    fn test_valid_minimums() {
        assert!(Grade::C.is_valid_minimum());
        assert!(Grade::Pass.is_valid_minimum());
        assert!(!Grade::TransferCredit.is_valid_minimum());
        assert!(!Grade::InProgress.is_valid_minimum());
        assert!(!Grade::Withdrawn.is_valid_minimum());
    }

    #[test]
    fn test_earns_credit() {
        assert!(Grade::DMinus.earns_credit());
        assert!(Grade::TransferCredit.earns_credit());
        assert!(Grade::Pass.earns_credit());
        assert!(!Grade::F.earns_credit());
        assert!(!Grade::InProgress.earns_credit());
        assert!(!Grade::Incomplete.earns_credit());
    }
}
