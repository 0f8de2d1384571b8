//! Fixed-point credit amounts
//!
//! Credits are stored as whole hundredths so that credit accounting
//! (`applied + remaining == need`) is exact.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;
use thiserror::Error;

/// Hundredths per credit
const SCALE: u32 = 100;

/// Errors produced when a credit value cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCreditsError {
    /// Empty input
    #[error("empty credit value")]
    Empty,
    /// Not a decimal number
    #[error("'{0}' is not a decimal number")]
    Invalid(String),
    /// Negative amount
    #[error("'{0}' is negative")]
    Negative(String),
    /// More than two decimal places
    #[error("'{0}' has more than two decimal places")]
    TooPrecise(String),
    /// Too large to represent
    #[error("'{0}' is too large")]
    Overflow(String),
}

/// A non-negative credit amount with two decimal places of precision
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Credits(u32);

impl Credits {
    /// Zero credits
    pub const ZERO: Self = Self(0);

    /// Create from a whole number of credits
    #[must_use]
    pub const fn whole(credits: u32) -> Self {
        Self(credits.saturating_mul(SCALE))
    }

    /// Create from hundredths of a credit (`150` = 1.5 credits)
    #[must_use]
    pub const fn from_hundredths(hundredths: u32) -> Self {
        Self(hundredths)
    }

    /// Raw value in hundredths
    #[must_use]
    pub const fn hundredths(self) -> u32 {
        self.0
    }

    /// Whether the amount is zero
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Subtract, flooring at zero
    #[must_use]
    pub const fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Convert from a float holding at most two decimal places
    ///
    /// Returns `None` for negative, non-finite or out-of-range values, and
    /// for values such as `1.333` that do not land on a hundredth.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        let exact = value * f64::from(SCALE);
        let scaled = exact.round();
        if (exact - scaled).abs() > 1e-6 || scaled > f64::from(u32::MAX) {
            return None;
        }
        Some(Self(scaled as u32))
    }

    /// Value as a float (for JSON output)
    #[must_use]
    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / f64::from(SCALE)
    }
}

impl FromStr for Credits {
    type Err = ParseCreditsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseCreditsError::Empty);
        }
        if trimmed.starts_with('-') {
            return Err(ParseCreditsError::Negative(trimmed.to_string()));
        }

        let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
        let digits_only = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if whole.is_empty() || !digits_only(whole) || !digits_only(fraction) {
            return Err(ParseCreditsError::Invalid(trimmed.to_string()));
        }
        if trimmed.ends_with('.') {
            return Err(ParseCreditsError::Invalid(trimmed.to_string()));
        }

        // Trailing zeros past the second place carry no precision
        let fraction = fraction.trim_end_matches('0');
        if fraction.len() > 2 {
            return Err(ParseCreditsError::TooPrecise(trimmed.to_string()));
        }

        let overflow = || ParseCreditsError::Overflow(trimmed.to_string());
        let whole: u32 = whole.parse().map_err(|_| overflow())?;
        let fraction: u32 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<u32>().map_err(|_| overflow())? * 10,
            _ => fraction.parse().map_err(|_| overflow())?,
        };

        whole
            .checked_mul(SCALE)
            .and_then(|w| w.checked_add(fraction))
            .map(Self)
            .ok_or_else(overflow)
    }
}

impl fmt::Display for Credits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / SCALE;
        let fraction = self.0 % SCALE;
        if fraction % 10 == 0 {
            write!(f, "{whole}.{}", fraction / 10)
        } else {
            write!(f, "{whole}.{fraction:02}")
        }
    }
}

impl Add for Credits {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Credits {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for Credits {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Credits {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Credits {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

struct CreditsVisitor;

impl Visitor<'_> for CreditsVisitor {
    type Value = Credits;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative credit amount")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Credits, E> {
        u32::try_from(v)
            .ok()
            .and_then(|v| v.checked_mul(SCALE))
            .map(Credits)
            .ok_or_else(|| E::custom(format!("credit value {v} is too large")))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Credits, E> {
        let v = u64::try_from(v).map_err(|_| E::custom(format!("credit value {v} is negative")))?;
        self.visit_u64(v)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Credits, E> {
        Credits::from_f64(v).ok_or_else(|| E::custom(format!("invalid credit value {v}")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Credits, E> {
        v.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Credits {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CreditsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal_forms() {
        assert_eq!("4".parse::<Credits>(), Ok(Credits::whole(4)));
        assert_eq!("4.0".parse::<Credits>(), Ok(Credits::whole(4)));
        assert_eq!("1.5".parse::<Credits>(), Ok(Credits::from_hundredths(150)));
        assert_eq!("0.25".parse::<Credits>(), Ok(Credits::from_hundredths(25)));
        assert_eq!(" 3.500 ".parse::<Credits>(), Ok(Credits::from_hundredths(350)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!("".parse::<Credits>(), Err(ParseCreditsError::Empty));
        assert!(matches!("-1".parse::<Credits>(), Err(ParseCreditsError::Negative(_))));
        assert!(matches!("abc".parse::<Credits>(), Err(ParseCreditsError::Invalid(_))));
        assert!(matches!(".5".parse::<Credits>(), Err(ParseCreditsError::Invalid(_))));
        assert!(matches!("4.".parse::<Credits>(), Err(ParseCreditsError::Invalid(_))));
        assert!(matches!(
            "1.125".parse::<Credits>(),
            Err(ParseCreditsError::TooPrecise(_))
        ));
        assert!(matches!(
            "99999999999".parse::<Credits>(),
            Err(ParseCreditsError::Overflow(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(Credits::whole(4).to_string(), "4.0");
        assert_eq!(Credits::from_hundredths(150).to_string(), "1.5");
        assert_eq!(Credits::from_hundredths(25).to_string(), "0.25");
        assert_eq!(Credits::ZERO.to_string(), "0.0");
    }

    #[test]
    fn test_arithmetic() {
        let total: Credits = [Credits::whole(3), Credits::from_hundredths(150)]
            .iter()
            .sum();
        assert_eq!(total, Credits::from_hundredths(450));
        assert_eq!(
            Credits::whole(2).saturating_sub(Credits::whole(5)),
            Credits::ZERO
        );
    }

    #[test]
    fn test_from_f64() {
        assert_eq!(Credits::from_f64(3.0), Some(Credits::whole(3)));
        assert_eq!(Credits::from_f64(0.1), Some(Credits::from_hundredths(10)));
        assert_eq!(Credits::from_f64(4.5), Some(Credits::from_hundredths(450)));
        assert_eq!(Credits::from_f64(1.333), None);
        assert_eq!(Credits::from_f64(-1.0), None);
        assert_eq!(Credits::from_f64(f64::NAN), None);
    }
}
