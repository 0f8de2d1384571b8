//! Academic term identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Season of an academic term, in calendar order within a year
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Season {
    /// Winter term
    Winter,
    /// Spring term
    Spring,
    /// Summer term
    Summer,
    /// Fall (autumn) term
    Fall,
}

impl Season {
    fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "winter" | "wi" | "wn" => Some(Self::Winter),
            "spring" | "sp" => Some(Self::Spring),
            "summer" | "su" | "sum" => Some(Self::Summer),
            "fall" | "autumn" | "fa" | "au" => Some(Self::Fall),
            _ => None,
        }
    }
}

/// A semester identifier such as `Fall 2021`.
///
/// The original label is kept verbatim; the year and season are extracted
/// when recognizable so terms can be ordered chronologically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Term {
    /// Label as it appeared on the transcript
    pub label: String,
    /// Four-digit year, if found
    pub year: Option<u16>,
    /// Season, if found
    pub season: Option<Season>,
}

impl Term {
    /// Parse a term label. Accepts `Fall 2021`, `2021 Fall`, `2021-FA`,
    /// `2021FA`, or a bare year.
    #[must_use]
    pub fn new(label: &str) -> Self {
        let label = label.trim().to_string();
        let mut year = None;
        let mut season = None;

        for token in label.split(|c: char| c.is_whitespace() || c == '-' || c == '_' || c == '/') {
            if token.is_empty() {
                continue;
            }
            let digits: String = token.chars().take_while(char::is_ascii_digit).collect();
            if digits.len() == 4 {
                year = year.or_else(|| digits.parse().ok());
                let rest = &token[digits.len()..];
                if !rest.is_empty() {
                    season = season.or_else(|| Season::parse(rest));
                }
            } else if digits.is_empty() {
                season = season.or_else(|| Season::parse(token));
            }
        }

        Self {
            label,
            year,
            season,
        }
    }

    /// Chronological sort key, `None` when the year is unknown.
    ///
    /// A term with a year but no season sorts before every season of that year.
    #[must_use]
    pub fn sort_key(&self) -> Option<(u16, u8)> {
        let season_rank = self.season.map_or(0, |s| s as u8 + 1);
        self.year.map(|y| (y, season_rank))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}
