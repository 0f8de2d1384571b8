//! Cross-listed course equivalences

use super::CourseCode;
use std::collections::{BTreeSet, HashMap};

/// Sets of course codes that name the same course (e.g. `PSYC 210` and
/// `NEUR 210`). Overlapping sets are merged, so equivalence is transitive.
#[derive(Debug, Clone, Default)]
pub struct CrossListings {
    groups: Vec<BTreeSet<CourseCode>>,
    index: HashMap<CourseCode, usize>,
}

impl CrossListings {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a set of equivalent codes
    pub fn add_group<I, C>(&mut self, codes: I)
    where
        I: IntoIterator<Item = C>,
        C: Into<CourseCode>,
    {
        let mut merged: BTreeSet<CourseCode> = codes
            .into_iter()
            .map(Into::into)
            .filter(|c| !c.is_empty())
            .collect();
        if merged.len() < 2 {
            return;
        }

        // Absorb any existing groups that share a code
        let mut absorbed: Vec<usize> = merged
            .iter()
            .filter_map(|code| self.index.get(code).copied())
            .collect();
        absorbed.sort_unstable();
        absorbed.dedup();
        for idx in absorbed.iter().rev() {
            merged.extend(self.groups.remove(*idx));
        }

        self.groups.push(merged);
        self.rebuild_index();
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (idx, group) in self.groups.iter().enumerate() {
            for code in group {
                self.index.insert(code.clone(), idx);
            }
        }
    }

    /// Codes equivalent to `code`, excluding `code` itself, in sorted order
    pub fn equivalents<'a>(&'a self, code: &'a CourseCode) -> impl Iterator<Item = &'a CourseCode> {
        self.index
            .get(code)
            .map(|idx| &self.groups[*idx])
            .into_iter()
            .flatten()
            .filter(move |other| *other != code)
    }

    /// Whether two codes are cross-listed with each other
    #[must_use]
    pub fn are_equivalent(&self, a: &CourseCode, b: &CourseCode) -> bool {
        a == b
            || matches!((self.index.get(a), self.index.get(b)), (Some(x), Some(y)) if x == y)
    }

    /// Number of equivalence groups
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no cross-listings are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
