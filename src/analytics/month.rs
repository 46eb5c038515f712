//! Month labels and the loose month resolver.
//!
//! Trained models are indexed by dense month positions, not labels: the
//! sorted distinct `YYYY-MM` labels of the demand dataset map to
//! `0..N-1`. Callers may ask for a month as an integer (`3`), a digit
//! string (`"3"`), or a label (`"2025-03"`); `resolve` maps any of
//! those onto a position, preferring the most recent matching label
//! when the requested year is not covered by the data.

use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// A loosely-typed month argument as it arrives in a request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MonthInput {
    Number(i64),
    Text(String),
}

fn month_label_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}$").expect("static pattern"))
}

/// Bijection between `YYYY-MM` labels and dense positions `0..N-1`.
///
/// Rebuilt wholesale on every training pass; never mutated in place.
/// Lexicographic order of the fixed-width labels equals chronological
/// order, so `labels` is both sorted and time-ordered.
#[derive(Debug, Clone, Default)]
pub struct MonthIndex {
    labels: Vec<String>,
    positions: HashMap<String, usize>,
}

impl MonthIndex {
    /// Build from the distinct labels of a dataset. Duplicates collapse,
    /// order is sorted-lexicographic.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let distinct: BTreeSet<String> = labels.into_iter().map(Into::into).collect();
        let labels: Vec<String> = distinct.into_iter().collect();
        let positions = labels
            .iter()
            .enumerate()
            .map(|(i, m)| (m.clone(), i))
            .collect();
        Self { labels, positions }
    }

    /// Fallback index used when no demand data exists yet, so the
    /// service stays queryable: the twelve months of 2025.
    pub fn synthetic() -> Self {
        Self::from_labels((1..=12).map(|m| format!("2025-{m:02}")))
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Exact position of a label, if present.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.positions.get(label).copied()
    }

    /// The lexicographically greatest (most recent) label.
    pub fn latest(&self) -> Option<&str> {
        self.labels.last().map(String::as_str)
    }

    /// Resolve a loosely-typed month input to a position.
    ///
    /// Returns `None` for absent input, out-of-range months, and inputs
    /// that match no label even after the fallbacks below.
    pub fn resolve(&self, input: Option<&MonthInput>) -> Option<usize> {
        match input {
            None => None,
            Some(MonthInput::Number(m)) => self.resolve_numeric(*m),
            Some(MonthInput::Text(s)) => self.resolve_text(s),
        }
    }

    /// A bare month number refers to that calendar month within the
    /// latest year the index covers; if the historical window has
    /// already moved past it, the same month of the following year is
    /// tried (the next upcoming occurrence).
    fn resolve_numeric(&self, month: i64) -> Option<usize> {
        let latest = self.latest()?;
        let year: i64 = latest.get(..4)?.parse().ok()?;
        for y in [year, year + 1] {
            let candidate = format!("{y:04}-{month:02}");
            if let Some(pos) = self.position(&candidate) {
                return Some(pos);
            }
        }
        None
    }

    fn resolve_text(&self, raw: &str) -> Option<usize> {
        let s = raw.trim();
        if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
            return self.resolve_numeric(s.parse().ok()?);
        }
        if !month_label_re().is_match(s) {
            return None;
        }
        if let Some(pos) = self.position(s) {
            return Some(pos);
        }
        // The exact year is absent: fall back to the most recent label
        // sharing the same two-digit month suffix.
        let suffix = format!("-{}", &s[5..7]);
        self.labels
            .iter()
            .rev()
            .find(|label| label.ends_with(&suffix))
            .and_then(|label| self.position(label))
    }
}
