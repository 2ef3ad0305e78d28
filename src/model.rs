use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One commit (or log entry) as read from VCS history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub day: NaiveDate,
    pub author: String,
    pub added: u64,
    pub removed: u64,
}

impl CommitRecord {
    pub fn new(day: NaiveDate, author: impl Into<String>, added: u64, removed: u64) -> Self {
        Self {
            day,
            author: author.into(),
            added,
            removed,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineDelta {
    #[serde(default)]
    pub added: u64,
    #[serde(default)]
    pub removed: u64,
}

impl LineDelta {
    pub fn lines_changed(&self) -> u64 {
        self.added.saturating_add(self.removed)
    }
}

pub type AuthorDeltas = BTreeMap<String, LineDelta>;

/// `day -> author -> {added, removed}`.
///
/// Serialises to the persisted JSON shape: `{"YYYY-MM-DD": {"email": {"added": n, "removed": n}}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityTable {
    days: BTreeMap<NaiveDate, AuthorDeltas>,
}

impl ActivityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, day: NaiveDate, author: &str, added: u64, removed: u64) {
        let delta = self
            .days
            .entry(day)
            .or_default()
            .entry(author.to_string())
            .or_default();
        delta.added = delta.added.saturating_add(added);
        delta.removed = delta.removed.saturating_add(removed);
    }

    pub fn get(&self, day: NaiveDate, author: &str) -> Option<&LineDelta> {
        self.days.get(&day).and_then(|authors| authors.get(author))
    }

    pub fn days(&self) -> impl Iterator<Item = (&NaiveDate, &AuthorDeltas)> {
        self.days.iter()
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Union of all authors appearing on any day, alphabetical.
    pub fn authors(&self) -> Vec<String> {
        let mut authors: Vec<String> = self
            .days
            .values()
            .flat_map(|a| a.keys().cloned())
            .collect();
        authors.sort();
        authors.dedup();
        authors
    }

    /// Sum of lines changed by `author` over `from..=to`, saturating at `u64::MAX`.
    pub fn lines_changed_between(&self, author: &str, from: NaiveDate, to: NaiveDate) -> u64 {
        if from > to {
            return 0;
        }
        self.days
            .range(from..=to)
            .filter_map(|(_, authors)| authors.get(author))
            .map(LineDelta::lines_changed)
            .fold(0, u64::saturating_add)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    Month,
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Granularity::Day => write!(f, "day"),
            Granularity::Week => write!(f, "week"),
            Granularity::Month => write!(f, "month"),
        }
    }
}

/// One calendar-aligned chart column covering `start..=end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarBucket {
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub offset: u32,
    pub is_skipped: bool,
}
