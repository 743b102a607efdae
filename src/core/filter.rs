//! Filter modes and the projection derived from them.

use std::{collections::HashSet, fmt};

use chrono::{Datelike, NaiveDate};

use crate::{
    domain::{EntryId, LedgerEntry, YearMonth},
    utils::format,
};

/// Label of the first category tab, which shows every entry.
pub const ALL_CATEGORIES: &str = "All";

/// The single rule deciding which entries are visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterMode {
    AllTime,
    Month(YearMonth),
    ExactDate(NaiveDate),
    Year(i32),
    Category(String),
}

impl FilterMode {
    pub fn matches(&self, entry: &LedgerEntry) -> bool {
        match self {
            FilterMode::AllTime => true,
            FilterMode::Month(month) => month.contains(entry.date),
            FilterMode::ExactDate(date) => entry.date == *date,
            FilterMode::Year(year) => entry.date.year() == *year,
            FilterMode::Category(name) => entry.category == *name,
        }
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        match self {
            FilterMode::ExactDate(date) => Some(*date),
            _ => None,
        }
    }

    pub fn category(&self) -> Option<&str> {
        match self {
            FilterMode::Category(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterMode::AllTime => f.write_str("all entries"),
            FilterMode::Month(month) => write!(f, "month {month}"),
            FilterMode::ExactDate(date) => write!(f, "date {}", date.format("%Y-%m-%d")),
            FilterMode::Year(year) => write!(f, "year {year}"),
            FilterMode::Category(name) => write!(f, "category `{name}`"),
        }
    }
}

/// `"All"` followed by every distinct category in first-seen order. A
/// category literally named `"All"` still gets its own tab.
pub fn categories(entries: &[LedgerEntry]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut list = vec![ALL_CATEGORIES.to_string()];
    for entry in entries {
        if seen.insert(entry.category.as_str()) {
            list.push(entry.category.clone());
        }
    }
    list
}

/// Entries visible under `mode`, in canonical order.
pub fn project<'a>(entries: &'a [LedgerEntry], mode: &'a FilterMode) -> Projection<'a> {
    Projection {
        mode,
        entries: entries.iter().filter(|entry| mode.matches(entry)).collect(),
        canonical_len: entries.len(),
    }
}

/// The visible subset of the canonical list together with the mode that
/// produced it. An empty projection under [`FilterMode::ExactDate`] means
/// "no entries on that day", which is distinct from an unfiltered view.
#[derive(Debug, Clone)]
pub struct Projection<'a> {
    mode: &'a FilterMode,
    entries: Vec<&'a LedgerEntry>,
    canonical_len: usize,
}

impl<'a> Projection<'a> {
    pub fn mode(&self) -> &FilterMode {
        self.mode
    }

    pub fn entries(&self) -> &[&'a LedgerEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a LedgerEntry> + '_ {
        self.entries.iter().copied()
    }

    pub fn ids(&self) -> Vec<EntryId> {
        self.entries.iter().map(|entry| entry.id).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when some canonical entries are hidden.
    pub fn is_filtered(&self) -> bool {
        self.entries.len() != self.canonical_len
    }

    /// Caption describing what the projection covers.
    pub fn caption(&self) -> Option<String> {
        match self.mode {
            FilterMode::AllTime => None,
            FilterMode::Month(month) => Some(month.label()),
            FilterMode::ExactDate(date) => Some(format::long_date(*date)),
            FilterMode::Year(year) => Some(format!("{year}년")),
            FilterMode::Category(name) => Some(name.clone()),
        }
    }
}
