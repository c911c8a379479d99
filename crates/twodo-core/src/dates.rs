//! Symbolic date aliases
//!
//! Expands a small vocabulary of tokens ("today", "tm", "next week", ...) into
//! concrete `YYYY-MM-DD` dates. Anything else passes through untouched so the
//! remote store can interpret it.

use chrono::{Datelike, Days, Local, Months, NaiveDate};

/// Date format produced by alias expansion.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateAlias {
    Today,
    Tomorrow,
    /// First Monday strictly after today.
    NextWeek,
    /// First day of the following month.
    NextMonth,
}

const ALIASES: &[(&str, DateAlias)] = &[
    ("today", DateAlias::Today),
    ("tomorrow", DateAlias::Tomorrow),
    ("next week", DateAlias::NextWeek),
    ("next month", DateAlias::NextMonth),
    ("t", DateAlias::Today),
    ("tm", DateAlias::Tomorrow),
    ("nw", DateAlias::NextWeek),
    ("nm", DateAlias::NextMonth),
    ("tod", DateAlias::Today),
    ("tom", DateAlias::Tomorrow),
    ("week", DateAlias::NextWeek),
    ("month", DateAlias::NextMonth),
];

const ALIAS_HELP: &str = r#"Available date aliases:
  Full forms:    today, tomorrow, next week, next month
  Short forms:   t, tm, nw, nm
  Alt forms:     tod, tom, week, month

Examples:
  twodo add "Task" -d today     # Today
  twodo add "Task" -d t         # Today (short)
  twodo add "Task" -d tm        # Tomorrow (short)
  twodo add "Task" -d nw        # Next Monday
  twodo list -d tomorrow        # Tomorrow's tasks
  twodo list -d nm              # Next month's tasks"#;

impl DateAlias {
    /// Look up a token, ignoring case and surrounding whitespace.
    pub fn parse(input: &str) -> Option<Self> {
        let token = input.trim().to_lowercase();
        ALIASES
            .iter()
            .find(|(name, _)| *name == token)
            .map(|(_, alias)| *alias)
    }

    /// Concrete date this alias denotes relative to `today`.
    pub fn resolve(self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            DateAlias::Today => Some(today),
            DateAlias::Tomorrow => today.checked_add_days(Days::new(1)),
            DateAlias::NextWeek => {
                let ahead = 7 - u64::from(today.weekday().num_days_from_monday());
                today.checked_add_days(Days::new(ahead))
            }
            DateAlias::NextMonth => NaiveDate::from_ymd_opt(today.year(), today.month(), 1)?
                .checked_add_months(Months::new(1)),
        }
    }
}

/// Outcome of alias expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expansion<'a> {
    Expanded(NaiveDate),
    /// Not an alias; holds the input exactly as given.
    Unchanged(&'a str),
}

impl Expansion<'_> {
    pub fn is_expanded(&self) -> bool {
        matches!(self, Expansion::Expanded(_))
    }

    /// The string to hand to the remote store.
    pub fn into_due_string(self) -> String {
        match self {
            Expansion::Expanded(date) => date.format(DATE_FORMAT).to_string(),
            Expansion::Unchanged(original) => original.to_string(),
        }
    }
}

/// Expand `input` against an explicit reference date.
pub fn expand_at(input: &str, today: NaiveDate) -> Expansion<'_> {
    match DateAlias::parse(input).and_then(|alias| alias.resolve(today)) {
        Some(date) => Expansion::Expanded(date),
        None => Expansion::Unchanged(input),
    }
}

/// Expand `input` against the local current date.
pub fn expand(input: &str) -> Expansion<'_> {
    expand_at(input, Local::now().date_naive())
}

/// Expand an alias to `YYYY-MM-DD`, or return the input unchanged.
pub fn expand_date_alias(input: &str) -> String {
    expand(input).into_due_string()
}

pub fn is_date_alias(input: &str) -> bool {
    DateAlias::parse(input).is_some()
}

/// Every recognised alias token, full forms first.
pub fn all_aliases() -> Vec<&'static str> {
    ALIASES.iter().map(|(name, _)| *name).collect()
}

pub fn alias_help() -> &'static str {
    ALIAS_HELP
}
