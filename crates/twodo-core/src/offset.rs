//! Reminder offsets with a recoverable real time
//!
//! The remote store only knows a single due time per task. To alert ahead of
//! (or after) the real deadline we send it the adjusted time and remember the
//! real one in the task text as `[realtime:YYYY-MM-DDTHH:MM:SS]`. The tag is
//! visible remotely, so anything shown to a person goes through
//! [`clean_for_display`] first.

use std::sync::OnceLock;

use chrono::{DateTime, Days, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use regex::Regex;
use tracing::debug;

use crate::config::Config;
use crate::error::Result;

/// Format of the timestamp inside the embedded tag.
pub const REAL_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Format of the adjusted due string sent to the remote store.
pub const DUE_FORMAT: &str = "%Y-%m-%d %H:%M";

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[realtime:([^\]]+)\]").expect("valid realtime tag pattern"))
}

fn iso_date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("valid ISO date pattern"))
}

/// An offset that was applied successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedOffset {
    /// Adjusted time as `YYYY-MM-DD HH:MM`, the due string for the remote store.
    pub adjusted_due: String,
    /// Task content carrying exactly one real-time tag.
    pub content: String,
    /// Real time as `YYYY-MM-DDTHH:MM:SS`.
    pub real_time: String,
    pub real: NaiveDateTime,
    pub adjusted: NaiveDateTime,
    pub offset_minutes: i64,
}

/// Result of [`TimeOffset::apply`].
///
/// A due expression that cannot be turned into a point in time leaves both the
/// expression and the content as they were; the remote store then gets the raw
/// expression and decides for itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OffsetOutcome {
    Applied(AppliedOffset),
    Unchanged { due: String, content: String },
}

impl OffsetOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, OffsetOutcome::Applied(_))
    }

    pub fn due_string(&self) -> &str {
        match self {
            OffsetOutcome::Applied(applied) => &applied.adjusted_due,
            OffsetOutcome::Unchanged { due, .. } => due,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            OffsetOutcome::Applied(applied) => &applied.content,
            OffsetOutcome::Unchanged { content, .. } => content,
        }
    }

    /// Real time string; the untouched due expression when nothing was applied.
    pub fn real_time(&self) -> &str {
        match self {
            OffsetOutcome::Applied(applied) => &applied.real_time,
            OffsetOutcome::Unchanged { due, .. } => due,
        }
    }
}

/// Offset engine; `anchor` is the time of day used for due expressions that
/// name only a date, `default_minutes` the configured reminder offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeOffset {
    anchor: NaiveTime,
    default_minutes: Option<i64>,
}

impl Default for TimeOffset {
    fn default() -> Self {
        Self::new(default_anchor())
    }
}

fn default_anchor() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default()
}

impl TimeOffset {
    pub fn new(anchor: NaiveTime) -> Self {
        Self {
            anchor,
            default_minutes: None,
        }
    }

    pub fn with_default_minutes(mut self, minutes: Option<i64>) -> Self {
        self.default_minutes = minutes;
        self
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.anchor_time()?).with_default_minutes(config.offset.default_minutes))
    }

    pub fn anchor(&self) -> NaiveTime {
        self.anchor
    }

    /// Offset to use when a caller asks for the configured one.
    pub fn default_minutes(&self) -> Option<i64> {
        self.default_minutes
    }

    /// Apply `offset_minutes` to `due` relative to the local current time.
    pub fn apply(&self, due: &str, offset_minutes: i64, content: &str) -> OffsetOutcome {
        self.apply_at(due, offset_minutes, content, Local::now().naive_local())
    }

    pub fn apply_at(
        &self,
        due: &str,
        offset_minutes: i64,
        content: &str,
        now: NaiveDateTime,
    ) -> OffsetOutcome {
        let unchanged = || OffsetOutcome::Unchanged {
            due: due.to_string(),
            content: content.to_string(),
        };

        let Some(real) = self.real_time_of(due, now) else {
            debug!("offset: could not interpret due '{}', leaving task as-is", due);
            return unchanged();
        };
        match applied_from(real, offset_minutes, content) {
            Some(applied) => OffsetOutcome::Applied(applied),
            None => unchanged(),
        }
    }

    /// Re-apply an offset to a real time recovered from a tag.
    ///
    /// Unlike [`apply_at`](Self::apply_at) the value must be an ISO date-time;
    /// relative words and free text leave the task untouched rather than
    /// being read against the current day.
    pub fn apply_real(&self, real_time: &str, offset_minutes: i64, content: &str) -> OffsetOutcome {
        let parsed = parse_iso(real_time.trim(), self.anchor)
            .and_then(|real| applied_from(real, offset_minutes, content));
        match parsed {
            Some(applied) => OffsetOutcome::Applied(applied),
            None => {
                debug!("offset: recorded real time '{}' is not a date-time", real_time);
                OffsetOutcome::Unchanged {
                    due: real_time.to_string(),
                    content: content.to_string(),
                }
            }
        }
    }

    /// The real point in time a due expression stands for.
    ///
    /// `today`/`tomorrow` land on the anchor time, ISO dates and date-times are
    /// parsed, and any other expression falls back to today at the anchor.
    /// Returns `None` when an ISO-looking expression does not parse.
    pub fn real_time_of(&self, due: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
        let trimmed = due.trim();
        match trimmed.to_lowercase().as_str() {
            "today" => Some(now.date().and_time(self.anchor)),
            "tomorrow" => Some(now.date().checked_add_days(Days::new(1))?.and_time(self.anchor)),
            _ if iso_date_pattern().is_match(trimmed) => parse_iso(trimmed, self.anchor),
            _ => Some(now.date().and_time(self.anchor)),
        }
    }

    /// Recompute the alarm time for a stored real time and an offset.
    ///
    /// Returns `real_time` unchanged when it cannot be parsed.
    pub fn display_time(&self, real_time: &str, offset_minutes: i64) -> String {
        parse_iso(real_time.trim(), self.anchor)
            .and_then(|real| shift(real, offset_minutes))
            .map(|adjusted| adjusted.format(DUE_FORMAT).to_string())
            .unwrap_or_else(|| real_time.to_string())
    }
}

/// Apply an offset with the default 09:00 anchor and the local clock.
pub fn apply_offset(due: &str, offset_minutes: i64, content: &str) -> OffsetOutcome {
    TimeOffset::default().apply(due, offset_minutes, content)
}

/// See [`TimeOffset::display_time`].
pub fn display_time(real_time: &str, offset_minutes: i64) -> String {
    TimeOffset::default().display_time(real_time, offset_minutes)
}

fn shift(time: NaiveDateTime, minutes: i64) -> Option<NaiveDateTime> {
    time.checked_add_signed(TimeDelta::try_minutes(minutes)?)
}

fn applied_from(real: NaiveDateTime, offset_minutes: i64, content: &str) -> Option<AppliedOffset> {
    let Some(adjusted) = shift(real, offset_minutes) else {
        debug!("offset: {} minutes from {} is out of range", offset_minutes, real);
        return None;
    };
    let real_time = real.format(REAL_TIME_FORMAT).to_string();
    Some(AppliedOffset {
        adjusted_due: adjusted.format(DUE_FORMAT).to_string(),
        content: embed_real_time(content, &real_time),
        real_time,
        real,
        adjusted,
        offset_minutes,
    })
}

fn parse_iso(input: &str, anchor: NaiveTime) -> Option<NaiveDateTime> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(input) {
        return Some(with_offset.with_timezone(&Local).naive_local());
    }
    if let Some(parsed) = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
    {
        return Some(parsed);
    }
    // A bare date means "that day at the anchor", same as `today`/`tomorrow`.
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(anchor))
}

/// Replace any real-time tag in `content` with one for `real_time`, appended at the end.
pub fn embed_real_time(content: &str, real_time: &str) -> String {
    format!("{} [realtime:{}]", clean_for_display(content), real_time)
}

/// Timestamp inside the first real-time tag, if any.
pub fn extract_real_time(content: &str) -> Option<&str> {
    tag_pattern()
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub fn has_real_time(content: &str) -> bool {
    tag_pattern().is_match(content)
}

/// Content without real-time tags, trimmed.
pub fn clean_for_display(content: &str) -> String {
    tag_pattern().replace_all(content, "").trim().to_string()
}

/// Human wording for a date-time: "Today 14:00", "Tomorrow 09:00" or "Dec 20 14:00".
pub fn describe_time(date_time: &str, now: NaiveDateTime) -> String {
    let Some(parsed) = parse_iso(date_time.trim(), default_anchor()) else {
        return date_time.to_string();
    };

    let today = now.date();
    if parsed.date() == today {
        format!("Today {}", parsed.format("%H:%M"))
    } else if today.checked_add_days(Days::new(1)) == Some(parsed.date()) {
        format!("Tomorrow {}", parsed.format("%H:%M"))
    } else {
        parsed.format("%b %d %H:%M").to_string()
    }
}

/// Human wording for an offset: "10 minutes before due time".
pub fn describe_offset(offset_minutes: i64) -> String {
    match offset_minutes {
        0 => "at due time".to_string(),
        m if m > 0 => format!("{} minutes after due time", m),
        m => format!("{} minutes before due time", m.unsigned_abs()),
    }
}
