//! What to send to the remote store when a task is created or updated with a
//! due expression and, optionally, a reminder offset.
//!
//! Without an offset the due expression only goes through alias expansion.
//! With one, the remote store receives the adjusted time and content carrying
//! the real-time tag.

use chrono::{Local, NaiveDateTime};

use crate::dates;
use crate::offset::{self, OffsetOutcome, TimeOffset};

/// Reminder offset a caller asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reminder {
    #[default]
    Off,
    /// Whatever `[offset].default_minutes` says; off when it is unset.
    Configured,
    Minutes(i64),
}

impl Reminder {
    /// Minutes to apply with `engine`, `None` when no offset applies.
    pub fn minutes(self, engine: &TimeOffset) -> Option<i64> {
        match self {
            Reminder::Off => None,
            Reminder::Configured => engine.default_minutes(),
            Reminder::Minutes(minutes) => Some(minutes),
        }
    }
}

impl From<Option<i64>> for Reminder {
    fn from(minutes: Option<i64>) -> Self {
        minutes.map_or(Reminder::Off, Reminder::Minutes)
    }
}

/// Change to the remote due field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DueChange {
    Keep,
    Clear,
    Set(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub due: DueChange,
    /// New content, `None` to leave it alone.
    pub content: Option<String>,
    /// Real time embedded in `content`, when an offset was applied.
    pub real_time: Option<String>,
}

/// Plan a new task.
pub fn plan_create(
    content: &str,
    due: Option<&str>,
    reminder: Reminder,
    engine: &TimeOffset,
    now: NaiveDateTime,
) -> Schedule {
    let content = content.trim();
    match (due, reminder.minutes(engine)) {
        (Some(due), Some(minutes)) => with_offset(due, minutes, content, engine, now),
        (Some(due), None) => Schedule {
            due: DueChange::Set(expand_at(due, now)),
            content: Some(content.to_string()),
            real_time: None,
        },
        (None, _) => Schedule {
            due: DueChange::Keep,
            content: Some(content.to_string()),
            real_time: None,
        },
    }
}

/// Plan an update to an existing task whose stored content is `current_content`.
///
/// An empty `due` clears the due date. An offset given without a due is applied
/// to the real time already recorded in the task, if there is one and it is a
/// valid date-time.
pub fn plan_update(
    current_content: &str,
    new_content: Option<&str>,
    due: Option<&str>,
    reminder: Reminder,
    engine: &TimeOffset,
    now: NaiveDateTime,
) -> Schedule {
    let base_content = new_content.unwrap_or(current_content);
    let untouched_content = new_content.map(str::to_string);

    match (due, reminder.minutes(engine)) {
        (Some(due), _) if due.trim().is_empty() => Schedule {
            due: DueChange::Clear,
            content: untouched_content,
            real_time: None,
        },
        (Some(due), Some(minutes)) => with_offset(due, minutes, base_content, engine, now),
        (Some(due), None) => Schedule {
            due: DueChange::Set(expand_at(due, now)),
            content: untouched_content,
            real_time: None,
        },
        (None, Some(minutes)) => {
            let recorded = offset::extract_real_time(current_content)
                .map(|real| engine.apply_real(real, minutes, base_content));
            match recorded {
                Some(OffsetOutcome::Applied(applied)) => Schedule {
                    due: DueChange::Set(applied.adjusted_due),
                    content: Some(applied.content),
                    real_time: Some(applied.real_time),
                },
                _ => Schedule {
                    due: DueChange::Keep,
                    content: untouched_content,
                    real_time: None,
                },
            }
        }
        (None, None) => Schedule {
            due: DueChange::Keep,
            content: untouched_content,
            real_time: None,
        },
    }
}

/// [`plan_create`] against the local clock.
pub fn plan_create_now(
    content: &str,
    due: Option<&str>,
    reminder: Reminder,
    engine: &TimeOffset,
) -> Schedule {
    plan_create(content, due, reminder, engine, Local::now().naive_local())
}

fn expand_at(due: &str, now: NaiveDateTime) -> String {
    dates::expand_at(due, now.date()).into_due_string()
}

fn with_offset(
    due: &str,
    minutes: i64,
    content: &str,
    engine: &TimeOffset,
    now: NaiveDateTime,
) -> Schedule {
    let expanded = expand_at(due, now);
    match engine.apply_at(&expanded, minutes, content, now) {
        OffsetOutcome::Applied(applied) => Schedule {
            due: DueChange::Set(applied.adjusted_due),
            content: Some(applied.content),
            real_time: Some(applied.real_time),
        },
        OffsetOutcome::Unchanged { due, content } => Schedule {
            due: DueChange::Set(due),
            content: Some(content),
            real_time: None,
        },
    }
}
