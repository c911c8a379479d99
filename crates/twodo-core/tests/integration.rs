//! Integration tests for the twodo-core crate.
//!
//! These tests walk a task snapshot through short-code indexing, code
//! resolution and reminder-offset planning the way a command would.

use std::collections::HashSet;

use chrono::NaiveDate;
use twodo_core::schedule::{plan_create, plan_update};
use twodo_core::{
    Config, DueChange, Reminder, ShortIdIndex, Task, TimeOffset, TwodoError, offset, parse_tasks,
};
use uuid::Uuid;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("twodo_core=trace")
        .with_test_writer()
        .try_init();
}

const SNAPSHOT: &str = r#"[
    {"id": "8001", "content": "Review pull request", "created_at": "2024-05-03T08:00:00.000000Z", "priority": 3},
    {"id": "8002", "content": "Call mom [realtime:2024-12-20T14:00:00]", "created_at": "2024-05-01T08:00:00.000000Z",
     "due": {"date": "2024-12-20", "datetime": "2024-12-20T13:50:00", "string": "2024-12-20 13:50"}},
    {"id": "8003", "content": "Buy milk", "created_at": "2024-05-02T08:00:00.000000Z", "labels": ["shopping"]}
]"#;

fn random_tasks(count: usize) -> Vec<Task> {
    (0..count)
        .map(|i| {
            Task::new(
                Uuid::new_v4().simple().to_string(),
                format!("Task {i}"),
                format!("2024-01-01T00:{:02}:{:02}Z", i / 60 % 60, i % 60),
            )
        })
        .collect()
}

#[test]
fn test_snapshot_to_resolution_workflow() {
    init_tracing();

    let tasks = parse_tasks(SNAPSHOT).unwrap();
    let index = ShortIdIndex::build(&tasks);

    // oldest task first
    let order: Vec<&str> = index.entries().iter().map(|e| e.task.id.as_str()).collect();
    assert_eq!(order, vec!["8002", "8003", "8001"]);

    let resolver = index.resolver();
    for task in &tasks {
        let code = index.code_for(&task.id).unwrap();
        assert_eq!(resolver.resolve(code).unwrap(), task.id);
        assert_eq!(resolver.resolve(&code.to_uppercase()).unwrap(), task.id);
    }

    let mom = resolver.resolve_task(index.code_for("8002").unwrap()).unwrap();
    assert_eq!(mom.display_content(), "Call mom");
    assert_eq!(mom.real_time(), Some("2024-12-20T14:00:00"));
}

#[test]
fn test_codes_are_deterministic_for_a_snapshot() {
    let tasks = random_tasks(300);

    let first = ShortIdIndex::build(&tasks);
    let second = ShortIdIndex::build(&tasks);

    let mut shuffled = tasks.clone();
    shuffled.reverse();
    let third = ShortIdIndex::build(&shuffled);

    for task in &tasks {
        let code = first.code_for(&task.id);
        assert_eq!(code, second.code_for(&task.id));
        assert_eq!(code, third.code_for(&task.id));
    }
}

#[test]
fn test_codes_unique_and_short_for_random_ids() {
    let tasks = random_tasks(3_000);
    let index = ShortIdIndex::build(&tasks);

    assert_eq!(index.len(), tasks.len());
    let codes: HashSet<&str> = index.entries().iter().map(|e| e.code.as_str()).collect();
    assert_eq!(codes.len(), tasks.len());
    assert!(codes.iter().all(|c| {
        (2..=4).contains(&c.len()) && c.chars().all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit())
    }));
}

#[test]
fn test_batch_resolution_reports_each_failure() {
    init_tracing();

    let tasks = random_tasks(500);
    let index = ShortIdIndex::build(&tasks);
    let resolver = index.resolver();

    let good = index.code_for(&tasks[10].id).unwrap().to_string();
    let batch = resolver.resolve_all(vec![good.clone(), "!!".to_string(), String::new()]);

    assert_eq!(batch.resolved.len(), 1);
    assert_eq!(batch.resolved[0].id(), tasks[10].id);
    assert_eq!(batch.failed.len(), 2);
    assert!(
        batch
            .failed
            .iter()
            .all(|(_, e)| matches!(e, TwodoError::NotFound { .. }))
    );

    // every single-character prefix used by more than one code is ambiguous
    let first_chars: Vec<char> = index
        .entries()
        .iter()
        .filter_map(|e| e.code.chars().next())
        .collect();
    let shared = first_chars
        .iter()
        .find(|c| first_chars.iter().filter(|d| d == c).count() > 1)
        .unwrap();
    match resolver.resolve(&shared.to_string()) {
        Err(TwodoError::Ambiguous { candidates, .. }) => {
            assert!(candidates.0.len() > 1);
            assert!(candidates.0.iter().all(|c| c.code.starts_with(*shared)));
        }
        other => panic!("expected ambiguity, got {other:?}"),
    }
}

#[test]
fn test_offset_create_then_reschedule() {
    init_tracing();

    let now = NaiveDate::from_ymd_opt(2024, 12, 1)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap();
    let engine = TimeOffset::from_config(&Config::default()).unwrap();

    let created = plan_create("Call mom", Some("2024-12-20T14:00:00"), Reminder::Minutes(-10), &engine, now);
    assert_eq!(created.due, DueChange::Set("2024-12-20 13:50".to_string()));
    let stored = created.content.unwrap();
    assert_eq!(stored, "Call mom [realtime:2024-12-20T14:00:00]");

    // the remote store now holds `stored` with due 13:50; move the alarm to an hour before
    let moved = plan_update(&stored, None, None, Reminder::Minutes(-60), &engine, now);
    assert_eq!(moved.due, DueChange::Set("2024-12-20 13:00".to_string()));
    assert_eq!(moved.content.as_deref(), Some(stored.as_str()));

    let real = offset::extract_real_time(&stored).unwrap();
    assert_eq!(offset::display_time(real, -60), "2024-12-20 13:00");
    assert_eq!(offset::clean_for_display(&stored), "Call mom");
}

#[test]
fn test_anchor_time_from_config() {
    let mut config = Config::default();
    config.offset.anchor_time = "07:30".to_string();
    let engine = TimeOffset::from_config(&config).unwrap();

    let now = NaiveDate::from_ymd_opt(2024, 6, 10)
        .unwrap()
        .and_hms_opt(22, 0, 0)
        .unwrap();
    let plan = plan_create("Run", Some("tomorrow"), Reminder::Minutes(0), &engine, now);

    assert_eq!(plan.due, DueChange::Set("2024-06-11 07:30".to_string()));
    assert_eq!(plan.real_time.as_deref(), Some("2024-06-11T07:30:00"));
}

#[test]
fn test_configured_default_offset() {
    init_tracing();

    let mut config = Config::default();
    config.offset.default_minutes = Some(-15);
    let engine = TimeOffset::from_config(&config).unwrap();

    let now = NaiveDate::from_ymd_opt(2024, 12, 1)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap();
    let created = plan_create("Call mom", Some("2024-12-20T14:00:00"), Reminder::Configured, &engine, now);
    assert_eq!(created.due, DueChange::Set("2024-12-20 13:45".to_string()));
    let stored = created.content.unwrap();

    // an explicit offset still wins over the configured one
    let moved = plan_update(&stored, None, None, Reminder::Minutes(-5), &engine, now);
    assert_eq!(moved.due, DueChange::Set("2024-12-20 13:55".to_string()));

    let back = plan_update(&stored, None, None, Reminder::Configured, &engine, now);
    assert_eq!(back.due, DueChange::Set("2024-12-20 13:45".to_string()));
}

#[test]
fn test_corrupted_tag_is_not_rescheduled() {
    let engine = TimeOffset::default();
    let now = NaiveDate::from_ymd_opt(2024, 6, 10)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();

    let plan = plan_update("Call mom [realtime:soon]", None, None, Reminder::Minutes(-10), &engine, now);
    assert_eq!(plan.due, DueChange::Keep);
    assert!(plan.content.is_none());
}
