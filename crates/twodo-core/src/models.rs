use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::offset;

/// Due information as reported by the remote task store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Due {
    pub date: String,
    #[serde(default)]
    pub datetime: Option<String>,
    #[serde(default)]
    pub string: String,
    #[serde(default)]
    pub timezone: Option<String>,
}

/// A task record owned by the remote store.
///
/// Only `id`, `content` and `created_at` matter for short-ID indexing; the
/// remaining fields are carried so callers can work with a full snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default = "default_priority")]
    pub priority: u8,
    #[serde(default)]
    pub due: Option<Due>,
    pub created_at: String,
    #[serde(default)]
    pub is_completed: bool,
}

fn default_priority() -> u8 {
    1
}

impl Task {
    pub fn new(id: impl Into<String>, content: impl Into<String>, created_at: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            description: None,
            project_id: None,
            labels: Vec::new(),
            priority: default_priority(),
            due: None,
            created_at: created_at.into(),
            is_completed: false,
        }
    }

    /// Content with any embedded real-time tag stripped.
    pub fn display_content(&self) -> String {
        offset::clean_for_display(&self.content)
    }

    /// Real due time recorded in the content, if an offset was ever applied.
    pub fn real_time(&self) -> Option<&str> {
        offset::extract_real_time(&self.content)
    }
}

/// Parse a task listing as returned by the remote store.
pub fn parse_tasks(json: &str) -> Result<Vec<Task>> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tasks_full_record() {
        let json = r#"[{
            "id": "7498238910",
            "content": "Call mom [realtime:2024-12-20T14:00:00]",
            "description": "",
            "project_id": "2203306141",
            "labels": ["family"],
            "priority": 4,
            "due": {
                "date": "2024-12-20",
                "datetime": "2024-12-20T13:50:00",
                "string": "2024-12-20 13:50",
                "timezone": null
            },
            "url": "https://todoist.com/showTask?id=7498238910",
            "comment_count": 0,
            "created_at": "2024-12-01T10:00:00.000000Z",
            "creator_id": "2671355",
            "is_completed": false
        }]"#;

        let tasks = parse_tasks(json).expect("Should parse task listing");

        assert_eq!(tasks.len(), 1);
        let task = &tasks[0];
        assert_eq!(task.id, "7498238910");
        assert_eq!(task.priority, 4);
        assert_eq!(task.labels, vec!["family".to_string()]);
        assert_eq!(task.due.as_ref().map(|d| d.string.as_str()), Some("2024-12-20 13:50"));
        assert_eq!(task.display_content(), "Call mom");
        assert_eq!(task.real_time(), Some("2024-12-20T14:00:00"));
    }

    #[test]
    fn test_parse_tasks_minimal_record() {
        let json = r#"[{"id": "1", "content": "Plain", "created_at": "2024-01-01T00:00:00Z"}]"#;

        let tasks = parse_tasks(json).expect("Should parse minimal record");

        assert_eq!(tasks[0].priority, 1);
        assert!(tasks[0].due.is_none());
        assert!(!tasks[0].is_completed);
        assert!(tasks[0].real_time().is_none());
    }

    #[test]
    fn test_parse_tasks_invalid() {
        assert!(parse_tasks("{not json").is_err());
        assert!(parse_tasks(r#"[{"content": "missing id"}]"#).is_err());
    }
}
