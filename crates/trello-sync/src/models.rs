//! Task and Trello entity type definitions.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Workflow stage of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Not started yet.
    Todo,
    /// Being worked on.
    #[serde(alias = "in_progress")]
    InProgress,
    /// Finished.
    Done,
}

impl TaskStatus {
    /// All statuses, in workflow order.
    pub const ALL: [Self; 3] = [Self::Todo, Self::InProgress, Self::Done];

    /// Wire representation of the status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(Self::Todo),
            "in-progress" | "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            other => Err(format!("unknown task status: {other}")),
        }
    }
}

/// Task record as owned by the task store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Task store identifier, absent until the store assigns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Task title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Longer description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Current workflow stage
    pub status: TaskStatus,
    /// Due date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    /// Linked Trello card, once the task has been pushed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trello_card_id: Option<String>,
}

/// Task as submitted for outbound sync.
///
/// Every field is optional at the wire level; the sync service decides what
/// is required so that a missing status yields a domain error instead of a
/// deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPayload {
    /// Task store identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Task title
    #[serde(default)]
    pub title: Option<String>,
    /// Longer description
    #[serde(default)]
    pub description: Option<String>,
    /// Workflow stage, as sent by the caller.
    #[serde(default)]
    pub status: Option<String>,
    /// Due date, as sent by the caller.
    #[serde(default)]
    pub due_date: Option<String>,
}

/// Request body for `POST /sync`.
#[derive(Debug, Default, Deserialize)]
pub struct OutboundRequest {
    /// Task to push.
    #[serde(default)]
    pub task: Option<TaskPayload>,
}

/// Partial update sent to the task store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    /// Trello card to link
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trello_card_id: Option<String>,
}

impl TaskUpdate {
    /// Update that links a Trello card.
    #[must_use]
    pub fn link_card(card_id: impl Into<String>) -> Self {
        Self {
            trello_card_id: Some(card_id.into()),
        }
    }
}

/// Trello board list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardList {
    /// Unique identifier
    pub id: String,
    /// List name (e.g., "To Do")
    pub name: String,
}

/// Trello card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Unique identifier
    pub id: String,
    /// Card name
    pub name: String,
    /// Card description (markdown)
    #[serde(default)]
    pub desc: String,
    /// Due date
    #[serde(default)]
    pub due: Option<DateTime<Utc>>,
    /// List the card belongs to
    #[serde(default)]
    pub id_list: String,
}

/// Input for creating a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateCard {
    /// Card name
    pub name: String,
    /// Card description
    pub desc: String,
    /// Normalized due timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
}

/// Parse a caller-supplied due date.
///
/// Accepts RFC 3339 timestamps, naive date-times (taken as UTC) and bare
/// dates (midnight UTC).
#[must_use]
pub fn parse_due_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Format a due date the way Trello stores it (`2024-05-01T00:00:00.000Z`).
#[must_use]
pub fn format_due_date(due: &DateTime<Utc>) -> String {
    due.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        let status: TaskStatus = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(status, TaskStatus::InProgress);
        assert_eq!("done".parse::<TaskStatus>().unwrap(), TaskStatus::Done);
        assert!("archived".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_task_serializes_camel_case() {
        let task = Task {
            id: Some("t-1".to_string()),
            title: Some("Buy milk".to_string()),
            description: None,
            status: TaskStatus::Todo,
            due_date: None,
            trello_card_id: Some("card-1".to_string()),
        };

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["trelloCardId"], "card-1");
        assert_eq!(json["status"], "todo");
        assert_eq!(json["title"], "Buy milk");
        assert!(json.get("description").is_none());
        assert!(json.get("dueDate").is_none());
    }

    #[test]
    fn test_card_deserialize() {
        let json = r#"{
            "id": "c1",
            "name": "Write docs",
            "desc": "",
            "due": "2024-05-01T12:00:00.000Z",
            "idList": "l1",
            "closed": false
        }"#;
        let card: Card = serde_json::from_str(json).unwrap();
        assert_eq!(card.id_list, "l1");
        assert_eq!(
            card.due,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_due_date_formats() {
        let midnight = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_due_date("2024-05-01"), Some(midnight));
        assert_eq!(parse_due_date("2024-05-01T00:00:00"), Some(midnight));
        assert_eq!(parse_due_date("2024-05-01T02:00:00+02:00"), Some(midnight));
        assert_eq!(parse_due_date("next tuesday"), None);
    }

    #[test]
    fn test_format_due_date() {
        let due = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        assert_eq!(format_due_date(&due), "2024-05-01T09:30:00.000Z");
    }

    #[test]
    fn test_create_card_omits_missing_due() {
        let input = CreateCard {
            name: "Untitled Task".to_string(),
            desc: String::new(),
            due: None,
        };
        let json = serde_json::to_value(&input).unwrap();
        assert!(json.get("due").is_none());
        assert_eq!(json["desc"], "");
    }
}
