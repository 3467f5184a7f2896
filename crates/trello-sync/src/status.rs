//! Mapping between task statuses and Trello list names.

use crate::models::TaskStatus;

/// List names used for each task status.
///
/// One field per status keeps the mapping total over [`TaskStatus`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMapping {
    /// List for [`TaskStatus::Todo`].
    pub todo: String,
    /// List for [`TaskStatus::InProgress`].
    pub in_progress: String,
    /// List for [`TaskStatus::Done`].
    pub done: String,
}

impl Default for StatusMapping {
    fn default() -> Self {
        Self {
            todo: "To Do".to_string(),
            in_progress: "In Progress".to_string(),
            done: "Done".to_string(),
        }
    }
}

impl StatusMapping {
    /// List name a task with `status` belongs in.
    #[must_use]
    pub fn list_name(&self, status: TaskStatus) -> &str {
        match status {
            TaskStatus::Todo => &self.todo,
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::Done => &self.done,
        }
    }

    /// Status for a card sitting in `list_name`.
    ///
    /// Lists outside the mapping are treated as [`TaskStatus::Todo`].
    #[must_use]
    pub fn status_for_list(&self, list_name: &str) -> TaskStatus {
        TaskStatus::ALL
            .into_iter()
            .find(|status| self.list_name(*status) == list_name)
            .unwrap_or(TaskStatus::Todo)
    }
}
