//! Trello integration.
//!
//! This module provides the kanban side of the sync:
//! - [`KanbanClient`] trait, the seam the sync service talks to
//! - [`TrelloClient`], a REST implementation against the Trello API
//! - Card to task conversion

mod client;

pub use client::TrelloClient;

use async_trait::async_trait;

use crate::error::TrelloError;
use crate::models::{BoardList, Card, CreateCard, Task};
use crate::status::StatusMapping;

/// Operations the sync service needs from a kanban board.
#[async_trait]
pub trait KanbanClient: Send + Sync {
    /// Get every list on the board.
    async fn get_lists(&self) -> Result<Vec<BoardList>, TrelloError>;

    /// Get the cards in a list.
    async fn get_cards(&self, list_id: &str) -> Result<Vec<Card>, TrelloError>;

    /// Create a card in a list.
    async fn create_card(&self, list_id: &str, input: &CreateCard) -> Result<Card, TrelloError>;

    /// Convert a card from `list_name` into a task.
    fn map_card_to_task(&self, card: &Card, list_name: &str, mapping: &StatusMapping) -> Task {
        card_to_task(card, list_name, mapping)
    }
}

/// Convert a card into a task.
///
/// The task has no store id; it is linked to the card through `trello_card_id`.
#[must_use]
pub fn card_to_task(card: &Card, list_name: &str, mapping: &StatusMapping) -> Task {
    Task {
        id: None,
        title: Some(card.name.clone()),
        description: Some(card.desc.clone()).filter(|desc| !desc.is_empty()),
        status: mapping.status_for_list(list_name),
        due_date: card.due,
        trello_card_id: Some(card.id.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskStatus;
    use chrono::{TimeZone, Utc};

    fn card(desc: &str) -> Card {
        Card {
            id: "c1".to_string(),
            name: "Ship release".to_string(),
            desc: desc.to_string(),
            due: Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()),
            id_list: "l2".to_string(),
        }
    }

    #[test]
    fn test_card_to_task() {
        let task = card_to_task(&card("notes"), "In Progress", &StatusMapping::default());
        assert_eq!(task.id, None);
        assert_eq!(task.title.as_deref(), Some("Ship release"));
        assert_eq!(task.description.as_deref(), Some("notes"));
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.trello_card_id.as_deref(), Some("c1"));
        assert!(task.due_date.is_some());
    }

    #[test]
    fn test_card_to_task_empty_description() {
        let task = card_to_task(&card(""), "Done", &StatusMapping::default());
        assert_eq!(task.description, None);
        assert_eq!(task.status, TaskStatus::Done);
    }
}
