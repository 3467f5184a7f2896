//! Bidirectional sync between the task store and a Trello board.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use crate::error::{SyncError, TrelloError};
use crate::models::{
    format_due_date, parse_due_date, BoardList, CreateCard, Task, TaskPayload, TaskStatus,
    TaskUpdate,
};
use crate::status::StatusMapping;
use crate::store::TaskStore;
use crate::trello::KanbanClient;

/// Card name used when a task has no title.
pub const UNTITLED_TASK: &str = "Untitled Task";

/// Result of fetching one list's cards during inbound sync.
#[derive(Debug)]
pub enum ListOutcome {
    /// Cards were fetched and converted.
    Synced { list: BoardList, tasks: Vec<Task> },
    /// Card fetch failed; the list contributes no tasks.
    Failed { list: BoardList, error: TrelloError },
}

/// A list whose cards could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFailure {
    /// List identifier
    pub list_id: String,
    /// List name
    pub list_name: String,
    /// Why the fetch failed
    pub error: String,
}

/// Aggregated result of an inbound sync.
#[derive(Debug, Default)]
pub struct InboundReport {
    /// Tasks from every list that synced, grouped by list in board order.
    pub tasks: Vec<Task>,
    /// Lists that were skipped.
    pub failed_lists: Vec<ListFailure>,
}

impl InboundReport {
    /// Fold per-list outcomes, keeping their order.
    #[must_use]
    pub fn from_outcomes(outcomes: Vec<ListOutcome>) -> Self {
        let mut report = Self::default();
        for outcome in outcomes {
            match outcome {
                ListOutcome::Synced { tasks, .. } => report.tasks.extend(tasks),
                ListOutcome::Failed { list, error } => report.failed_lists.push(ListFailure {
                    list_id: list.id,
                    list_name: list.name,
                    error: error.to_string(),
                }),
            }
        }
        report
    }

    /// Whether any list was skipped.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.failed_lists.is_empty()
    }
}

/// Sync façade over a kanban board and a task store.
#[derive(Clone)]
pub struct SyncService {
    kanban: Arc<dyn KanbanClient>,
    store: Arc<dyn TaskStore>,
    mapping: StatusMapping,
    fetch_concurrency: usize,
}

impl SyncService {
    /// Create a sync service that fetches list cards one list at a time.
    pub fn new(
        kanban: Arc<dyn KanbanClient>,
        store: Arc<dyn TaskStore>,
        mapping: StatusMapping,
    ) -> Self {
        Self {
            kanban,
            store,
            mapping,
            fetch_concurrency: 1,
        }
    }

    /// Fetch up to `limit` lists' cards at once. Values below 1 are raised to 1.
    #[must_use]
    pub fn with_fetch_concurrency(mut self, limit: usize) -> Self {
        self.fetch_concurrency = limit.max(1);
        self
    }

    /// Status mapping in use.
    #[must_use]
    pub fn mapping(&self) -> &StatusMapping {
        &self.mapping
    }

    /// Pull every card on the board and convert it into a task.
    ///
    /// Only a failure to enumerate the board lists is an error. A list whose
    /// cards cannot be fetched is reported in [`InboundReport::failed_lists`]
    /// and left out of the tasks.
    #[instrument(skip(self))]
    pub async fn pull(&self) -> Result<InboundReport, SyncError> {
        let lists = self.kanban.get_lists().await?;
        debug!(count = lists.len(), "Fetched board lists");

        let outcomes: Vec<ListOutcome> = stream::iter(lists)
            .map(|list| self.pull_list(list))
            .buffered(self.fetch_concurrency)
            .collect()
            .await;

        let report = InboundReport::from_outcomes(outcomes);
        info!(
            tasks = report.tasks.len(),
            failed_lists = report.failed_lists.len(),
            "Inbound sync complete"
        );
        Ok(report)
    }

    async fn pull_list(&self, list: BoardList) -> ListOutcome {
        match self.kanban.get_cards(&list.id).await {
            Ok(cards) => {
                let tasks = cards
                    .iter()
                    .map(|card| self.kanban.map_card_to_task(card, &list.name, &self.mapping))
                    .collect();
                ListOutcome::Synced { list, tasks }
            }
            Err(error) => {
                warn!(
                    list_id = %list.id,
                    list_name = %list.name,
                    error = %error,
                    "Failed to fetch cards for list, skipping"
                );
                ListOutcome::Failed { list, error }
            }
        }
    }

    /// Push a task to the board as a new card.
    ///
    /// Returns the task linked to the created card. When the task has an id,
    /// the link is also written to the task store; if that write fails the
    /// card stays on the board and the error is returned.
    #[instrument(skip(self, payload))]
    pub async fn push(&self, payload: Option<TaskPayload>) -> Result<Task, SyncError> {
        let task = validate(payload)?;

        let list_name = self.mapping.list_name(task.status);
        let lists = self.kanban.get_lists().await?;
        let Some(target) = lists.iter().find(|list| list.name == list_name) else {
            warn!(status = %task.status, list_name = %list_name, "No board list for status");
            return Err(SyncError::ListNotFound {
                list_name: list_name.to_string(),
            });
        };

        let input = CreateCard {
            name: task
                .title
                .clone()
                .filter(|title| !title.is_empty())
                .unwrap_or_else(|| UNTITLED_TASK.to_string()),
            desc: task.description.clone().unwrap_or_default(),
            due: task.due_date.as_ref().map(format_due_date),
        };
        let card = self.kanban.create_card(&target.id, &input).await?;
        info!(card_id = %card.id, list_name = %target.name, "Created Trello card");

        let updated = Task {
            trello_card_id: Some(card.id.clone()),
            ..task
        };

        if let Some(id) = &updated.id {
            if let Err(e) = self
                .store
                .update_task(id, TaskUpdate::link_card(card.id.clone()))
                .await
            {
                error!(
                    task_id = %id,
                    card_id = %card.id,
                    error = %e,
                    "Card created but linking it to the task failed"
                );
                return Err(e.into());
            }
        }

        Ok(updated)
    }
}

/// Turn a request payload into a task, rejecting anything without a usable status.
fn validate(payload: Option<TaskPayload>) -> Result<Task, SyncError> {
    let payload = payload.ok_or(SyncError::InvalidTask)?;
    let status: TaskStatus = payload
        .status
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or(SyncError::InvalidTask)?
        .parse()
        .map_err(|_| SyncError::InvalidTask)?;
    let due_date = match payload.due_date.as_deref().filter(|d| !d.is_empty()) {
        Some(raw) => Some(parse_due_date(raw).ok_or(SyncError::InvalidTask)?),
        None => None,
    };

    Ok(Task {
        id: payload.id.filter(|id| !id.is_empty()),
        title: payload.title,
        description: payload.description,
        status,
        due_date,
        trello_card_id: None,
    })
}
