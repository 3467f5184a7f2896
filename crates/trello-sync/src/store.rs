//! Task store clients.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::config::Config;
use crate::error::{summarize_body, StoreError};
use crate::models::{Task, TaskUpdate};

/// Persistence operations the sync service needs.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Apply a partial update to an existing task.
    async fn update_task(&self, id: &str, update: TaskUpdate) -> Result<(), StoreError>;
}

/// Task store reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTaskStore {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpTaskStore {
    /// Create a client for the store at `base_url`.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built
    pub fn new(
        base_url: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Create a client from `TASK_STORE_URL` and `TASK_STORE_TOKEN`.
    ///
    /// # Errors
    /// Returns [`StoreError::NotConfigured`] when no store URL is set
    pub fn from_config(config: &Config) -> Result<Self, StoreError> {
        let url = config
            .task_store_url
            .as_deref()
            .ok_or_else(|| StoreError::NotConfigured("TASK_STORE_URL is not set".to_string()))?;
        Self::new(url, config.task_store_token.clone(), config.request_timeout)
    }

    /// Store base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl TaskStore for HttpTaskStore {
    #[instrument(skip(self, update))]
    async fn update_task(&self, id: &str, update: TaskUpdate) -> Result<(), StoreError> {
        let url = format!("{}/tasks/{id}", self.base_url);
        let mut request = self.client.patch(url).json(&update);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(id.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message: summarize_body(status, &body),
            });
        }

        debug!("Task updated");
        Ok(())
    }
}

/// Process-local task store for embedding and tests.
///
/// Only tasks added with [`InMemoryTaskStore::insert`] can be updated.
#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    tasks: RwLock<HashMap<String, Task>>,
}

impl InMemoryTaskStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a task. Tasks without an id are ignored.
    pub async fn insert(&self, task: Task) {
        if let Some(id) = task.id.clone() {
            self.tasks.write().await.insert(id, task);
        }
    }

    /// Look up a task by id.
    pub async fn get(&self, id: &str) -> Option<Task> {
        self.tasks.read().await.get(id).cloned()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn update_task(&self, id: &str, update: TaskUpdate) -> Result<(), StoreError> {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if update.trello_card_id.is_some() {
            task.trello_card_id = update.trello_card_id;
        }
        Ok(())
    }
}
