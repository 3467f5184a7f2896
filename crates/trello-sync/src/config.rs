//! Configuration for the Trello sync service.

use std::env;
use std::time::Duration;

use crate::status::StatusMapping;

/// Trello sync service configuration.
#[derive(Clone)]
pub struct Config {
    /// HTTP server port.
    pub port: u16,
    /// Whether the sync endpoints are enabled.
    pub enabled: bool,
    /// Trello API key.
    pub trello_api_key: Option<String>,
    /// Trello member token.
    pub trello_token: Option<String>,
    /// Board to sync with.
    pub trello_board_id: Option<String>,
    /// Trello API base URL.
    pub trello_api_url: String,
    /// Timeout for outbound HTTP requests.
    pub request_timeout: Duration,
    /// How many lists' cards to fetch at once during inbound sync.
    pub fetch_concurrency: usize,
    /// List names per task status.
    pub status_mapping: StatusMapping,
    /// Task store base URL. Required by the service binary.
    pub task_store_url: Option<String>,
    /// Bearer token for the task store.
    pub task_store_token: Option<String>,
}

/// Trello credentials, present only when all three are configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrelloCredentials<'a> {
    pub api_key: &'a str,
    pub token: &'a str,
    pub board_id: &'a str,
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.trim().is_empty())
}

impl Default for Config {
    fn default() -> Self {
        let defaults = StatusMapping::default();
        Self {
            port: env::var("TRELLO_SYNC_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8082),
            enabled: env::var("TRELLO_SYNC_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
            trello_api_key: non_empty("TRELLO_API_KEY"),
            trello_token: non_empty("TRELLO_TOKEN"),
            trello_board_id: non_empty("TRELLO_BOARD_ID"),
            trello_api_url: non_empty("TRELLO_API_URL")
                .unwrap_or_else(|| "https://api.trello.com".to_string()),
            request_timeout: Duration::from_secs(
                env::var("TRELLO_REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            fetch_concurrency: env::var("TRELLO_FETCH_CONCURRENCY")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(1)
                .max(1),
            status_mapping: StatusMapping {
                todo: non_empty("TRELLO_LIST_TODO").unwrap_or(defaults.todo),
                in_progress: non_empty("TRELLO_LIST_IN_PROGRESS").unwrap_or(defaults.in_progress),
                done: non_empty("TRELLO_LIST_DONE").unwrap_or(defaults.done),
            },
            task_store_url: non_empty("TASK_STORE_URL"),
            task_store_token: non_empty("TASK_STORE_TOKEN"),
        }
    }
}

impl Config {
    /// Trello credentials, if key, token and board are all set.
    #[must_use]
    pub fn trello_credentials(&self) -> Option<TrelloCredentials<'_>> {
        Some(TrelloCredentials {
            api_key: self.trello_api_key.as_deref()?,
            token: self.trello_token.as_deref()?,
            board_id: self.trello_board_id.as_deref()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: [&str; 13] = [
        "TRELLO_SYNC_PORT",
        "TRELLO_SYNC_ENABLED",
        "TRELLO_API_KEY",
        "TRELLO_TOKEN",
        "TRELLO_BOARD_ID",
        "TRELLO_API_URL",
        "TRELLO_REQUEST_TIMEOUT_SECS",
        "TRELLO_FETCH_CONCURRENCY",
        "TRELLO_LIST_TODO",
        "TRELLO_LIST_IN_PROGRESS",
        "TRELLO_LIST_DONE",
        "TASK_STORE_URL",
        "TASK_STORE_TOKEN",
    ];

    fn clear_env() {
        for key in KEYS {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_default_config() {
        clear_env();

        let config = Config::default();
        assert!(config.enabled);
        assert_eq!(config.port, 8082);
        assert_eq!(config.trello_api_url, "https://api.trello.com");
        assert_eq!(config.fetch_concurrency, 1);
        assert_eq!(config.status_mapping, StatusMapping::default());
        assert!(config.task_store_url.is_none());
        assert!(config.trello_credentials().is_none());
    }

    #[test]
    #[serial]
    fn test_config_from_env() {
        clear_env();

        env::set_var("TRELLO_SYNC_PORT", "9100");
        env::set_var("TRELLO_SYNC_ENABLED", "false");
        env::set_var("TRELLO_API_KEY", "key");
        env::set_var("TRELLO_TOKEN", "token");
        env::set_var("TRELLO_BOARD_ID", "board");
        env::set_var("TRELLO_FETCH_CONCURRENCY", "0");
        env::set_var("TRELLO_LIST_IN_PROGRESS", "Doing");
        env::set_var("TASK_STORE_URL", "http://tasks.local");

        let config = Config::default();
        assert!(!config.enabled);
        assert_eq!(config.port, 9100);
        assert_eq!(config.fetch_concurrency, 1);
        assert_eq!(config.status_mapping.in_progress, "Doing");
        assert_eq!(config.status_mapping.todo, "To Do");
        assert_eq!(config.task_store_url.as_deref(), Some("http://tasks.local"));
        assert_eq!(
            config.trello_credentials(),
            Some(TrelloCredentials {
                api_key: "key",
                token: "token",
                board_id: "board",
            })
        );

        clear_env();
    }

    #[test]
    #[serial]
    fn test_blank_credentials_are_unset() {
        clear_env();

        env::set_var("TRELLO_API_KEY", "key");
        env::set_var("TRELLO_TOKEN", "  ");
        env::set_var("TRELLO_BOARD_ID", "board");

        assert!(Config::default().trello_credentials().is_none());

        clear_env();
    }
}
