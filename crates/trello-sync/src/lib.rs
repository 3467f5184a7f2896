//! Task sync between the CTO task store and a Trello board.
//!
//! This crate provides:
//! - REST client for Trello boards, lists and cards
//! - Task store clients (HTTP and in-memory)
//! - Inbound sync (cards to tasks) and outbound sync (task to card)
//! - HTTP server exposing both directions on `/sync`

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Most async API methods can fail

pub mod config;
pub mod error;
pub mod models;
pub mod server;
pub mod status;
pub mod store;
pub mod sync;
pub mod trello;

pub use config::Config;
pub use error::{StoreError, SyncError, TrelloError};
pub use models::*;
pub use status::StatusMapping;
pub use store::{HttpTaskStore, InMemoryTaskStore, TaskStore};
pub use sync::{InboundReport, ListFailure, ListOutcome, SyncService};
pub use trello::{KanbanClient, TrelloClient};
