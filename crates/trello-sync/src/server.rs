//! HTTP server for Trello sync.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::SyncError;
use crate::models::OutboundRequest;
use crate::sync::SyncService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Configuration.
    pub config: Config,
    /// Sync façade.
    pub sync: SyncService,
}

/// Build the HTTP router for the sync service.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/sync", get(pull_handler).post(push_handler))
        // Health check
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

type Envelope = (StatusCode, Json<Value>);

fn failure(status: StatusCode, message: impl Into<String>) -> Envelope {
    (
        status,
        Json(json!({
            "success": false,
            "error": message.into()
        })),
    )
}

fn sync_failure(err: &SyncError) -> Envelope {
    failure(err.status_code(), err.to_string())
}

fn disabled() -> Envelope {
    failure(StatusCode::SERVICE_UNAVAILABLE, "Trello sync is disabled")
}

/// Pull every card from the board as tasks.
async fn pull_handler(State(state): State<AppState>) -> Envelope {
    if !state.config.enabled {
        debug!("Trello sync is disabled, rejecting pull");
        return disabled();
    }

    match state.sync.pull().await {
        Ok(report) => {
            let partial = report.is_partial();
            let mut body = json!({
                "success": true,
                "tasks": report.tasks,
            });
            if partial {
                warn!(
                    failed_lists = report.failed_lists.len(),
                    "Inbound sync skipped some lists"
                );
                body["failedLists"] = json!(report.failed_lists);
            }
            (StatusCode::OK, Json(body))
        }
        Err(e) => {
            error!(error = %e, "Error syncing with Trello");
            sync_failure(&e)
        }
    }
}

/// Push one task to the board as a new card.
async fn push_handler(State(state): State<AppState>, body: Bytes) -> Envelope {
    if !state.config.enabled {
        debug!("Trello sync is disabled, rejecting push");
        return disabled();
    }

    let request: OutboundRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Failed to parse sync request body");
            return sync_failure(&SyncError::InvalidTask);
        }
    };

    match state.sync.push(request.task).await {
        Ok(task) => {
            info!(card_id = ?task.trello_card_id, "Task pushed to Trello");
            (
                StatusCode::OK,
                Json(json!({
                    "success": true,
                    "task": task,
                })),
            )
        }
        Err(e) => {
            if e.status_code().is_server_error() {
                error!(error = %e, "Error creating Trello card");
            } else {
                warn!(error = %e, "Rejected sync request");
            }
            sync_failure(&e)
        }
    }
}

/// Health check endpoint.
async fn health_check() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

/// Readiness check endpoint.
async fn readiness_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    if !state.config.enabled || state.config.trello_credentials().is_none() {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }
    Ok(Json(json!({ "status": "ready" })))
}
