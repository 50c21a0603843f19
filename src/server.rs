//! HTTP server for the issue tracker
//!
//! Exposes the issue store service as a REST API.
//!
//! # Routes
//!
//! - `GET /health` - Liveness check
//! - `GET /api/issues/{project}` - Query issues, query-string filters
//! - `POST /api/issues/{project}` - Create an issue
//! - `PUT /api/issues/{project}` - Partially update an issue by `_id`
//! - `DELETE /api/issues/{project}` - Delete an issue by `_id`
//!
//! Every logical outcome is returned with HTTP 200; success or failure is
//! carried in the JSON body shape. This preserves the wire contract of the
//! service this one replaces.
//!
//! # Example
//!
//! ```no_run
//! use tracklet::server::IssueServer;
//! use std::path::PathBuf;
//!
//! #[tokio::main]
//! async fn main() {
//!     let server = IssueServer::new(&PathBuf::from("issues.db"))
//!         .expect("Failed to create server");
//!
//!     server.run("127.0.0.1:8080").await.expect("Server failed");
//! }
//! ```

use crate::issue::{IssueDraft, IssueFilter, IssueUpdate};
use crate::service::IssueService;
use crate::store::IssueStore;
use crate::{Result, TrackletError};
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path as FsPath;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// Request body size limit
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Shared server state
struct AppState {
    service: Mutex<IssueService>,
}

/// HTTP server for the issue tracker
pub struct IssueServer {
    state: Arc<AppState>,
}

impl IssueServer {
    /// Create a server over the database at `db_path`
    pub fn new(db_path: &FsPath) -> Result<Self> {
        let store = IssueStore::open(db_path)?;
        Ok(Self {
            state: Arc::new(AppState {
                service: Mutex::new(IssueService::new(store)),
            }),
        })
    }

    /// Build the router
    fn router(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/health", get(health))
            .route(
                "/api/issues/{project}",
                get(get_issues)
                    .post(create_issue)
                    .put(update_issue)
                    .delete(delete_issue),
            )
            .layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_BYTES))
            .with_state(state)
    }

    /// Consume the server and return its router (for tests and embedding)
    pub fn into_router(self) -> Router {
        Self::router(self.state)
    }

    /// Run the server on the given address
    pub async fn run(self, addr: &str) -> Result<()> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| TrackletError::Bind(e.to_string()))?;

        tracing::info!(addr = addr, "Issue tracker listening");

        axum::serve(listener, Self::router(self.state))
            .await
            .map_err(TrackletError::Io)
    }
}

// ============================================================================
// Request types
// ============================================================================

/// Query-string filters for GET
#[derive(Debug, Default, Deserialize)]
struct FilterQuery {
    #[serde(rename = "_id")]
    id: Option<String>,
    issue_title: Option<String>,
    issue_text: Option<String>,
    created_by: Option<String>,
    assigned_to: Option<String>,
    status_text: Option<String>,
}

impl From<FilterQuery> for IssueFilter {
    fn from(q: FilterQuery) -> Self {
        Self {
            id: q.id,
            issue_title: q.issue_title,
            issue_text: q.issue_text,
            created_by: q.created_by,
            assigned_to: q.assigned_to,
            status_text: q.status_text,
        }
    }
}

/// Body for POST
#[derive(Debug, Default, Deserialize)]
struct CreateRequest {
    issue_title: Option<String>,
    issue_text: Option<String>,
    created_by: Option<String>,
    assigned_to: Option<String>,
    status_text: Option<String>,
}

/// Body for PUT
#[derive(Debug, Default, Deserialize)]
struct UpdateRequest {
    #[serde(rename = "_id")]
    id: Option<String>,
    issue_title: Option<String>,
    issue_text: Option<String>,
    created_by: Option<String>,
    assigned_to: Option<String>,
    status_text: Option<String>,
}

/// Body for DELETE
#[derive(Debug, Default, Deserialize)]
struct DeleteRequest {
    #[serde(rename = "_id")]
    id: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn get_issues(
    State(state): State<Arc<AppState>>,
    Path(project): Path<String>,
    Query(query): Query<FilterQuery>,
) -> Json<Value> {
    let service = state.service.lock().await;
    let issues = service.query(&project, &query.into());
    Json(json!(issues))
}

async fn create_issue(
    State(state): State<Arc<AppState>>,
    Path(project): Path<String>,
    Json(req): Json<CreateRequest>,
) -> Json<Value> {
    let draft = IssueDraft::from_fields(
        req.issue_title,
        req.issue_text,
        req.created_by,
        req.assigned_to,
        req.status_text,
    );

    let mut service = state.service.lock().await;
    match service.create(&project, draft) {
        Ok(outcome) => Json(outcome.to_json()),
        Err(e) => {
            tracing::error!(project = project, error = %e, "Create failed");
            Json(json!({ "error": "server error" }))
        }
    }
}

async fn update_issue(
    State(state): State<Arc<AppState>>,
    Path(project): Path<String>,
    Json(req): Json<UpdateRequest>,
) -> Json<Value> {
    let update = IssueUpdate::from_fields(
        req.issue_title,
        req.issue_text,
        req.created_by,
        req.assigned_to,
        req.status_text,
    );

    let service = state.service.lock().await;
    match service.update(&project, req.id, update) {
        Ok(outcome) => Json(outcome.to_json()),
        Err(e) => {
            tracing::error!(project = project, error = %e, "Update failed");
            Json(json!({ "error": "server error" }))
        }
    }
}

async fn delete_issue(
    State(state): State<Arc<AppState>>,
    Path(project): Path<String>,
    Json(req): Json<DeleteRequest>,
) -> Json<Value> {
    let service = state.service.lock().await;
    match service.delete(&project, req.id) {
        Ok(outcome) => Json(outcome.to_json()),
        Err(e) => {
            tracing::error!(project = project, error = %e, "Delete failed");
            Json(json!({ "error": "server error" }))
        }
    }
}
