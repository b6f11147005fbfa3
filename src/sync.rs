//! Synchronization service owning the canonical in-memory task forest.
//!
//! The [`SyncService`] is the only writer of [`SyncState`]. Every mutation
//! goes to the remote service first and the forest is then re-derived from a
//! full fetch; there is no optimistic local patching, so the forest always
//! reflects state the server actually reported. Operations are single-flight:
//! an internal lock queues concurrent callers so two operations never
//! interleave their forest replacement.

use std::sync::Arc;

use anyhow::Result;
use log::{error, info};
use tokio::sync::{mpsc, Mutex};

use crate::api::{ApiError, TaskService, UpdateTaskArgs};
use crate::credentials::CredentialStore;
use crate::hierarchy::{build_forest, TaskNode};
use crate::session::{Session, SessionEvent, TOKEN_MISSING};

/// Current status of the sync state machine.
#[derive(Clone, Debug, PartialEq)]
pub enum SyncStatus {
    /// No operation in progress; the forest is current as of the last fetch.
    Idle,
    /// An operation is in flight.
    Loading,
    /// The last operation failed.
    Error {
        /// Human-readable message, preferring server-supplied text.
        message: String,
    },
}

/// Forest plus status, replaced atomically under one lock.
#[derive(Clone, Debug)]
pub struct SyncState {
    pub forest: Vec<TaskNode>,
    pub status: SyncStatus,
}

impl SyncState {
    fn new() -> Self {
        Self {
            forest: Vec::new(),
            status: SyncStatus::Idle,
        }
    }
}

/// Service coordinating task mutations against the remote service.
///
/// Cheap to clone; clones share the same state and single-flight lock.
/// Callers issuing an operation while another is in flight are queued, not
/// interleaved.
#[derive(Clone)]
pub struct SyncService {
    tasks: Arc<dyn TaskService>,
    session: Session,
    state: Arc<Mutex<SyncState>>,
    op_lock: Arc<Mutex<()>>,
}

impl SyncService {
    /// Create a sync service over the given remote service and credential
    /// store. Session-expiry notifications are delivered on `navigation`.
    pub fn new(
        tasks: Arc<dyn TaskService>,
        credentials: Arc<dyn CredentialStore>,
        navigation: mpsc::UnboundedSender<SessionEvent>,
    ) -> Self {
        Self {
            tasks,
            session: Session::new(credentials, navigation),
            state: Arc::new(Mutex::new(SyncState::new())),
            op_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Snapshot of the current state. The returned forest is a copy; readers
    /// never observe a half-replaced forest.
    pub async fn state(&self) -> SyncState {
        self.state.lock().await.clone()
    }

    /// Snapshot of the current forest.
    pub async fn forest(&self) -> Vec<TaskNode> {
        self.state.lock().await.forest.clone()
    }

    /// Current status of the state machine.
    pub async fn status(&self) -> SyncStatus {
        self.state.lock().await.status.clone()
    }

    /// Fetch the flat task list and rebuild the forest from it.
    ///
    /// On failure the forest is cleared: after a failed refresh there is no
    /// fetch the retained data could be trusted against.
    pub async fn refresh(&self) -> Result<SyncStatus> {
        let _guard = self.op_lock.lock().await;
        self.set_status(SyncStatus::Loading).await;
        Ok(self.refresh_locked().await)
    }

    /// Apply a partial update to a task, then re-derive the forest.
    ///
    /// Rejects an empty task id, an update that sets no field, and an empty
    /// `content` before any request is issued; those never touch the state
    /// machine. On remote failure the previous forest is left untouched.
    pub async fn update_task(&self, task_id: &str, args: &UpdateTaskArgs) -> Result<SyncStatus> {
        if task_id.trim().is_empty() {
            anyhow::bail!("Task id cannot be empty");
        }
        if args.is_empty() {
            anyhow::bail!("Update must change at least one field");
        }
        if let Some(content) = &args.content {
            if content.trim().is_empty() {
                anyhow::bail!("Task content cannot be empty");
            }
        }

        let _guard = self.op_lock.lock().await;
        self.set_status(SyncStatus::Loading).await;

        let token = match self.require_token(false).await {
            Ok(token) => token,
            Err(status) => return Ok(status),
        };

        info!("Updating task {task_id}");
        match self.tasks.update_task(&token, task_id, args).await {
            Ok(()) => Ok(self.refresh_locked().await),
            Err(err) => Ok(self.fail_mutation("update", task_id, &err).await),
        }
    }

    /// Delete a task, then re-derive the forest.
    pub async fn delete_task(&self, task_id: &str) -> Result<SyncStatus> {
        if task_id.trim().is_empty() {
            anyhow::bail!("Task id cannot be empty");
        }

        let _guard = self.op_lock.lock().await;
        self.set_status(SyncStatus::Loading).await;

        let token = match self.require_token(false).await {
            Ok(token) => token,
            Err(status) => return Ok(status),
        };

        info!("Deleting task {task_id}");
        match self.tasks.delete_task(&token, task_id).await {
            Ok(()) => Ok(self.refresh_locked().await),
            Err(err) => Ok(self.fail_mutation("delete", task_id, &err).await),
        }
    }

    /// Mark a task completed, then re-derive the forest.
    ///
    /// No idempotency check is made here: a completion request for an
    /// already-completed task is forwarded as-is. Guarding against redundant
    /// requests is the caller's responsibility.
    pub async fn complete_task(&self, task_id: &str) -> Result<SyncStatus> {
        if task_id.trim().is_empty() {
            anyhow::bail!("Task id cannot be empty");
        }

        let _guard = self.op_lock.lock().await;
        self.set_status(SyncStatus::Loading).await;

        let token = match self.require_token(false).await {
            Ok(token) => token,
            Err(status) => return Ok(status),
        };

        info!("Completing task {task_id}");
        match self.tasks.complete_task(&token, task_id).await {
            Ok(()) => Ok(self.refresh_locked().await),
            Err(err) => Ok(self.fail_mutation("complete", task_id, &err).await),
        }
    }

    /// Fetch and rebuild while already holding the operation lock, so a
    /// mutation's follow-up refresh stays within its single-flight window.
    async fn refresh_locked(&self) -> SyncStatus {
        let token = match self.require_token(true).await {
            Ok(token) => token,
            Err(status) => return status,
        };

        match self.tasks.list_tasks(&token).await {
            Ok(records) => {
                let forest = build_forest(&records);
                info!(
                    "Fetched {} tasks, {} roots after hierarchy build",
                    records.len(),
                    forest.len()
                );
                let mut state = self.state.lock().await;
                state.forest = forest;
                state.status = SyncStatus::Idle;
                state.status.clone()
            }
            Err(err) => {
                let message = self.session.describe_failure(&err);
                error!("Task list fetch failed: {message}");
                let mut state = self.state.lock().await;
                state.forest.clear();
                state.status = SyncStatus::Error { message };
                state.status.clone()
            }
        }
    }

    /// Read the credential, failing the operation if none is stored. A
    /// refresh additionally clears the forest, a mutation keeps it.
    async fn require_token(&self, clear_forest: bool) -> Result<String, SyncStatus> {
        match self.session.token() {
            Some(token) => Ok(token),
            None => {
                error!("No credential available, rejecting operation");
                let mut state = self.state.lock().await;
                if clear_forest {
                    state.forest.clear();
                }
                state.status = SyncStatus::Error {
                    message: TOKEN_MISSING.to_string(),
                };
                Err(state.status.clone())
            }
        }
    }

    async fn fail_mutation(&self, op: &str, task_id: &str, err: &ApiError) -> SyncStatus {
        let message = self.session.describe_failure(err);
        error!("Failed to {op} task {task_id}: {message}");
        let mut state = self.state.lock().await;
        state.status = SyncStatus::Error { message };
        state.status.clone()
    }

    async fn set_status(&self, status: SyncStatus) {
        self.state.lock().await.status = status;
    }
}
