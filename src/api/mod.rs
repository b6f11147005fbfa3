//! Remote service abstraction for the tasklens backend.
//!
//! This module defines the wire-level data types exchanged with the backend,
//! the error taxonomy for remote calls, and the traits the rest of the
//! application programs against. The HTTP implementation lives in
//! [`http`](crate::api::http); tests substitute their own implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod http;

/// Error types for remote service operations.
///
/// `Auth` is reserved for credential rejection (HTTP 401) and is what the
/// sync layer's session-expiry policy keys on; every other failure is either
/// `Network` (service unreachable) or `Api` (service responded with a
/// structured failure).
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Service error: {0}")]
    Api(String),
}

impl ApiError {
    /// Whether this error means the bearer credential was rejected.
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Auth(_))
    }
}

/// A task as reported by the remote service, flat form.
///
/// `parent_id` references another record's `id`; `order` is the sibling
/// ordering key and is not globally unique.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub order: i32,
    pub content: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub priority: i32,
}

/// Partial update payload for a task. Fields left as `None` are not sent.
#[derive(Clone, Debug, Default, Serialize)]
pub struct UpdateTaskArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl UpdateTaskArgs {
    /// True when no field is set; such an update would be a no-op request.
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.description.is_none()
    }
}

/// Request body for the code analysis endpoint.
#[derive(Clone, Debug, Serialize)]
pub struct AnalysisRequest {
    pub requirements: String,
    pub code: String,
}

/// One entry of the checklist returned by the analyzer.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub item_description: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub is_completed: bool,
}

/// Structured result of a code analysis request.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,
}

/// Task operations offered by the remote service.
///
/// Every call carries the caller's bearer credential explicitly; the service
/// itself holds no session state. Implementations map HTTP 401 to
/// [`ApiError::Auth`] so callers can apply the session-expiry policy.
#[async_trait]
pub trait TaskService: Send + Sync {
    /// Fetch the full flat task list.
    async fn list_tasks(&self, token: &str) -> Result<Vec<TaskRecord>, ApiError>;

    /// Apply a partial update to one task.
    async fn update_task(
        &self,
        token: &str,
        task_id: &str,
        args: &UpdateTaskArgs,
    ) -> Result<(), ApiError>;

    /// Delete a task permanently.
    async fn delete_task(&self, token: &str, task_id: &str) -> Result<(), ApiError>;

    /// Mark a task as completed.
    async fn complete_task(&self, token: &str, task_id: &str) -> Result<(), ApiError>;
}

/// Code analysis operation offered by the remote service.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Submit a requirements document and a code snippet for analysis.
    async fn analyze(
        &self,
        token: &str,
        request: &AnalysisRequest,
    ) -> Result<AnalysisReport, ApiError>;
}
