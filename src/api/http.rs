//! HTTP implementation of the remote service traits.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use super::{
    AnalysisReport, AnalysisRequest, AnalysisService, ApiError, TaskRecord, TaskService,
    UpdateTaskArgs,
};

/// Error body shape the backend uses for failed requests.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// HTTP client for the tasklens backend.
///
/// Implements both [`TaskService`] and [`AnalysisService`] against the same
/// base URL. The bearer credential is supplied per call by the caller, never
/// stored here.
#[derive(Clone)]
pub struct HttpClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpClient {
    /// Create a client for the given base URL with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn transport_error(err: reqwest::Error) -> ApiError {
        ApiError::Network(err.to_string())
    }

    /// Map a non-success response to the error taxonomy, preferring the
    /// server-supplied message over a generic fallback.
    async fn error_from_response(resp: reqwest::Response) -> ApiError {
        let status = resp.status();
        let message = resp
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .filter(|m| !m.is_empty());

        if status == StatusCode::UNAUTHORIZED {
            ApiError::Auth(message.unwrap_or_else(|| "Invalid or expired credential".to_string()))
        } else {
            ApiError::Api(message.unwrap_or_else(|| format!("Request failed with status {status}")))
        }
    }

    async fn expect_success(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            Err(Self::error_from_response(resp).await)
        }
    }
}

#[async_trait]
impl TaskService for HttpClient {
    async fn list_tasks(&self, token: &str) -> Result<Vec<TaskRecord>, ApiError> {
        let resp = self
            .client
            .get(self.url("/api/todoist/list"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(Self::transport_error)?;

        Self::expect_success(resp)
            .await?
            .json::<Vec<TaskRecord>>()
            .await
            .map_err(|e| ApiError::Api(format!("Malformed task list response: {e}")))
    }

    async fn update_task(
        &self,
        token: &str,
        task_id: &str,
        args: &UpdateTaskArgs,
    ) -> Result<(), ApiError> {
        let resp = self
            .client
            .put(self.url(&format!("/api/todoist/update/{task_id}")))
            .bearer_auth(token)
            .json(args)
            .send()
            .await
            .map_err(Self::transport_error)?;

        Self::expect_success(resp).await.map(|_| ())
    }

    async fn delete_task(&self, token: &str, task_id: &str) -> Result<(), ApiError> {
        let resp = self
            .client
            .delete(self.url(&format!("/api/todoist/delete/{task_id}")))
            .bearer_auth(token)
            .send()
            .await
            .map_err(Self::transport_error)?;

        Self::expect_success(resp).await.map(|_| ())
    }

    async fn complete_task(&self, token: &str, task_id: &str) -> Result<(), ApiError> {
        let resp = self
            .client
            .put(self.url(&format!("/api/todoist/complete/{task_id}")))
            .bearer_auth(token)
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(Self::transport_error)?;

        Self::expect_success(resp).await.map(|_| ())
    }
}

#[async_trait]
impl AnalysisService for HttpClient {
    async fn analyze(
        &self,
        token: &str,
        request: &AnalysisRequest,
    ) -> Result<AnalysisReport, ApiError> {
        let resp = self
            .client
            .post(self.url("/api/codecheck"))
            .bearer_auth(token)
            .json(request)
            .send()
            .await
            .map_err(Self::transport_error)?;

        Self::expect_success(resp)
            .await?
            .json::<AnalysisReport>()
            .await
            .map_err(|e| ApiError::Api(format!("Malformed analysis response: {e}")))
    }
}
