//! Code analysis front-end.
//!
//! Submits a requirements document plus a code snippet to the backend's
//! analyzer and returns the structured checklist. Input validation happens
//! here, before any request is issued; credential rejection goes through the
//! same session-expiry policy as the task operations.

use std::sync::Arc;

use anyhow::{bail, Result};
use log::{error, info};
use tokio::sync::mpsc;

use crate::api::{AnalysisReport, AnalysisRequest, AnalysisService};
use crate::credentials::CredentialStore;
use crate::session::{Session, SessionEvent, TOKEN_MISSING};

/// Client-side wrapper around the remote code analyzer.
#[derive(Clone)]
pub struct CodeChecker {
    analyzer: Arc<dyn AnalysisService>,
    session: Session,
}

impl CodeChecker {
    pub fn new(
        analyzer: Arc<dyn AnalysisService>,
        credentials: Arc<dyn CredentialStore>,
        navigation: mpsc::UnboundedSender<SessionEvent>,
    ) -> Self {
        Self {
            analyzer,
            session: Session::new(credentials, navigation),
        }
    }

    /// Analyze `code` against `requirements`.
    ///
    /// Empty inputs are rejected before any network call. Remote failures
    /// surface as errors carrying the server-supplied message where one
    /// exists; a rejected credential additionally clears the store and emits
    /// the login navigation event.
    pub async fn analyze(&self, requirements: &str, code: &str) -> Result<AnalysisReport> {
        if requirements.trim().is_empty() {
            bail!("Requirements cannot be empty");
        }
        if code.trim().is_empty() {
            bail!("Code snippet cannot be empty");
        }

        let Some(token) = self.session.token() else {
            bail!(TOKEN_MISSING);
        };

        let request = AnalysisRequest {
            requirements: requirements.to_string(),
            code: code.to_string(),
        };

        info!("Submitting code for analysis ({} bytes)", code.len());
        match self.analyzer.analyze(&token, &request).await {
            Ok(report) => {
                info!("Analysis returned {} checklist items", report.checklist.len());
                Ok(report)
            }
            Err(err) => {
                let message = self.session.describe_failure(&err);
                error!("Code analysis failed: {message}");
                bail!(message)
            }
        }
    }
}
