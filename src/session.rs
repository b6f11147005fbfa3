//! Session-expiry policy shared by every remote operation.
//!
//! The backend signals a rejected credential the same way on every endpoint,
//! so the response to it lives in one place instead of being repeated per
//! call site: clear the stored credential, emit a single navigation event so
//! the caller can present a login surface, and surface a session-expired
//! message that is distinguishable from ordinary failures.

use std::sync::Arc;

use log::warn;
use tokio::sync::mpsc;

use crate::api::ApiError;
use crate::credentials::CredentialStore;

/// Prefix carried by every session-expired error message.
pub const SESSION_EXPIRED_PREFIX: &str = "Session expired";

/// Message surfaced when no credential is available before a call.
pub const TOKEN_MISSING: &str = "Authentication token missing. Please log in.";

/// Whether an error message came from the session-expiry policy.
pub fn is_session_expired(message: &str) -> bool {
    message.starts_with(SESSION_EXPIRED_PREFIX)
}

/// Events the engine emits toward its embedder. Navigation itself is the
/// embedder's job.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// The credential was rejected and cleared; a login surface is required.
    LoginRequired,
}

/// Handle bundling the credential store with the navigation channel.
#[derive(Clone)]
pub struct Session {
    credentials: Arc<dyn CredentialStore>,
    navigation: mpsc::UnboundedSender<SessionEvent>,
}

impl Session {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        navigation: mpsc::UnboundedSender<SessionEvent>,
    ) -> Self {
        Self {
            credentials,
            navigation,
        }
    }

    /// Current credential, if one is stored.
    pub fn token(&self) -> Option<String> {
        self.credentials.get()
    }

    /// Apply the expiry policy once: invalidate the credential, request
    /// navigation to login, and return the message to surface.
    pub fn expire(&self, detail: &str) -> String {
        self.credentials.clear();
        if self.navigation.send(SessionEvent::LoginRequired).is_err() {
            warn!("Session expired but no receiver is listening for navigation events");
        }
        format!("{SESSION_EXPIRED_PREFIX}: {detail}. Please log in again.")
    }

    /// Turn a remote failure into the message to surface, applying the
    /// expiry policy when the credential was rejected.
    pub fn describe_failure(&self, err: &ApiError) -> String {
        match err {
            ApiError::Auth(detail) => self.expire(detail),
            other => other.to_string(),
        }
    }
}
