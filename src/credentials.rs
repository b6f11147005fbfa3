//! Bearer credential storage.
//!
//! The sync and analysis layers read the credential before every remote call
//! and clear it when the service rejects it, so the store is modeled as a
//! small trait with exactly those two operations. The default implementation
//! keeps the token in a file under the user config directory, with the
//! `TASKLENS_API_TOKEN` environment variable taking precedence when set.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use log::warn;

/// Environment variable consulted before the token file.
pub const TOKEN_ENV_VAR: &str = "TASKLENS_API_TOKEN";

/// Read/clear access to the caller's bearer credential.
pub trait CredentialStore: Send + Sync {
    /// Returns the current credential, if any.
    fn get(&self) -> Option<String>;

    /// Invalidates the stored credential so no further call uses it.
    fn clear(&self);
}

/// File-backed credential store.
///
/// The token lives in a plain file so a login flow outside this process can
/// write it and a session expiry in this process can revoke it. An
/// environment variable takes precedence over the file when set; since the
/// process environment cannot be unset reliably, `clear()` marks the
/// environment value revoked instead, and [`store`](Self::store) lifts the
/// revocation.
pub struct FileCredentialStore {
    path: PathBuf,
    env_var: String,
    env_revoked: AtomicBool,
}

impl FileCredentialStore {
    /// Create a store at the default location
    /// (`$XDG_CONFIG_HOME/tasklens/token`).
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir().context("Could not determine user config directory")?;
        Ok(Self::with_path(config_dir.join("tasklens").join("token")))
    }

    /// Create a store backed by a specific file.
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            env_var: TOKEN_ENV_VAR.to_string(),
            env_revoked: AtomicBool::new(false),
        }
    }

    /// Override the environment variable consulted before the token file.
    pub fn with_env_var(mut self, env_var: &str) -> Self {
        self.env_var = env_var.to_string();
        self
    }

    /// Persist a new credential, replacing any previous one and lifting a
    /// prior revocation of the environment override.
    pub fn store(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(&self.path, token.trim())
            .with_context(|| format!("Failed to write token file {}", self.path.display()))?;
        self.env_revoked.store(false, Ordering::SeqCst);
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Option<String> {
        if !self.env_revoked.load(Ordering::SeqCst) {
            if let Ok(token) = std::env::var(&self.env_var) {
                if !token.trim().is_empty() {
                    return Some(token.trim().to_string());
                }
            }
        }

        std::fs::read_to_string(&self.path)
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }

    fn clear(&self) {
        // Revoke the environment value too, or the next call would re-send
        // the credential the service just rejected.
        self.env_revoked.store(true, Ordering::SeqCst);
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove token file {}: {e}", self.path.display()),
        }
    }
}
