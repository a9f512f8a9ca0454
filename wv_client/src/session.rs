//! Persisted session token storage.
//!
//! The client keeps a single bearer token on disk so a session survives
//! restarts. Absence of the file means logged out; a present token is used
//! as-is, with no expiry or signature check before use - a stale token
//! simply surfaces as a failed fetch.

use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// File name of the persisted token within the store directory.
const TOKEN_FILE: &str = "access_token";

/// On-disk store for the session's bearer token.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store rooted at the user's config directory (`wv_client/access_token`).
    pub fn new() -> Result<Self> {
        let dir = dirs::config_dir()
            .context("No config directory available")?
            .join("wv_client");
        Ok(Self {
            path: dir.join(TOKEN_FILE),
        })
    }

    /// Store rooted at an explicit directory.
    pub fn with_dir(dir: PathBuf) -> Self {
        Self {
            path: dir.join(TOKEN_FILE),
        }
    }

    /// Read the persisted token, if any.
    pub fn load(&self) -> Option<String> {
        let token = fs::read_to_string(&self.path).ok()?;
        let token = token.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    /// Persist the token, creating the store directory if needed.
    pub fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create session directory")?;
        }
        fs::write(&self.path, token).context("Failed to persist session token")?;
        log::debug!("session token saved to {}", self.path.display());
        Ok(())
    }

    /// Remove the persisted token. An already-absent token is fine.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).context("Failed to remove session token"),
        }
    }
}
