//! File-based Session Store Adapter
//!
//! Persists the session as a small YAML document so it survives restarts,
//! the way browser storage survives page reloads. The file is re-read on
//! every `get`, so external changes are always observed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::domain::foundation::SessionToken;
use crate::domain::Session;
use crate::ports::SessionStore;

/// On-disk representation of a session
#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    token: String,
    username: String,
    saved_at: DateTime<Utc>,
}

/// File-based storage for the current session
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Create a store backed by the given file
    ///
    /// # Example
    /// ```ignore
    /// let store = FileSessionStore::new("./.score-portal/session.yaml");
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Option<Session>, String> {
        let yaml = match fs::read_to_string(&self.path) {
            Ok(yaml) => yaml,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.to_string()),
        };

        let stored: StoredSession = serde_yaml::from_str(&yaml).map_err(|e| e.to_string())?;
        let token = SessionToken::new(stored.token).map_err(|e| e.to_string())?;

        tracing::trace!(username = %stored.username, saved_at = %stored.saved_at, "Session loaded");
        Ok(Some(Session::new(token, stored.username)))
    }

    fn write(&self, session: &Session) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| e.to_string())?;
            }
        }

        let stored = StoredSession {
            token: session.token.expose().to_string(),
            username: session.username.clone(),
            saved_at: Utc::now(),
        };
        let yaml = serde_yaml::to_string(&stored).map_err(|e| e.to_string())?;

        fs::write(&self.path, yaml).map_err(|e| e.to_string())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Option<Session> {
        match self.read() {
            Ok(session) => session,
            Err(error) => {
                tracing::warn!(path = %self.path.display(), %error, "Unreadable session file, treating as signed out");
                None
            }
        }
    }

    fn set(&self, session: Session) {
        if let Err(error) = self.write(&session) {
            tracing::warn!(path = %self.path.display(), %error, "Failed to persist session");
        }
    }

    fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(error) => {
                tracing::warn!(path = %self.path.display(), %error, "Failed to remove session file");
            }
        }
    }
}
