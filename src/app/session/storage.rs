//! Session persistence backends
//!
//! Only the session (user profile and token) survives a restart. It is stored
//! as one named JSON record:
//!
//! ```json
//! { "name": "console-session", "state": { "user": { ... }, "token": "..." } }
//! ```
//!
//! A missing record, or a record stored under a different name, reads back
//! as an empty session.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::app::models::Session;
use crate::constants::session;
use crate::errors::{PersistError, PersistResult};

/// Where the session is kept between runs
#[async_trait]
pub trait SessionStorage: Send + Sync + std::fmt::Debug {
    /// Read the stored session; an absent record is an empty session
    async fn load(&self) -> PersistResult<Session>;

    /// Replace the stored session
    async fn save(&self, session: &Session) -> PersistResult<()>;

    /// Remove the stored session
    async fn clear(&self) -> PersistResult<()>;
}

/// On-disk/in-memory record layout
#[derive(Debug, Serialize, Deserialize)]
struct PersistedRecord {
    name: String,
    state: Session,
}

fn encode(record_name: &str, session: &Session) -> PersistResult<String> {
    let record = PersistedRecord {
        name: record_name.to_string(),
        state: session.clone(),
    };
    Ok(serde_json::to_string_pretty(&record)?)
}

fn decode(record_name: &str, text: &str) -> PersistResult<Session> {
    let record: PersistedRecord = serde_json::from_str(text)?;
    if record.name != record_name {
        warn!(
            "Ignoring stored session record '{}' (expected '{}')",
            record.name, record_name
        );
        return Ok(Session::default());
    }
    Ok(record.state)
}

/// JSON file storage, written atomically
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
    record_name: String,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>, record_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            record_name: record_name.into(),
        }
    }

    /// `<config_dir>/console-store/session.json`
    ///
    /// # Errors
    ///
    /// Returns `PersistError::NoLocation` when the platform has no config directory
    pub fn default_path() -> PersistResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(session::APP_DIR).join(session::FILE_NAME))
            .ok_or(PersistError::NoLocation)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> PersistError {
        PersistError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| session::FILE_NAME.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl SessionStorage for FileSessionStorage {
    async fn load(&self) -> PersistResult<Session> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => decode(&self.record_name, &text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No stored session at {}", self.path.display());
                Ok(Session::default())
            }
            Err(e) => Err(self.io_error(e)),
        }
    }

    async fn save(&self, session: &Session) -> PersistResult<()> {
        let text = encode(&self.record_name, session)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| self.io_error(e))?;
            }
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, text)
            .await
            .map_err(|e| self.io_error(e))?;

        // The record holds a bearer token
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(session::FILE_PERMISSIONS);
            tokio::fs::set_permissions(&temp, perms)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| self.io_error(e))?;

        debug!("Session saved to {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> PersistResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

/// In-process storage holding the serialized record
#[derive(Debug)]
pub struct MemorySessionStorage {
    record_name: String,
    record: Mutex<Option<String>>,
}

impl Default for MemorySessionStorage {
    fn default() -> Self {
        Self::new(session::RECORD_NAME)
    }
}

impl MemorySessionStorage {
    pub fn new(record_name: impl Into<String>) -> Self {
        Self {
            record_name: record_name.into(),
            record: Mutex::new(None),
        }
    }

    /// Storage pre-seeded with raw record text
    pub fn with_raw(record_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            record_name: record_name.into(),
            record: Mutex::new(Some(text.into())),
        }
    }

    /// The stored record text, if any
    pub async fn raw(&self) -> Option<String> {
        self.record.lock().await.clone()
    }
}

#[async_trait]
impl SessionStorage for MemorySessionStorage {
    async fn load(&self) -> PersistResult<Session> {
        match self.record.lock().await.as_deref() {
            Some(text) => decode(&self.record_name, text),
            None => Ok(Session::default()),
        }
    }

    async fn save(&self, session: &Session) -> PersistResult<()> {
        let text = encode(&self.record_name, session)?;
        *self.record.lock().await = Some(text);
        Ok(())
    }

    async fn clear(&self) -> PersistResult<()> {
        *self.record.lock().await = None;
        Ok(())
    }
}
