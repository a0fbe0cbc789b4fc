//! On-disk transaction journal and its advisory lock
//!
//! The journal is rewritten in full after every change: serialized into a
//! temporary file next to it, synced, then renamed over the old copy. A
//! reader therefore sees either the previous or the new journal, never a
//! torn one.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use fslock::LockFile;
use serde::{Deserialize, Serialize};

use crate::error::{AsterError, Result};

/// What an operation does to its path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Write,
    Delete,
}

/// One journaled file mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub kind: OperationKind,

    /// Absolute target path
    pub path: PathBuf,

    #[serde(default, skip_serializing_if = "Option::is_none", with = "base64_bytes")]
    pub new_content: Option<Vec<u8>>,

    /// Content before the transaction first touched `path`
    #[serde(default, skip_serializing_if = "Option::is_none", with = "base64_bytes")]
    pub backup_content: Option<Vec<u8>>,

    /// Whether `path` was absent before the first touch.
    /// `None` on every later touch of the same path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_new_file: Option<bool>,
}

impl Operation {
    /// Whether this operation captured the pre-transaction state of its path
    pub fn is_first_touch(&self) -> bool {
        self.is_new_file.is_some()
    }
}

/// Journal contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    /// RFC 3339 timestamp
    pub started_at: String,
    #[serde(default)]
    pub operations: Vec<Operation>,
    /// Directories created by the transaction, shallowest first
    #[serde(default)]
    pub created_dirs: Vec<PathBuf>,
    #[serde(default)]
    pub completed: bool,
}

impl Transaction {
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            started_at: chrono::Utc::now().to_rfc3339(),
            operations: Vec::new(),
            created_dirs: Vec::new(),
            completed: false,
        }
    }

    /// Whether any operation already targeted `path`
    pub fn touched(&self, path: &Path) -> bool {
        self.operations.iter().any(|op| op.path == path)
    }

    /// Read the journal at `path`, if there is one
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let raw = match fs::read(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AsterError::FileReadFailed {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                });
            }
        };

        serde_json::from_slice(&raw)
            .map(Some)
            .map_err(|e| AsterError::JournalCorrupt {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
    }

    /// Atomically replace the journal at `path` with this transaction
    pub fn persist(&self, path: &Path) -> Result<()> {
        let write_failed = |reason: String| AsterError::FileWriteFailed {
            path: path.display().to_string(),
            reason,
        };

        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let json = serde_json::to_vec_pretty(self)?;

        let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(|e| write_failed(e.to_string()))?;
        temp.write_all(&json)
            .map_err(|e| write_failed(e.to_string()))?;
        temp.as_file()
            .sync_all()
            .map_err(|e| write_failed(e.to_string()))?;
        temp.persist(path)
            .map_err(|e| write_failed(e.error.to_string()))?;

        Ok(())
    }
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

/// Delete the journal at `path`; a missing journal is fine
pub fn remove_journal(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(AsterError::FileDeleteFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Exclusive advisory lock over the journal, released on drop
///
/// The lock file itself is left in place.
#[derive(Debug)]
pub struct JournalLock {
    lock: LockFile,
}

impl JournalLock {
    /// Take the lock without blocking
    pub fn try_acquire(lock_path: &Path) -> Result<Self> {
        let mut lock = LockFile::open(lock_path).map_err(|e| AsterError::FileWriteFailed {
            path: lock_path.display().to_string(),
            reason: format!("Failed to open lock file: {e}"),
        })?;

        let acquired = lock.try_lock().map_err(|e| AsterError::IoError {
            message: format!("Failed to lock {}: {e}", lock_path.display()),
        })?;

        if acquired {
            Ok(Self { lock })
        } else {
            Err(AsterError::TransactionLocked {
                path: lock_path.display().to_string(),
            })
        }
    }
}

impl Drop for JournalLock {
    fn drop(&mut self) {
        if self.lock.owns_lock() {
            let _ = self.lock.unlock();
        }
    }
}

/// Serde adapter storing optional byte payloads as base64 strings
mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(bytes) => serializer.serialize_some(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error> {
        let encoded: Option<String> = Option::deserialize(deserializer)?;
        encoded
            .map(|s| STANDARD.decode(s).map_err(serde::de::Error::custom))
            .transpose()
    }
}
