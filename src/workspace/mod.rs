//! Project location and layout
//!
//! ## Project Structure
//!
//! ```text
//! <root>/
//! ├── asterhub.json          # Installed resources
//! └── .asterhub/
//!     ├── .transaction.json  # Journal of an in-flight transaction
//!     └── .transaction.lock  # Advisory lock guarding the journal
//! ```

use std::path::{Path, PathBuf};

use crate::config::ProjectConfig;
use crate::config::paths::{CONFIG_FILE, LOCK_FILE, STATE_DIR, TRANSACTION_FILE};
use crate::error::{AsterError, Result};

/// A project directory resources are installed into
#[derive(Debug, Clone)]
pub struct Project {
    /// Canonical project root
    pub root: PathBuf,

    /// Tool-owned state directory (`<root>/.asterhub`)
    pub state_dir: PathBuf,
}

impl Project {
    /// Open the project rooted at `dir`
    pub fn open(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(AsterError::ProjectNotFound {
                path: dir.display().to_string(),
            });
        }
        let root = dunce::canonicalize(dir).map_err(|e| AsterError::IoError {
            message: format!("Failed to resolve project directory {}: {e}", dir.display()),
        })?;
        Ok(Self::at(root))
    }

    /// Layout for `root` without touching the filesystem
    pub fn at(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let state_dir = root.join(STATE_DIR);
        Self { root, state_dir }
    }

    /// Open from an optional CLI argument, falling back to the current directory
    pub fn from_arg(workspace: Option<PathBuf>) -> Result<Self> {
        let dir = match workspace {
            Some(path) => path,
            None => std::env::current_dir().map_err(|e| AsterError::IoError {
                message: format!("Failed to get current directory: {e}"),
            })?,
        };
        Self::open(&dir)
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn journal_path(&self) -> PathBuf {
        self.state_dir.join(TRANSACTION_FILE)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.state_dir.join(LOCK_FILE)
    }

    pub fn load_config(&self) -> Result<ProjectConfig> {
        ProjectConfig::load(&self.config_path())
    }
}
