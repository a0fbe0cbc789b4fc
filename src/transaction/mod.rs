//! Transactional file installer with a write-ahead journal
//!
//! Every mutation of the project goes through an [`Installer`]. Before a file
//! is written or deleted, the intended operation and the file's prior content
//! are appended to `.asterhub/.transaction.json` and the journal is flushed to
//! disk. If the process dies halfway through, [`recover`] replays the journal
//! backwards and puts the project back the way it was.
//!
//! ## Usage
//!
//! ```ignore
//! let mut installer = Installer::new(&project.root);
//! installer.begin()?;
//!
//! if let Err(e) = installer.write("components/ui/button.tsx", bytes) {
//!     let report = installer.rollback()?;
//!     return Err(e);
//! }
//!
//! installer.commit()?;
//! ```
//!
//! Dropping an active installer does not roll back. The journal stays on disk
//! and the next `begin()` refuses to start until it is recovered.

pub mod journal;


use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::error::{AsterError, Result};
use crate::workspace::Project;
use journal::{JournalLock, Operation, OperationKind, Transaction, remove_journal};

/// A path the undo pass could not put back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of undoing a transaction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RollbackReport {
    /// Files whose previous content was written back
    pub restored: Vec<PathBuf>,
    /// Files created by the transaction and removed again
    pub removed: Vec<PathBuf>,
    pub failures: Vec<RestoreFailure>,
}

impl RollbackReport {
    /// True when every path was restored
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn fail(&mut self, path: &Path, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::warn!(path = %path.display(), reason = %reason, "failed to restore");
        self.failures.push(RestoreFailure {
            path: path.to_path_buf(),
            reason,
        });
    }
}

/// Result of [`recover`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryOutcome {
    /// No journal on disk
    NothingToRecover,
    /// A committed journal was left behind and has been deleted
    DiscardedCompleted { id: String },
    /// An interrupted transaction was undone
    RolledBack { id: String, report: RollbackReport },
}

/// Transaction in progress, together with the lock that guards it
struct Active {
    transaction: Transaction,
    _lock: JournalLock,
}

/// Applies file writes and deletes to a project, journaling each one first
pub struct Installer {
    project: Project,
    active: Option<Active>,
}

impl Installer {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project: Project::at(project_root),
            active: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// The transaction in progress, if any
    #[cfg(test)]
    pub fn transaction(&self) -> Option<&Transaction> {
        self.active.as_ref().map(|a| &a.transaction)
    }

    /// Start a transaction and return its id
    ///
    /// Fails with `PendingTransaction` when an interrupted transaction is
    /// still journaled, and with `TransactionLocked` when another process
    /// is mid-transaction on this project.
    pub fn begin(&mut self) -> Result<String> {
        if let Some(active) = &self.active {
            return Err(AsterError::PendingTransaction {
                id: active.transaction.id.clone(),
                started_at: active.transaction.started_at.clone(),
            });
        }

        let journal_path = self.project.journal_path();
        fs::create_dir_all(&self.project.state_dir).map_err(|e| AsterError::DirCreateFailed {
            path: self.project.state_dir.display().to_string(),
            reason: e.to_string(),
        })?;

        ensure_no_pending(&journal_path)?;
        let lock = JournalLock::try_acquire(&self.project.lock_path())?;
        // another process may have begun between the check and the lock
        ensure_no_pending(&journal_path)?;

        let transaction = Transaction::new();
        transaction.persist(&journal_path)?;

        let id = transaction.id.clone();
        tracing::info!(id = %id, root = %self.project.root.display(), "transaction started");

        self.active = Some(Active {
            transaction,
            _lock: lock,
        });
        Ok(id)
    }

    /// Write `content` to `path`, creating parent directories as needed
    pub fn write(&mut self, path: impl AsRef<Path>, content: &[u8]) -> Result<()> {
        let target = self.resolve_path(path.as_ref())?;
        let journal_path = self.project.journal_path();
        let active = self.active.as_mut().ok_or(AsterError::NoActiveTransaction)?;

        let (is_new_file, backup_content) = capture(&active.transaction, &target)?;
        let new_dirs = missing_parents(&target, &self.project.root);
        for dir in &new_dirs {
            if !active.transaction.created_dirs.contains(dir) {
                active.transaction.created_dirs.push(dir.clone());
            }
        }
        active.transaction.operations.push(Operation {
            kind: OperationKind::Write,
            path: target.clone(),
            new_content: Some(content.to_vec()),
            backup_content,
            is_new_file,
        });
        active.transaction.persist(&journal_path)?;

        tracing::debug!(path = %target.display(), bytes = content.len(), "write");

        if let Some(parent) = new_dirs.last() {
            fs::create_dir_all(parent).map_err(|e| AsterError::DirCreateFailed {
                path: parent.display().to_string(),
                reason: e.to_string(),
            })?;
        }
        fs::write(&target, content).map_err(|e| AsterError::FileWriteFailed {
            path: target.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Delete `path`; deleting a file that does not exist succeeds
    pub fn delete(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let target = self.resolve_path(path.as_ref())?;
        let journal_path = self.project.journal_path();
        let active = self.active.as_mut().ok_or(AsterError::NoActiveTransaction)?;

        let (is_new_file, backup_content) = capture(&active.transaction, &target)?;
        active.transaction.operations.push(Operation {
            kind: OperationKind::Delete,
            path: target.clone(),
            new_content: None,
            backup_content,
            is_new_file,
        });
        active.transaction.persist(&journal_path)?;

        tracing::debug!(path = %target.display(), "delete");

        match fs::remove_file(&target) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AsterError::FileDeleteFailed {
                path: target.display().to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// Make the transaction permanent and remove the journal
    pub fn commit(&mut self) -> Result<()> {
        let mut active = self.active.take().ok_or(AsterError::NoActiveTransaction)?;
        let journal_path = self.project.journal_path();

        active.transaction.completed = true;
        if let Err(e) = active.transaction.persist(&journal_path) {
            active.transaction.completed = false;
            self.active = Some(active);
            return Err(e);
        }

        // a completed journal left behind is discarded by the next begin or recover
        if let Err(e) = remove_journal(&journal_path) {
            tracing::warn!(error = %e, "failed to remove committed journal");
        }

        tracing::info!(
            id = %active.transaction.id,
            operations = active.transaction.operations.len(),
            "transaction committed"
        );
        Ok(())
    }

    /// Undo everything done since `begin()`
    pub fn rollback(&mut self) -> Result<RollbackReport> {
        let active = self.active.take().ok_or(AsterError::NoActiveTransaction)?;
        let report = undo(&active.transaction, &self.project.journal_path());

        tracing::info!(
            id = %active.transaction.id,
            restored = report.restored.len(),
            removed = report.removed.len(),
            failures = report.failures.len(),
            "transaction rolled back"
        );
        Ok(report)
    }

    /// Absolute path for `path`, which must stay inside the project and
    /// outside its state directory
    fn resolve_path(&self, path: &Path) -> Result<PathBuf> {
        let outside = || AsterError::PathOutsideProject {
            path: path.display().to_string(),
        };

        if path.components().any(|c| matches!(c, Component::ParentDir)) {
            return Err(outside());
        }

        let target = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project.root.join(path)
        };

        if target == self.project.root
            || !target.starts_with(&self.project.root)
            || target.starts_with(&self.project.state_dir)
        {
            return Err(outside());
        }
        Ok(target)
    }
}

/// Undo an interrupted transaction left in `project_root`, if any
///
/// A corrupt journal is reported as `JournalCorrupt` and left on disk.
pub fn recover(project_root: &Path) -> Result<RecoveryOutcome> {
    let project = Project::at(project_root);
    let journal_path = project.journal_path();

    if Transaction::load(&journal_path)?.is_none() {
        return Ok(RecoveryOutcome::NothingToRecover);
    }

    let _lock = JournalLock::try_acquire(&project.lock_path())?;
    let Some(transaction) = Transaction::load(&journal_path)? else {
        return Ok(RecoveryOutcome::NothingToRecover);
    };

    if transaction.completed {
        remove_journal(&journal_path)?;
        tracing::info!(id = %transaction.id, "discarded completed journal");
        return Ok(RecoveryOutcome::DiscardedCompleted { id: transaction.id });
    }

    let report = undo(&transaction, &journal_path);
    tracing::info!(
        id = %transaction.id,
        restored = report.restored.len(),
        removed = report.removed.len(),
        failures = report.failures.len(),
        "recovered interrupted transaction"
    );
    Ok(RecoveryOutcome::RolledBack {
        id: transaction.id,
        report,
    })
}

/// Delete the journal in `project_root` without undoing anything
///
/// Meant for a journal that `recover` cannot read. Returns the id of the
/// discarded transaction when the journal was readable.
pub fn discard(project_root: &Path) -> Result<Option<String>> {
    let project = Project::at(project_root);
    let journal_path = project.journal_path();
    if !journal_path.exists() {
        return Ok(None);
    }

    let _lock = JournalLock::try_acquire(&project.lock_path())?;
    let id = match Transaction::load(&journal_path) {
        Ok(tx) => tx.map(|tx| tx.id),
        Err(AsterError::JournalCorrupt { reason, .. }) => {
            tracing::warn!(reason = %reason, "discarding corrupt journal");
            None
        }
        Err(e) => return Err(e),
    };

    remove_journal(&journal_path)?;
    tracing::info!(id = ?id, "journal discarded");
    Ok(id)
}

/// The interrupted transaction in `project_root`, if any
pub fn pending_transaction(project_root: &Path) -> Result<Option<Transaction>> {
    let journal_path = Project::at(project_root).journal_path();
    Ok(Transaction::load(&journal_path)?.filter(|tx| !tx.completed))
}

fn ensure_no_pending(journal_path: &Path) -> Result<()> {
    match Transaction::load(journal_path)? {
        Some(tx) if !tx.completed => Err(AsterError::PendingTransaction {
            id: tx.id,
            started_at: tx.started_at,
        }),
        _ => Ok(()),
    }
}

/// Pre-transaction state of `target`, captured only on its first touch
fn capture(transaction: &Transaction, target: &Path) -> Result<(Option<bool>, Option<Vec<u8>>)> {
    if transaction.touched(target) {
        return Ok((None, None));
    }
    match fs::read(target) {
        Ok(bytes) => Ok((Some(false), Some(bytes))),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok((Some(true), None)),
        Err(e) => Err(AsterError::FileReadFailed {
            path: target.display().to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Ancestors of `target` below `root` that do not exist yet, shallowest first
fn missing_parents(target: &Path, root: &Path) -> Vec<PathBuf> {
    let mut missing = Vec::new();
    let mut current = target.parent();
    while let Some(dir) = current {
        if dir == root || !dir.starts_with(root) || dir.exists() {
            break;
        }
        missing.push(dir.to_path_buf());
        current = dir.parent();
    }
    missing.reverse();
    missing
}

/// Reverse-replay `transaction`, then prune its directories and delete the journal
///
/// Never stops early: each failure is recorded and the next operation is tried.
fn undo(transaction: &Transaction, journal_path: &Path) -> RollbackReport {
    let mut report = RollbackReport::default();

    for op in transaction.operations.iter().rev() {
        if !op.is_first_touch() {
            continue;
        }
        match (op.is_new_file, &op.backup_content) {
            (Some(true), _) => match fs::remove_file(&op.path) {
                Ok(()) => report.removed.push(op.path.clone()),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => report.fail(&op.path, e.to_string()),
            },
            (_, Some(backup)) => match restore(&op.path, backup) {
                Ok(()) => report.restored.push(op.path.clone()),
                Err(e) => report.fail(&op.path, e.to_string()),
            },
            (_, None) => report.fail(&op.path, "journal has no backup for this file"),
        }
    }

    let mut dirs: Vec<&PathBuf> = transaction.created_dirs.iter().collect();
    dirs.sort_by_key(|d| std::cmp::Reverse(d.components().count()));
    for dir in dirs {
        let empty = fs::read_dir(dir)
            .map(|mut entries| entries.next().is_none())
            .unwrap_or(false);
        if !empty {
            continue;
        }
        if let Err(e) = fs::remove_dir(dir) {
            report.fail(dir, e.to_string());
        }
    }

    if let Err(e) = remove_journal(journal_path) {
        report.fail(journal_path, e.to_string());
    }

    report
}

fn restore(path: &Path, content: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}
