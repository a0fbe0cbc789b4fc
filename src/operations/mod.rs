//! High-level operations behind the CLI commands
//!
//! - AddOperation: resolve, check conflicts, install transactionally
//! - RemoveOperation: delete recorded files and config entries transactionally
//! - InitOperation: write the project configuration
//! - UpdateOperation: re-install outdated resources through AddOperation
//!
//! They take user confirmations as closures so the commands decide how to
//! prompt and tests can answer directly.

pub mod add;
pub mod init;
pub mod remove;
pub mod update;

pub use add::{AddOperation, AddOptions};
pub use init::{InitOperation, InitOptions, InitOutcome};
pub use remove::{RemoveOperation, RemoveOptions};
pub use update::{UpdateOperation, UpdateOptions, UpdateOutcome};

use crate::transaction::Installer;
use crate::ui;

/// Roll back after a failed step, reporting what could not be restored
pub(crate) fn abort(installer: &mut Installer) {
    if !installer.is_active() {
        return;
    }
    match installer.rollback() {
        Ok(report) => ui::display_rollback_report(&report),
        Err(e) => tracing::error!(error = %e, "rollback failed"),
    }
}
