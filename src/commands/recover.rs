//! Recover command implementation

use std::path::PathBuf;

use crate::cli::RecoverArgs;
use crate::error::{AsterError, Result};
use crate::transaction::{self, RecoveryOutcome};
use crate::ui;
use crate::workspace::Project;

/// Run recover command
///
/// Fails with `RollbackIncomplete` when some paths could not be restored.
/// With `--discard` the journal is deleted without undoing anything.
pub fn run(workspace: Option<PathBuf>, args: RecoverArgs) -> Result<()> {
    let project = Project::from_arg(workspace)?;

    if args.discard {
        if project.journal_path().exists() {
            let id = transaction::discard(&project.root)?;
            ui::display_discarded(id.as_deref());
        } else {
            ui::display_recovery(&RecoveryOutcome::NothingToRecover);
        }
        return Ok(());
    }

    let outcome = transaction::recover(&project.root)?;

    ui::display_recovery(&outcome);

    match outcome {
        RecoveryOutcome::RolledBack { report, .. } if !report.is_clean() => {
            Err(AsterError::RollbackIncomplete {
                count: report.failures.len(),
            })
        }
        _ => Ok(()),
    }
}
