//! List command implementation

use std::path::PathBuf;

use console::Style;

use crate::error::Result;
use crate::transaction::pending_transaction;
use crate::ui;
use crate::workspace::Project;

/// Run list command
pub fn run(workspace: Option<PathBuf>) -> Result<()> {
    let project = Project::from_arg(workspace)?;
    let config = project.load_config()?;

    ui::display_installed(&config);

    if let Some(pending) = pending_transaction(&project.root)? {
        eprintln!(
            "\n{} transaction {} (started {}) was interrupted; run 'asterhub recover'",
            Style::new().yellow().bold().apply_to("Warning:"),
            pending.id,
            pending.started_at
        );
    }

    Ok(())
}
