//! Init command CLI wrapper
//!
//! Delegates to operations/init.rs.

use std::path::PathBuf;

use console::Style;

use super::helpers::confirm;
use crate::cli::InitArgs;
use crate::error::Result;
use crate::operations::{InitOperation, InitOptions, InitOutcome};
use crate::workspace::Project;

/// Run init command
pub fn run(workspace: Option<PathBuf>, args: InitArgs) -> Result<()> {
    let project = Project::from_arg(workspace)?;

    let operation = InitOperation::new(&project, InitOptions::from(&args));
    let outcome = operation.execute(|| confirm("asterhub.json already exists. Overwrite its settings?"))?;

    match outcome {
        InitOutcome::Cancelled => println!("Cancelled. No files were changed."),
        InitOutcome::Created => println!(
            "{} asterhub.json ({} + {})",
            Style::new().green().bold().apply_to("Created"),
            args.framework,
            args.style
        ),
        InitOutcome::Reconfigured => println!(
            "{} asterhub.json ({} + {}); installed resources were kept",
            Style::new().green().bold().apply_to("Updated"),
            args.framework,
            args.style
        ),
    }

    Ok(())
}
