//! Add command CLI wrapper
//!
//! Opens the project and registry, then delegates to operations/add.rs.

use std::path::PathBuf;

use console::Style;

use super::helpers::{confirm, open_registry};
use crate::cli::AddArgs;
use crate::error::Result;
use crate::operations::{AddOperation, AddOptions};
use crate::ui;
use crate::workspace::Project;

/// Run add command
pub fn run(workspace: Option<PathBuf>, registry: Option<PathBuf>, args: AddArgs) -> Result<()> {
    let project = Project::from_arg(workspace)?;
    let registry = open_registry(registry, &project)?;

    let operation = AddOperation::new(&project, registry, AddOptions::from(&args));
    let summary = operation.execute(&args.resources, |conflicts| {
        let listed: Vec<(String, String)> = conflicts
            .iter()
            .map(|c| (c.path.clone(), c.key.to_string()))
            .collect();
        ui::display_conflicts(&listed);
        confirm("Overwrite these files?")
    })?;

    let Some(summary) = summary else {
        println!("Cancelled. No files were changed.");
        return Ok(());
    };

    println!(
        "{} {} resource(s), {} file(s)",
        Style::new().green().bold().apply_to("Installed"),
        summary.installed.len(),
        summary.files_written
    );
    for key in &summary.installed {
        println!("  {key}");
    }
    ui::display_npm_hints(&summary.dependencies, &summary.dev_dependencies);

    Ok(())
}
