//! Update command CLI wrapper
//!
//! Delegates to operations/update.rs.

use std::path::PathBuf;

use console::Style;

use super::helpers::{confirm, open_registry, select};
use crate::cli::UpdateArgs;
use crate::error::Result;
use crate::operations::{UpdateOperation, UpdateOptions, UpdateOutcome};
use crate::ui;
use crate::workspace::Project;

/// Run update command
pub fn run(workspace: Option<PathBuf>, registry: Option<PathBuf>, args: UpdateArgs) -> Result<()> {
    let project = Project::from_arg(workspace)?;
    let registry = open_registry(registry, &project)?;

    let operation = UpdateOperation::new(&project, registry, UpdateOptions::from(&args));
    let outcome = operation.execute(
        &args.names,
        |outdated| {
            println!();
            select("Select resources to update", outdated.to_vec())
        },
        |conflicts| {
            let listed: Vec<(String, String)> = conflicts
                .iter()
                .map(|c| (c.path.clone(), c.key.to_string()))
                .collect();
            ui::display_conflicts(&listed);
            confirm("Overwrite these files?")
        },
    )?;

    match outcome {
        UpdateOutcome::NothingInstalled => println!("No resources installed."),
        UpdateOutcome::UpToDate { checked } => println!(
            "{} ({checked} checked)",
            Style::new().green().apply_to("Everything is up to date")
        ),
        UpdateOutcome::Cancelled => println!("Cancelled. No files were changed."),
        UpdateOutcome::Updated { updated, summary } => {
            println!(
                "{} {} resource(s), {} file(s)",
                Style::new().green().bold().apply_to("Updated"),
                updated.len(),
                summary.files_written
            );
            ui::display_outdated(&updated);
            ui::display_npm_hints(&summary.dependencies, &summary.dev_dependencies);
        }
    }

    Ok(())
}
