//! Remove command CLI wrapper
//!
//! Delegates to operations/remove.rs.

use std::path::PathBuf;

use console::Style;

use super::helpers::confirm;
use crate::cli::RemoveArgs;
use crate::error::Result;
use crate::operations::{RemoveOperation, RemoveOptions};
use crate::workspace::Project;

/// Run remove command
pub fn run(workspace: Option<PathBuf>, args: RemoveArgs) -> Result<()> {
    let project = Project::from_arg(workspace)?;

    let operation = RemoveOperation::new(&project, RemoveOptions::from(&args));
    let summary = operation.execute(&args.names, |targets| {
        println!("\nThe following resource(s) will be removed:");
        for target in targets {
            println!("  - {} ({} file(s))", target.label(), target.record.files.len());
        }
        println!();
        confirm("Proceed with remove?")
    })?;

    let Some(summary) = summary else {
        println!("Cancelled. No files were changed.");
        return Ok(());
    };

    for name in &summary.unknown {
        eprintln!("{} {name} is not installed", Style::new().yellow().apply_to("Skipped:"));
    }
    println!(
        "{} {} ({} file(s) deleted)",
        Style::new().green().bold().apply_to("Removed"),
        summary.removed.join(", "),
        summary.files_deleted
    );

    Ok(())
}
