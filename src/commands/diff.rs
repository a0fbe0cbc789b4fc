//! Diff command implementation

use std::path::PathBuf;

use super::helpers::open_registry;
use crate::cli::DiffArgs;
use crate::error::Result;
use crate::operations::update::{check_versions, select_installed};
use crate::progress;
use crate::ui;
use crate::workspace::Project;

/// Run diff command
pub fn run(workspace: Option<PathBuf>, registry: Option<PathBuf>, args: DiffArgs) -> Result<()> {
    let project = Project::from_arg(workspace)?;
    let registry = open_registry(registry, &project)?;
    let config = project.load_config()?;

    let targets = select_installed(&config, &args.names)?;
    if targets.is_empty() {
        println!("No resources installed.");
        return Ok(());
    }

    let spinner = progress::resolution_spinner();
    let check = check_versions(&registry, &config, &targets);
    spinner.finish_and_clear();

    ui::display_version_check(&check);
    Ok(())
}
