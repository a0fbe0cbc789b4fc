//! Command helper utilities

use std::path::PathBuf;

use inquire::{Confirm, MultiSelect};

use crate::config::paths::default_registry_dir;
use crate::error::{AsterError, Result};
use crate::resolver::RegistryDir;
use crate::workspace::Project;

/// Registry from `--registry`/`ASTERHUB_REGISTRY`, else the per-user default
fn resolve_registry(registry: Option<PathBuf>) -> Result<RegistryDir> {
    let root = match registry {
        Some(path) => path,
        None => default_registry_dir().ok_or_else(|| AsterError::IoError {
            message: "Could not determine home directory; pass --registry".to_string(),
        })?,
    };

    let registry = RegistryDir::new(root);
    if !registry.root().is_dir() {
        tracing::warn!(path = %registry.root().display(), "registry directory does not exist");
    }
    Ok(registry)
}

/// Registry for `project`, preferring documents built for its framework and style
pub fn open_registry(registry: Option<PathBuf>, project: &Project) -> Result<RegistryDir> {
    let config = project.load_config()?;
    Ok(resolve_registry(registry)?.with_variant(config.variant()))
}

/// Ask a yes/no question, defaulting to no
pub fn confirm(prompt: &str) -> Result<bool> {
    Confirm::new(prompt)
        .with_default(false)
        .with_help_message("Press 'y' to continue, Enter to cancel")
        .prompt()
        .map_err(AsterError::from)
}

/// Let the user pick from `options`, all preselected
///
/// Escape or an empty selection yields an empty list.
pub fn select<T: std::fmt::Display>(prompt: &str, options: Vec<T>) -> Result<Vec<T>> {
    let all: Vec<usize> = (0..options.len()).collect();
    let picked = MultiSelect::new(prompt, options)
        .with_default(&all)
        .with_page_size(10)
        .with_help_message("  ↑↓ navigate  space select  enter confirm  type to filter  esc cancel")
        .prompt_skippable()?;
    Ok(picked.unwrap_or_default())
}
