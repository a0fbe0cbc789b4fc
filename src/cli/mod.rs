//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - init: Init command arguments
//! - add: Add command arguments
//! - remove: Remove command arguments
//! - update: Update and diff command arguments
//! - recover: Recover command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::paths::REGISTRY_ENV;

pub mod add;
pub mod completions;
pub mod init;
pub mod recover;
pub mod remove;
pub mod update;

pub use add::AddArgs;
pub use completions::CompletionsArgs;
pub use init::InitArgs;
pub use recover::RecoverArgs;
pub use remove::RemoveArgs;
pub use update::{DiffArgs, UpdateArgs};

/// AsterHub - UI component registry client
///
/// Install components, hooks and utilities from an AsterHub registry into a project.
#[derive(Parser, Debug)]
#[command(
    name = "asterhub",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Install UI components and their dependencies from an AsterHub registry",
    long_about = "AsterHub copies registry resources (ui components, hooks, libs, configs) into \
                  your project together with everything they depend on. Installs are \
                  transactional: an interrupted install can always be undone with 'asterhub recover'.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  asterhub init                           \x1b[90m# Create asterhub.json\x1b[0m\n   \
                  asterhub add button                     \x1b[90m# Add a ui component from the default namespace\x1b[0m\n   \
                  asterhub add @acme/hook:use-toggle@1.0  \x1b[90m# Add a pinned hook from another namespace\x1b[0m\n   \
                  asterhub remove button -y               \x1b[90m# Remove without confirmation\x1b[0m\n   \
                  asterhub list                           \x1b[90m# List installed resources\x1b[0m\n   \
                  asterhub diff                           \x1b[90m# Show resources with newer versions\x1b[0m\n   \
                  asterhub update --all                   \x1b[90m# Update every outdated resource\x1b[0m\n   \
                  asterhub recover                        \x1b[90m# Undo an interrupted install\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Project directory (defaults to current directory)
    #[arg(long, short = 'w', global = true)]
    pub workspace: Option<PathBuf>,

    /// Registry directory (defaults to ~/.asterhub/registry)
    #[arg(long, global = true, env = REGISTRY_ENV)]
    pub registry: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create or rewrite the project configuration
    Init(InitArgs),

    /// Add resources and their dependencies to the project
    Add(AddArgs),

    /// Remove installed resources
    Remove(RemoveArgs),

    /// List installed resources
    List,

    /// Re-install resources that have a newer registry version
    Update(UpdateArgs),

    /// Show installed resources that have a newer registry version
    Diff(DiffArgs),

    /// Undo an interrupted install
    Recover(RecoverArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_list() {
        let cli = Cli::try_parse_from(["asterhub", "list"]).unwrap();
        assert!(matches!(cli.command, Commands::List));
    }

    #[test]
    fn test_cli_parsing_recover() {
        let cli = Cli::try_parse_from(["asterhub", "recover"]).unwrap();
        assert!(matches!(cli.command, Commands::Recover(RecoverArgs { discard: false })));
    }

    #[test]
    fn test_cli_parsing_version() {
        let cli = Cli::try_parse_from(["asterhub", "version"]).unwrap();
        assert!(matches!(cli.command, Commands::Version));
    }

    #[test]
    fn test_cli_global_options() {
        let cli = Cli::try_parse_from([
            "asterhub",
            "-v",
            "-w",
            "/tmp/project",
            "--registry",
            "/tmp/registry",
            "list",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.workspace, Some(PathBuf::from("/tmp/project")));
        assert_eq!(cli.registry, Some(PathBuf::from("/tmp/registry")));
    }

    #[test]
    fn test_cli_global_options_after_subcommand() {
        let cli = Cli::try_parse_from(["asterhub", "list", "-w", "/tmp/project"]).unwrap();
        assert_eq!(cli.workspace, Some(PathBuf::from("/tmp/project")));
    }

    #[test]
    fn test_cli_unknown_command() {
        assert!(Cli::try_parse_from(["asterhub", "install"]).is_err());
    }
}
