//! AsterHub - UI component registry client
//!
//! Installs registry resources (ui components, hooks, libs, configs) and
//! everything they depend on into a project, transactionally.

use clap::Parser;
use miette::Diagnostic;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod error;
mod operations;
mod progress;
mod resolver;
mod resource;
mod transaction;
mod ui;
mod workspace;

use cli::{Cli, Commands};
use config::paths::LOG_ENV;

/// Filter from `ASTERHUB_LOG`, else `debug` with `-v`, else `warn`
fn log_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "asterhub=debug" } else { "warn" })
    })
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose))
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let result = match cli.command {
        Commands::Init(args) => commands::init::run(cli.workspace, args),
        Commands::Add(args) => commands::add::run(cli.workspace, cli.registry, args),
        Commands::Remove(args) => commands::remove::run(cli.workspace, args),
        Commands::List => commands::list::run(cli.workspace),
        Commands::Update(args) => commands::update::run(cli.workspace, cli.registry, args),
        Commands::Diff(args) => commands::diff::run(cli.workspace, cli.registry, args),
        Commands::Recover(args) => commands::recover::run(cli.workspace, args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        if let Some(help) = e.help() {
            eprintln!("  help: {}", help);
        }
        std::process::exit(1);
    }
}
