//! Terminal output for commands
//!
//! Everything a user sees outside of progress bars and prompts goes
//! through here. Problems go to stderr, results to stdout.

use console::Style;

use crate::config::ProjectConfig;
use crate::operations::update::{Outdated, VersionCheck};
use crate::resolver::ResolutionError;
use crate::resource::ResourceKind;
use crate::transaction::{RecoveryOutcome, RollbackReport};

/// Print every resolution problem
pub fn display_resolution_errors(errors: &[ResolutionError]) {
    eprintln!(
        "{}",
        Style::new()
            .red()
            .bold()
            .apply_to("Dependency resolution failed:")
    );
    for error in errors {
        eprintln!("  {} {}", Style::new().red().apply_to("✗"), error);
    }
}

/// Print files an install would overwrite
pub fn display_conflicts(conflicts: &[(String, String)]) {
    println!(
        "\n{}",
        Style::new()
            .yellow()
            .bold()
            .apply_to("The following files already exist and will be overwritten:")
    );
    for (path, owner) in conflicts {
        println!("  {path} {}", Style::new().dim().apply_to(format!("({owner})")));
    }
    println!();
}

/// Print what an undo pass did
pub fn display_rollback_report(report: &RollbackReport) {
    if report.is_clean() {
        eprintln!(
            "{} ({} restored, {} removed)",
            Style::new().yellow().apply_to("Changes rolled back"),
            report.restored.len(),
            report.removed.len()
        );
        return;
    }

    eprintln!(
        "{}",
        Style::new()
            .red()
            .bold()
            .apply_to("Rollback could not restore these paths:")
    );
    for failure in &report.failures {
        eprintln!("  {} {}: {}", Style::new().red().apply_to("✗"), failure.path.display(), failure.reason);
    }
}

/// Print the package-manager commands for npm dependencies of installed resources
pub fn display_npm_hints(dependencies: &[String], dev_dependencies: &[String]) {
    if dependencies.is_empty() && dev_dependencies.is_empty() {
        return;
    }

    println!("\n{}", Style::new().bold().apply_to("Install npm dependencies:"));
    if !dependencies.is_empty() {
        println!("  npm install {}", dependencies.join(" "));
    }
    if !dev_dependencies.is_empty() {
        println!("  npm install -D {}", dev_dependencies.join(" "));
    }
}

/// Print installed resources grouped by kind
pub fn display_installed(config: &ProjectConfig) {
    let entries = config.entries();
    if entries.is_empty() {
        println!("No resources installed.");
        return;
    }

    let mut current: Option<ResourceKind> = None;
    for (kind, name, record) in entries {
        if current != Some(kind) {
            println!("{}", Style::new().bold().green().apply_to(kind));
            current = Some(kind);
        }
        println!(
            "  {} {}",
            Style::new().bold().yellow().apply_to(name),
            Style::new()
                .dim()
                .apply_to(format!("@{} {} ({} files)", record.namespace, record.version, record.files.len()))
        );
    }
}

/// Print the outcome of `asterhub recover`
pub fn display_recovery(outcome: &RecoveryOutcome) {
    match outcome {
        RecoveryOutcome::NothingToRecover => println!("Nothing to recover."),
        RecoveryOutcome::DiscardedCompleted { id } => {
            println!("Transaction {id} had already completed; removed its journal.");
        }
        RecoveryOutcome::RolledBack { id, report } => {
            println!(
                "{} {id}: {} restored, {} removed",
                Style::new().green().bold().apply_to("Rolled back transaction"),
                report.restored.len(),
                report.removed.len()
            );
            if !report.is_clean() {
                display_rollback_report(report);
            }
        }
    }
}

/// Print the outcome of `asterhub recover --discard`
pub fn display_discarded(id: Option<&str>) {
    match id {
        Some(id) => println!(
            "{} {id}; no files were changed.",
            Style::new().yellow().bold().apply_to("Discarded journal of transaction")
        ),
        None => println!("Discarded the unreadable journal; no files were changed."),
    }
}

/// Print resources whose registry version is newer than the installed one
pub fn display_version_check(check: &VersionCheck) {
    for reference in &check.unavailable {
        eprintln!(
            "{} {} could not be found in the registry",
            Style::new().yellow().apply_to("Skipped:"),
            reference.short_name()
        );
    }

    if check.outdated.is_empty() {
        println!(
            "{} ({} checked)",
            Style::new().green().apply_to("Everything is up to date"),
            check.up_to_date.len()
        );
        return;
    }

    println!("{}", Style::new().bold().apply_to("Updates available:"));
    display_outdated(&check.outdated);
    println!("\nRun 'asterhub update' to install them.");
}

/// Print one line per outdated resource
pub fn display_outdated(outdated: &[Outdated]) {
    for item in outdated {
        println!(
            "  {} {} → {}",
            Style::new().bold().yellow().apply_to(item.label()),
            Style::new().dim().apply_to(&item.current),
            Style::new().green().apply_to(&item.latest)
        );
    }
}
