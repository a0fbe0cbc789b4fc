//! Update and version-check operations
//!
//! `diff` and `update` share the same check: fetch the latest registry
//! document of each selected installed resource and compare its version with
//! the recorded one. `update` then re-installs the chosen resources through
//! [`AddOperation`], so the new files and the config change land in one
//! transaction.

use std::cmp::Ordering;
use std::fmt;

use crate::cli::UpdateArgs;
use crate::config::ProjectConfig;
use crate::error::{AsterError, Result};
use crate::progress;
use crate::resolver::Fetcher;
use crate::resource::ResourceRef;
use crate::workspace::Project;

use super::add::{AddOperation, AddOptions, AddSummary, Conflict};

/// Configuration options for update
#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
    /// Take every outdated resource without asking which
    pub all: bool,
    /// Implies `all` and overwrites conflicts
    pub force: bool,
    pub progress: bool,
}

impl From<&UpdateArgs> for UpdateOptions {
    fn from(args: &UpdateArgs) -> Self {
        Self {
            all: args.all,
            force: args.force,
            progress: true,
        }
    }
}

/// An installed resource whose registry version is newer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outdated {
    pub reference: ResourceRef,
    pub current: String,
    pub latest: String,
}

impl Outdated {
    pub fn label(&self) -> String {
        self.reference.short_name()
    }
}

impl fmt::Display for Outdated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} → {}", self.label(), self.current, self.latest)
    }
}

/// Result of comparing installed versions with the registry
#[derive(Debug, Default)]
pub struct VersionCheck {
    pub outdated: Vec<Outdated>,
    pub up_to_date: Vec<ResourceRef>,
    /// Resources the registry no longer has, or could not be read
    pub unavailable: Vec<ResourceRef>,
}

/// What `update` ended up doing
#[derive(Debug)]
pub enum UpdateOutcome {
    NothingInstalled,
    UpToDate { checked: usize },
    Cancelled,
    Updated {
        updated: Vec<Outdated>,
        summary: AddSummary,
    },
}

/// Installed resources named by `names` (`[kind:]name` or bare name); all when empty
///
/// Fails with `NotInstalled` when names were given and none matched.
pub fn select_installed(config: &ProjectConfig, names: &[String]) -> Result<Vec<ResourceRef>> {
    let selected: Vec<ResourceRef> = config
        .entries()
        .into_iter()
        .map(|(kind, name, record)| ResourceRef::new(record.namespace.clone(), kind, name))
        .filter(|reference| {
            names.is_empty()
                || names
                    .iter()
                    .any(|n| *n == reference.short_name() || *n == reference.name)
        })
        .collect();

    if selected.is_empty() && !names.is_empty() {
        return Err(AsterError::NotInstalled {
            name: names.join(", "),
        });
    }
    Ok(selected)
}

/// Compare each installed version in `targets` with the latest in the registry
pub fn check_versions<F: Fetcher>(fetcher: &F, config: &ProjectConfig, targets: &[ResourceRef]) -> VersionCheck {
    let mut check = VersionCheck::default();

    for reference in targets {
        let Some(record) = config.installed(reference.kind, &reference.name) else {
            continue;
        };
        let latest = match fetcher.fetch(reference) {
            Ok(Some(resource)) => resource.content.version,
            Ok(None) => {
                tracing::warn!(reference = %reference, "no longer in the registry");
                check.unavailable.push(reference.clone());
                continue;
            }
            Err(e) => {
                tracing::warn!(reference = %reference, error = %e, "version check failed");
                check.unavailable.push(reference.clone());
                continue;
            }
        };

        if is_newer(&latest, &record.version) {
            check.outdated.push(Outdated {
                reference: reference.clone(),
                current: record.version.clone(),
                latest,
            });
        } else {
            check.up_to_date.push(reference.clone());
        }
    }

    check
}

/// Whether `latest` should replace `current`
///
/// Semantic versions are compared as such. Anything else counts as newer
/// whenever it differs.
pub fn is_newer(latest: &str, current: &str) -> bool {
    match (semver::Version::parse(latest), semver::Version::parse(current)) {
        (Ok(latest), Ok(current)) => latest.cmp(&current) == Ordering::Greater,
        _ => latest != current,
    }
}

/// High-level update operation
pub struct UpdateOperation<'a, F> {
    project: &'a Project,
    fetcher: F,
    options: UpdateOptions,
}

impl<'a, F: Fetcher + Clone> UpdateOperation<'a, F> {
    pub fn new(project: &'a Project, fetcher: F, options: UpdateOptions) -> Self {
        Self {
            project,
            fetcher,
            options,
        }
    }

    /// Check `names` (everything when empty) and re-install the outdated ones
    ///
    /// `select` picks which outdated resources to update unless `all` or
    /// `force` is set. `confirm` is the overwrite prompt of [`AddOperation`].
    pub fn execute(
        &self,
        names: &[String],
        select: impl FnOnce(&[Outdated]) -> Result<Vec<Outdated>>,
        confirm: impl FnOnce(&[Conflict]) -> Result<bool>,
    ) -> Result<UpdateOutcome> {
        let config = self.project.load_config()?;
        let targets = select_installed(&config, names)?;
        if targets.is_empty() {
            return Ok(UpdateOutcome::NothingInstalled);
        }

        let spinner = self.options.progress.then(progress::resolution_spinner);
        let check = check_versions(&self.fetcher, &config, &targets);
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }

        if check.outdated.is_empty() {
            return Ok(UpdateOutcome::UpToDate {
                checked: targets.len(),
            });
        }

        let chosen = if self.options.all || self.options.force {
            check.outdated
        } else {
            select(&check.outdated)?
        };
        if chosen.is_empty() {
            return Ok(UpdateOutcome::Cancelled);
        }

        let roots: Vec<ResourceRef> = chosen.iter().map(|o| o.reference.clone()).collect();
        let add = AddOperation::new(
            self.project,
            self.fetcher.clone(),
            AddOptions {
                force: self.options.force,
                progress: self.options.progress,
            },
        );

        match add.execute_refs(&roots, confirm)? {
            Some(summary) => {
                tracing::info!(updated = chosen.len(), "update finished");
                Ok(UpdateOutcome::Updated {
                    updated: chosen,
                    summary,
                })
            }
            None => Ok(UpdateOutcome::Cancelled),
        }
    }
}
