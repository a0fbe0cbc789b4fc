//! Add operation
//!
//! Resolves the requested resources, checks for files that would be
//! overwritten, then writes every file and the updated `asterhub.json` in a
//! single transaction. If anything fails after the transaction has begun,
//! the project is rolled back before the error is returned.

use std::collections::HashSet;

use crate::cli::AddArgs;
use crate::config::ProjectConfig;
use crate::config::paths::CONFIG_FILE;
use crate::error::{AsterError, Result};
use crate::progress::{self, ProgressDisplay};
use crate::resolver::{Fetcher, InstallPlan, Resolver};
use crate::resource::{ResolvedResource, ResourceKey, ResourceRef};
use crate::transaction::Installer;
use crate::ui;
use crate::workspace::Project;

use super::abort;

/// Configuration options for add
#[derive(Debug, Clone, Default)]
pub struct AddOptions {
    pub force: bool,
    /// Show spinner and progress bar
    pub progress: bool,
}

impl From<&AddArgs> for AddOptions {
    fn from(args: &AddArgs) -> Self {
        Self {
            force: args.force,
            progress: true,
        }
    }
}

/// An existing file the install would overwrite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    /// Path relative to the project root
    pub path: String,
    /// Resource that would write it
    pub key: ResourceKey,
}

/// What a successful add did
#[derive(Debug, Default)]
pub struct AddSummary {
    /// Installed resources, in install order
    pub installed: Vec<ResourceKey>,
    pub files_written: usize,
    /// npm packages the installed resources need, first occurrence order
    pub dependencies: Vec<String>,
    pub dev_dependencies: Vec<String>,
}

/// High-level add operation
pub struct AddOperation<'a, F> {
    project: &'a Project,
    resolver: Resolver<F>,
    options: AddOptions,
}

impl<'a, F: Fetcher> AddOperation<'a, F> {
    pub fn new(project: &'a Project, fetcher: F, options: AddOptions) -> Self {
        Self {
            project,
            resolver: Resolver::new(fetcher),
            options,
        }
    }

    /// Install `inputs` and their dependencies
    ///
    /// `confirm` is asked before overwriting existing files unless `force`
    /// is set. Returns `None` when the user declined.
    pub fn execute(
        &self,
        inputs: &[String],
        confirm: impl FnOnce(&[Conflict]) -> Result<bool>,
    ) -> Result<Option<AddSummary>> {
        let config = self.project.load_config()?;
        let roots = parse_references(inputs, &config.default_namespace)?;
        self.execute_refs(&roots, confirm)
    }

    /// Install already-parsed references and their dependencies
    pub fn execute_refs(
        &self,
        roots: &[ResourceRef],
        confirm: impl FnOnce(&[Conflict]) -> Result<bool>,
    ) -> Result<Option<AddSummary>> {
        let mut config = self.project.load_config()?;

        let spinner = self.options.progress.then(progress::resolution_spinner);
        let plan = self.resolver.resolve(roots);
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
        tracing::debug!(resources = plan.order.len(), errors = plan.errors.len(), "resolved");

        if !plan.is_complete() {
            ui::display_resolution_errors(&plan.errors);
            return Err(AsterError::ResolutionFailed {
                count: plan.errors.len(),
            });
        }

        let conflicts = find_conflicts(self.project, &config, &plan);
        if !conflicts.is_empty() && !self.options.force && !confirm(&conflicts)? {
            tracing::info!(conflicts = conflicts.len(), "add cancelled");
            return Ok(None);
        }

        let files_written = self.install(&mut config, &plan)?;
        let (dependencies, dev_dependencies) = npm_dependencies(&plan);

        Ok(Some(AddSummary {
            installed: plan.order.clone(),
            files_written,
            dependencies,
            dev_dependencies,
        }))
    }

    /// Write the plan and the updated config inside one transaction
    fn install(&self, config: &mut ProjectConfig, plan: &InstallPlan) -> Result<usize> {
        let mut installer = Installer::new(&self.project.root);
        installer.begin()?;

        let total: usize = plan.iter().map(|r| r.content.files.len()).sum();
        let progress = self
            .options
            .progress
            .then(|| ProgressDisplay::new(total as u64));

        match write_plan(&mut installer, config, plan, progress.as_ref()) {
            Ok(()) => {
                if let Some(progress) = &progress {
                    progress.finish();
                }
                Ok(total)
            }
            Err(e) => {
                if let Some(progress) = &progress {
                    progress.abandon();
                }
                abort(&mut installer);
                Err(e)
            }
        }
    }
}

fn write_plan(
    installer: &mut Installer,
    config: &mut ProjectConfig,
    plan: &InstallPlan,
    progress: Option<&ProgressDisplay>,
) -> Result<()> {
    let planned: HashSet<&str> = plan
        .iter()
        .flat_map(|r| r.content.files.iter().map(|f| f.path.as_str()))
        .collect();

    for resource in plan.iter() {
        for file in &resource.content.files {
            installer.write(&file.path, file.bytes())?;
            if let Some(progress) = progress {
                progress.update_file(&file.path);
            }
        }
        for path in stale_files(config, resource, &planned) {
            tracing::debug!(path = %path, "removing file dropped by new version");
            installer.delete(&path)?;
        }
        config.mark_installed(resource);
        tracing::debug!(key = %resource.reference.key(), "installed");
    }

    installer.write(CONFIG_FILE, config.to_json()?.as_bytes())?;
    installer.commit()
}

/// Files recorded for an earlier install of `resource` that its new content
/// no longer has
///
/// Files still recorded by another resource, or written by any resource in
/// this plan, are kept.
pub fn stale_files(config: &ProjectConfig, resource: &ResolvedResource, planned: &HashSet<&str>) -> Vec<String> {
    let reference = &resource.reference;
    let Some(previous) = config.installed(reference.kind, &reference.name) else {
        return Vec::new();
    };

    previous
        .files
        .iter()
        .filter(|path| !planned.contains(path.as_str()))
        .filter(|path| {
            !config.entries().into_iter().any(|(kind, name, record)| {
                (kind, name) != (reference.kind, reference.name.as_str())
                    && record.files.iter().any(|f| f == *path)
            })
        })
        .cloned()
        .collect()
}

/// Parse user input into references, filling in the default namespace
pub fn parse_references(inputs: &[String], default_namespace: &str) -> Result<Vec<ResourceRef>> {
    inputs
        .iter()
        .map(|input| ResourceRef::parse_with_default(input, default_namespace))
        .collect()
}

/// Existing files the plan would overwrite
///
/// Files already recorded as belonging to the same installed resource are
/// not conflicts: re-adding a resource updates it in place.
pub fn find_conflicts(project: &Project, config: &ProjectConfig, plan: &InstallPlan) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    for resource in plan.iter() {
        let reference = &resource.reference;
        for file in &resource.content.files {
            if !project.root.join(&file.path).exists() {
                continue;
            }
            if config.owns(reference.kind, &reference.name, &file.path) {
                continue;
            }
            conflicts.push(Conflict {
                path: file.path.clone(),
                key: reference.key(),
            });
        }
    }
    conflicts
}

/// Deduplicated npm dependencies of every planned resource
pub fn npm_dependencies(plan: &InstallPlan) -> (Vec<String>, Vec<String>) {
    let mut dependencies = Vec::new();
    let mut dev_dependencies = Vec::new();
    let mut seen = HashSet::new();
    let mut seen_dev = HashSet::new();

    for resource in plan.iter() {
        for dep in &resource.content.dependencies {
            if seen.insert(dep.as_str()) {
                dependencies.push(dep.clone());
            }
        }
        for dep in &resource.content.dev_dependencies {
            if seen_dev.insert(dep.as_str()) {
                dev_dependencies.push(dep.clone());
            }
        }
    }

    (dependencies, dev_dependencies)
}
