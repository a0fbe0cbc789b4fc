//! Remove operation
//!
//! Deletes the files recorded for each named resource and drops the
//! resources from `asterhub.json`, all in one transaction. Files that another
//! remaining resource also records are left in place.

use std::collections::HashSet;
use std::str::FromStr;

use crate::cli::RemoveArgs;
use crate::config::paths::CONFIG_FILE;
use crate::config::{InstalledResource, ProjectConfig};
use crate::error::{AsterError, Result};
use crate::resource::ResourceKind;
use crate::transaction::Installer;
use crate::workspace::Project;

use super::abort;

/// Configuration options for remove
#[derive(Debug, Clone, Default)]
pub struct RemoveOptions {
    pub yes: bool,
}

impl From<&RemoveArgs> for RemoveOptions {
    fn from(args: &RemoveArgs) -> Self {
        Self { yes: args.yes }
    }
}

/// An installed resource selected for removal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveTarget {
    pub kind: ResourceKind,
    pub name: String,
    pub record: InstalledResource,
}

impl RemoveTarget {
    pub fn label(&self) -> String {
        format!("{}:{}", self.kind, self.name)
    }
}

/// What a successful remove did
#[derive(Debug, Default)]
pub struct RemoveSummary {
    pub removed: Vec<String>,
    pub files_deleted: usize,
    /// Names that matched nothing installed
    pub unknown: Vec<String>,
}

/// High-level remove operation
pub struct RemoveOperation<'a> {
    project: &'a Project,
    options: RemoveOptions,
}

impl<'a> RemoveOperation<'a> {
    pub fn new(project: &'a Project, options: RemoveOptions) -> Self {
        Self { project, options }
    }

    /// Remove `names`; `confirm` is asked unless `yes` is set
    ///
    /// Returns `None` when the user declined.
    pub fn execute(
        &self,
        names: &[String],
        confirm: impl FnOnce(&[RemoveTarget]) -> Result<bool>,
    ) -> Result<Option<RemoveSummary>> {
        let mut config = self.project.load_config()?;
        let (targets, unknown) = select_targets(&config, names)?;

        for name in &unknown {
            tracing::warn!(name = %name, "not installed, skipping");
        }
        if targets.is_empty() {
            return Err(AsterError::NotInstalled {
                name: names.join(", "),
            });
        }

        if !self.options.yes && !confirm(&targets)? {
            return Ok(None);
        }

        let files = files_to_delete(&config, &targets);
        let mut installer = Installer::new(&self.project.root);
        installer.begin()?;
        if let Err(e) = delete_targets(&mut installer, &mut config, &targets, &files) {
            abort(&mut installer);
            return Err(e);
        }

        Ok(Some(RemoveSummary {
            removed: targets.iter().map(RemoveTarget::label).collect(),
            files_deleted: files.len(),
            unknown,
        }))
    }
}

fn delete_targets(
    installer: &mut Installer,
    config: &mut ProjectConfig,
    targets: &[RemoveTarget],
    files: &[String],
) -> Result<()> {
    for file in files {
        installer.delete(file)?;
    }
    for target in targets {
        config.mark_removed(target.kind, &target.name);
        tracing::debug!(resource = %target.label(), "removed");
    }
    installer.write(CONFIG_FILE, config.to_json()?.as_bytes())?;
    installer.commit()
}

/// Match `[kind:]name` inputs against installed resources
///
/// Returns the matches and the inputs that matched nothing. A bare name
/// installed under more than one kind is rejected as ambiguous.
pub fn select_targets(config: &ProjectConfig, names: &[String]) -> Result<(Vec<RemoveTarget>, Vec<String>)> {
    let mut targets: Vec<RemoveTarget> = Vec::new();
    let mut unknown = Vec::new();

    for input in names {
        let matches: Vec<ResourceKind> = match input.split_once(':') {
            Some((kind, name)) => {
                let kind = ResourceKind::from_str(kind)?;
                config
                    .installed(kind, name)
                    .map(|_| kind)
                    .into_iter()
                    .collect()
            }
            None => ResourceKind::ALL
                .iter()
                .copied()
                .filter(|&kind| config.installed(kind, input).is_some())
                .collect(),
        };

        let name = input.split_once(':').map_or(input.as_str(), |(_, n)| n);
        match matches.as_slice() {
            [] => unknown.push(input.clone()),
            [kind] => {
                let already = targets.iter().any(|t| t.kind == *kind && t.name == name);
                if let (false, Some(record)) = (already, config.installed(*kind, name)) {
                    targets.push(RemoveTarget {
                        kind: *kind,
                        name: name.to_string(),
                        record: record.clone(),
                    });
                }
            }
            _ => {
                let kinds: Vec<&str> = matches.iter().map(|k| k.as_str()).collect();
                return Err(AsterError::InvalidReference {
                    input: input.clone(),
                    reason: format!("installed as more than one kind ({}); prefix it with the kind", kinds.join(", ")),
                });
            }
        }
    }

    Ok((targets, unknown))
}

/// Recorded files of `targets` that no remaining resource also records
fn files_to_delete(config: &ProjectConfig, targets: &[RemoveTarget]) -> Vec<String> {
    let removing: HashSet<(ResourceKind, &str)> = targets.iter().map(|t| (t.kind, t.name.as_str())).collect();
    let kept: HashSet<&str> = config
        .entries()
        .into_iter()
        .filter(|(kind, name, _)| !removing.contains(&(*kind, *name)))
        .flat_map(|(_, _, record)| record.files.iter().map(String::as_str))
        .collect();

    let mut seen = HashSet::new();
    targets
        .iter()
        .flat_map(|t| t.record.files.iter())
        .filter(|file| !kept.contains(file.as_str()) && seen.insert(file.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use tempfile::TempDir;

    fn record(files: &[&str]) -> InstalledResource {
        InstalledResource {
            namespace: "asterhub".to_string(),
            version: "1.0.0".to_string(),
            installed_at: "2026-01-01T00:00:00Z".to_string(),
            integrity: None,
            files: files.iter().map(|f| (*f).to_string()).collect(),
        }
    }

    fn setup() -> (TempDir, Project) {
        let temp = TempDir::new().unwrap();
        let project = Project::open(temp.path()).unwrap();

        let mut config = ProjectConfig::default();
        config
            .installed
            .ui
            .insert("button".to_string(), record(&["components/ui/button.tsx", "lib/utils.ts"]));
        config
            .installed
            .lib
            .insert("utils".to_string(), record(&["lib/utils.ts"]));
        config
            .installed
            .hook
            .insert("button".to_string(), record(&["hooks/use-button.ts"]));
        fs::write(project.config_path(), config.to_json().unwrap()).unwrap();

        for file in ["components/ui/button.tsx", "lib/utils.ts", "hooks/use-button.ts"] {
            let path = project.root.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, file).unwrap();
        }
        (temp, project)
    }

    fn names(inputs: &[&str]) -> Vec<String> {
        inputs.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_remove_keeps_files_shared_with_remaining_resources() {
        let (_temp, project) = setup();
        let operation = RemoveOperation::new(&project, RemoveOptions { yes: true });

        let summary = operation
            .execute(&names(&["ui:button"]), |_| Ok(false))
            .unwrap()
            .unwrap();

        assert_eq!(summary.removed, vec!["ui:button"]);
        assert_eq!(summary.files_deleted, 1);
        assert!(!project.root.join("components/ui/button.tsx").exists());
        assert!(project.root.join("lib/utils.ts").exists());

        let config = project.load_config().unwrap();
        assert!(config.installed(ResourceKind::Ui, "button").is_none());
        assert!(config.installed(ResourceKind::Hook, "button").is_some());
        assert!(!project.journal_path().exists());
    }

    #[test]
    fn test_ambiguous_bare_name_rejected() {
        let (_temp, project) = setup();
        let operation = RemoveOperation::new(&project, RemoveOptions { yes: true });

        let result = operation.execute(&names(&["button"]), |_| Ok(true));

        assert!(matches!(result, Err(AsterError::InvalidReference { .. })));
        assert!(project.root.join("components/ui/button.tsx").exists());
    }

    #[test]
    fn test_unknown_names_skipped() {
        let (_temp, project) = setup();
        let operation = RemoveOperation::new(&project, RemoveOptions { yes: true });

        let summary = operation
            .execute(&names(&["ghost", "utils"]), |_| Ok(true))
            .unwrap()
            .unwrap();

        assert_eq!(summary.unknown, vec!["ghost"]);
        assert_eq!(summary.removed, vec!["lib:utils"]);
        // still recorded by ui:button
        assert!(project.root.join("lib/utils.ts").exists());
    }

    #[test]
    fn test_nothing_installed_fails() {
        let (_temp, project) = setup();
        let operation = RemoveOperation::new(&project, RemoveOptions { yes: true });

        let result = operation.execute(&names(&["ghost"]), |_| Ok(true));
        assert!(matches!(result, Err(AsterError::NotInstalled { .. })));
    }

    #[test]
    fn test_declined_confirmation_changes_nothing() {
        let (_temp, project) = setup();
        let operation = RemoveOperation::new(&project, RemoveOptions { yes: false });

        let outcome = operation.execute(&names(&["hook:button"]), |targets| {
            assert_eq!(targets.len(), 1);
            Ok(false)
        });

        assert!(outcome.unwrap().is_none());
        assert!(project.root.join("hooks/use-button.ts").exists());
    }

    #[test]
    fn test_removing_both_owners_deletes_shared_file() {
        let (_temp, project) = setup();
        let config = project.load_config().unwrap();

        let (targets, unknown) = select_targets(&config, &names(&["ui:button", "lib:utils"])).unwrap();
        assert!(unknown.is_empty());
        assert_eq!(
            files_to_delete(&config, &targets),
            vec!["components/ui/button.tsx", "lib/utils.ts"]
        );
    }

    #[test]
    fn test_invalid_kind_prefix() {
        let (_temp, project) = setup();
        let config = project.load_config().unwrap();
        assert!(select_targets(&config, &names(&["widget:button"])).is_err());
    }
}
