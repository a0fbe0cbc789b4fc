//! Init operation
//!
//! Writes `asterhub.json` with the project's framework, style and import
//! aliases, and creates the aliased directories. Re-running init on a
//! configured project only replaces those settings: installed-resource
//! records and unknown keys are kept.

use std::fs;

use crate::cli::InitArgs;
use crate::config::paths::{CONFIG_FILE, DEFAULT_FRAMEWORK, DEFAULT_STYLE};
use crate::config::project::SCHEMA_URL;
use crate::config::{Aliases, ProjectConfig, Variant};
use crate::error::{AsterError, Result};
use crate::transaction::Installer;
use crate::workspace::Project;

use super::abort;

/// Configuration options for init
#[derive(Debug, Clone)]
pub struct InitOptions {
    pub framework: String,
    pub style: String,
    pub aliases: Aliases,
    /// Overwrite an existing configuration without asking
    pub force: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            framework: DEFAULT_FRAMEWORK.to_string(),
            style: DEFAULT_STYLE.to_string(),
            aliases: Aliases::default(),
            force: false,
        }
    }
}

impl From<&InitArgs> for InitOptions {
    fn from(args: &InitArgs) -> Self {
        Self {
            framework: args.framework.clone(),
            style: args.style.clone(),
            aliases: Aliases {
                components: args.components.clone(),
                hooks: args.hooks.clone(),
                lib: args.lib.clone(),
                ..Aliases::default()
            },
            force: args.force,
        }
    }
}

/// What init did
#[derive(Debug, PartialEq, Eq)]
pub enum InitOutcome {
    Created,
    /// An existing configuration was rewritten
    Reconfigured,
    Cancelled,
}

/// High-level init operation
pub struct InitOperation<'a> {
    project: &'a Project,
    options: InitOptions,
}

impl<'a> InitOperation<'a> {
    pub fn new(project: &'a Project, options: InitOptions) -> Self {
        Self { project, options }
    }

    /// Write the configuration
    ///
    /// `confirm` is asked before touching an existing `asterhub.json` unless
    /// `force` is set.
    pub fn execute(&self, confirm: impl FnOnce() -> Result<bool>) -> Result<InitOutcome> {
        let variant = Variant::new(&self.options.framework, &self.options.style)?;
        let directories = self.options.aliases.directories()?;

        let existing = self.project.config_path().exists();
        if existing && !self.options.force && !confirm()? {
            tracing::info!("init cancelled");
            return Ok(InitOutcome::Cancelled);
        }

        let mut config = self.project.load_config()?;
        config.schema = Some(SCHEMA_URL.to_string());
        config.framework = Some(variant.framework);
        config.style = Some(variant.style);
        let extra = config.aliases.take().map(|a| a.extra).unwrap_or_default();
        config.aliases = Some(Aliases {
            extra,
            ..self.options.aliases.clone()
        });

        let mut installer = Installer::new(&self.project.root);
        installer.begin()?;
        if let Err(e) = write_config(&mut installer, &config) {
            abort(&mut installer);
            return Err(e);
        }

        for dir in directories {
            let path = self.project.root.join(&dir);
            fs::create_dir_all(&path).map_err(|e| AsterError::DirCreateFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
            tracing::debug!(path = %dir.display(), "ensured alias directory");
        }

        Ok(if existing {
            InitOutcome::Reconfigured
        } else {
            InitOutcome::Created
        })
    }
}

fn write_config(installer: &mut Installer, config: &ProjectConfig) -> Result<()> {
    installer.write(CONFIG_FILE, config.to_json()?.as_bytes())?;
    installer.commit()
}
