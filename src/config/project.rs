//! Project configuration (asterhub.json)
//!
//! Records which resources are installed in a project, from which namespace
//! and version, and which files they wrote:
//!
//! ```json
//! {
//!   "$schema": "https://asterhub.dev/schema/asterhub.json",
//!   "framework": "next",
//!   "style": "tailwind",
//!   "aliases": { "components": "@/components", "hooks": "@/hooks", "lib": "@/lib" },
//!   "defaultNamespace": "asterhub",
//!   "installed": {
//!     "ui": { "button": { "namespace": "asterhub", "version": "1.0.0", ... } },
//!     "hook": {},
//!     "lib": {},
//!     "config": {}
//!   }
//! }
//! ```
//!
//! Keys this version does not model are kept and written back unchanged.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::paths::{DEFAULT_FRAMEWORK, DEFAULT_NAMESPACE, DEFAULT_STYLE, STATE_DIR};
use crate::error::{AsterError, Result};
use crate::resource::{ResolvedResource, ResourceKind, is_valid_segment};

pub(crate) const SCHEMA_URL: &str = "https://asterhub.dev/schema/asterhub.json";

/// Project configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Framework variant to request from the registry (e.g. "next")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,

    /// Styling variant to request from the registry (e.g. "tailwind")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aliases: Option<Aliases>,

    /// Namespace filled in when a reference omits `@namespace/`
    #[serde(default = "default_namespace")]
    pub default_namespace: String,

    #[serde(default)]
    pub installed: InstalledMap,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            schema: Some(SCHEMA_URL.to_string()),
            framework: Some(DEFAULT_FRAMEWORK.to_string()),
            style: Some(DEFAULT_STYLE.to_string()),
            aliases: Some(Aliases::default()),
            default_namespace: default_namespace(),
            installed: InstalledMap::default(),
            extra: serde_json::Map::new(),
        }
    }
}

/// Import aliases of the project's source directories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Aliases {
    pub components: String,
    pub hooks: String,
    pub lib: String,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for Aliases {
    fn default() -> Self {
        Self {
            components: "@/components".to_string(),
            hooks: "@/hooks".to_string(),
            lib: "@/lib".to_string(),
            extra: serde_json::Map::new(),
        }
    }
}

impl Aliases {
    /// Project-relative directories behind the aliases (`@/components` → `components`)
    ///
    /// Fails on an alias that does not name a plain directory inside the
    /// project.
    pub fn directories(&self) -> Result<Vec<PathBuf>> {
        [("components", &self.components), ("hooks", &self.hooks), ("lib", &self.lib)]
            .into_iter()
            .map(|(field, alias)| {
                alias_directory(alias).ok_or_else(|| AsterError::InvalidConfigValue {
                    field: format!("{field} alias"),
                    value: alias.clone(),
                })
            })
            .collect()
    }
}

fn alias_directory(alias: &str) -> Option<PathBuf> {
    let relative = alias
        .strip_prefix("@/")
        .or_else(|| alias.strip_prefix("~/"))
        .unwrap_or(alias);
    let path = Path::new(relative);
    let plain = path.components().all(|c| matches!(c, Component::Normal(_)));
    let state = path.starts_with(STATE_DIR);
    (plain && !relative.is_empty() && !state).then(|| path.to_path_buf())
}

/// Framework and style a project installs resources for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub framework: String,
    pub style: String,
}

impl Variant {
    /// Both parts become registry path segments, so they are validated
    pub fn new(framework: &str, style: &str) -> Result<Self> {
        for (field, value) in [("framework", framework), ("style", style)] {
            if !is_valid_segment(value) {
                return Err(AsterError::InvalidConfigValue {
                    field: field.to_string(),
                    value: value.to_string(),
                });
            }
        }
        Ok(Self {
            framework: framework.to_string(),
            style: style.to_string(),
        })
    }
}

/// Installed resources, one section per kind, keyed by resource name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledMap {
    #[serde(default)]
    pub ui: BTreeMap<String, InstalledResource>,
    #[serde(default)]
    pub hook: BTreeMap<String, InstalledResource>,
    #[serde(default)]
    pub lib: BTreeMap<String, InstalledResource>,
    #[serde(default)]
    pub config: BTreeMap<String, InstalledResource>,
}

impl InstalledMap {
    pub fn section(&self, kind: ResourceKind) -> &BTreeMap<String, InstalledResource> {
        match kind {
            ResourceKind::Ui => &self.ui,
            ResourceKind::Hook => &self.hook,
            ResourceKind::Lib => &self.lib,
            ResourceKind::Config => &self.config,
        }
    }

    pub fn section_mut(&mut self, kind: ResourceKind) -> &mut BTreeMap<String, InstalledResource> {
        match kind {
            ResourceKind::Ui => &mut self.ui,
            ResourceKind::Hook => &mut self.hook,
            ResourceKind::Lib => &mut self.lib,
            ResourceKind::Config => &mut self.config,
        }
    }
}

/// Record of one installed resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledResource {
    pub namespace: String,
    pub version: String,
    /// RFC 3339 timestamp
    pub installed_at: String,
    /// `blake3:<hex>` over the installed files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integrity: Option<String>,
    /// Files written, relative to the project root
    #[serde(default)]
    pub files: Vec<String>,
}

impl ProjectConfig {
    /// Load from `path`; a missing file yields the default configuration
    pub fn load(path: &Path) -> Result<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(AsterError::FileReadFailed {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                });
            }
        };

        serde_json::from_str(&raw).map_err(|e| AsterError::ConfigParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Serialize as pretty JSON with a trailing newline
    pub fn to_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Record `resource` as installed, replacing any previous record
    pub fn mark_installed(&mut self, resource: &ResolvedResource) {
        let record = InstalledResource {
            namespace: resource.reference.namespace.clone(),
            version: resource.content.version.clone(),
            installed_at: chrono::Utc::now().to_rfc3339(),
            integrity: Some(resource.content.integrity()),
            files: resource.content.files.iter().map(|f| f.path.clone()).collect(),
        };
        self.installed
            .section_mut(resource.reference.kind)
            .insert(resource.reference.name.clone(), record);
    }

    /// Forget an installed resource, returning its record
    pub fn mark_removed(&mut self, kind: ResourceKind, name: &str) -> Option<InstalledResource> {
        self.installed.section_mut(kind).remove(name)
    }

    pub fn installed(&self, kind: ResourceKind, name: &str) -> Option<&InstalledResource> {
        self.installed.section(kind).get(name)
    }

    /// All installed resources, grouped by kind and sorted by name
    pub fn entries(&self) -> Vec<(ResourceKind, &str, &InstalledResource)> {
        ResourceKind::ALL
            .iter()
            .flat_map(|&kind| {
                self.installed
                    .section(kind)
                    .iter()
                    .map(move |(name, record)| (kind, name.as_str(), record))
            })
            .collect()
    }

    /// Registry variant from `framework` and `style`, when both are set
    ///
    /// An unusable value is logged and ignored, which falls back to the
    /// registry's plain documents.
    pub fn variant(&self) -> Option<Variant> {
        let (Some(framework), Some(style)) = (&self.framework, &self.style) else {
            return None;
        };
        match Variant::new(framework, style) {
            Ok(variant) => Some(variant),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring framework/style");
                None
            }
        }
    }

    /// Whether the recorded files of `kind`/`name` include `path`
    pub fn owns(&self, kind: ResourceKind, name: &str, path: &str) -> bool {
        self.installed(kind, name)
            .is_some_and(|record| record.files.iter().any(|f| f == path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::content::FileEntry;
    use crate::resource::{ResourceContent, ResourceRef};
    use tempfile::TempDir;

    fn button() -> ResolvedResource {
        let mut content: ResourceContent =
            serde_json::from_str(r#"{"name": "button", "version": "1.2.0"}"#).unwrap();
        content.files = vec![FileEntry::new("components/ui/button.tsx", "export {}")];
        ResolvedResource::new(
            ResourceRef::new("acme", ResourceKind::Ui, "button"),
            content,
            Vec::new(),
        )
    }

    #[test]
    fn test_load_missing_returns_default() {
        let temp = TempDir::new().unwrap();
        let config = ProjectConfig::load(&temp.path().join("asterhub.json")).unwrap();
        assert_eq!(config, ProjectConfig::default());
        assert_eq!(config.default_namespace, "asterhub");
    }

    #[test]
    fn test_load_invalid_json_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("asterhub.json");
        fs::write(&path, "{ nope").unwrap();
        let result = ProjectConfig::load(&path);
        assert!(matches!(result, Err(AsterError::ConfigParseFailed { .. })));
    }

    #[test]
    fn test_mark_installed_and_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("asterhub.json");

        let mut config = ProjectConfig::default();
        config.mark_installed(&button());
        fs::write(&path, config.to_json().unwrap()).unwrap();

        let loaded = ProjectConfig::load(&path).unwrap();
        let record = loaded.installed(ResourceKind::Ui, "button").unwrap();
        assert_eq!(record.namespace, "acme");
        assert_eq!(record.version, "1.2.0");
        assert_eq!(record.files, vec!["components/ui/button.tsx"]);
        assert!(record.integrity.as_deref().unwrap().starts_with("blake3:"));
        assert!(loaded.owns(ResourceKind::Ui, "button", "components/ui/button.tsx"));
        assert!(!loaded.owns(ResourceKind::Hook, "button", "components/ui/button.tsx"));

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"$schema\""));
        assert!(raw.contains("\"installedAt\""));
    }

    #[test]
    fn test_mark_removed() {
        let mut config = ProjectConfig::default();
        config.mark_installed(&button());
        assert!(config.mark_removed(ResourceKind::Ui, "button").is_some());
        assert!(config.mark_removed(ResourceKind::Ui, "button").is_none());
        assert!(config.entries().is_empty());
    }

    #[test]
    fn test_entries_grouped_by_kind() {
        let raw = r#"{
            "installed": {
                "lib": {"utils": {"namespace": "a", "version": "1", "installedAt": "t"}},
                "ui": {"card": {"namespace": "a", "version": "1", "installedAt": "t"},
                       "button": {"namespace": "a", "version": "1", "installedAt": "t"}}
            },
            "aliases": {"components": "@/components"}
        }"#;
        let config: ProjectConfig = serde_json::from_str(raw).unwrap();
        let names: Vec<(ResourceKind, &str)> =
            config.entries().iter().map(|(k, n, _)| (*k, *n)).collect();
        assert_eq!(
            names,
            vec![
                (ResourceKind::Ui, "button"),
                (ResourceKind::Ui, "card"),
                (ResourceKind::Lib, "utils"),
            ]
        );
        assert_eq!(config.default_namespace, "asterhub");
    }

    #[test]
    fn test_unmodelled_keys_survive_rewrite() {
        let raw = r#"{
            "framework": "next",
            "style": "tailwind",
            "aliases": {"components": "@/ui", "hooks": "@/hooks", "lib": "@/lib", "utils": "@/lib/utils"},
            "tsx": true,
            "tailwind": {"config": "tailwind.config.ts"},
            "installed": {"ui": {}, "hook": {}, "lib": {}, "config": {}}
        }"#;
        let mut config: ProjectConfig = serde_json::from_str(raw).unwrap();
        config.mark_installed(&button());

        let written: serde_json::Value = serde_json::from_str(&config.to_json().unwrap()).unwrap();
        assert_eq!(written["framework"], "next");
        assert_eq!(written["style"], "tailwind");
        assert_eq!(written["aliases"]["components"], "@/ui");
        assert_eq!(written["aliases"]["utils"], "@/lib/utils");
        assert_eq!(written["tsx"], true);
        assert_eq!(written["tailwind"]["config"], "tailwind.config.ts");
        assert_eq!(written["installed"]["ui"]["button"]["version"], "1.2.0");
    }

    #[test]
    fn test_variant_requires_both_parts() {
        let mut config = ProjectConfig::default();
        assert_eq!(
            config.variant(),
            Some(Variant::new("next", "tailwind").unwrap())
        );

        config.style = None;
        assert_eq!(config.variant(), None);

        config.style = Some("../escape".to_string());
        assert_eq!(config.variant(), None);
    }

    #[test]
    fn test_variant_rejects_path_segments() {
        assert!(matches!(
            Variant::new("next/../x", "tailwind"),
            Err(AsterError::InvalidConfigValue { .. })
        ));
        assert!(Variant::new("nuxt", "css-modules").is_ok());
    }

    #[test]
    fn test_alias_directories() {
        let mut aliases = Aliases {
            components: "@/src/components".to_string(),
            hooks: "~/hooks".to_string(),
            lib: "lib".to_string(),
            extra: serde_json::Map::new(),
        };
        assert_eq!(
            aliases.directories().unwrap(),
            vec![
                PathBuf::from("src/components"),
                PathBuf::from("hooks"),
                PathBuf::from("lib")
            ]
        );

        aliases.lib = "../outside".to_string();
        let result = aliases.directories();
        assert!(matches!(result, Err(AsterError::InvalidConfigValue { field, .. }) if field == "lib alias"));

        assert_eq!(alias_directory("/abs"), None);
        assert_eq!(alias_directory("@/.asterhub"), None);
        assert_eq!(alias_directory("@/"), None);
    }
}
