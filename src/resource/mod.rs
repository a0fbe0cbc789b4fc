//! Resource references and identity
//!
//! A **Resource** is an installable unit (UI component, hook, library module or
//! config) published under a namespace. A **Reference** points at one:
//!
//! ```text
//! @acme/hook:use-debounce@1.2.0
//!  ^^^^ ^^^^ ^^^^^^^^^^^^ ^^^^^
//!  ns   kind name         version (absent = latest)
//! ```
//!
//! The kind prefix is elided for `ui`, so `@acme/button` is a UI component.
//! Identity for dependency resolution is `namespace + kind + name`; see
//! [`ResourceKey`].

pub mod content;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AsterError, Result};

pub use content::{ResolvedResource, ResourceContent};

/// The closed set of resource kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// UI component
    Ui,
    /// React-style hook
    Hook,
    /// Library module
    Lib,
    /// Configuration preset
    Config,
}

impl ResourceKind {
    /// All kinds, in display order
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Ui,
        ResourceKind::Hook,
        ResourceKind::Lib,
        ResourceKind::Config,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Ui => "ui",
            ResourceKind::Hook => "hook",
            ResourceKind::Lib => "lib",
            ResourceKind::Config => "config",
        }
    }

    /// Prefix used in keys and short names (`""` for UI components)
    pub fn key_prefix(self) -> &'static str {
        match self {
            ResourceKind::Ui => "",
            ResourceKind::Hook => "hook:",
            ResourceKind::Lib => "lib:",
            ResourceKind::Config => "config:",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = AsterError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ui" => Ok(ResourceKind::Ui),
            "hook" => Ok(ResourceKind::Hook),
            "lib" => Ok(ResourceKind::Lib),
            "config" => Ok(ResourceKind::Config),
            other => Err(AsterError::InvalidReference {
                input: other.to_string(),
                reason: "unknown resource kind (expected ui, hook, lib or config)".to_string(),
            }),
        }
    }
}

/// A parsed pointer to a resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRef {
    /// Publisher scope
    pub namespace: String,

    pub kind: ResourceKind,

    pub name: String,

    /// Pinned version; `None` means latest
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ResourceRef {
    pub fn new(namespace: impl Into<String>, kind: ResourceKind, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            kind,
            name: name.into(),
            version: None,
        }
    }

    /// Pin this reference to a version
    #[cfg(test)]
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Identity of this reference in the dependency graph
    pub fn key(&self) -> ResourceKey {
        ResourceKey::from(self)
    }

    /// Short display name without namespace (e.g. `hook:use-debounce`)
    pub fn short_name(&self) -> String {
        format!("{}{}", self.kind.key_prefix(), self.name)
    }

    /// Version to request from a registry
    pub fn version_or_latest(&self) -> &str {
        self.version.as_deref().unwrap_or("latest")
    }

    /// Parse a fully-qualified reference (`@namespace/[kind:]name[@version]`)
    pub fn parse(input: &str) -> Result<Self> {
        if !input.starts_with('@') {
            return Err(invalid(input, "missing @namespace/ prefix"));
        }
        parse_reference(input, None)
    }

    /// Parse a reference where the `@namespace/` part may be omitted
    ///
    /// This is the form accepted on the command line and in a resource's
    /// `registryDependencies`; which namespace fills the gap is up to the
    /// caller.
    pub fn parse_with_default(input: &str, default_namespace: &str) -> Result<Self> {
        parse_reference(input, Some(default_namespace))
    }
}

impl FromStr for ResourceRef {
    type Err = AsterError;

    fn from_str(s: &str) -> Result<Self> {
        ResourceRef::parse(s)
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())?;
        if let Some(version) = &self.version {
            write!(f, "@{version}")?;
        }
        Ok(())
    }
}

fn invalid(input: &str, reason: &str) -> AsterError {
    AsterError::InvalidReference {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}

pub(crate) fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Versions name a registry document, so they must stay a plain file stem
fn is_valid_version(version: &str) -> bool {
    !version.starts_with('.')
        && !version.contains("..")
        && version
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '+' | '-'))
}

fn parse_reference(input: &str, default_namespace: Option<&str>) -> Result<ResourceRef> {
    let trimmed = input.trim();

    let (namespace, rest) = if let Some(scoped) = trimmed.strip_prefix('@') {
        let (namespace, rest) = scoped
            .split_once('/')
            .ok_or_else(|| invalid(input, "expected @namespace/name"))?;
        (namespace, rest)
    } else {
        let namespace =
            default_namespace.ok_or_else(|| invalid(input, "missing @namespace/ prefix"))?;
        (namespace, trimmed)
    };

    if !is_valid_segment(namespace) {
        return Err(invalid(input, "namespace must be letters, digits, '-' or '_'"));
    }

    let (body, version) = match rest.split_once('@') {
        Some((_, "")) => return Err(invalid(input, "empty version after '@'")),
        Some((_, version)) if !is_valid_version(version) => {
            return Err(invalid(input, "version must be letters, digits, '.', '_', '+' or '-'"));
        }
        Some((body, version)) => (body, Some(version.to_string())),
        None => (rest, None),
    };

    let (kind, name) = match body.split_once(':') {
        Some((kind, name)) => {
            let kind = kind.parse::<ResourceKind>().map_err(|_| {
                invalid(input, "unknown resource kind (expected ui, hook, lib or config)")
            })?;
            (kind, name)
        }
        None => (ResourceKind::Ui, body),
    };

    if !is_valid_segment(name) {
        return Err(invalid(input, "name must be letters, digits, '-' or '_'"));
    }

    let mut reference = ResourceRef::new(namespace, kind, name);
    reference.version = version;
    Ok(reference)
}

/// Canonical identity of a resource: `@namespace/kind:name`
///
/// The kind is elided for UI components. Version does not participate, so two
/// references pinning different versions of one resource share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceKey(String);

impl ResourceKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&ResourceRef> for ResourceKey {
    fn from(reference: &ResourceRef) -> Self {
        ResourceKey(format!(
            "@{}/{}{}",
            reference.namespace,
            reference.kind.key_prefix(),
            reference.name
        ))
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
