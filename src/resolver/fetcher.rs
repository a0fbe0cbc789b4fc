//! The fetch capability used by the resolver
//!
//! The resolver only ever talks to the outside world through [`Fetcher`].
//! This module provides:
//! - the trait itself (also implemented for plain closures, which is what
//!   tests use)
//! - [`RegistryDir`], a registry laid out on disk the same way the remote
//!   registry API lays out its URLs

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::Variant;
use crate::error::{AsterError, Result};
use crate::resource::{ResolvedResource, ResourceContent, ResourceRef};

/// Fetch a resource and its declared dependencies
///
/// `Ok(None)` means the registry does not have the resource. `Err` means the
/// registry could not be consulted; the resolver records both as a missing
/// resource for that branch.
pub trait Fetcher {
    fn fetch(&self, reference: &ResourceRef) -> Result<Option<ResolvedResource>>;
}

impl<F> Fetcher for F
where
    F: Fn(&ResourceRef) -> Result<Option<ResolvedResource>>,
{
    fn fetch(&self, reference: &ResourceRef) -> Result<Option<ResolvedResource>> {
        self(reference)
    }
}

/// A registry stored as JSON documents in a directory
///
/// ```text
/// <root>/<namespace>/<kind>/<name>/latest.json
/// <root>/<namespace>/<kind>/<name>/1.2.0.json
/// <root>/<namespace>/<kind>/<name>/<framework>/<style>/latest.json
/// ```
///
/// With a [`Variant`] set, the framework/style document wins over the plain
/// one when both exist.
#[derive(Debug, Clone)]
pub struct RegistryDir {
    root: PathBuf,
    variant: Option<Variant>,
}

impl RegistryDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            variant: None,
        }
    }

    /// Prefer documents built for `variant`
    #[must_use]
    pub fn with_variant(mut self, variant: Option<Variant>) -> Self {
        self.variant = variant;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Candidate documents for `reference`, most specific first
    pub fn document_paths(&self, reference: &ResourceRef) -> Vec<PathBuf> {
        let entry = self
            .root
            .join(&reference.namespace)
            .join(reference.kind.as_str())
            .join(&reference.name);
        let file = format!("{}.json", reference.version_or_latest());

        let mut paths = Vec::with_capacity(2);
        if let Some(variant) = &self.variant {
            paths.push(entry.join(&variant.framework).join(&variant.style).join(&file));
        }
        paths.push(entry.join(file));
        paths
    }

    fn read_document(&self, path: &Path) -> Result<Option<ResourceContent>> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AsterError::RegistryReadFailed {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                });
            }
        };

        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| AsterError::RegistryReadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
    }
}

impl Fetcher for RegistryDir {
    fn fetch(&self, reference: &ResourceRef) -> Result<Option<ResolvedResource>> {
        let mut found = None;
        for path in self.document_paths(reference) {
            tracing::debug!(reference = %reference, path = %path.display(), "reading registry document");
            found = self.read_document(&path)?;
            if found.is_some() {
                break;
            }
        }
        let Some(content) = found else {
            return Ok(None);
        };

        let dependencies = parse_registry_dependencies(&content, &reference.namespace);
        Ok(Some(ResolvedResource::new(
            reference.clone(),
            content,
            dependencies,
        )))
    }
}

/// Turn `registryDependencies` strings into references
///
/// Entries without an explicit namespace inherit the parent's namespace.
/// Entries that do not parse are skipped.
pub fn parse_registry_dependencies(
    content: &ResourceContent,
    parent_namespace: &str,
) -> Vec<ResourceRef> {
    content
        .registry_dependencies
        .iter()
        .filter_map(|dep| match ResourceRef::parse_with_default(dep, parent_namespace) {
            Ok(reference) => Some(reference),
            Err(e) => {
                tracing::warn!(resource = %content.name, dependency = %dep, "skipping dependency: {e}");
                None
            }
        })
        .collect()
}
