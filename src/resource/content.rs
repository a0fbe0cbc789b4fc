//! Resource content as served by a registry

use serde::{Deserialize, Serialize};

use super::{ResourceKind, ResourceRef};

/// One file a resource writes into the project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Target path relative to the project root (e.g. "components/ui/button.tsx")
    pub path: String,

    /// File contents
    pub content: String,

    /// Registry file classification (e.g. "registry:ui"); informational only
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
}

impl FileEntry {
    #[cfg(test)]
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            file_type: None,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        self.content.as_bytes()
    }
}

/// Registry document for one version of a resource
///
/// Unknown fields are ignored so newer registries stay readable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContent {
    pub name: String,

    #[serde(rename = "type", default = "default_kind")]
    pub kind: ResourceKind,

    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Files to write, in order
    #[serde(default)]
    pub files: Vec<FileEntry>,

    /// npm package names; opaque to the installer
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// npm dev package names; opaque to the installer
    #[serde(default)]
    pub dev_dependencies: Vec<String>,

    /// References to other registry resources (`[@ns/][kind:]name[@version]`)
    #[serde(default)]
    pub registry_dependencies: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

fn default_kind() -> ResourceKind {
    ResourceKind::Ui
}

fn default_version() -> String {
    "0.0.0".to_string()
}

impl ResourceContent {
    /// BLAKE3 digest over file paths and contents, as `blake3:<hex>`
    pub fn integrity(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for file in &self.files {
            hasher.update(file.path.as_bytes());
            hasher.update(&[0]);
            hasher.update(file.bytes());
            hasher.update(&[0]);
        }
        format!("blake3:{}", hasher.finalize().to_hex())
    }
}

/// A fetched resource together with its declared registry dependencies
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedResource {
    pub reference: ResourceRef,
    pub content: ResourceContent,
    pub dependencies: Vec<ResourceRef>,
}

impl ResolvedResource {
    pub fn new(reference: ResourceRef, content: ResourceContent, dependencies: Vec<ResourceRef>) -> Self {
        Self {
            reference,
            content,
            dependencies,
        }
    }
}
