//! Dependency resolution for registry resources
//!
//! This module handles:
//! - Walking declared registry dependencies depth-first from the requested roots
//! - Deduplicating shared (diamond) dependencies
//! - Circular dependency detection
//! - Ordering everything dependencies-first (see [`sort`])
//!
//! Missing resources and cycles do not abort resolution. They are collected as
//! [`ResolutionError`]s on the returned [`InstallPlan`] next to everything that
//! could be resolved; whether to proceed is the caller's decision.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let resolver = Resolver::new(RegistryDir::new(registry_root));
//! let plan = resolver.resolve(&[ResourceRef::parse("@acme/button")?]);
//! if !plan.is_complete() {
//!     // report plan.errors, write nothing
//! }
//! for resource in plan.iter() {
//!     // install in order
//! }
//! ```

pub mod fetcher;
mod graph;
mod sort;

#[cfg(test)]
pub(crate) mod tests;

use std::collections::{HashMap, HashSet};
use std::fmt;

pub use fetcher::{Fetcher, RegistryDir};

use crate::resource::{ResolvedResource, ResourceKey, ResourceRef};
use graph::DependencyGraph;
use sort::topological_sort;

/// What went wrong with one branch of the dependency tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionErrorKind {
    /// The branch loops back onto itself, or cannot be ordered because of a loop
    Cycle,
    /// The registry has no such resource (or could not be asked)
    NotFound,
}

/// A non-fatal resolution problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionError {
    pub kind: ResolutionErrorKind,
    pub detail: String,
    /// Keys involved, in the order they appear in `detail`
    pub keys: Vec<ResourceKey>,
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ResolutionErrorKind::Cycle => write!(f, "circular dependency: {}", self.detail),
            ResolutionErrorKind::NotFound => f.write_str(&self.detail),
        }
    }
}

/// Output of [`Resolver::resolve`]
#[derive(Debug, Default)]
pub struct InstallPlan {
    /// Install order: every key appears after all keys it depends on
    pub order: Vec<ResourceKey>,
    /// Resolved resource for every key in `order`
    pub resources: HashMap<ResourceKey, ResolvedResource>,
    /// Problems that did not stop resolution of unaffected branches
    pub errors: Vec<ResolutionError>,
}

impl InstallPlan {
    /// True when resolution produced no errors
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }

    /// Resources in install order
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedResource> {
        self.order.iter().filter_map(|key| self.resources.get(key))
    }
}

/// Per-call traversal state
struct Traversal {
    graph: DependencyGraph,
    visited: HashSet<ResourceKey>,
    errors: Vec<ResolutionError>,
    /// Keys already named by a reported cycle
    cyclic: HashSet<ResourceKey>,
}

/// Dependency resolver over an injected fetch capability
pub struct Resolver<F> {
    fetcher: F,
}

impl<F: Fetcher> Resolver<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Resolve `roots` and everything they depend on into an install plan
    ///
    /// Never fails: missing resources and cycles are reported in
    /// [`InstallPlan::errors`] and the affected branches are left out.
    pub fn resolve(&self, roots: &[ResourceRef]) -> InstallPlan {
        let mut traversal = Traversal {
            graph: DependencyGraph::new(),
            visited: HashSet::new(),
            errors: Vec::new(),
            cyclic: HashSet::new(),
        };

        let mut path = Vec::new();
        for root in roots {
            self.visit(root, &mut path, &mut traversal);
        }

        let sorted = topological_sort(&traversal.graph);

        let unreported: Vec<ResourceKey> = sorted
            .stuck
            .into_iter()
            .filter(|key| !traversal.cyclic.contains(key))
            .collect();
        if !unreported.is_empty() {
            let detail = format!(
                "unable to order dependencies: {}",
                join_keys(&unreported, ", ")
            );
            traversal.errors.push(ResolutionError {
                kind: ResolutionErrorKind::Cycle,
                detail,
                keys: unreported,
            });
        }

        let emitted: HashSet<&ResourceKey> = sorted.order.iter().collect();
        let resources = traversal
            .graph
            .into_resources()
            .filter(|(key, _)| emitted.contains(key))
            .collect();

        tracing::debug!(
            resolved = sorted.order.len(),
            errors = traversal.errors.len(),
            "resolution finished"
        );

        InstallPlan {
            order: sorted.order,
            resources,
            errors: traversal.errors,
        }
    }

    /// Depth-first visit of one reference
    ///
    /// `path` holds the keys currently being expanded, root first.
    fn visit(&self, reference: &ResourceRef, path: &mut Vec<ResourceKey>, state: &mut Traversal) {
        let key = reference.key();

        if let Some(start) = path.iter().position(|k| *k == key) {
            let mut cycle: Vec<ResourceKey> = path[start..].to_vec();
            cycle.push(key);
            let detail = join_keys(&cycle, " → ");
            tracing::debug!(cycle = %detail, "circular dependency");
            state.cyclic.extend(cycle.iter().cloned());
            state.errors.push(ResolutionError {
                kind: ResolutionErrorKind::Cycle,
                detail,
                keys: cycle,
            });
            return;
        }

        if state.visited.contains(&key) {
            if let Some(node) = state.graph.get(&key) {
                let registered = &node.resource.reference.version;
                if reference.version.is_some() && reference.version != *registered {
                    tracing::warn!(
                        key = %key,
                        requested = reference.version_or_latest(),
                        using = node.resource.reference.version_or_latest(),
                        "resource requested at more than one version; keeping the first"
                    );
                }
            }
            return;
        }

        let fetched = match self.fetcher.fetch(reference) {
            Ok(Some(resource)) => resource,
            Ok(None) => {
                state.errors.push(not_found(key, None));
                return;
            }
            Err(e) => {
                state.errors.push(not_found(key, Some(&e.to_string())));
                return;
            }
        };

        tracing::debug!(key = %key, dependencies = fetched.dependencies.len(), "fetched");

        let dependencies = fetched.dependencies.clone();
        state.graph.register(key.clone(), fetched);
        state.visited.insert(key.clone());

        path.push(key);
        for dep in &dependencies {
            self.visit(dep, path, state);
        }
        path.pop();
    }
}

fn not_found(key: ResourceKey, reason: Option<&str>) -> ResolutionError {
    let detail = match reason {
        Some(reason) => format!("resource not found: {key} ({reason})"),
        None => format!("resource not found: {key}"),
    };
    ResolutionError {
        kind: ResolutionErrorKind::NotFound,
        detail,
        keys: vec![key],
    }
}

fn join_keys(keys: &[ResourceKey], separator: &str) -> String {
    keys.iter()
        .map(ResourceKey::as_str)
        .collect::<Vec<_>>()
        .join(separator)
}
