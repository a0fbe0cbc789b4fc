//! Dependency graph built during resolution
//!
//! Nodes are kept in registration order, which is what makes the install
//! order deterministic for identical inputs:
//!
//! ```text
//! nodes:  [ @acme/hook:a, @acme/lib:b ]      (registration order)
//! index:  { @acme/hook:a → 0, @acme/lib:b → 1 }
//! edges:  @acme/hook:a → [@acme/lib:b]       (declared dependency keys)
//! ```
//!
//! The graph is private to the resolver; callers only ever see an
//! [`InstallPlan`](super::InstallPlan).

use std::collections::HashMap;

use crate::resource::{ResolvedResource, ResourceKey};

/// A registered resource and the keys it depends on
#[derive(Debug, Clone)]
pub(crate) struct GraphNode {
    pub key: ResourceKey,
    pub dependency_keys: Vec<ResourceKey>,
    pub resource: ResolvedResource,
}

/// Insertion-ordered map from key to node
#[derive(Debug, Default)]
pub(crate) struct DependencyGraph {
    nodes: Vec<GraphNode>,
    index: HashMap<ResourceKey, usize>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fetched resource under `key`
    ///
    /// A key is registered at most once; a second registration is ignored.
    pub fn register(&mut self, key: ResourceKey, resource: ResolvedResource) {
        if self.index.contains_key(&key) {
            return;
        }
        let dependency_keys = resource.dependencies.iter().map(|dep| dep.key()).collect();
        self.index.insert(key.clone(), self.nodes.len());
        self.nodes.push(GraphNode {
            key,
            dependency_keys,
            resource,
        });
    }

    pub fn get(&self, key: &ResourceKey) -> Option<&GraphNode> {
        self.index.get(key).map(|&i| &self.nodes[i])
    }

    pub fn position(&self, key: &ResourceKey) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Nodes in registration order
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// Consume the graph, yielding `(key, resource)` pairs
    pub fn into_resources(self) -> impl Iterator<Item = (ResourceKey, ResolvedResource)> {
        self.nodes.into_iter().map(|node| (node.key, node.resource))
    }
}
