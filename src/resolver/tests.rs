//! Resolver tests

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::*;
use crate::error::{AsterError, Result};
use crate::resource::content::FileEntry;
use crate::resource::{ResourceContent, ResourceKind};

/// Build a resolved resource whose dependencies are shorthand references in `namespace`
pub(crate) fn resolved(namespace: &str, kind: ResourceKind, name: &str, deps: &[&str]) -> ResolvedResource {
    let content = ResourceContent {
        name: name.to_string(),
        kind,
        version: "1.0.0".to_string(),
        description: None,
        files: vec![FileEntry::new(format!("{}/{name}.ts", kind.as_str()), name)],
        dependencies: Vec::new(),
        dev_dependencies: Vec::new(),
        registry_dependencies: deps.iter().map(|d| (*d).to_string()).collect(),
        meta: None,
    };
    let dependencies = deps
        .iter()
        .map(|d| ResourceRef::parse_with_default(d, namespace).unwrap())
        .collect();
    ResolvedResource::new(ResourceRef::new(namespace, kind, name), content, dependencies)
}

/// In-memory registry that records every fetch
#[derive(Default, Clone)]
struct MemoryRegistry {
    resources: HashMap<ResourceKey, ResolvedResource>,
    fetches: Rc<RefCell<Vec<ResourceKey>>>,
}

impl MemoryRegistry {
    fn with(mut self, kind: ResourceKind, name: &str, deps: &[&str]) -> Self {
        let resource = resolved("acme", kind, name, deps);
        self.resources.insert(resource.reference.key(), resource);
        self
    }

    fn fetch_count(&self, key: &str) -> usize {
        self.fetches
            .borrow()
            .iter()
            .filter(|k| k.as_str() == key)
            .count()
    }
}

impl Fetcher for MemoryRegistry {
    fn fetch(&self, reference: &ResourceRef) -> Result<Option<ResolvedResource>> {
        let key = reference.key();
        self.fetches.borrow_mut().push(key.clone());
        Ok(self.resources.get(&key).map(|r| {
            let mut r = r.clone();
            r.reference = reference.clone();
            r
        }))
    }
}

fn acme(kind: ResourceKind, name: &str) -> ResourceRef {
    ResourceRef::new("acme", kind, name)
}

fn order_of(plan: &InstallPlan) -> Vec<&str> {
    plan.order.iter().map(ResourceKey::as_str).collect()
}

fn position(plan: &InstallPlan, key: &str) -> usize {
    plan.order
        .iter()
        .position(|k| k.as_str() == key)
        .unwrap_or_else(|| panic!("{key} missing from plan"))
}

#[test]
fn test_hook_depending_on_lib() {
    let registry = MemoryRegistry::default()
        .with(ResourceKind::Hook, "a", &["lib:b"])
        .with(ResourceKind::Lib, "b", &[]);

    let plan = Resolver::new(registry.clone()).resolve(&[acme(ResourceKind::Hook, "a")]);

    assert!(plan.is_complete());
    assert_eq!(order_of(&plan), vec!["@acme/lib:b", "@acme/hook:a"]);
    assert_eq!(plan.resources.len(), 2);
    let names: Vec<&str> = plan.iter().map(|r| r.content.name.as_str()).collect();
    assert_eq!(names, vec!["b", "a"]);
}

#[test]
fn test_two_node_cycle_yields_empty_plan() {
    let registry = MemoryRegistry::default()
        .with(ResourceKind::Ui, "x", &["y"])
        .with(ResourceKind::Ui, "y", &["x"]);

    let plan = Resolver::new(registry.clone()).resolve(&[acme(ResourceKind::Ui, "x")]);

    assert!(plan.order.is_empty());
    assert!(plan.resources.is_empty());
    assert_eq!(plan.errors.len(), 1);
    let err = &plan.errors[0];
    assert_eq!(err.kind, ResolutionErrorKind::Cycle);
    assert_eq!(err.detail, "@acme/x → @acme/y → @acme/x");
    assert!(err.to_string().contains("circular dependency"));
}

#[test]
fn test_cycle_error_names_every_key_on_the_cycle() {
    let registry = MemoryRegistry::default()
        .with(ResourceKind::Ui, "root", &["lib:a"])
        .with(ResourceKind::Lib, "a", &["lib:b"])
        .with(ResourceKind::Lib, "b", &["lib:c"])
        .with(ResourceKind::Lib, "c", &["lib:a"]);

    let plan = Resolver::new(registry.clone()).resolve(&[acme(ResourceKind::Ui, "root")]);

    let cycle = plan
        .errors
        .iter()
        .find(|e| e.detail.contains('→'))
        .expect("cycle error");
    assert_eq!(
        cycle.detail,
        "@acme/lib:a → @acme/lib:b → @acme/lib:c → @acme/lib:a"
    );
    for key in ["@acme/lib:a", "@acme/lib:b", "@acme/lib:c"] {
        assert!(!order_of(&plan).contains(&key), "{key} must not be planned");
    }
    // root depends on the cycle, so it cannot be ordered either
    assert!(!order_of(&plan).contains(&"@acme/root"));
    assert!(
        plan.errors
            .iter()
            .any(|e| e.detail.contains("unable to order") && e.detail.contains("@acme/root"))
    );
}

#[test]
fn test_self_dependency_is_a_cycle() {
    let registry = MemoryRegistry::default().with(ResourceKind::Ui, "me", &["me"]);

    let plan = Resolver::new(registry.clone()).resolve(&[acme(ResourceKind::Ui, "me")]);

    assert!(plan.order.is_empty());
    assert_eq!(plan.errors.len(), 1);
    assert_eq!(plan.errors[0].detail, "@acme/me → @acme/me");
}

#[test]
fn test_diamond_dependency_planned_once_before_both_roots() {
    let registry = MemoryRegistry::default()
        .with(ResourceKind::Ui, "left", &["lib:shared"])
        .with(ResourceKind::Ui, "right", &["lib:shared"])
        .with(ResourceKind::Lib, "shared", &[]);

    let plan = Resolver::new(registry.clone()).resolve(&[
        acme(ResourceKind::Ui, "left"),
        acme(ResourceKind::Ui, "right"),
    ]);

    assert!(plan.is_complete());
    assert_eq!(plan.order.len(), 3);
    let shared = position(&plan, "@acme/lib:shared");
    assert!(shared < position(&plan, "@acme/left"));
    assert!(shared < position(&plan, "@acme/right"));
    assert_eq!(registry.fetch_count("@acme/lib:shared"), 1);
}

#[test]
fn test_missing_dependency_is_reported_and_rest_resolved() {
    let registry = MemoryRegistry::default()
        .with(ResourceKind::Ui, "card", &["lib:ghost", "lib:utils"])
        .with(ResourceKind::Lib, "utils", &[]);

    let plan = Resolver::new(registry.clone()).resolve(&[acme(ResourceKind::Ui, "card")]);

    assert_eq!(plan.errors.len(), 1);
    assert_eq!(plan.errors[0].kind, ResolutionErrorKind::NotFound);
    assert_eq!(plan.errors[0].detail, "resource not found: @acme/lib:ghost");
    assert_eq!(order_of(&plan), vec!["@acme/lib:utils", "@acme/card"]);
}

#[test]
fn test_missing_root() {
    let registry = MemoryRegistry::default();
    let plan = Resolver::new(registry.clone()).resolve(&[acme(ResourceKind::Hook, "nope")]);

    assert!(plan.order.is_empty());
    assert_eq!(plan.errors.len(), 1);
    assert_eq!(plan.errors[0].keys[0].as_str(), "@acme/hook:nope");
}

#[test]
fn test_fetch_failure_recorded_as_not_found() {
    let failing = |reference: &ResourceRef| -> Result<Option<ResolvedResource>> {
        Err(AsterError::RegistryReadFailed {
            path: reference.to_string(),
            reason: "connection reset".to_string(),
        })
    };

    let plan = Resolver::new(failing).resolve(&[acme(ResourceKind::Ui, "button")]);

    assert_eq!(plan.errors.len(), 1);
    assert_eq!(plan.errors[0].kind, ResolutionErrorKind::NotFound);
    assert!(plan.errors[0].detail.contains("connection reset"));
}

#[test]
fn test_every_key_after_its_dependencies() {
    let registry = MemoryRegistry::default()
        .with(ResourceKind::Ui, "form", &["input", "button", "lib:cn"])
        .with(ResourceKind::Ui, "input", &["lib:cn", "hook:use-id"])
        .with(ResourceKind::Ui, "button", &["lib:cn"])
        .with(ResourceKind::Hook, "use-id", &["lib:cn"])
        .with(ResourceKind::Lib, "cn", &[]);

    let plan = Resolver::new(registry.clone()).resolve(&[
        acme(ResourceKind::Ui, "form"),
        acme(ResourceKind::Ui, "button"),
    ]);

    assert!(plan.is_complete());
    assert_eq!(plan.order.len(), 5);
    for resource in plan.iter() {
        let at = position(&plan, resource.reference.key().as_str());
        for dep in &resource.dependencies {
            assert!(position(&plan, dep.key().as_str()) < at);
        }
    }
}

#[test]
fn test_resolution_is_deterministic() {
    let registry = MemoryRegistry::default()
        .with(ResourceKind::Ui, "a", &["lib:x", "lib:y"])
        .with(ResourceKind::Ui, "b", &["lib:y", "lib:z"])
        .with(ResourceKind::Lib, "x", &[])
        .with(ResourceKind::Lib, "y", &[])
        .with(ResourceKind::Lib, "z", &[]);
    let roots = [acme(ResourceKind::Ui, "a"), acme(ResourceKind::Ui, "b")];

    let first = Resolver::new(registry.clone()).resolve(&roots);
    let second = Resolver::new(registry.clone()).resolve(&roots);

    assert_eq!(first.order, second.order);
    assert_eq!(
        order_of(&first),
        vec!["@acme/lib:x", "@acme/lib:y", "@acme/lib:z", "@acme/a", "@acme/b"]
    );
}

#[test]
fn test_version_does_not_split_identity() {
    let registry = MemoryRegistry::default()
        .with(ResourceKind::Ui, "a", &["lib:utils@1.0.0"])
        .with(ResourceKind::Ui, "b", &["lib:utils@2.0.0"])
        .with(ResourceKind::Lib, "utils", &[]);

    let plan = Resolver::new(registry.clone()).resolve(&[
        acme(ResourceKind::Ui, "a"),
        acme(ResourceKind::Ui, "b"),
    ]);

    assert!(plan.is_complete());
    assert_eq!(plan.order.len(), 3);
    assert_eq!(registry.fetch_count("@acme/lib:utils"), 1);
    let utils = plan
        .resources
        .get(&acme(ResourceKind::Lib, "utils").key())
        .unwrap();
    assert_eq!(utils.reference.version.as_deref(), Some("1.0.0"));
}

#[test]
fn test_duplicate_roots_resolved_once() {
    let registry = MemoryRegistry::default().with(ResourceKind::Ui, "a", &[]);

    let plan = Resolver::new(registry.clone()).resolve(&[
        acme(ResourceKind::Ui, "a"),
        acme(ResourceKind::Ui, "a"),
    ]);

    assert_eq!(order_of(&plan), vec!["@acme/a"]);
    assert_eq!(registry.fetch_count("@acme/a"), 1);
}
