//! Common test utilities for AsterHub integration tests

use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

/// A project directory plus a registry directory to install from
pub struct TestWorkspace {
    /// Project directory
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Registry directory
    #[allow(dead_code)]
    pub registry_temp: TempDir,
    /// Canonical path to the project root
    pub path: PathBuf,
    pub registry: PathBuf,
}

impl TestWorkspace {
    /// Create an empty project and an empty registry
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let registry_temp = TempDir::new().expect("Failed to create registry directory");
        let path = std::fs::canonicalize(temp.path()).expect("Failed to canonicalize temp directory");
        let registry = registry_temp.path().to_path_buf();
        Self {
            temp,
            registry_temp,
            path,
            registry,
        }
    }

    /// Publish a registry document as `<ns>/<kind>/<name>/latest.json`
    #[allow(dead_code)]
    pub fn publish(&self, namespace: &str, kind: &str, name: &str, document: &serde_json::Value) {
        self.publish_version(namespace, kind, name, "latest", document);
    }

    /// Publish a registry document for one specific version
    #[allow(dead_code)]
    pub fn publish_version(
        &self,
        namespace: &str,
        kind: &str,
        name: &str,
        version: &str,
        document: &serde_json::Value,
    ) {
        let dir = self.registry.join(namespace).join(kind).join(name);
        std::fs::create_dir_all(&dir).expect("Failed to create registry entry");
        std::fs::write(dir.join(format!("{version}.json")), document.to_string())
            .expect("Failed to write registry document");
    }

    /// Publish a document built for one framework and style
    #[allow(dead_code)]
    pub fn publish_variant(
        &self,
        namespace: &str,
        kind: &str,
        name: &str,
        framework: &str,
        style: &str,
        document: &serde_json::Value,
    ) {
        let dir = self
            .registry
            .join(namespace)
            .join(kind)
            .join(name)
            .join(framework)
            .join(style);
        std::fs::create_dir_all(&dir).expect("Failed to create registry entry");
        std::fs::write(dir.join("latest.json"), document.to_string())
            .expect("Failed to write registry document");
    }

    /// Publish `@asterhub/button` depending on `@asterhub/lib:utils`
    #[allow(dead_code)]
    pub fn publish_button(&self) {
        self.publish(
            "asterhub",
            "ui",
            "button",
            &serde_json::json!({
                "name": "button",
                "type": "ui",
                "version": "1.0.0",
                "files": [{"path": "components/ui/button.tsx", "content": "export const Button = () => null;\n"}],
                "dependencies": ["clsx"],
                "registryDependencies": ["lib:utils"]
            }),
        );
        self.publish(
            "asterhub",
            "lib",
            "utils",
            &serde_json::json!({
                "name": "utils",
                "type": "lib",
                "version": "1.1.0",
                "files": [{"path": "lib/utils.ts", "content": "export const cn = () => '';\n"}],
                "dependencies": ["clsx", "tailwind-merge"]
            }),
        );
    }

    /// Write a file in the project
    #[allow(dead_code)]
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from the project
    #[allow(dead_code)]
    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    /// Check if a file exists in the project
    #[allow(dead_code)]
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// Parsed `asterhub.json`
    #[allow(dead_code)]
    pub fn config(&self) -> serde_json::Value {
        serde_json::from_str(&self.read_file("asterhub.json")).expect("Failed to parse asterhub.json")
    }

    /// Path of the transaction journal
    #[allow(dead_code)]
    pub fn journal_path(&self) -> PathBuf {
        self.path.join(".asterhub").join(".transaction.json")
    }

    /// Write a transaction journal as if a process had died mid-install
    #[allow(dead_code)]
    pub fn write_journal(&self, journal: &serde_json::Value) {
        std::fs::create_dir_all(self.path.join(".asterhub")).expect("Failed to create state directory");
        std::fs::write(self.journal_path(), journal.to_string()).expect("Failed to write journal");
    }

    /// The asterhub binary, run inside this project against this registry
    #[allow(dead_code, deprecated)]
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("asterhub").expect("asterhub binary");
        cmd.current_dir(&self.path);
        cmd.env("ASTERHUB_REGISTRY", &self.registry);
        cmd.env_remove("ASTERHUB_LOG");
        cmd
    }
}
