//! Well-known names and defaults

/// Tool-owned state directory inside a project
pub const STATE_DIR: &str = ".asterhub";

/// Project configuration file at the project root
pub const CONFIG_FILE: &str = "asterhub.json";

/// Transaction journal, inside [`STATE_DIR`]
pub const TRANSACTION_FILE: &str = ".transaction.json";

/// Advisory lock guarding the journal, inside [`STATE_DIR`]
pub const LOCK_FILE: &str = ".transaction.lock";

/// Environment variable naming the registry directory
pub const REGISTRY_ENV: &str = "ASTERHUB_REGISTRY";

/// Environment variable with a `tracing` filter directive
pub const LOG_ENV: &str = "ASTERHUB_LOG";

/// Namespace used when a reference omits `@namespace/`
pub const DEFAULT_NAMESPACE: &str = "asterhub";

/// Framework written by `asterhub init` unless another is given
pub const DEFAULT_FRAMEWORK: &str = "next";

/// Styling written by `asterhub init` unless another is given
pub const DEFAULT_STYLE: &str = "tailwind";

/// Registry used when neither `--registry` nor [`REGISTRY_ENV`] is given
pub fn default_registry_dir() -> Option<std::path::PathBuf> {
    dirs::home_dir().map(|home| home.join(STATE_DIR).join("registry"))
}
