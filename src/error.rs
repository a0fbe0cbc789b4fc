//! Error types and handling for asterhub
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Resolution problems (cycles, missing resources) are not errors of this
//! type: the resolver collects them as [`crate::resolver::ResolutionError`]
//! values and the caller decides. `ResolutionFailed` is what the caller
//! raises once it has decided.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for asterhub operations
#[derive(Error, Diagnostic, Debug)]
pub enum AsterError {
    // Reference errors
    #[error("Invalid resource reference '{input}': {reason}")]
    #[diagnostic(
        code(asterhub::reference::invalid),
        help("References look like @namespace/kind:name@version, e.g. @acme/hook:use-debounce@1.0.0")
    )]
    InvalidReference { input: String, reason: String },

    // Resolution errors
    #[error("Dependency resolution failed with {count} error(s)")]
    #[diagnostic(
        code(asterhub::resolve::failed),
        help("No files were written. Fix the missing or circular dependencies and try again")
    )]
    ResolutionFailed { count: usize },

    #[error("Failed to read registry entry: {path}: {reason}")]
    #[diagnostic(code(asterhub::registry::read_failed))]
    RegistryReadFailed { path: String, reason: String },

    // Transaction errors
    #[error("A pending transaction '{id}' (started {started_at}) exists in this project")]
    #[diagnostic(
        code(asterhub::transaction::pending),
        help("Run 'asterhub recover' to undo the interrupted operation first")
    )]
    PendingTransaction { id: String, started_at: String },

    #[error("Transaction journal is locked by another process: {path}")]
    #[diagnostic(
        code(asterhub::transaction::locked),
        help("Wait for the other process to finish. If none is running, run 'asterhub recover'")
    )]
    TransactionLocked { path: String },

    #[error("No active transaction")]
    #[diagnostic(code(asterhub::transaction::inactive))]
    NoActiveTransaction,

    #[error("Transaction journal is corrupt: {path}: {reason}")]
    #[diagnostic(
        code(asterhub::transaction::journal_corrupt),
        help("The journal was left in place. Inspect it, then run 'asterhub recover --discard' to drop it without undoing anything")
    )]
    JournalCorrupt { path: String, reason: String },

    #[error("Rollback left {count} path(s) unrestored")]
    #[diagnostic(
        code(asterhub::transaction::rollback_incomplete),
        help("Restore the listed files manually")
    )]
    RollbackIncomplete { count: usize },

    #[error("Path is outside the project: {path}")]
    #[diagnostic(
        code(asterhub::fs::outside_project),
        help("Files must stay inside the project and out of its .asterhub state directory")
    )]
    PathOutsideProject { path: String },

    // Project errors
    #[error("Project directory not found: {path}")]
    #[diagnostic(code(asterhub::project::not_found))]
    ProjectNotFound { path: String },

    #[error("Resource '{name}' is not installed")]
    #[diagnostic(
        code(asterhub::project::not_installed),
        help("Run 'asterhub list' to see installed resources")
    )]
    NotInstalled { name: String },

    // Configuration errors
    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(asterhub::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid {field} '{value}' in configuration")]
    #[diagnostic(
        code(asterhub::config::invalid_value),
        help("Framework and style take letters, digits, '-' or '_'. Aliases name a directory inside the project, e.g. '@/components'")
    )]
    InvalidConfigValue { field: String, value: String },

    // File system errors
    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(asterhub::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(asterhub::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("Failed to delete file: {path}: {reason}")]
    #[diagnostic(code(asterhub::fs::delete_failed))]
    FileDeleteFailed { path: String, reason: String },

    #[error("Failed to create directory: {path}: {reason}")]
    #[diagnostic(code(asterhub::fs::dir_create_failed))]
    DirCreateFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(asterhub::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for AsterError {
    fn from(err: std::io::Error) -> Self {
        AsterError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for AsterError {
    fn from(err: serde_json::Error) -> Self {
        AsterError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for AsterError {
    fn from(err: inquire::InquireError) -> Self {
        AsterError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, AsterError>;
