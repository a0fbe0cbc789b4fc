//! Configuration file handling for asterhub
//!
//! This module contains:
//! - `asterhub.json` - framework, style, aliases and installed-resource records
//! - well-known paths shared by the installer and the CLI

pub mod paths;
pub mod project;

pub use project::{Aliases, InstalledResource, ProjectConfig, Variant};
