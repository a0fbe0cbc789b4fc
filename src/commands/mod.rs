//! Command implementations for AsterHub CLI

pub mod add;
pub mod completions;
pub mod diff;
mod helpers;
pub mod init;
pub mod list;
pub mod recover;
pub mod remove;
pub mod update;
pub mod version;
