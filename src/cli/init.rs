use clap::Parser;

use crate::config::paths::{DEFAULT_FRAMEWORK, DEFAULT_STYLE};

/// Arguments for the init command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Create asterhub.json with the defaults:\n    asterhub init\n\n\
                  Keep components under src/:\n    asterhub init --components @/src/components\n\n\
                  Rewrite an existing configuration without asking:\n    asterhub init --force")]
pub struct InitArgs {
    /// Framework to request from the registry
    #[arg(long, default_value = DEFAULT_FRAMEWORK)]
    pub framework: String,

    /// Styling solution to request from the registry
    #[arg(long, default_value = DEFAULT_STYLE)]
    pub style: String,

    /// Alias of the components directory
    #[arg(long, default_value = "@/components")]
    pub components: String,

    /// Alias of the hooks directory
    #[arg(long, default_value = "@/hooks")]
    pub hooks: String,

    /// Alias of the utilities directory
    #[arg(long, default_value = "@/lib")]
    pub lib: String,

    /// Overwrite an existing configuration without confirmation
    #[arg(long, short = 'f')]
    pub force: bool,
}
