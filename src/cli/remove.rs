use clap::Parser;

/// Arguments for the remove command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Remove a ui component:\n    asterhub remove button\n\n\
                  Remove a hook without confirmation:\n    asterhub remove hook:use-toggle -y")]
pub struct RemoveArgs {
    /// Installed resource names: [kind:]name
    #[arg(required = true)]
    pub names: Vec<String>,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}
