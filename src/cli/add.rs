use clap::Parser;

/// Arguments for the add command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Add a ui component:\n    asterhub add button\n\n\
                  Add several resources at once:\n    asterhub add button card hook:use-toggle\n\n\
                  Add from another namespace at a pinned version:\n    asterhub add @acme/lib:utils@2.0.0\n\n\
                  Overwrite existing files without asking:\n    asterhub add button --force")]
pub struct AddArgs {
    /// Resource references: [@namespace/][kind:]name[@version]
    #[arg(required = true)]
    pub resources: Vec<String>,

    /// Overwrite existing files without confirmation
    #[arg(long, short = 'f')]
    pub force: bool,
}
