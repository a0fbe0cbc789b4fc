use clap::Parser;

/// Arguments for the recover command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Undo an interrupted install:\n    asterhub recover\n\n\
                  Drop a journal that cannot be read:\n    asterhub recover --discard")]
pub struct RecoverArgs {
    /// Delete the journal without undoing anything
    #[arg(long)]
    pub discard: bool,
}
