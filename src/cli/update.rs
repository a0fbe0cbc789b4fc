use clap::Parser;

/// Arguments for the update command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Pick outdated resources to update:\n    asterhub update\n\n\
                  Update one resource:\n    asterhub update button\n\n\
                  Update everything without prompting:\n    asterhub update --all --force")]
pub struct UpdateArgs {
    /// Installed resource names: [kind:]name (all when omitted)
    pub names: Vec<String>,

    /// Update every outdated resource without picking
    #[arg(long, short = 'a')]
    pub all: bool,

    /// Skip prompts and overwrite changed files
    #[arg(long, short = 'f')]
    pub force: bool,
}

/// Arguments for the diff command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Check every installed resource:\n    asterhub diff\n\n\
                  Check one hook:\n    asterhub diff hook:use-toggle")]
pub struct DiffArgs {
    /// Installed resource names: [kind:]name (all when omitted)
    pub names: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};

    #[test]
    fn test_cli_parsing_update() {
        let cli = Cli::try_parse_from(["asterhub", "update", "button", "lib:utils", "-a"]).unwrap();
        match cli.command {
            Commands::Update(args) => {
                assert_eq!(args.names, vec!["button", "lib:utils"]);
                assert!(args.all);
                assert!(!args.force);
            }
            _ => panic!("Expected Update command"),
        }
    }

    #[test]
    fn test_cli_parsing_diff_without_names() {
        let cli = Cli::try_parse_from(["asterhub", "diff"]).unwrap();
        match cli.command {
            Commands::Diff(args) => assert!(args.names.is_empty()),
            _ => panic!("Expected Diff command"),
        }
    }
}
