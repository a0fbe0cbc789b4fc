use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    asterhub completions bash > ~/.bash_completion.d/asterhub\n\n\
                  Generate zsh completions:\n    asterhub completions zsh > ~/.zfunc/_asterhub\n\n\
                  Generate fish completions:\n    asterhub completions fish > ~/.config/fish/completions/asterhub.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    pub shell: String,
}
