use std::path::PathBuf;

use clap::{Parser, Subcommand};
use relaybot_core::{BackendKind, Mode};

#[derive(Parser, Debug)]
#[command(name = "relaybot", version, about = "Tool-calling chat assistant for Redmine and GitLab")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a settings file (overrides auto-discovery)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Log verbosity when RUST_LOG is unset (error, warn, info, debug)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one conversation turn and print the reply
    Ask {
        /// Message from the user
        #[arg(value_name = "MESSAGE", trailing_var_arg = true)]
        message: Vec<String>,

        /// JSON file with prior thread messages ([{role, username, content}])
        #[arg(long)]
        thread: Option<PathBuf>,

        /// Name shown to the model for MESSAGE
        #[arg(long, short = 'u', env = "USER", default_value = "user")]
        user: String,

        /// Force a mode instead of keyword detection (general, code_review)
        #[arg(long, short = 'm')]
        mode: Option<Mode>,

        /// Redmine project the conversation is about
        #[arg(long, short = 'p')]
        project: Option<String>,

        /// Chat backend (openai, mock)
        #[arg(long)]
        backend: Option<BackendKind>,

        #[arg(long, short = 'M')]
        model: Option<String>,

        /// Print the turn report as JSON instead of the bare reply
        #[arg(long)]
        json: bool,
    },
    /// List the tools each mode advertises
    Tools {
        /// Also query every configured tool server
        #[arg(long)]
        discover: bool,
    },
    /// Manage settings files
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a settings file with default values
    Init {
        /// Write to ./.config/relaybot instead of the user config dir
        #[arg(long)]
        workspace: bool,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective settings after environment overrides
    Show,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ask() {
        let cli = Cli::try_parse_from([
            "relaybot", "ask", "--backend", "mock", "--mode", "review", "-p", "42", "list", "my", "tasks",
        ])
        .unwrap();

        match cli.command {
            Commands::Ask {
                message,
                backend,
                mode,
                project,
                ..
            } => {
                assert_eq!(message.join(" "), "list my tasks");
                assert_eq!(backend, Some(BackendKind::Mock));
                assert_eq!(mode, Some(Mode::CodeReview));
                assert_eq!(project.as_deref(), Some("42"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_config_init() {
        let cli = Cli::try_parse_from(["relaybot", "config", "init", "--workspace"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                command: ConfigCommands::Init {
                    workspace: true,
                    force: false
                }
            }
        ));
    }

    #[test]
    fn test_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["relaybot", "ask", "--mode", "chaos", "hi"]).is_err());
    }
}
