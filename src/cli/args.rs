//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Walk a JSON decision tree in the terminal: questions, breadcrumbs, results
#[derive(Parser, Debug)]
#[command(name = "theramatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log to stderr (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// Config file (default: ./.theramatch.toml if present)
    #[arg(short = 'c', long = "config", env = "THERAMATCH_CONFIG", global = true, value_hint = ValueHint::FilePath)]
    pub config_file: Option<PathBuf>,

    /// Without a subcommand, `walk` the configured source
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Answer questions interactively
    Walk {
        /// Document file or http(s) URL (default: configured source)
        #[arg(value_hint = ValueHint::AnyPath)]
        source: Option<String>,
        /// Numbered menu instead of the fuzzy finder
        #[arg(long)]
        plain: bool,
    },

    /// Follow answers by label and print where they lead
    Run {
        /// Document file or http(s) URL (default: configured source)
        #[arg(value_hint = ValueHint::AnyPath)]
        source: Option<String>,
        /// Answer label to pick, in order (repeatable)
        #[arg(short = 'a', long = "answer", value_name = "LABEL")]
        answers: Vec<String>,
        /// Print the plain-text summary instead of the view
        #[arg(short, long)]
        summary: bool,
        /// Copy the summary to the clipboard
        #[arg(long)]
        copy: bool,
    },

    /// Print the question graph as a tree
    Show {
        /// Document file or http(s) URL (default: configured source)
        #[arg(value_hint = ValueHint::AnyPath)]
        source: Option<String>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config instead of ./.theramatch.toml
        #[arg(short, long)]
        global: bool,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show config paths
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn given_repeated_answers_when_parsing_run_then_kept_in_order() {
        let cli = Cli::parse_from([
            "theramatch", "-dd", "run", "tree.json", "-a", "Yes", "--answer", "No", "--summary",
        ]);

        assert_eq!(cli.debug, 2);
        match cli.command {
            Some(Commands::Run {
                source,
                answers,
                summary,
                copy,
            }) => {
                assert_eq!(source.as_deref(), Some("tree.json"));
                assert_eq!(answers, vec!["Yes".to_string(), "No".to_string()]);
                assert!(summary);
                assert!(!copy);
            }
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn given_no_subcommand_when_parsing_then_command_is_none() {
        let cli = Cli::parse_from(["theramatch"]);
        assert!(cli.command.is_none());
    }
}
