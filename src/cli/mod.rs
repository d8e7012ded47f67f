//! CLI module for review-chain
//!
//! Provides command-line interface parsing and handling for the review-chain binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// review-chain - sequential agent chain for document review
///
/// Runs a document through an ordered list of prompt-configured agents. Each
/// agent sees the document plus every earlier agent's output.
#[derive(Parser, Debug)]
#[command(
    name = "review-chain",
    version,
    about = "Sequential agent chain for document review",
    long_about = "Runs a document through an ordered list of prompt-configured agents.\n\
                  Each agent sees the document plus every earlier agent's output, and the\n\
                  final step writes a consolidated review report.",
    after_help = "EXAMPLES:\n    \
                  review-chain run --input submission.txt          # Review a document\n    \
                  cat doc.txt | review-chain run --output report.md  # Read stdin, write a file\n    \
                  review-chain agents list                         # Show the agent chain\n    \
                  review-chain config --validate                   # Check review-chain.toml"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "review-chain.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the agent chain over a document
    ///
    /// Progress is printed per step. The Markdown report goes to --output,
    /// or to stdout when no output file is given. With --notes, every agent
    /// output is appended to a reviewer notes file.
    Run {
        /// Input text file; `-` or no value reads stdin
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// File to write the Markdown report to
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Reviewer notes file to append agent outputs to; created if missing
        #[arg(short, long)]
        notes: Option<PathBuf>,

        /// API key; overrides the environment variable named in the config
        #[arg(long, env = "REVIEW_CHAIN_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },

    /// Show configuration information
    Config {
        /// Show the full configuration
        #[arg(short = 'f', long)]
        full: bool,

        /// Validate the configuration file
        #[arg(long)]
        validate: bool,
    },

    /// Inspect the agent chain
    #[command(subcommand)]
    Agents(AgentCommands),
}

/// Agent subcommands
#[derive(Subcommand, Debug)]
pub enum AgentCommands {
    /// List agents in execution order
    List,

    /// Show details for a specific agent
    Show {
        /// Id of the agent
        id: String,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run_with_files() {
        let cli = Cli::try_parse_from([
            "review-chain",
            "run",
            "--input",
            "doc.txt",
            "--output",
            "report.md",
        ])
        .unwrap();

        assert_eq!(cli.config, PathBuf::from("review-chain.toml"));
        match cli.command {
            Commands::Run { input, output, .. } => {
                assert_eq!(input, Some(PathBuf::from("doc.txt")));
                assert_eq!(output, Some(PathBuf::from("report.md")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_agents_show_with_global_flags() {
        let cli = Cli::try_parse_from([
            "review-chain",
            "agents",
            "show",
            "3",
            "--no-color",
            "--config",
            "custom.toml",
        ])
        .unwrap();

        assert!(cli.no_color);
        assert_eq!(cli.config, PathBuf::from("custom.toml"));
        assert!(matches!(
            cli.command,
            Commands::Agents(AgentCommands::Show { ref id }) if id == "3"
        ));
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(Cli::try_parse_from(["review-chain"]).is_err());
    }
}
