//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use std::path::PathBuf;

/// Fairway - league management tools for the Golf Genius API
///
/// Calls the same tools an agent host would, from the shell. Reads use the
/// API key embedded in the request path; writes send it as a bearer token.
#[derive(Parser, Debug)]
#[command(
    name = "fairway",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "FAIRWAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Upstream API key (overrides the configuration file)
    #[arg(long, global = true, env = "GOLF_GENIUS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Output format for results
    #[arg(short, long, value_enum, global = true, default_value = "human")]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every tool name
    Tools,

    /// Invoke one tool with JSON arguments
    Call(CallArgs),

    /// Check that the upstream is reachable and the API key is accepted
    Health,

    /// Manage configuration files and settings
    Config(ConfigArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the call command
#[derive(Parser, Debug)]
pub struct CallArgs {
    /// Tool name, as listed by `fairway tools`
    #[arg(value_name = "TOOL")]
    pub tool: String,

    /// Tool arguments as a JSON object
    #[arg(short, long, value_name = "JSON", conflicts_with = "args_file")]
    pub args: Option<String>,

    /// Read tool arguments from a JSON or YAML file
    #[arg(long, value_name = "PATH")]
    pub args_file: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration with the API key redacted
    Show(ConfigShowArgs),

    /// Write a default configuration file
    Init(ConfigInitArgs),
}

#[derive(Parser, Debug)]
pub struct ConfigShowArgs {
    /// Show configuration in specified format
    #[arg(short, long, value_enum, default_value = "yaml")]
    pub format: ConfigFormat,
}

#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Destination file; `.json` writes JSON, anything else YAML
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Configuration file formats
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_call_arguments() {
        let cli = Cli::try_parse_from([
            "fairway",
            "call",
            "get_event_details",
            "--args",
            r#"{"event_id": 5}"#,
            "--pretty",
        ])
        .unwrap();

        match cli.command {
            Commands::Call(args) => {
                assert_eq!(args.tool, "get_event_details");
                assert_eq!(args.args.as_deref(), Some(r#"{"event_id": 5}"#));
                assert!(args.pretty);
                assert!(args.args_file.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_args_and_args_file_conflict() {
        let parsed = Cli::try_parse_from([
            "fairway",
            "call",
            "list_seasons",
            "--args",
            "{}",
            "--args-file",
            "args.json",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_verbosity_level() {
        let cli = Cli::try_parse_from(["fairway", "-vv", "tools"]).unwrap();
        assert_eq!(cli.verbosity_level(), 2);

        let quiet = Cli::try_parse_from(["fairway", "--quiet", "tools"]).unwrap();
        assert_eq!(quiet.verbosity_level(), 0);
    }

    #[test]
    fn test_config_init_defaults() {
        let cli = Cli::try_parse_from(["fairway", "config", "init"]).unwrap();
        match cli.command {
            Commands::Config(ConfigArgs {
                action: ConfigAction::Init(args),
            }) => {
                assert!(args.path.is_none());
                assert!(!args.force);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
