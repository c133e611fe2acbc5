//! CLI command definitions and argument parsing.

use clap::{ArgAction, Parser, Subcommand};

/// Tracelint - Check requirement traceability snapshots against structural rules.
#[derive(Debug, Parser)]
#[command(name = "tracelint")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "TRACELINT_CONFIG")]
    pub config: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs or names only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check a snapshot against the default and project rules
    Check(CheckArgs),

    /// Validate rule text before it is stored
    Validate(ValidateArgs),

    /// List the built-in default rules
    Defaults,

    /// List artifacts of given types around one artifact
    Neighborhood(NeighborhoodArgs),
}

/// Arguments for the check command.
#[derive(Debug, Parser)]
pub struct CheckArgs {
    /// Snapshot JSON file ({"artifacts": [...], "traceLinks": [...]})
    pub snapshot: String,

    /// TOML file of project rules ([[rules]] tables)
    #[arg(short, long)]
    pub rules: Option<String>,

    /// Skip the built-in default rules
    #[arg(long)]
    pub no_defaults: bool,

    /// Fail on the first malformed project rule
    #[arg(long)]
    pub strict: bool,

    /// Exit with an error when any artifact has warnings
    #[arg(long)]
    pub deny_warnings: bool,
}

/// Arguments for the validate command.
#[derive(Debug, Parser)]
pub struct ValidateArgs {
    /// Rule name
    #[arg(short, long)]
    pub name: String,

    /// Rule description
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Rule text, e.g. "at-least-one(Requirement, CHILD, Design)"
    pub text: String,
}

/// Arguments for the neighborhood command.
#[derive(Debug, Parser)]
pub struct NeighborhoodArgs {
    /// Snapshot JSON file
    pub snapshot: String,

    /// Artifact ID to start from
    pub artifact: String,

    /// Artifact types to keep (comma separated)
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub types: Vec<String>,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_command() {
        let cli = Cli::parse_from([
            "tracelint",
            "check",
            "snapshot.json",
            "--rules",
            "rules.toml",
            "--no-defaults",
        ]);
        match cli.command {
            Command::Check(args) => {
                assert_eq!(args.snapshot, "snapshot.json");
                assert_eq!(args.rules.as_deref(), Some("rules.toml"));
                assert!(args.no_defaults);
                assert!(!args.strict);
            }
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_validate_command() {
        let cli = Cli::parse_from([
            "tracelint",
            "validate",
            "--name",
            "single-design",
            "exactly-one(Requirement, CHILD, Design)",
        ]);
        match cli.command {
            Command::Validate(args) => {
                assert_eq!(args.name, "single-design");
                assert_eq!(args.description, "");
                assert_eq!(args.text, "exactly-one(Requirement, CHILD, Design)");
            }
            _ => panic!("Expected Validate command"),
        }
    }

    #[test]
    fn test_neighborhood_types_split_on_comma() {
        let cli = Cli::parse_from([
            "tracelint",
            "neighborhood",
            "snapshot.json",
            "00000000-0000-0000-0000-000000000001",
            "--types",
            "Design,Test",
        ]);
        match cli.command {
            Command::Neighborhood(args) => assert_eq!(args.types, vec!["Design", "Test"]),
            _ => panic!("Expected Neighborhood command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["tracelint", "-vv", "defaults", "--format", "json", "--no-color"]);
        assert_eq!(cli.verbose, 2);
        assert!(cli.no_color);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        assert!(matches!(cli.command, Command::Defaults));
    }
}
