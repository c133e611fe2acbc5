//! Tracelint CLI - check traceability snapshots against structural rules.

use clap::Parser;
use tracelint_cli::commands;
use tracelint_cli::{Cli, CliError, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        match &e {
            CliError::RuleRejected { rendered, .. } => eprintln!("{}", rendered),
            _ => eprintln!("Error: {}", e),
        }
        std::process::exit(1);
    }
}

/// Log to stderr so stdout stays machine readable; RUST_LOG wins over -v.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> tracelint_cli::Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Check(args) => commands::execute_check(args, &config, &formatter),
        Command::Validate(args) => commands::execute_validate(args, &config, &formatter),
        Command::Defaults => commands::execute_defaults(&formatter),
        Command::Neighborhood(args) => commands::execute_neighborhood(args, &formatter),
    }
}
