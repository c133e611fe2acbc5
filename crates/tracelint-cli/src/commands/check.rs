//! Check command implementation.

use crate::cli::CheckArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::sources::{JsonSnapshotFile, TomlRuleFile};
use tracelint_domain::traits::SnapshotProvider;
use tracelint_verifier::{VerificationReport, Verifier};
use tracing::info;

/// Execute the check command.
pub fn execute_check(args: CheckArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let (report, rendered) = render_check(&args, config, formatter)?;
    println!("{}", rendered);

    if args.deny_warnings && !report.is_clean() {
        return Err(CliError::WarningsFound(report.warnings.len()));
    }
    Ok(())
}

/// Check the snapshot and render the report.
pub fn render_check(
    args: &CheckArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<(VerificationReport, String)> {
    let mut verifier_config = config.verifier.clone();
    if args.no_defaults {
        verifier_config.include_default_rules = false;
    }
    if args.strict {
        verifier_config.strict_rules = true;
    }

    let snapshot = JsonSnapshotFile::new(&args.snapshot).snapshot()?;
    let rules_path = args.rules.clone().or_else(|| config.settings.rules_file.clone());
    let repository = TomlRuleFile::new(rules_path);

    let mut verifier = Verifier::with_builtin_defaults(verifier_config)?;
    let report = verifier.check_from(&snapshot, &repository)?;
    info!("{}", report.metrics.summary());

    let rendered = formatter.format_report(&report, &snapshot)?;
    Ok((report, rendered))
}
