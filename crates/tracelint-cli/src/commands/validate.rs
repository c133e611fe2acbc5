//! Validate command implementation.

use crate::cli::ValidateArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use tracelint_domain::RuleDefinition;
use tracelint_rules::{RuleAuthoring, RuleParser};

/// Execute the validate command.
///
/// Prints the parsed rule on success. A rejected rule comes back as
/// [`CliError::RuleRejected`] so the exit code is non-zero.
pub fn execute_validate(args: ValidateArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    println!("{}", render_validate(&args, config, formatter)?);
    Ok(())
}

/// Validate the rule and render the accepted rule.
///
/// On rejection the error carries its rendering, with a marker under the
/// offending position.
pub fn render_validate(args: &ValidateArgs, config: &Config, formatter: &Formatter) -> Result<String> {
    let authoring = RuleAuthoring::new(RuleParser::with_max_depth(config.verifier.max_rule_depth));
    let definition = RuleDefinition::new(&args.name, &args.description, &args.text);

    match authoring.validate(&definition) {
        Ok(accepted) => formatter.format_accepted(&accepted),
        Err(error) => Err(CliError::RuleRejected {
            rendered: formatter.format_parse_error(&definition.text, &error),
            error,
        }),
    }
}
