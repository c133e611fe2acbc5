//! Defaults command implementation.

use crate::error::Result;
use crate::output::Formatter;
use tracelint_verifier::DefaultRuleSet;

/// Execute the defaults command.
pub fn execute_defaults(formatter: &Formatter) -> Result<()> {
    println!("{}", render_defaults(formatter)?);
    Ok(())
}

/// Render the built-in rule set.
pub fn render_defaults(formatter: &Formatter) -> Result<String> {
    let defaults = DefaultRuleSet::builtin()?;
    formatter.format_rules(&defaults)
}
