//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use std::collections::HashMap;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};
use tracelint_domain::{Artifact, ArtifactId, Snapshot};
use tracelint_rules::{AcceptedRule, ParseError};
use tracelint_verifier::{DefaultRuleSet, VerificationReport};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a check report.
    ///
    /// `snapshot` supplies artifact types and names for the table view.
    pub fn format_report(&self, report: &VerificationReport, snapshot: &Snapshot) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Table => Ok(self.format_report_table(report, snapshot)),
            OutputFormat::Quiet => Ok(report
                .warnings
                .iter()
                .map(|(id, _)| id.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn format_report_table(&self, report: &VerificationReport, snapshot: &Snapshot) -> String {
        let artifacts = index_artifacts(snapshot);
        let mut sections = Vec::new();

        for link in &report.skipped_links {
            sections.push(self.warning(&link.to_string()));
        }
        for rejected in &report.rejected_rules {
            sections.push(self.warning(&format!(
                "Rule '{}' skipped: {}",
                rejected.name, rejected.error
            )));
        }

        if report.warnings.is_empty() {
            sections.push(self.success(&format!(
                "No warnings ({} artifacts checked)",
                snapshot.artifacts.len()
            )));
            return sections.join("\n");
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Type", "Name", "Violated rule"]);

        for (id, names) in report.warnings.iter() {
            let (artifact_type, name) = describe(&artifacts, id);
            for rule_name in names {
                builder.push_record([
                    short_id(id),
                    artifact_type.clone(),
                    name.clone(),
                    rule_name.clone(),
                ]);
            }
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        sections.push(table.to_string());
        sections.push(self.colorize(
            &format!(
                "{} violation(s) on {} of {} artifacts",
                report.warnings.violation_count(),
                report.warnings.len(),
                snapshot.artifacts.len()
            ),
            "yellow",
        ));
        sections.join("\n")
    }

    /// Format the default rule set.
    pub fn format_rules(&self, defaults: &DefaultRuleSet) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(defaults.definitions())?),
            OutputFormat::Quiet => Ok(defaults
                .definitions()
                .iter()
                .map(|d| d.name.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if defaults.is_empty() {
                    return Ok(self.colorize("No default rules.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["Name", "Applies to", "Rule", "Description"]);
                for (definition, rule) in defaults.definitions().iter().zip(defaults.rules()) {
                    builder.push_record([
                        definition.name.clone(),
                        rule.source_type().unwrap_or("-").to_string(),
                        rule.text(),
                        definition.description.clone(),
                    ]);
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
        }
    }

    /// Format a rule accepted by validation.
    pub fn format_accepted(&self, accepted: &AcceptedRule) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "id": accepted.id.to_string(),
                "name": accepted.rule.name(),
                "description": accepted.rule.description(),
                "text": accepted.rule.text(),
                "appliesTo": accepted.rule.source_type(),
            }))?),
            OutputFormat::Quiet => Ok(accepted.id.to_string()),
            OutputFormat::Table => {
                let mut lines = vec![self.success(&format!(
                    "Rule '{}' is valid ({})",
                    accepted.rule.name(),
                    accepted.id
                ))];
                lines.push(format!("  {}", accepted.rule.text()));
                match accepted.rule.source_type() {
                    Some(source) => lines.push(format!("  Applies to: {}", source)),
                    None => lines.push(self.warning(
                        "Leaves name different source types; this rule applies to no artifact",
                    )),
                }
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format a rejected rule, pointing at the offending position.
    pub fn format_parse_error(&self, text: &str, error: &ParseError) -> String {
        if self.format == OutputFormat::Json {
            return serde_json::json!({
                "code": error.code(),
                "message": error.to_string(),
                "offset": error.offset(),
            })
            .to_string();
        }

        let mut lines = vec![self.error(&error.to_string())];
        if let Some(offset) = error.offset() {
            let column = text.get(..offset).map(|s| s.chars().count()).unwrap_or(0);
            lines.push(format!("  {}", text));
            lines.push(format!("  {}{}", " ".repeat(column), self.colorize("^", "red")));
        }
        lines.join("\n")
    }

    /// Format artifacts found around a starting artifact.
    pub fn format_artifacts(&self, ids: &[ArtifactId], snapshot: &Snapshot) -> Result<String> {
        let artifacts = index_artifacts(snapshot);
        match self.format {
            OutputFormat::Json => {
                let found: Vec<&Artifact> = ids.iter().filter_map(|id| artifacts.get(id).copied()).collect();
                Ok(serde_json::to_string_pretty(&found)?)
            }
            OutputFormat::Quiet => Ok(ids.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n")),
            OutputFormat::Table => {
                if ids.is_empty() {
                    return Ok(self.colorize("No matching artifacts found.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["ID", "Type", "Name"]);
                for id in ids {
                    let (artifact_type, name) = describe(&artifacts, *id);
                    builder.push_record([id.to_string(), artifact_type, name]);
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn index_artifacts(snapshot: &Snapshot) -> HashMap<ArtifactId, &Artifact> {
    let mut index = HashMap::new();
    for artifact in &snapshot.artifacts {
        index.entry(artifact.id).or_insert(artifact);
    }
    index
}

fn describe(artifacts: &HashMap<ArtifactId, &Artifact>, id: ArtifactId) -> (String, String) {
    match artifacts.get(&id) {
        Some(a) => (a.artifact_type.clone(), a.name.clone().unwrap_or_default()),
        None => ("?".to_string(), String::new()),
    }
}

/// First UUID group, enough to tell artifacts apart in a table.
fn short_id(id: ArtifactId) -> String {
    let full = id.to_string();
    full.split('-').next().unwrap_or(&full).to_string()
}
