//! `rules` subcommand: presentation of the built-in catalog.

use anyhow::Result;
use colored::*;
use engine::{Rule, RuleCatalog};
use std::io::{self, Write};
use std::path::Path;

use crate::config::load_config;
use crate::ui::use_colored_output;

/// Prints every built-in rule, marking the ones disabled by the
/// configuration.
pub fn list_rules(config: Option<&Path>) -> Result<()> {
    let catalog = RuleCatalog::builtin();
    let cfg = load_config(config)?;
    cfg.validate(&catalog)?;
    let mut out = io::stdout();
    write_rules(&mut out, &catalog, &cfg.rules.disabled, use_colored_output())?;
    Ok(())
}

fn write_rules<W: Write>(
    out: &mut W,
    catalog: &RuleCatalog,
    disabled: &[String],
    color: bool,
) -> io::Result<()> {
    let mut enabled = 0;
    for rule in catalog.iter() {
        let off = disabled.iter().any(|d| d == rule.id());
        if !off {
            enabled += 1;
        }
        write_rule(out, rule.as_ref(), off, color)?;
    }
    writeln!(out, "{} rules, {} enabled", catalog.len(), enabled)
}

fn write_rule<W: Write>(out: &mut W, rule: &dyn Rule, disabled: bool, color: bool) -> io::Result<()> {
    let status = if disabled { " (disabled)" } else { "" };
    if color {
        writeln!(out, "{}{}", rule.id().bright_white().bold(), status.bright_yellow())?;
    } else {
        writeln!(out, "{}{}", rule.id(), status)?;
    }
    writeln!(out, "    Name:        {}", rule.name())?;
    writeln!(out, "    Severity:    {}", rule.severity())?;
    for tag in rule.weaknesses() {
        writeln!(out, "    Weakness:    {tag}")?;
        writeln!(out, "                 {}", tag.url())?;
    }
    writeln!(out, "    Description: {}", rule.description())?;
    writeln!(out)
}
