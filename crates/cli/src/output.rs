use clap::ValueEnum;
use engine::{Finding, RuleCatalog};
use reporters::{self, ScanInfo};

/// Supported output formats for scan results.
#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum Format {
    Text,
    Json,
    Sarif,
}

impl From<Format> for reporters::Format {
    fn from(fmt: Format) -> Self {
        match fmt {
            Format::Text => reporters::Format::Text,
            Format::Json => reporters::Format::Json,
            Format::Sarif => reporters::Format::Sarif,
        }
    }
}

pub fn print_findings(
    findings: &[Finding],
    rules: &RuleCatalog,
    fmt: Format,
    info: &ScanInfo,
) -> anyhow::Result<()> {
    reporters::print_findings(findings, rules, fmt.into(), Some(info))?;
    Ok(())
}
