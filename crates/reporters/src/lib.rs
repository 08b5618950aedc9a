//! Formatters for findings in text, JSON and SARIF.
//! Provide human and tool-friendly output.

use engine::{FailedFile, Finding, RuleCatalog, Severity};
use serde::Serialize;
use std::io::{self, Write};
use tracing::debug;

mod sarif;

pub use sarif::to_sarif;

const RULE: &str = "    ──────────────────────────────────────────────────────────────────────────────\n";

/// Returns the severity colored with simple ANSI codes.
fn color_severity(sev: Severity) -> String {
    let code = match sev {
        Severity::Info | Severity::Low => "\x1b[32m",
        Severity::Medium => "\x1b[33m",
        Severity::High | Severity::Critical => "\x1b[31m",
    };
    format!("{code}{sev}\x1b[0m")
}

fn simple_box(title: &str) -> String {
    let width = title.chars().count() + 2;
    format!(
        "╭{}╮\n│ {} │\n╰{}╯\n",
        "─".repeat(width),
        title,
        "─".repeat(width)
    )
}

/// Summary printed before the results of a text report.
fn summary_section(info: &ScanInfo) -> String {
    let mut output = simple_box("Analysis Status");
    output.push('\n');
    output.push_str(&format!(
        "    Scanned {} PHP files with {} rules\n\n",
        info.files_analyzed, info.rules_loaded
    ));

    output.push_str("    PERFORMANCE\n");
    output.push_str(RULE);
    output.push_str(&format!("    Duration                  {}ms\n", info.duration_ms));
    output.push_str(&format!(
        "    Classes indexed           {}\n",
        info.classes_indexed
    ));
    output.push_str(&format!(
        "    Failed files              {}\n",
        info.failed_files.len()
    ));

    if !info.failed_files.is_empty() {
        output.push('\n');
        output.push_str("    FAILED FILES\n");
        output.push_str(RULE);
        for failed in &info.failed_files {
            output.push_str(&format!(
                "    {}: {}\n",
                failed.path.display(),
                failed.reason
            ));
        }
    }
    output
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Supported formats for printing findings.
pub enum Format {
    /// Human-readable output in plain text.
    Text,
    /// JSON structure for integrations.
    Json,
    /// Report in SARIF 2.1.0 format.
    Sarif,
}

#[derive(Serialize)]
/// Simple wrapper used when serialising to JSON.
struct FindingsOut<'a> {
    findings: &'a [Finding],
    total: usize,
}

/// Additional information to display in statistics.
#[derive(Debug, Clone, Default)]
pub struct ScanInfo {
    pub rules_loaded: usize,
    pub files_analyzed: usize,
    pub classes_indexed: usize,
    pub duration_ms: u64,
    pub failed_files: Vec<FailedFile>,
}

/// Prints findings in the selected format.
///
/// `rules` supplies the rule metadata embedded in SARIF output.
///
/// # Example
/// ```
/// use engine::RuleCatalog;
/// use reporters::{print_findings, Format, ScanInfo};
/// let info = ScanInfo {
///     rules_loaded: 5,
///     files_analyzed: 3,
///     duration_ms: 12,
///     ..ScanInfo::default()
/// };
/// print_findings(&[], &RuleCatalog::builtin(), Format::Text, Some(&info)).unwrap();
/// ```
pub fn print_findings(
    findings: &[Finding],
    rules: &RuleCatalog,
    fmt: Format,
    scan_info: Option<&ScanInfo>,
) -> io::Result<()> {
    let mut out = io::stdout();
    write_findings(&mut out, findings, rules, fmt, scan_info)
}

/// Writes findings to any `Write`.
pub fn write_findings<W: Write>(
    out: &mut W,
    findings: &[Finding],
    rules: &RuleCatalog,
    fmt: Format,
    scan_info: Option<&ScanInfo>,
) -> io::Result<()> {
    debug!(format = ?fmt, findings = findings.len(), "Rendering report");
    match fmt {
        Format::Text => {
            if let Some(info) = scan_info {
                writeln!(out, "{}", summary_section(info))?;
            }

            writeln!(out, "{}", simple_box("Results"))?;
            if findings.is_empty() {
                writeln!(out, "✔ No issues found.")?;
                return Ok(());
            }
            writeln!(out, "⚠ Found {} issue(s):\n", findings.len())?;
            for f in findings {
                writeln!(
                    out,
                    "{} {}:{} {} [{}]",
                    color_severity(f.severity),
                    f.file.display(),
                    f.line,
                    f.rule_id,
                    f.kind
                )?;
                writeln!(out, "    {}", f.message)?;
                writeln!(out, "    ↳  {}", f.excerpt.trim())?;
                if !f.weaknesses.is_empty() {
                    writeln!(out, "    • {}", f.weaknesses.join(", "))?;
                }
                writeln!(out)?;
            }
            writeln!(out, "Total: {}", findings.len())?;
        }
        Format::Json => {
            let json = FindingsOut {
                findings,
                total: findings.len(),
            };
            serde_json::to_writer_pretty(&mut *out, &json)?;
            writeln!(out)?;
        }
        Format::Sarif => {
            let sarif = sarif::to_sarif(findings, rules)?;
            serde_json::to_writer_pretty(&mut *out, &sarif)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
