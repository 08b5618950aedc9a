//! Analysis engine for PHP projects.
//!
//! The engine builds a [`ProjectIndex`] of every class declared in the
//! scanned files, then evaluates a [`RuleCatalog`] over each syntax tree.
//! Rules query the tree through a [`Scope`] and its analyzers instead of
//! walking nodes by hand.

use parsers::ParserMetrics;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub mod analyzers;
pub mod index;
pub mod rules;
pub mod scan;
pub mod scope;

pub use index::{ClassDescriptor, ProjectIndex};
pub use rules::{Rule, RuleCatalog, RuleContext};
pub use scan::{FailedFile, Orchestrator, ScanReport, ScanStatus, Scanner, TreeScanner};
pub use scope::{Scope, ScopeError};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "UPPERCASE")]
/// Severity associated with a rule or finding.
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Info => "INFO",
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            "warning" => Ok(Severity::Medium),
            other => Err(format!("unknown severity '{other}'")),
        }
    }
}

/// CWE classification attached to a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct WeaknessTag {
    /// Identifier such as `CWE-502`.
    pub id: &'static str,
    pub title: &'static str,
}

impl WeaknessTag {
    pub const fn new(id: &'static str, title: &'static str) -> Self {
        Self { id, title }
    }

    /// Link to the MITRE definition page.
    pub fn url(&self) -> String {
        let number = self.id.trim_start_matches("CWE-");
        format!("https://cwe.mitre.org/data/definitions/{number}.html")
    }
}

impl fmt::Display for WeaknessTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.title)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Result of evaluating a rule over a file.
/// Contains basic information for reports.
pub struct Finding {
    /// Rule that generated the finding.
    pub rule_id: String,
    /// Human readable label of the rule.
    #[serde(rename = "type")]
    pub kind: String,
    /// Severity assigned by the rule.
    pub severity: Severity,
    /// Path of the affected file.
    pub file: PathBuf,
    pub line: usize,
    pub column: usize,
    /// Relevant code fragment.
    pub excerpt: String,
    /// Descriptive message of the problem.
    pub message: String,
    /// CWE identifiers of the rule.
    #[serde(default)]
    pub weaknesses: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Wall-clock budget per file, checked between rules.
    pub file_timeout: Option<Duration>,
    /// Marker that drops findings reported on the same line.
    pub suppress_comment: Option<String>,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct EngineMetrics {
    pub file_times_ms: HashMap<String, u128>,
    pub rule_times_ms: HashMap<String, u128>,
    pub classes_indexed: usize,
    pub findings: usize,
    pub parser: ParserMetrics,
}
