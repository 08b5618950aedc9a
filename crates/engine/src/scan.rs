//! Scan orchestration: parse, index, then evaluate every rule on every file.

use ir::FileAst;
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use crate::index::ProjectIndex;
use crate::rules::{Rule, RuleCatalog, RuleContext};
use crate::scope::Scope;
use crate::{EngineConfig, EngineMetrics, Finding, Severity};

/// Evaluates one rule over one syntax tree.
pub trait Scanner: Send + Sync {
    /// Findings of `rule` on `file`, in node visitation order.
    fn scan(&self, file: &FileAst, rule: &dyn Rule) -> Vec<Finding>;

    /// Offers the project index. Scanners without project-wide context
    /// keep the default and decline.
    fn bind_index(&mut self, _index: Arc<ProjectIndex>) -> bool {
        false
    }
}

/// Scanner walking the syntax tree in preorder and calling the rule on
/// every node of the kinds it declares.
#[derive(Debug, Default)]
pub struct TreeScanner {
    index: Arc<ProjectIndex>,
}

impl TreeScanner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scanner for TreeScanner {
    fn scan(&self, file: &FileAst, rule: &dyn Rule) -> Vec<Finding> {
        let kinds = rule.node_kinds();
        let path = Path::new(&file.file_path);
        let mut out = Vec::new();
        let Some(root) = file.root() else {
            return out;
        };
        for node in file.descendants(root.id) {
            if !kinds.contains(&node.kind) {
                continue;
            }
            let result = Scope::new(file, &self.index, node.id).and_then(|scope| {
                let ctx = RuleContext::new(scope, rule, path);
                rule.check(&ctx)
            });
            match result {
                Ok(findings) => out.extend(findings),
                Err(e) => error!(
                    rule = rule.id(),
                    file = %file.file_path,
                    line = node.meta.line,
                    error = %e,
                    "Rule misused its scope"
                ),
            }
        }
        out
    }

    fn bind_index(&mut self, index: Arc<ProjectIndex>) -> bool {
        self.index = index;
        true
    }
}

/// A file that could not be analysed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedFile {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScanStatus {
    Success,
    Failure,
}

impl ScanStatus {
    pub fn is_failure(self) -> bool {
        self == ScanStatus::Failure
    }
}

/// Outcome of one [`Orchestrator::run`].
#[derive(Debug, Default, Serialize)]
pub struct ScanReport {
    /// Findings in file, rule and node order.
    pub findings: Vec<Finding>,
    pub files_scanned: usize,
    pub failed_files: Vec<FailedFile>,
    pub rules_loaded: usize,
    pub metrics: EngineMetrics,
}

impl ScanReport {
    /// Failure when a finding reaches `threshold`. Failed files do not
    /// count.
    pub fn status(&self, threshold: Severity) -> ScanStatus {
        if self.findings.iter().any(|f| f.severity >= threshold) {
            ScanStatus::Failure
        } else {
            ScanStatus::Success
        }
    }
}

struct FileOutcome {
    findings: Vec<Finding>,
    rule_times_ms: Vec<(&'static str, u128)>,
    elapsed_ms: u128,
    timed_out: bool,
}

/// Runs a catalog over a file set. One run per instance.
pub struct Orchestrator<S: Scanner> {
    scanner: S,
    catalog: RuleCatalog,
    config: EngineConfig,
}

impl<S: Scanner> Orchestrator<S> {
    pub fn new(scanner: S, catalog: RuleCatalog) -> Self {
        Self {
            scanner,
            catalog,
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Parses `files`, builds the class index and evaluates the catalog.
    ///
    /// Unreadable or unparsable files are reported in
    /// [`ScanReport::failed_files`] and never abort the run.
    pub fn run<I, P>(mut self, files: I) -> ScanReport
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let paths: Vec<PathBuf> = files.into_iter().map(Into::into).collect();
        let mut report = ScanReport {
            rules_loaded: self.catalog.len(),
            ..ScanReport::default()
        };
        info!(files = paths.len(), rules = report.rules_loaded, "Scan started");

        let (parsed, failed) = self.parse_all(&paths, &mut report.metrics);
        report.failed_files = failed;
        report.files_scanned = parsed.len();

        let index = Arc::new(ProjectIndex::build(&parsed));
        report.metrics.classes_indexed = index.len();
        info!(classes = index.len(), "Class index built");
        if !self.scanner.bind_index(Arc::clone(&index)) {
            debug!("Scanner runs without project index");
        }

        let outcomes: Vec<FileOutcome> = parsed
            .par_iter()
            .map(|file| self.scan_file(file))
            .collect();
        let budget_ms = self
            .config
            .file_timeout
            .map(|t| t.as_millis())
            .unwrap_or_default();
        for (file, outcome) in parsed.iter().zip(outcomes) {
            report
                .metrics
                .file_times_ms
                .insert(file.file_path.clone(), outcome.elapsed_ms);
            for (rule, ms) in outcome.rule_times_ms {
                *report.metrics.rule_times_ms.entry(rule.to_string()).or_insert(0) += ms;
            }
            if outcome.timed_out {
                warn!(file = %file.file_path, "File analysis timed out");
                report.failed_files.push(FailedFile {
                    path: PathBuf::from(&file.file_path),
                    reason: format!("analysis exceeded the {budget_ms} ms file budget"),
                });
                continue;
            }
            report.findings.extend(
                outcome
                    .findings
                    .into_iter()
                    .filter(|f| !file.suppressed.contains(&f.line)),
            );
        }
        report.metrics.findings = report.findings.len();
        info!(
            findings = report.findings.len(),
            failed = report.failed_files.len(),
            "Scan finished"
        );
        report
    }

    fn parse_all(
        &self,
        paths: &[PathBuf],
        metrics: &mut EngineMetrics,
    ) -> (Vec<FileAst>, Vec<FailedFile>) {
        let suppress = self.config.suppress_comment.as_deref();
        let results: Vec<_> = paths
            .par_iter()
            .map(|path| (path, parsers::parse_file(path, suppress)))
            .collect();
        let mut parsed = Vec::new();
        let mut failed = Vec::new();
        for (path, result) in results {
            match result {
                Ok(Some(ast)) => {
                    metrics.parser.files_parsed += 1;
                    parsed.push(ast);
                }
                Ok(None) => debug!(file = %path.display(), "Skipping unsupported file"),
                Err(e) => {
                    metrics.parser.parse_errors += 1;
                    warn!(file = %path.display(), error = %e, "Skipping file");
                    failed.push(FailedFile {
                        path: path.clone(),
                        reason: format!("{e:#}"),
                    });
                }
            }
        }
        (parsed, failed)
    }

    fn scan_file(&self, file: &FileAst) -> FileOutcome {
        let start = Instant::now();
        let mut outcome = FileOutcome {
            findings: Vec::new(),
            rule_times_ms: Vec::new(),
            elapsed_ms: 0,
            timed_out: false,
        };
        for rule in self.catalog.iter() {
            if let Some(ft) = self.config.file_timeout {
                if start.elapsed() >= ft {
                    outcome.timed_out = true;
                    break;
                }
            }
            debug!("Evaluating rule '{}' on file '{}'", rule.id(), file.file_path);
            let rule_start = Instant::now();
            outcome.findings.extend(self.scanner.scan(file, rule.as_ref()));
            let elapsed = rule_start.elapsed().as_millis();
            debug!(rule = rule.id(), time_ms = elapsed, "rule evaluated");
            outcome.rule_times_ms.push((rule.id(), elapsed));
        }
        if let Some(ft) = self.config.file_timeout {
            if start.elapsed() >= ft {
                outcome.timed_out = true;
            }
        }
        outcome.elapsed_ms = start.elapsed().as_millis();
        debug!(file = %file.file_path, time_ms = outcome.elapsed_ms, "file analyzed");
        outcome
    }
}
