use anyhow::{anyhow, Context, Result};
use engine::{EngineConfig, Orchestrator, RuleCatalog, Severity, TreeScanner};
use regex::Regex;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::level_filters::LevelFilter;
use tracing::{debug, error, info};

use crate::args::ScanArgs;
use crate::config::{load_config, Config};
use crate::output::{self, Format};
use crate::{
    default_excludes, is_excluded, load_ignore_patterns, parse_exclude, ui, walk,
    DEFAULT_MAX_FILE_SIZE, DEFAULT_SUPPRESS_COMMENT,
};

/// Scan options after merging the command line over the configuration file.
#[derive(Debug)]
pub struct Settings {
    pub fail_on: Option<Severity>,
    pub suppress_comment: String,
    pub max_file_size: u64,
    pub file_timeout: Option<Duration>,
    pub excludes: Vec<Regex>,
    pub disabled: Vec<String>,
}

impl Settings {
    /// Flags win over `cfg`; list settings are concatenated.
    pub fn resolve(args: &ScanArgs, cfg: &Config, catalog: &RuleCatalog) -> Result<Self> {
        cfg.validate(catalog)?;
        for id in &args.disable_rule {
            if !catalog.contains(id) {
                return Err(anyhow!("unknown rule id '{id}' in --disable-rule"));
            }
        }
        let mut excludes = args.exclude.clone();
        for pattern in &cfg.scan.exclude {
            excludes.push(parse_exclude(pattern).map_err(anyhow::Error::msg)?);
        }
        if !args.no_default_exclude {
            excludes.extend(default_excludes());
        }
        let mut disabled = cfg.rules.disabled.clone();
        disabled.extend(args.disable_rule.iter().cloned());
        Ok(Self {
            fail_on: args.fail_on.or(cfg.fail_on()?),
            suppress_comment: args
                .suppress_comment
                .clone()
                .or_else(|| cfg.scan.suppress_comment.clone())
                .unwrap_or_else(|| DEFAULT_SUPPRESS_COMMENT.to_string()),
            max_file_size: args
                .max_file_size
                .or(cfg.scan.max_file_size)
                .unwrap_or(DEFAULT_MAX_FILE_SIZE),
            file_timeout: args
                .timeout_file_ms
                .or(cfg.scan.timeout_file_ms)
                .map(Duration::from_millis),
            excludes,
            disabled,
        })
    }
}

fn init_tracing(args: &ScanArgs) {
    let level = if args.quiet {
        LevelFilter::OFF
    } else if args.debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    if args.debug && !args.quiet {
        debug!("Debug mode enabled");
    }
}

pub fn run_scan(args: ScanArgs) -> Result<()> {
    init_tracing(&args);

    let builtin = RuleCatalog::builtin();
    let user_cfg = load_config(args.config.as_deref()).context("failed to load configuration")?;
    let settings = Settings::resolve(&args, &user_cfg, &builtin)?;

    if args.format == Format::Text && !args.quiet {
        ui::print_header();
    }

    let path = args
        .path
        .canonicalize()
        .with_context(|| format!("failed to access {}", args.path.display()))?;
    info!(target = %path.display(), "Scan started");
    debug!(path = %path.display(), max_file_size = settings.max_file_size, "Scanning path");
    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads)
        .build_global()
    {
        error!("Failed to build global thread pool: {e}");
    }

    let catalog = builtin.without(&settings.disabled);
    info!(count = catalog.len(), "Rules loaded");

    let mut patterns = settings.excludes.clone();
    patterns.extend(load_ignore_patterns(&path));
    let files: Vec<PathBuf> = walk::collect_php_files(&path, &|p| {
        is_excluded(p, &patterns, settings.max_file_size)
    })?;
    let total_files = files.len();
    info!(files = total_files, "Files queued");
    debug!(files = files.len(), excludes = patterns.len(), "Files queued");

    let config = EngineConfig {
        file_timeout: settings.file_timeout,
        suppress_comment: Some(settings.suppress_comment.clone()),
    };
    let start_time = Instant::now();
    let report = Orchestrator::new(TreeScanner::new(), catalog.clone())
        .with_config(config)
        .run(files);
    let duration_ms = start_time.elapsed().as_millis() as u64;

    let scan_info = reporters::ScanInfo {
        rules_loaded: report.rules_loaded,
        files_analyzed: total_files,
        classes_indexed: report.metrics.classes_indexed,
        duration_ms,
        failed_files: report.failed_files.clone(),
    };
    output::print_findings(&report.findings, &catalog, args.format, &scan_info)?;

    if let Some(path) = &args.metrics {
        let data = serde_json::to_string_pretty(&report.metrics)?;
        if path.as_os_str() == "-" {
            if !args.quiet {
                eprintln!("{data}");
            }
        } else {
            fs::write(path, data)
                .with_context(|| format!("failed to write metrics to {}", path.display()))?;
        }
    }

    info!(findings = report.findings.len(), "Scan completed");
    if let Some(threshold) = settings.fail_on {
        if report.status(threshold).is_failure() {
            std::process::exit(1);
        }
    }
    Ok(())
}
