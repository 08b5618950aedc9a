use clap::{Args as ClapArgs, Parser, Subcommand};
use engine::Severity;
use regex::Regex;
use std::path::PathBuf;

use crate::output::Format;

fn parse_severity(s: &str) -> Result<Severity, String> {
    s.parse()
}

fn default_threads() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get())
}

fn parse_threads(s: &str) -> Result<usize, String> {
    let v: usize = s
        .parse()
        .map_err(|e: std::num::ParseIntError| e.to_string())?;
    if v == 0 {
        Err("threads must be greater than 0".into())
    } else {
        Ok(v)
    }
}

#[derive(Parser)]
#[command(
    name = "rootcause-php",
    author,
    version,
    about = "RootCause PHP - static security analysis for PHP and Laravel projects",
    long_about = "RootCause PHP indexes the classes of a PHP project, then runs CWE-tagged security rules over every file.

Rules:
• php.unsafe-deserialization    unserialize() on user input (CWE-502)
• php.missing-sensitive-parameter    secrets without #[\\SensitiveParameter] (CWE-532)
• php.query-builder-user-sort    Spatie QueryBuilder allow lists from the request (CWE-89)
• php.command-injection    shell execution of user input (CWE-78)
• php.raw-sql    raw SQL fragments built from user input (CWE-89)

Examples:
  rootcause-php scan .                        # Scan current directory
  rootcause-php scan app/ --format sarif      # SARIF output for code scanning
  rootcause-php scan . --fail-on high         # Non-zero exit on HIGH findings
  rootcause-php rules list                    # Show the rule catalog",
    subcommand_required = true,
    disable_version_flag = true
)]
pub struct Cli {
    /// Show version information
    #[arg(short = 'v', long = "version", action = clap::ArgAction::Version)]
    pub version: Option<bool>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a PHP project for security vulnerabilities
    Scan(ScanArgs),
    /// Inspect the built-in rule catalog
    #[command(subcommand, alias = "rule")]
    Rules(RulesCmd),
}

#[derive(ClapArgs)]
pub struct ScanArgs {
    /// Path to scan (file or directory)
    pub path: PathBuf,
    /// Output format for scan results
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
    /// Exit with error code if findings of this severity or higher are found
    #[arg(long = "fail-on", value_parser = parse_severity)]
    pub fail_on: Option<Severity>,
    /// Number of parallel threads to use for scanning
    #[arg(long, default_value_t = default_threads(), value_parser = parse_threads)]
    pub threads: usize,
    /// Exclude files matching these glob patterns
    #[arg(long, value_parser = crate::parse_exclude, value_delimiter = ',')]
    pub exclude: Vec<Regex>,
    /// Don't use default exclusion patterns (vendor/, node_modules/, .git/)
    #[arg(long)]
    pub no_default_exclude: bool,
    /// Maximum file size to scan (in bytes)
    #[arg(long)]
    pub max_file_size: Option<u64>,
    /// Analysis budget per file in milliseconds
    #[arg(long)]
    pub timeout_file_ms: Option<u64>,
    /// Write performance metrics to file (`-` for stderr)
    #[arg(long)]
    pub metrics: Option<PathBuf>,
    /// Comment marker that suppresses findings on its line
    #[arg(long = "suppress-comment")]
    pub suppress_comment: Option<String>,
    /// Rule id to skip; may be repeated
    #[arg(long = "disable-rule")]
    pub disable_rule: Vec<String>,
    /// Configuration file (defaults to ~/.config/rootcause-php/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
    /// Suppress non-essential output
    #[arg(long)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum RulesCmd {
    /// List the built-in rules with their severity and CWE tags
    List {
        /// Configuration file whose disabled rules are marked
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}
