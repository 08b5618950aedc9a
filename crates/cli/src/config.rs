use anyhow::{bail, Context, Result};
use engine::{RuleCatalog, Severity};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

#[cfg(windows)]
pub fn config_dir() -> PathBuf {
    std::env::var("APPDATA")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("rootcause-php")
}

#[cfg(not(windows))]
pub fn config_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".config")
        .join("rootcause-php")
}

fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

#[derive(Debug, Default, Deserialize)]
pub struct RulesConfig {
    /// Rule ids that never run.
    #[serde(default)]
    pub disabled: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScanConfig {
    pub fail_on: Option<String>,
    pub suppress_comment: Option<String>,
    pub max_file_size: Option<u64>,
    pub timeout_file_ms: Option<u64>,
    /// Glob patterns added to the exclusions.
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// Contents of `config.toml`. Command line flags take precedence.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub scan: ScanConfig,
}

impl Config {
    /// Checks the settings that can only be validated against the rule
    /// catalog or need parsing.
    pub fn validate(&self, catalog: &RuleCatalog) -> Result<()> {
        for id in &self.rules.disabled {
            if !catalog.contains(id) {
                bail!("unknown rule id '{id}' in [rules] disabled");
            }
        }
        self.fail_on()?;
        for pattern in &self.scan.exclude {
            crate::parse_exclude(pattern)
                .map_err(|e| anyhow::anyhow!("invalid exclude pattern '{pattern}': {e}"))?;
        }
        Ok(())
    }

    pub fn fail_on(&self) -> Result<Option<Severity>> {
        self.scan
            .fail_on
            .as_deref()
            .map(|s| s.parse::<Severity>().map_err(anyhow::Error::msg))
            .transpose()
            .context("invalid [scan] fail_on")
    }
}

/// Loads `path`, or the user configuration file when none is given.
///
/// An explicit file must exist; a missing default file yields the
/// default configuration.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let default = config_file_path();
            if !default.exists() {
                return Ok(Config::default());
            }
            default
        }
    };
    let content =
        fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}
