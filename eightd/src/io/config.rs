//! Wizard configuration stored in `eightd.toml`.
//!
//! Resolution order: CLI flags, then environment variables, then this file,
//! then built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "eightd.toml";

pub const ENV_DEFAULTS_FILE: &str = "ACME_DEFAULTS_FILE";
pub const ENV_FEEDBACK_LOG: &str = "ACME_FEEDBACK_LOG";
pub const ENV_OUTPUT_FORMAT: &str = "ACME_OUTPUT_FORMAT";
pub const ENV_NON_INTERACTIVE: &str = "NON_INTERACTIVE";

/// How the wizard prints its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Scrum report wrapped in banners, followed by workflow status.
    #[default]
    Scrum,
    /// Scrum report without banners, followed by workflow status.
    Plain,
    /// Single JSON object with the report and status lists.
    Json,
}

impl OutputFormat {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "scrum" => Ok(Self::Scrum),
            "plain" => Ok(Self::Plain),
            "json" => Ok(Self::Json),
            other => Err(anyhow!(
                "unknown output format '{other}' (expected scrum, plain or json)"
            )),
        }
    }
}

/// Wizard configuration (TOML).
///
/// Missing fields default to the values the wizard has always used.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WizardConfig {
    /// Answers persisted between runs (JSON object).
    pub defaults_file: PathBuf,

    /// Append-only log of submitted feedback (JSON lines).
    pub feedback_log: PathBuf,

    /// Output format used when `--format` is not given.
    pub format: OutputFormat,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            defaults_file: PathBuf::from("customer_defaults.json"),
            feedback_log: PathBuf::from("feedback_events.jsonl"),
            format: OutputFormat::Scrum,
        }
    }
}

impl WizardConfig {
    pub fn validate(&self) -> Result<()> {
        if self.defaults_file.as_os_str().is_empty() {
            return Err(anyhow!("defaults_file must be a non-empty path"));
        }
        if self.feedback_log.as_os_str().is_empty() {
            return Err(anyhow!("feedback_log must be a non-empty path"));
        }
        Ok(())
    }

    /// Overlay environment variables read through `lookup`.
    ///
    /// Empty variables are ignored.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(path) = read(ENV_DEFAULTS_FILE) {
            self.defaults_file = PathBuf::from(path);
        }
        if let Some(path) = read(ENV_FEEDBACK_LOG) {
            self.feedback_log = PathBuf::from(path);
        }
        if let Some(raw) = read(ENV_OUTPUT_FORMAT) {
            self.format =
                OutputFormat::parse(&raw).with_context(|| format!("read {ENV_OUTPUT_FORMAT}"))?;
        }
        self.validate()?;
        Ok(self)
    }
}

/// True when `NON_INTERACTIVE=1` is set.
pub fn non_interactive_from_env<F>(lookup: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup(ENV_NON_INTERACTIVE).is_some_and(|value| value.trim() == "1")
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `WizardConfig::default()`.
pub fn load_config(path: &Path) -> Result<WizardConfig> {
    if !path.exists() {
        let cfg = WizardConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: WizardConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &WizardConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    super::write_atomic(path, &buf)
}
