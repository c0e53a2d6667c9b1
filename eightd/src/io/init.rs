//! Scaffolding for a fresh wizard working directory.

use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use tracing::debug;

use super::answers::{Answers, write_answers};
use super::config::{CONFIG_FILE, WizardConfig, write_config};

/// Options for `init_workspace`.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// If true, overwrite existing wizard-owned files.
    pub force: bool,
}

/// Files created by `init_workspace`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitPaths {
    pub config_path: PathBuf,
    pub answers_path: PathBuf,
}

/// Write `eightd.toml` and an all-null answers file in `root`.
///
/// Fails if either file already exists unless `options.force` is set.
pub fn init_workspace(root: &Path, options: &InitOptions) -> Result<InitPaths> {
    let config_path = root.join(CONFIG_FILE);
    let config = WizardConfig::default();
    let answers_path = root.join(&config.defaults_file);

    for path in [&config_path, &answers_path] {
        if path.exists() && !options.force {
            return Err(anyhow!(
                "init: {} already exists (use --force to overwrite)",
                path.display()
            ));
        }
    }

    debug!(root = %root.display(), force = options.force, "initializing workspace");
    write_config(&config_path, &config)?;
    write_answers(&answers_path, &Answers::default())?;

    Ok(InitPaths {
        config_path,
        answers_path,
    })
}
