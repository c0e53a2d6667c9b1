//! Customer feedback intake wizard.
//!
//! Collects contact details and an issue report, logs the feedback event, and
//! prints a scrum-style report with the 8D remediation status.

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use eightd::core::registry::StepRegistry;
use eightd::exit_codes;
use eightd::io::config::{
    CONFIG_FILE, OutputFormat, WizardConfig, load_config, non_interactive_from_env,
};
use eightd::io::init::{InitOptions, init_workspace};
use eightd::io::prompt::{Aborted, Prompter};
use eightd::logging;
use eightd::report::{render_outcome, status_text};
use eightd::session::{
    SessionOptions, run_session, run_unattended, status_from_answers, validate_answers,
};

#[derive(Parser)]
#[command(
    name = "eightd",
    version,
    about = "Customer feedback intake wizard with 8D remediation status"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Use stored answers without prompting.
    #[arg(long, global = true)]
    use_defaults: bool,

    /// Never prompt; also enabled by NON_INTERACTIVE=1 or a non-terminal stdin.
    #[arg(long, global = true)]
    non_interactive: bool,

    /// Output format (overrides config and ACME_OUTPUT_FORMAT).
    #[arg(long, value_enum, global = true)]
    format: Option<OutputFormat>,

    /// Answers file (overrides config and ACME_DEFAULTS_FILE).
    #[arg(long, global = true)]
    defaults_file: Option<PathBuf>,

    /// Config file.
    #[arg(long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// Create `eightd.toml` and an empty answers file.
    Init {
        /// Overwrite existing files.
        #[arg(short, long)]
        force: bool,
    },
    /// Print the workflow status of the stored answers.
    Status,
    /// Check config and answers file.
    Validate,
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn main() {
    logging::init();
    let cli = Cli::parse();
    let code = match run(&cli) {
        Ok(code) => code,
        Err(err) if err.downcast_ref::<Aborted>().is_some() => {
            eprintln!("\nAborted by user.");
            exit_codes::ABORTED
        }
        Err(err) => {
            eprintln!("{:#}", err);
            exit_codes::INVALID
        }
    };
    std::process::exit(code);
}

fn run(cli: &Cli) -> Result<i32> {
    match cli.command {
        Some(Command::Init { force }) => cmd_init(force),
        Some(Command::Status) => cmd_status(&resolve_config(cli)?),
        Some(Command::Validate) => cmd_validate(&resolve_config(cli)?),
        None => cmd_wizard(cli, &resolve_config(cli)?),
    }
}

/// Config file, then environment, then command-line flags.
fn resolve_config(cli: &Cli) -> Result<WizardConfig> {
    let mut cfg = load_config(&cli.config)?
        .with_env(env_var)
        .with_context(|| "apply environment overrides")?;
    if let Some(path) = &cli.defaults_file {
        cfg.defaults_file = path.clone();
    }
    if let Some(format) = cli.format {
        cfg.format = format;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn cmd_init(force: bool) -> Result<i32> {
    let paths = init_workspace(Path::new("."), &InitOptions { force })?;
    println!("wrote {}", paths.config_path.display());
    println!("wrote {}", paths.answers_path.display());
    Ok(exit_codes::OK)
}

fn cmd_wizard(cli: &Cli, cfg: &WizardConfig) -> Result<i32> {
    let interactive =
        !cli.non_interactive && !non_interactive_from_env(env_var) && io::stdin().is_terminal();
    let options = SessionOptions {
        defaults_file: cfg.defaults_file.clone(),
        feedback_log: cfg.feedback_log.clone(),
        use_defaults: cli.use_defaults,
    };

    let outcome = if interactive {
        let stdin = io::stdin();
        let mut prompter = Prompter::new(stdin.lock(), io::stdout());
        run_session(&options, &mut prompter)?
    } else {
        run_unattended(&options)?
    };

    print!(
        "{}",
        render_outcome(&outcome, cfg.format, &StepRegistry::standard())?
    );
    Ok(exit_codes::OK)
}

fn cmd_status(cfg: &WizardConfig) -> Result<i32> {
    let (snapshot, status) = status_from_answers(&cfg.defaults_file)?;
    match cfg.format {
        OutputFormat::Json => {
            let payload = serde_json::json!({ "report": snapshot, "status": status });
            println!("{}", serde_json::to_string(&payload).context("serialize status")?);
        }
        OutputFormat::Scrum | OutputFormat::Plain => {
            print!("{}", status_text(&status, &StepRegistry::standard()));
        }
    }
    if status.is_stalled() {
        return Ok(exit_codes::STALLED);
    }
    Ok(exit_codes::OK)
}

fn cmd_validate(cfg: &WizardConfig) -> Result<i32> {
    validate_answers(&cfg.defaults_file)?;
    println!("{} is valid", cfg.defaults_file.display());
    Ok(exit_codes::OK)
}
