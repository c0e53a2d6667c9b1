//! Wizard session orchestration for the default command and `eightd status`.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use crate::core::completion::{CompletionOracle, ISSUE_STEP};
use crate::core::registry::{StepRegistry, validate_registry};
use crate::core::snapshot::Snapshot;
use crate::core::status::compute_status;
use crate::core::types::StatusReport;
use crate::intake::{CustomerFeedback, CustomerIssue};
use crate::io::answers::{Answers, load_answers, load_answers_validated, write_answers};
use crate::io::feedback_log::log_feedback;
use crate::io::prompt::Prompter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Answers persisted between runs.
    pub defaults_file: PathBuf,
    /// Feedback event log (JSON lines).
    pub feedback_log: PathBuf,
    /// Take contact and issue from `defaults_file` without asking.
    pub use_defaults: bool,
}

/// Result of one wizard run.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOutcome {
    /// True when the issue was complete and a feedback event was logged.
    pub feedback_submitted: bool,
    pub snapshot: Snapshot,
    pub status: StatusReport,
}

/// Run the wizard against a prompter.
///
/// Asks for contact details and the issue unless `use_defaults` is set, then
/// asks for a rating once a complete issue is on hand. Declining to leave
/// feedback reports an empty issue. Answers are saved before the report is
/// built.
pub fn run_session<R: BufRead, W: Write>(
    options: &SessionOptions,
    prompter: &mut Prompter<R, W>,
) -> Result<SessionOutcome> {
    let mut answers = load_answers(&options.defaults_file)?;
    if options.use_defaults {
        debug!("using stored answers without prompting");
        let issue = answers.issue();
        return finish(options, &answers, &issue, None);
    }

    prompter.collect_contact(&mut answers)?;
    prompter.say("How can we help you today?")?;
    let issue = prompter.collect_issue(&mut answers)?.unwrap_or_default();

    let oracle = CompletionOracle::standard();
    let rating = if oracle.is_complete(ISSUE_STEP, &issue.to_value()) {
        prompter.rating()?
    } else {
        None
    };

    write_answers(&options.defaults_file, &answers)
        .with_context(|| "save answers for the next run")?;
    finish(options, &answers, &issue, rating)
}

/// Run the wizard without any prompts, from stored answers only.
pub fn run_unattended(options: &SessionOptions) -> Result<SessionOutcome> {
    let answers = load_answers(&options.defaults_file)?;
    let issue = answers.issue();
    finish(options, &answers, &issue, None)
}

fn finish(
    options: &SessionOptions,
    answers: &Answers,
    issue: &CustomerIssue,
    rating: Option<u8>,
) -> Result<SessionOutcome> {
    let registry = StepRegistry::standard();
    let oracle = CompletionOracle::standard();

    let feedback_submitted = oracle.is_complete(ISSUE_STEP, &issue.to_value());
    if feedback_submitted {
        let feedback = CustomerFeedback::from_issue(issue, rating)?;
        log_feedback(&options.feedback_log, &feedback)?;
    } else {
        debug!("issue incomplete, no feedback event logged");
    }

    let snapshot = answers.snapshot(&registry, issue);
    let status = compute_status(&snapshot, &registry, &oracle);
    info!(
        feedback_submitted,
        done = status.done.len(),
        missing = status.missing.len(),
        doing = ?status.doing,
        "session finished"
    );
    Ok(SessionOutcome {
        feedback_submitted,
        snapshot,
        status,
    })
}

/// Workflow status of the answers stored at `path`.
pub fn status_from_answers(path: &Path) -> Result<(Snapshot, StatusReport)> {
    let answers = load_answers(path)?;
    let registry = StepRegistry::standard();
    let snapshot = answers.snapshot(&registry, &answers.issue());
    let status = compute_status(&snapshot, &registry, &CompletionOracle::standard());
    Ok((snapshot, status))
}

/// Check the answers file against its schema and the standard registry.
pub fn validate_answers(path: &Path) -> Result<Answers> {
    let registry = StepRegistry::standard();
    let errors = validate_registry(registry.order(), registry.prereqs());
    if !errors.is_empty() {
        bail!("step registry invariants failed:\n- {}", errors.join("\n- "));
    }
    load_answers_validated(path)
}
