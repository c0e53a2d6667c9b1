//! Text and JSON renderings of a wizard session.
//!
//! The scrum report and the congratulations email are minijinja templates;
//! the status listing is plain text built here.

pub mod phrases;

use anyhow::{Context, Result};
use minijinja::{Environment, context};
use serde::Serialize;

use crate::core::completion::ISSUE_STEP;
use crate::core::registry::StepRegistry;
use crate::core::snapshot::Snapshot;
use crate::core::status::unmet_prerequisites;
use crate::core::types::StatusReport;
use crate::core::value::{Record, Value};
use crate::io::config::OutputFormat;
use crate::session::SessionOutcome;
use phrases::phrases_for;

const SCRUM_TEMPLATE: &str = include_str!("templates/scrum.txt");
const CONGRATULATIONS_TEMPLATE: &str = include_str!("templates/congratulations.txt");

const UNKNOWN: &str = "Unknown";

pub const THANK_YOU: &str = "Thank you for choosing our services. We are committed to providing you with the best experience possible!";
pub const NOT_SUBMITTED: &str =
    "No complete issue submitted (requires what/when/where/expectation).";
pub const FEEDBACK_USED: &str = "Your feedback will be used to improve our services and ensure a better experience for all customers.";

#[derive(Debug, Clone, Serialize)]
struct IssueContext {
    what_happened: String,
    when_happened: String,
    where_happened: String,
    expecting_to_happen: String,
    resolution_request: String,
}

impl IssueContext {
    fn from_snapshot(snapshot: &Snapshot) -> Self {
        let empty = Record::new();
        let record = snapshot
            .get(ISSUE_STEP)
            .and_then(Value::as_record)
            .unwrap_or(&empty);
        Self {
            what_happened: or_unknown(record.get("what_happened")),
            when_happened: or_unknown(record.get("when_happened")),
            where_happened: or_unknown(record.get("where_happened")),
            expecting_to_happen: or_unknown(record.get("expecting_to_happen")),
            resolution_request: or_unknown(record.get("resolution_request")),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct DoneEntry {
    phrase: &'static str,
    details: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
struct MissingEntry {
    todo: &'static str,
    definition: &'static str,
    note: Option<&'static str>,
}

fn or_unknown(value: &Value) -> String {
    if value.is_null() {
        UNKNOWN.to_string()
    } else {
        value.to_string()
    }
}

fn snapshot_text(snapshot: &Snapshot, step: &str) -> String {
    snapshot.get(step).map_or_else(|| UNKNOWN.to_string(), or_unknown)
}

/// Join team member names: `A`, `A and B`, `A, B and C`.
///
/// Null, empty lists and blank text render as `Unknown`.
pub fn join_names(value: &Value) -> String {
    let names: Vec<String> = match value {
        Value::Null => Vec::new(),
        other => match other.as_list() {
            Some(items) => items
                .iter()
                .filter(|item| !item.is_null())
                .map(ToString::to_string)
                .collect(),
            None => vec![other.to_string()],
        },
    };
    let names: Vec<&str> = names
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .collect();
    match names.as_slice() {
        [] => UNKNOWN.to_string(),
        [only] => (*only).to_string(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

/// Template engine wrapper around minijinja.
pub struct ReportRenderer {
    env: Environment<'static>,
}

impl Default for ReportRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportRenderer {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.add_template("scrum", SCRUM_TEMPLATE)
            .expect("scrum template should be valid");
        env.add_template("congratulations", CONGRATULATIONS_TEMPLATE)
            .expect("congratulations template should be valid");
        Self { env }
    }

    /// Progress update: the customer issue, what is done, and what is left.
    ///
    /// Only steps with known phrases are listed, in the order of `status`.
    pub fn scrum_report(&self, snapshot: &Snapshot, status: &StatusReport) -> Result<String> {
        let issue = IssueContext::from_snapshot(snapshot);
        let done: Vec<DoneEntry> = status
            .done
            .iter()
            .filter_map(|step| {
                let phrases = phrases_for(step)?;
                Some(DoneEntry {
                    phrase: phrases.done,
                    details: done_details(snapshot, step, &issue),
                })
            })
            .collect();
        let missing: Vec<MissingEntry> = status
            .missing
            .iter()
            .filter_map(|step| {
                let phrases = phrases_for(step)?;
                Some(MissingEntry {
                    todo: phrases.todo,
                    definition: phrases.definition_complete,
                    note: (step == ISSUE_STEP).then_some("Find out why the issue is missing"),
                })
            })
            .collect();

        let template = self.env.get_template("scrum")?;
        template
            .render(context! { issue => issue, done => done, missing => missing })
            .context("render scrum report")
    }

    /// Congratulations email for the team once every step is done.
    pub fn congratulations(&self, snapshot: &Snapshot) -> Result<String> {
        let issue = IssueContext::from_snapshot(snapshot);
        let team = snapshot.get("team").map_or_else(|| UNKNOWN.to_string(), join_names);
        let template = self.env.get_template("congratulations")?;
        template
            .render(context! {
                team => team,
                what_happened => issue.what_happened,
                where_happened => issue.where_happened,
                plan => snapshot_text(snapshot, "plan"),
                prerequisites => snapshot_text(snapshot, "prerequisites"),
                problem_description => snapshot_text(snapshot, "problem_description"),
                interim_containment_plan => snapshot_text(snapshot, "interim_containment_plan"),
                root_causes => snapshot_text(snapshot, "root_causes"),
                permanent_corrections => snapshot_text(snapshot, "permanent_corrections"),
                corrective_actions => snapshot_text(snapshot, "corrective_actions"),
                preventive_measures => snapshot_text(snapshot, "preventive_measures"),
            })
            .context("render congratulations")
    }
}

fn done_details(snapshot: &Snapshot, step: &str, issue: &IssueContext) -> Vec<String> {
    match step {
        ISSUE_STEP => vec![
            format!("Expectation: {}", issue.expecting_to_happen),
            format!("Reality: {}", issue.what_happened),
            format!("When: {}", issue.when_happened),
            format!("Where: {}", issue.where_happened),
            format!("Request: {}", issue.resolution_request),
        ],
        "team" => vec![snapshot.get(step).map_or_else(|| UNKNOWN.to_string(), join_names)],
        _ => vec![snapshot_text(snapshot, step)],
    }
}

/// Wrap a scrum report in start/end banners.
pub fn inform_scrum(report: &str) -> String {
    format!(
        "----------- SCRUM REPORT -------------\n{}\n------- END OF SCRUM REPORT-----------\n",
        report.trim_end()
    )
}

/// Done / Doing / Todo / Blocked listing.
pub fn status_text(status: &StatusReport, registry: &StepRegistry) -> String {
    let mut lines = Vec::new();
    if !status.done.is_empty() {
        lines.push("Done:".to_string());
        lines.extend(status.done.iter().map(|step| format!("- {step}")));
    }

    if !status.missing.is_empty() {
        lines.push(String::new());
        match &status.doing {
            Some(step) => lines.push(format!("Doing: {step}")),
            None => lines.push("Doing: (none available - prerequisites missing)".to_string()),
        }

        lines.push(String::new());
        lines.push("Todo (available next):".to_string());
        lines.extend(status.available.iter().map(|step| format!("- {step}")));

        if !status.blocked.is_empty() {
            lines.push(String::new());
            lines.push("Blocked (missing prerequisites):".to_string());
            for step in &status.blocked {
                let needs = unmet_prerequisites(status, registry, step);
                lines.push(format!("- {step} (needs: {})", needs.join(", ")));
            }
        }
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Machine-readable session result.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary<'a> {
    pub feedback_submitted: bool,
    pub report: &'a Snapshot,
    pub done_steps: &'a [String],
    pub missing_steps: &'a [String],
    pub available_steps: &'a [String],
    pub blocked_steps: &'a [String],
    pub doing_step: Option<&'a str>,
}

impl<'a> JsonSummary<'a> {
    pub fn new(outcome: &'a SessionOutcome) -> Self {
        Self {
            feedback_submitted: outcome.feedback_submitted,
            report: &outcome.snapshot,
            done_steps: &outcome.status.done,
            missing_steps: &outcome.status.missing,
            available_steps: &outcome.status.available,
            blocked_steps: &outcome.status.blocked,
            doing_step: outcome.status.doing.as_deref(),
        }
    }
}

/// Render a finished session in the requested format.
pub fn render_outcome(
    outcome: &SessionOutcome,
    format: OutputFormat,
    registry: &StepRegistry,
) -> Result<String> {
    if format == OutputFormat::Json {
        let mut json =
            serde_json::to_string(&JsonSummary::new(outcome)).context("serialize summary")?;
        json.push('\n');
        return Ok(json);
    }

    let mut out = format!("{THANK_YOU}\n");
    if !outcome.feedback_submitted {
        out.push_str(NOT_SUBMITTED);
        out.push('\n');
        return Ok(out);
    }
    out.push_str(FEEDBACK_USED);
    out.push('\n');

    let renderer = ReportRenderer::new();
    let scrum = renderer.scrum_report(&outcome.snapshot, &outcome.status)?;
    match format {
        OutputFormat::Scrum => out.push_str(&inform_scrum(&scrum)),
        _ => {
            out.push_str(scrum.trim_end());
            out.push('\n');
        }
    }
    out.push('\n');
    out.push_str(&status_text(&outcome.status, registry));

    if outcome.status.is_complete() {
        out.push('\n');
        out.push_str(renderer.congratulations(&outcome.snapshot)?.trim_end());
        out.push('\n');
    }
    Ok(out)
}
