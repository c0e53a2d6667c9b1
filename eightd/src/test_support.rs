//! Test-only helpers for building snapshots and answers files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

use crate::core::registry::STANDARD_ORDER;
use crate::core::snapshot::Snapshot;
use crate::core::value::{Record, Value};

/// Issue record with every sub-field filled in.
pub fn complete_issue() -> Value {
    Value::from(
        Record::new()
            .with_field("what_happened", "Package arrived damaged")
            .with_field("when_happened", "2025-01-10")
            .with_field("where_happened", "Front porch")
            .with_field("expecting_to_happen", "Package should be intact")
            .with_field("resolution_request", "Replacement item"),
    )
}

/// [`complete_issue`] with selected sub-fields replaced (`None` = null).
pub fn issue_with(overrides: &[(&str, Option<&str>)]) -> Value {
    let mut record = complete_issue()
        .as_record()
        .cloned()
        .unwrap_or_default();
    for (field, value) in overrides {
        record.insert(*field, value.map(Value::text));
    }
    Value::from(record)
}

/// Snapshot over the standard order: `issue` plus every remediation step,
/// null unless listed in `steps`.
pub fn standard_snapshot(issue: Value, steps: &[(&str, &str)]) -> Snapshot {
    let mut snapshot = Snapshot::new().with(STANDARD_ORDER[0], issue);
    for step in &STANDARD_ORDER[1..] {
        let value = steps
            .iter()
            .find(|(name, _)| name == step)
            .map(|(_, value)| Value::text(*value));
        snapshot.insert(*step, value);
    }
    snapshot
}

/// Temporary working directory with helpers for answers files.
pub struct TestDir {
    dir: TempDir,
}

impl TestDir {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir().context("create temp dir")?,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write `value` as JSON to `name` inside the directory.
    pub fn write_json(&self, name: &str, value: &serde_json::Value) -> Result<PathBuf> {
        let path = self.join(name);
        let mut buf = serde_json::to_string_pretty(value)?;
        buf.push('\n');
        std::fs::write(&path, buf).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }
}

/// Answers fixture with contact details and a complete issue.
pub fn answers_json_with_issue() -> serde_json::Value {
    serde_json::json!({
        "name": "Sam",
        "phone_number": "555-5555",
        "email": "sam@example.com",
        "feedback": null,
        "what_happened": "Package arrived damaged",
        "when_happened": "2025-01-10",
        "where_happened": "Front porch",
        "expecting_to_happen": "Package should be intact",
        "resolution_request": "Replacement item"
    })
}

/// [`answers_json_with_issue`] plus values for all remediation steps.
pub fn answers_json_all_steps() -> serde_json::Value {
    let mut answers = answers_json_with_issue();
    let steps = serde_json::json!({
        "plan": "Plan and execute replacement workflow",
        "prerequisites": "Confirm stock and shipping address",
        "team": ["Support Agent", "Warehouse Lead"],
        "problem_description": "Damaged shipment reported by customer",
        "interim_containment_plan": "Offer immediate refund option",
        "root_causes": "Insufficient packaging for fragile item",
        "permanent_corrections": "Use reinforced packaging standard",
        "corrective_actions": "Update packaging SOP and train staff",
        "preventive_measures": "Quarterly packaging quality audits"
    });
    if let (Some(target), Some(extra)) = (answers.as_object_mut(), steps.as_object()) {
        for (key, value) in extra {
            target.insert(key.clone(), value.clone());
        }
    }
    answers
}
