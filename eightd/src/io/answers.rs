//! Answers persisted between wizard runs (`customer_defaults.json`).
//!
//! The file is a flat JSON object: contact details, the five issue fields, and
//! one entry per remediation step. Unknown keys are preserved on rewrite.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use jsonschema::validator_for;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as JsonValue};
use tracing::debug;

use crate::core::completion::ISSUE_STEP;
use crate::core::registry::StepRegistry;
use crate::core::snapshot::Snapshot;
use crate::core::value::Value;
use crate::intake::{CustomerContact, CustomerIssue, normalize_optional};

pub const ANSWERS_SCHEMA: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/schemas/answers.schema.json"
));

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Answers {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, alias = "phone", deserialize_with = "lenient_text")]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub feedback: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub what_happened: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub when_happened: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub where_happened: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub expecting_to_happen: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub resolution_request: Option<String>,
    /// Remediation step values and any other keys, kept verbatim.
    #[serde(flatten)]
    pub steps: Map<String, JsonValue>,
}

/// Accept strings, numbers and booleans as text; blank becomes `None`.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<JsonValue>::deserialize(deserializer)?;
    let text = match raw {
        None | Some(JsonValue::Null) => None,
        Some(JsonValue::String(text)) => Some(text),
        Some(JsonValue::Number(number)) => Some(number.to_string()),
        Some(JsonValue::Bool(flag)) => Some(flag.to_string()),
        Some(other) => {
            return Err(serde::de::Error::custom(format!(
                "expected text, found {other}"
            )));
        }
    };
    Ok(normalize_optional(text.as_deref()))
}

impl Answers {
    pub fn contact(&self) -> CustomerContact {
        CustomerContact {
            name: self.name.clone(),
            phone_number: self.phone_number.clone(),
            email: self.email.clone(),
        }
    }

    pub fn set_contact(&mut self, contact: &CustomerContact) {
        self.name = normalize_optional(contact.name.as_deref());
        self.phone_number = normalize_optional(contact.phone_number.as_deref());
        self.email = normalize_optional(contact.email.as_deref());
    }

    pub fn issue(&self) -> CustomerIssue {
        CustomerIssue {
            what_happened: self.what_happened.clone(),
            when_happened: self.when_happened.clone(),
            where_happened: self.where_happened.clone(),
            expecting_to_happen: self.expecting_to_happen.clone(),
            resolution_request: self.resolution_request.clone(),
        }
    }

    pub fn set_issue(&mut self, issue: &CustomerIssue) {
        self.what_happened = normalize_optional(issue.what_happened.as_deref());
        self.when_happened = normalize_optional(issue.when_happened.as_deref());
        self.where_happened = normalize_optional(issue.where_happened.as_deref());
        self.expecting_to_happen = normalize_optional(issue.expecting_to_happen.as_deref());
        self.resolution_request = normalize_optional(issue.resolution_request.as_deref());
    }

    /// Machine-readable report over every registry step.
    ///
    /// `issue` is taken from `issue` (which may differ from the stored issue
    /// fields when the customer declined to give feedback); other steps come
    /// from the stored step values, with blank text treated as null.
    pub fn snapshot(&self, registry: &StepRegistry, issue: &CustomerIssue) -> Snapshot {
        registry
            .order()
            .iter()
            .map(|step| {
                let value = if step == ISSUE_STEP {
                    issue.to_value()
                } else {
                    self.step_value(step)
                };
                (step.clone(), value)
            })
            .collect()
    }

    fn step_value(&self, step: &str) -> Value {
        match self.steps.get(step) {
            Some(JsonValue::String(text)) if text.trim().is_empty() => Value::Null,
            Some(raw) => Value::from(raw.clone()),
            None => Value::Null,
        }
    }
}

/// Load answers from disk.
///
/// If the file is missing, returns all-null answers.
pub fn load_answers(path: &Path) -> Result<Answers> {
    if !path.exists() {
        debug!(path = %path.display(), "answers file missing, using empty answers");
        return Ok(Answers::default());
    }
    let contents =
        fs::read_to_string(path).with_context(|| format!("read answers {}", path.display()))?;
    let answers: Answers = serde_json::from_str(&contents)
        .with_context(|| format!("parse answers {}", path.display()))?;
    debug!(path = %path.display(), steps = answers.steps.len(), "answers loaded");
    Ok(answers)
}

/// Load answers and check them against the embedded JSON Schema.
pub fn load_answers_validated(path: &Path) -> Result<Answers> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read answers {}", path.display()))?;
    let value: JsonValue = serde_json::from_str(&contents)
        .with_context(|| format!("parse answers {}", path.display()))?;
    validate_schema(&value).with_context(|| format!("validate {}", path.display()))?;
    serde_json::from_value(value).with_context(|| format!("deserialize answers {}", path.display()))
}

fn validate_schema(value: &JsonValue) -> Result<()> {
    let schema: JsonValue = serde_json::from_str(ANSWERS_SCHEMA).context("parse answers schema")?;
    let compiled = validator_for(&schema).map_err(|err| anyhow!("invalid schema: {}", err))?;
    if !compiled.is_valid(value) {
        let messages = compiled
            .iter_errors(value)
            .map(|err| err.to_string())
            .collect::<Vec<_>>();
        return Err(anyhow!(
            "answers schema validation failed: {}",
            messages.join("; ")
        ));
    }
    Ok(())
}

/// Atomically write answers to disk (temp file + rename).
pub fn write_answers(path: &Path, answers: &Answers) -> Result<()> {
    debug!(path = %path.display(), "writing answers");
    let mut buf = serde_json::to_string_pretty(answers).context("serialize answers")?;
    buf.push('\n');
    super::write_atomic(path, &buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{TestDir, answers_json_all_steps, answers_json_with_issue};
    use serde_json::json;

    #[test]
    fn missing_file_yields_empty_answers() {
        let dir = TestDir::new().expect("dir");
        let answers = load_answers(&dir.join("nope.json")).expect("load");
        assert_eq!(answers, Answers::default());
        assert_eq!(answers.issue(), CustomerIssue::default());
    }

    #[test]
    fn text_is_trimmed_and_blank_dropped() {
        let dir = TestDir::new().expect("dir");
        let path = dir
            .write_json(
                "answers.json",
                &json!({"name": "  Sam ", "email": "   ", "phone": 5551234}),
            )
            .expect("write");
        let answers = load_answers(&path).expect("load");
        assert_eq!(answers.name.as_deref(), Some("Sam"));
        assert_eq!(answers.email, None);
        assert_eq!(answers.phone_number.as_deref(), Some("5551234"));
    }

    #[test]
    fn rejects_structured_contact_field() {
        let dir = TestDir::new().expect("dir");
        let path = dir
            .write_json("answers.json", &json!({"name": {"first": "Sam"}}))
            .expect("write");
        assert!(load_answers(&path).is_err());
    }

    #[test]
    fn rewrite_preserves_steps_and_drops_legacy_phone() {
        let dir = TestDir::new().expect("dir");
        let path = dir
            .write_json(
                "answers.json",
                &json!({"phone": "555", "plan": "p", "team": ["Ann"], "custom": 1}),
            )
            .expect("write");
        let answers = load_answers(&path).expect("load");
        write_answers(&path, &answers).expect("write");

        let raw: JsonValue =
            serde_json::from_str(&fs::read_to_string(&path).expect("read")).expect("parse");
        assert_eq!(raw["phone_number"], json!("555"));
        assert!(raw.get("phone").is_none());
        assert_eq!(raw["plan"], json!("p"));
        assert_eq!(raw["team"], json!(["Ann"]));
        assert_eq!(raw["custom"], json!(1));
        assert_eq!(raw["what_happened"], JsonValue::Null);
    }

    #[test]
    fn snapshot_covers_registry_order() {
        let dir = TestDir::new().expect("dir");
        let path = dir
            .write_json("answers.json", &answers_json_all_steps())
            .expect("write");
        let answers = load_answers(&path).expect("load");
        let registry = StepRegistry::standard();
        let snapshot = answers.snapshot(&registry, &answers.issue());

        let keys: Vec<&str> = snapshot.keys().collect();
        let order: Vec<&str> = registry.order().iter().map(String::as_str).collect();
        assert_eq!(keys, order);
        assert!(snapshot.get("custom").is_none());
        assert_eq!(
            snapshot.get("team").map(ToString::to_string).as_deref(),
            Some("Support Agent, Warehouse Lead")
        );
        let issue = snapshot.get("issue").and_then(Value::as_record).expect("issue");
        assert_eq!(issue.get("where_happened").as_text(), Some("Front porch"));
    }

    #[test]
    fn snapshot_treats_blank_step_text_as_null() {
        let answers = Answers {
            steps: Map::from_iter([("plan".to_string(), json!("  "))]),
            ..Answers::default()
        };
        let snapshot = answers.snapshot(&StepRegistry::standard(), &CustomerIssue::default());
        assert_eq!(snapshot.get("plan"), Some(&Value::Null));
    }

    #[test]
    fn validated_load_accepts_fixture() {
        let dir = TestDir::new().expect("dir");
        let path = dir
            .write_json("answers.json", &answers_json_with_issue())
            .expect("write");
        let answers = load_answers_validated(&path).expect("valid");
        assert_eq!(answers.what_happened.as_deref(), Some("Package arrived damaged"));
    }

    #[test]
    fn validated_load_rejects_non_object() {
        let dir = TestDir::new().expect("dir");
        let path = dir.write_json("answers.json", &json!(["x"])).expect("write");
        let err = load_answers_validated(&path).expect_err("invalid");
        assert!(format!("{err:#}").contains("answers schema validation failed"));
    }
}
