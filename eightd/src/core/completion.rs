//! Per-step completeness rules.
//!
//! Completeness is never stored: it is derived from the recorded value every
//! time it is needed. Every step uses the generic [`is_present`] rule unless a
//! dedicated [`CompletenessRule`] is registered for it in the
//! [`CompletionOracle`].

use std::collections::BTreeMap;
use std::fmt;

use crate::core::value::{Scalar, Value};

/// Step id of the customer issue intake step.
pub const ISSUE_STEP: &str = "issue";

/// Issue sub-fields that must all be filled before the issue counts as done.
///
/// `resolution_request` is deliberately optional.
pub const ISSUE_REQUIRED_FIELDS: [&str; 4] = [
    "what_happened",
    "when_happened",
    "where_happened",
    "expecting_to_happen",
];

/// Decides whether a recorded value counts as complete for one step.
pub trait CompletenessRule: Send + Sync {
    fn is_complete(&self, value: &Value) -> bool;
}

impl<F> CompletenessRule for F
where
    F: Fn(&Value) -> bool + Send + Sync,
{
    fn is_complete(&self, value: &Value) -> bool {
        self(value)
    }
}

/// Generic rule: `null` is missing, any scalar is present, and a record is
/// missing only when every one of its sub-fields is missing.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Scalar(_) => true,
        Value::Record(record) => record.fields().any(|(_, field)| is_present(field)),
    }
}

/// [`is_present`] as a rule value.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyPresent;

impl CompletenessRule for AnyPresent {
    fn is_complete(&self, value: &Value) -> bool {
        is_present(value)
    }
}

/// Record rule: every listed sub-field must hold content.
///
/// Blank text does not count as content. A value that is not a record never
/// satisfies the rule.
#[derive(Debug, Clone)]
pub struct RequiredFields {
    fields: Vec<String>,
}

impl RequiredFields {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

impl CompletenessRule for RequiredFields {
    fn is_complete(&self, value: &Value) -> bool {
        let Some(record) = value.as_record() else {
            return false;
        };
        self.fields
            .iter()
            .all(|field| has_content(record.get(field)))
    }
}

fn has_content(value: &Value) -> bool {
    match value {
        Value::Scalar(Scalar::Text(text)) => !text.trim().is_empty(),
        other => is_present(other),
    }
}

/// Registry of per-step completeness overrides.
#[derive(Default)]
pub struct CompletionOracle {
    rules: BTreeMap<String, Box<dyn CompletenessRule>>,
}

impl CompletionOracle {
    /// Oracle with no overrides: every step uses [`is_present`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Oracle for the remediation workflow: the issue step requires
    /// [`ISSUE_REQUIRED_FIELDS`].
    pub fn standard() -> Self {
        Self::new().with_rule(ISSUE_STEP, RequiredFields::new(ISSUE_REQUIRED_FIELDS))
    }

    /// Register (or replace) the rule used for `step`.
    pub fn with_rule(
        mut self,
        step: impl Into<String>,
        rule: impl CompletenessRule + 'static,
    ) -> Self {
        self.rules.insert(step.into(), Box::new(rule));
        self
    }

    pub fn has_override(&self, step: &str) -> bool {
        self.rules.contains_key(step)
    }

    pub fn is_complete(&self, step: &str, value: &Value) -> bool {
        match self.rules.get(step) {
            Some(rule) => rule.is_complete(value),
            None => is_present(value),
        }
    }
}

impl fmt::Debug for CompletionOracle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionOracle")
            .field("overrides", &self.rules.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::Record;
    use crate::test_support::{complete_issue, issue_with};

    #[test]
    fn null_is_missing_and_scalars_are_present() {
        assert!(!is_present(&Value::Null));
        assert!(is_present(&Value::text("")));
        assert!(is_present(&Value::from(Vec::<Value>::new())));
    }

    #[test]
    fn record_is_missing_only_when_all_fields_missing() {
        let empty = Value::from(Record::new());
        let all_null = Value::from(Record::new().with_field("a", Value::Null));
        let one_set = Value::from(
            Record::new()
                .with_field("a", Value::Null)
                .with_field("b", "x"),
        );
        let nested_null = Value::from(
            Record::new().with_field("inner", Record::new().with_field("c", Value::Null)),
        );
        assert!(!is_present(&empty));
        assert!(!is_present(&all_null));
        assert!(is_present(&one_set));
        assert!(!is_present(&nested_null));
    }

    #[test]
    fn issue_requires_all_four_fields() {
        let oracle = CompletionOracle::standard();
        assert!(oracle.is_complete(ISSUE_STEP, &complete_issue()));
        for field in ISSUE_REQUIRED_FIELDS {
            let partial = issue_with(&[(field, None)]);
            assert!(
                !oracle.is_complete(ISSUE_STEP, &partial),
                "issue without {field} must be missing"
            );
        }
    }

    #[test]
    fn issue_ignores_resolution_request() {
        let oracle = CompletionOracle::standard();
        let issue = issue_with(&[("resolution_request", None)]);
        assert!(oracle.is_complete(ISSUE_STEP, &issue));
    }

    #[test]
    fn issue_blank_text_is_missing() {
        let oracle = CompletionOracle::standard();
        let issue = issue_with(&[("where_happened", Some("   "))]);
        assert!(!oracle.is_complete(ISSUE_STEP, &issue));
    }

    #[test]
    fn issue_override_beats_generic_rule() {
        let issue = issue_with(&[("when_happened", None)]);
        assert!(is_present(&issue));
        assert!(!CompletionOracle::standard().is_complete(ISSUE_STEP, &issue));
        assert!(CompletionOracle::new().is_complete(ISSUE_STEP, &issue));
    }

    #[test]
    fn issue_scalar_never_satisfies_required_fields() {
        let oracle = CompletionOracle::standard();
        assert!(!oracle.is_complete(ISSUE_STEP, &Value::text("something broke")));
    }

    #[test]
    fn closures_can_be_registered_as_rules() {
        let oracle = CompletionOracle::new().with_rule("team", |value: &Value| {
            value.as_list().is_some_and(|members| members.len() >= 2)
        });
        assert!(oracle.has_override("team"));
        assert!(!oracle.is_complete("team", &Value::from(vec!["Ann"])));
        assert!(oracle.is_complete("team", &Value::from(vec!["Ann", "Bo"])));
        assert!(oracle.is_complete("plan", &Value::text("p")));
    }

    #[test]
    fn any_present_restores_generic_rule_for_issue() {
        let oracle = CompletionOracle::standard().with_rule(ISSUE_STEP, AnyPresent);
        let partial = issue_with(&[("when_happened", None), ("where_happened", None)]);
        assert!(oracle.is_complete(ISSUE_STEP, &partial));
        assert!(!oracle.is_complete(ISSUE_STEP, &Value::from(Record::new())));
        assert!(!oracle.is_complete(ISSUE_STEP, &Value::Null));
    }

    #[test]
    fn later_rule_replaces_earlier_one() {
        let oracle = CompletionOracle::standard()
            .with_rule(ISSUE_STEP, RequiredFields::new(["what_happened"]));
        let partial = issue_with(&[("when_happened", None), ("expecting_to_happen", None)]);
        assert!(oracle.is_complete(ISSUE_STEP, &partial));
        assert!(!oracle.is_complete(ISSUE_STEP, &issue_with(&[("what_happened", None)])));

        let strict = CompletionOracle::new()
            .with_rule("plan", |_: &Value| false)
            .with_rule("plan", AnyPresent);
        assert!(strict.is_complete("plan", &Value::text("p")));
    }
}
