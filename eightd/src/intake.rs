//! Customer intake models: contact details, the reported issue, and feedback
//! events.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::value::{Record, Value};

/// Trim `raw`; blank input becomes `None`.
pub fn normalize_optional(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToString::to_string)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerContact {
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

/// What the customer reported.
///
/// The first four fields are required for the issue to count as complete;
/// `resolution_request` is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerIssue {
    pub what_happened: Option<String>,
    pub when_happened: Option<String>,
    pub where_happened: Option<String>,
    pub expecting_to_happen: Option<String>,
    pub resolution_request: Option<String>,
}

impl CustomerIssue {
    /// Record form used as the `issue` entry of a snapshot.
    pub fn to_value(&self) -> Value {
        Value::from(
            Record::new()
                .with_field("what_happened", self.what_happened.clone())
                .with_field("when_happened", self.when_happened.clone())
                .with_field("where_happened", self.where_happened.clone())
                .with_field("expecting_to_happen", self.expecting_to_happen.clone())
                .with_field("resolution_request", self.resolution_request.clone()),
        )
    }

    /// Compact JSON with sorted keys, as stored in feedback events.
    pub fn to_sorted_json(&self) -> Result<String> {
        let fields: BTreeMap<&str, Option<&str>> = BTreeMap::from([
            ("expecting_to_happen", self.expecting_to_happen.as_deref()),
            ("resolution_request", self.resolution_request.as_deref()),
            ("what_happened", self.what_happened.as_deref()),
            ("when_happened", self.when_happened.as_deref()),
            ("where_happened", self.where_happened.as_deref()),
        ]);
        serde_json::to_string(&fields).context("serialize issue")
    }
}

/// Free-text feedback with an optional 1-10 rating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerFeedback {
    pub feedback: String,
    pub rating: Option<u8>,
}

impl CustomerFeedback {
    /// Feedback event payload for a submitted issue.
    pub fn from_issue(issue: &CustomerIssue, rating: Option<u8>) -> Result<Self> {
        Ok(Self {
            feedback: issue.to_sorted_json()?,
            rating,
        })
    }
}
