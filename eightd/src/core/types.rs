//! Shared deterministic types for workflow status.
//!
//! These types define stable contracts between the status computation and the
//! renderers. They do not depend on external state or I/O.

use serde::{Deserialize, Serialize};

/// Classification of every step in a snapshot.
///
/// All lists are in canonical order; steps the registry does not rank come
/// last, in snapshot order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    /// Steps whose recorded value is complete.
    pub done: Vec<String>,
    /// Steps whose recorded value is not complete.
    pub missing: Vec<String>,
    /// Missing steps whose prerequisites are all done.
    pub available: Vec<String>,
    /// Missing steps with at least one prerequisite not done.
    pub blocked: Vec<String>,
    /// First available step, if any.
    pub doing: Option<String>,
}

impl StatusReport {
    /// True when nothing is missing.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// True when steps are missing but none can be started.
    pub fn is_stalled(&self) -> bool {
        !self.missing.is_empty() && self.available.is_empty()
    }

    pub fn is_done(&self, step: &str) -> bool {
        self.done.iter().any(|done| done == step)
    }
}
