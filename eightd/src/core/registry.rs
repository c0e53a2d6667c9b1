//! Static declaration of workflow steps and their prerequisites.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use anyhow::{Result, anyhow};

use crate::core::completion::ISSUE_STEP;

/// Prerequisite declarations: step id to the steps that must be done first.
pub type PrereqMap = BTreeMap<String, BTreeSet<String>>;

/// Canonical order of the remediation workflow, led by the issue intake step.
pub const STANDARD_ORDER: [&str; 10] = [
    ISSUE_STEP,
    "plan",
    "prerequisites",
    "team",
    "problem_description",
    "interim_containment_plan",
    "root_causes",
    "permanent_corrections",
    "corrective_actions",
    "preventive_measures",
];

/// Prerequisites of the remediation workflow.
///
/// `issue` gates itself: it can only be supplied by the customer intake, never
/// picked up as workflow work.
pub const STANDARD_PREREQS: [(&str, &[&str]); 10] = [
    (ISSUE_STEP, &[ISSUE_STEP]),
    ("plan", &[ISSUE_STEP]),
    ("prerequisites", &["plan"]),
    ("team", &[ISSUE_STEP]),
    ("problem_description", &[ISSUE_STEP, "team"]),
    ("interim_containment_plan", &["problem_description"]),
    (
        "root_causes",
        &["problem_description", "interim_containment_plan"],
    ),
    ("permanent_corrections", &["root_causes"]),
    ("corrective_actions", &["permanent_corrections"]),
    ("preventive_measures", &["corrective_actions"]),
];

/// Validated, immutable step configuration.
///
/// Invariants (checked by [`StepRegistry::new`]):
/// - step ids are non-blank
/// - `order` has no duplicates
/// - prerequisites contain no cycle spanning two or more steps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRegistry {
    order: Vec<String>,
    prereqs: PrereqMap,
    ranks: HashMap<String, usize>,
}

impl StepRegistry {
    /// Build a registry, rejecting malformed configuration.
    pub fn new<I, S>(order: I, prereqs: PrereqMap) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let order: Vec<String> = order.into_iter().map(Into::into).collect();
        let errors = validate_registry(&order, &prereqs);
        if !errors.is_empty() {
            return Err(anyhow!(
                "step registry invariants failed:\n- {}",
                errors.join("\n- ")
            ));
        }
        Ok(Self::build(order, prereqs))
    }

    /// Build a registry from borrowed literals.
    pub fn from_lists(order: &[&str], prereqs: &[(&str, &[&str])]) -> Result<Self> {
        Self::new(order.iter().copied(), prereq_map(prereqs))
    }

    /// The issue intake step followed by the eight remediation disciplines.
    pub fn standard() -> Self {
        Self::build(
            STANDARD_ORDER.iter().map(ToString::to_string).collect(),
            prereq_map(&STANDARD_PREREQS),
        )
    }

    fn build(order: Vec<String>, prereqs: PrereqMap) -> Self {
        let mut ranks = HashMap::with_capacity(order.len());
        for (index, step) in order.iter().enumerate() {
            ranks.entry(step.clone()).or_insert(index);
        }
        Self {
            order,
            prereqs,
            ranks,
        }
    }

    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn prereqs(&self) -> &PrereqMap {
        &self.prereqs
    }

    /// Position of `step` in the canonical order.
    pub fn rank(&self, step: &str) -> Option<usize> {
        self.ranks.get(step).copied()
    }

    pub fn contains(&self, step: &str) -> bool {
        self.ranks.contains_key(step)
    }

    /// Declared prerequisites of `step`; empty when none are declared.
    pub fn prerequisites(&self, step: &str) -> &BTreeSet<String> {
        static EMPTY: BTreeSet<String> = BTreeSet::new();
        self.prereqs.get(step).unwrap_or(&EMPTY)
    }

    /// True if `step` lists itself as a prerequisite.
    pub fn is_intake_gated(&self, step: &str) -> bool {
        self.prerequisites(step).contains(step)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Default for StepRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Convert borrowed `(step, prerequisites)` pairs into a [`PrereqMap`].
pub fn prereq_map(pairs: &[(&str, &[&str])]) -> PrereqMap {
    let mut map = PrereqMap::new();
    for (step, reqs) in pairs {
        map.entry((*step).to_string())
            .or_default()
            .extend(reqs.iter().map(ToString::to_string));
    }
    map
}

/// Check registry invariants.
///
/// Returns a list of stable error messages (empty on success). Prerequisites
/// naming unknown steps are allowed: the dependent step simply never becomes
/// available.
pub fn validate_registry(order: &[String], prereqs: &PrereqMap) -> Vec<String> {
    let mut errors = Vec::new();

    let mut seen = HashSet::new();
    for (index, step) in order.iter().enumerate() {
        if step.trim().is_empty() {
            errors.push(format!("order[{index}]: step id must not be blank"));
            continue;
        }
        if !seen.insert(step.as_str()) {
            errors.push(format!("duplicate step id '{step}' in order at {index}"));
        }
    }

    for (step, reqs) in prereqs {
        if step.trim().is_empty() {
            errors.push("prerequisites declared for a blank step id".to_string());
        }
        if reqs.iter().any(|req| req.trim().is_empty()) {
            errors.push(format!("{step}: prerequisite ids must not be blank"));
        }
    }

    for cycle in find_cycles(prereqs) {
        errors.push(format!("prerequisite cycle: {}", cycle.join(" -> ")));
    }

    errors
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Visited,
}

/// Depth-first search for cycles of length >= 2. Self-references are skipped.
fn find_cycles(prereqs: &PrereqMap) -> Vec<Vec<String>> {
    let mut marks = HashMap::new();
    let mut cycles = Vec::new();
    for step in prereqs.keys() {
        let mut path = Vec::new();
        visit(step, prereqs, &mut marks, &mut path, &mut cycles);
    }
    cycles
}

fn visit<'a>(
    step: &'a str,
    prereqs: &'a PrereqMap,
    marks: &mut HashMap<&'a str, Mark>,
    path: &mut Vec<&'a str>,
    cycles: &mut Vec<Vec<String>>,
) {
    match marks.get(step) {
        Some(Mark::Visited) => return,
        Some(Mark::Visiting) => {
            let start = path.iter().position(|seen| *seen == step).unwrap_or(0);
            let mut cycle: Vec<String> = path[start..].iter().map(ToString::to_string).collect();
            cycle.push(step.to_string());
            cycles.push(cycle);
            return;
        }
        None => {}
    }

    marks.insert(step, Mark::Visiting);
    path.push(step);
    if let Some(reqs) = prereqs.get(step) {
        for req in reqs.iter().filter(|req| req.as_str() != step) {
            visit(req, prereqs, marks, path, cycles);
        }
    }
    path.pop();
    marks.insert(step, Mark::Visited);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(order: &[&str]) -> Vec<String> {
        order.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn standard_registry_is_valid() {
        let registry = StepRegistry::standard();
        assert!(validate_registry(registry.order(), registry.prereqs()).is_empty());
        assert_eq!(registry.len(), 10);
        assert_eq!(registry.rank("issue"), Some(0));
        assert_eq!(registry.rank("preventive_measures"), Some(9));
        assert!(registry.is_intake_gated("issue"));
        assert!(!registry.is_intake_gated("plan"));
    }

    #[test]
    fn undeclared_prerequisites_are_empty() {
        let registry = StepRegistry::from_lists(&["a", "b"], &[("b", &["a"])]).expect("registry");
        assert!(registry.prerequisites("a").is_empty());
        assert!(registry.prerequisites("unknown").is_empty());
        assert_eq!(
            registry.prerequisites("b").iter().collect::<Vec<_>>(),
            vec!["a"]
        );
    }

    #[test]
    fn rejects_duplicate_order_entries() {
        let errors = validate_registry(&owned(&["a", "b", "a"]), &PrereqMap::new());
        assert_eq!(errors, vec!["duplicate step id 'a' in order at 2".to_string()]);
        assert!(StepRegistry::from_lists(&["a", "a"], &[]).is_err());
    }

    #[test]
    fn rejects_blank_ids() {
        let errors = validate_registry(&owned(&["a", " "]), &prereq_map(&[("a", &[""])]));
        assert_eq!(
            errors,
            vec![
                "order[1]: step id must not be blank".to_string(),
                "a: prerequisite ids must not be blank".to_string(),
            ]
        );
    }

    #[test]
    fn rejects_two_step_cycle() {
        let prereqs = prereq_map(&[("a", &["b"]), ("b", &["a"])]);
        let errors = validate_registry(&owned(&["a", "b"]), &prereqs);
        assert_eq!(errors, vec!["prerequisite cycle: a -> b -> a".to_string()]);
    }

    #[test]
    fn rejects_longer_cycle_once() {
        let prereqs = prereq_map(&[("a", &["c"]), ("b", &["a"]), ("c", &["b"])]);
        let errors = validate_registry(&owned(&["a", "b", "c"]), &prereqs);
        assert_eq!(
            errors,
            vec!["prerequisite cycle: a -> c -> b -> a".to_string()]
        );
    }

    #[test]
    fn accepts_self_gate_and_dangling_prerequisite() {
        let registry =
            StepRegistry::from_lists(&["intake", "work"], &[("intake", &["intake"]), ("work", &["ghost"])])
                .expect("registry");
        assert!(registry.is_intake_gated("intake"));
        assert!(!registry.contains("ghost"));
    }

    #[test]
    fn new_reports_every_violation() {
        let err = StepRegistry::from_lists(&["a", "a"], &[("a", &["b"]), ("b", &["a"])])
            .expect_err("invalid registry");
        let message = err.to_string();
        assert!(message.contains("duplicate step id 'a'"));
        assert!(message.contains("prerequisite cycle"));
    }
}
