//! Workflow status: done/missing classification, gating and next-step choice.

use std::collections::HashSet;

use crate::core::completion::CompletionOracle;
use crate::core::registry::StepRegistry;
use crate::core::snapshot::Snapshot;
use crate::core::types::StatusReport;

/// Classify every step in `snapshot`.
///
/// 1. Each key is done or missing according to `oracle`.
/// 2. Both lists are put in canonical order (see [`ordered`]).
/// 3. A missing step is available when all of its declared prerequisites are
///    done; otherwise it is blocked.
/// 4. `doing` is the first available step.
///
/// Pure and deterministic: the snapshot is only read.
pub fn compute_status(
    snapshot: &Snapshot,
    registry: &StepRegistry,
    oracle: &CompletionOracle,
) -> StatusReport {
    let mut done = Vec::new();
    let mut missing = Vec::new();
    for (step, value) in snapshot.iter() {
        if oracle.is_complete(step, value) {
            done.push(step);
        } else {
            missing.push(step);
        }
    }

    let done_set: HashSet<&str> = done.iter().copied().collect();
    let done = ordered(done, registry);
    let missing = ordered(missing, registry);

    let (available, blocked): (Vec<String>, Vec<String>) =
        missing.iter().cloned().partition(|step| {
            registry
                .prerequisites(step)
                .iter()
                .all(|req| done_set.contains(req.as_str()))
        });
    let doing = available.first().cloned();

    StatusReport {
        done,
        missing,
        available,
        blocked,
        doing,
    }
}

/// Sort `steps` by their rank in the registry order.
///
/// Unranked steps sort after every ranked one and keep their input order.
pub fn ordered<I, S>(steps: I, registry: &StepRegistry) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut ranked: Vec<(usize, usize, String)> = steps
        .into_iter()
        .enumerate()
        .map(|(position, step)| {
            let step = step.as_ref();
            let rank = registry.rank(step).unwrap_or(usize::MAX);
            (rank, position, step.to_string())
        })
        .collect();
    ranked.sort_by_key(|(rank, position, _)| (*rank, *position));
    ranked.into_iter().map(|(_, _, step)| step).collect()
}

/// Prerequisites of `step` that are not done in `report`, in canonical order.
pub fn unmet_prerequisites(
    report: &StatusReport,
    registry: &StepRegistry,
    step: &str,
) -> Vec<String> {
    let unmet = registry
        .prerequisites(step)
        .iter()
        .filter(|req| !report.is_done(req));
    ordered(unmet, registry)
}
