//! Requery bookkeeping over the attempt log of a round.
//!
//! The log is append-only: a requery adds a new attempt. Settling picks one
//! attempt per agent as `Final` and marks the rest `Superseded`.

use foresight_domain::{AttemptStatus, ScoredResponse};
use std::collections::BTreeMap;

/// Index of each agent's latest attempt, in first-seen agent order.
fn latest_attempts(attempts: &[ScoredResponse]) -> Vec<usize> {
    let mut order: Vec<&str> = Vec::new();
    let mut latest: BTreeMap<&str, usize> = BTreeMap::new();
    for (i, scored) in attempts.iter().enumerate() {
        let name = scored.response.agent_name.as_str();
        match latest.get(name) {
            Some(&j) if attempts[j].response.attempt_index > scored.response.attempt_index => {}
            Some(_) => {
                latest.insert(name, i);
            }
            None => {
                order.push(name);
                latest.insert(name, i);
            }
        }
    }
    order.iter().filter_map(|name| latest.get(name).copied()).collect()
}

/// Agents whose latest attempt succeeded but scored below the bar.
pub(crate) fn requery_targets(attempts: &[ScoredResponse]) -> Vec<usize> {
    latest_attempts(attempts)
        .into_iter()
        .filter(|&i| attempts[i].response.is_success() && attempts[i].needs_requery())
        .collect()
}

/// Mark one attempt per agent as `Final`, every other as `Superseded`.
///
/// The final attempt is the successful one with the highest depth score,
/// ties going to the later attempt. An agent with no success keeps its
/// latest attempt as final.
pub(crate) fn settle(attempts: &mut [ScoredResponse]) {
    let mut chosen: BTreeMap<String, usize> = BTreeMap::new();
    for (i, scored) in attempts.iter().enumerate() {
        let name = &scored.response.agent_name;
        let better = match chosen.get(name) {
            None => true,
            Some(&j) => {
                let current = &attempts[j];
                match (scored.response.is_success(), current.response.is_success()) {
                    (true, false) => true,
                    (false, true) => false,
                    (true, true) => scored.depth_score() >= current.depth_score(),
                    (false, false) => {
                        scored.response.attempt_index >= current.response.attempt_index
                    }
                }
            }
        };
        if better {
            chosen.insert(name.clone(), i);
        }
    }

    for (i, scored) in attempts.iter_mut().enumerate() {
        scored.response.status = if chosen.get(&scored.response.agent_name) == Some(&i) {
            AttemptStatus::Final
        } else {
            AttemptStatus::Superseded
        };
    }
}
