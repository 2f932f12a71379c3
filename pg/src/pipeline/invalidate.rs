//! Invalidator - per-session exclusion increments
//!
//! After each session is assembled, half of every phase's chosen ids are
//! folded into the week's exclusion accumulator so later days (and, after
//! persistence, next week) cannot reuse them. The source behavior never
//! specified *which* half, so the policy is explicit configuration.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{PhaseKind, Session};

/// Which half of each phase's chosen ids carries into the exclusion set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CarryoverPolicy {
    /// The first half in performance order (deterministic, default)
    #[default]
    FirstHalf,
    /// Every other id, starting from the first (deterministic)
    Alternating,
    /// A uniform random half (non-reproducible runs)
    Random,
}

/// Select ceil(50%) of one phase's ids under the given policy
fn half_of(ids: &[&str], policy: CarryoverPolicy) -> Vec<String> {
    let take = ids.len().div_ceil(2);
    match policy {
        CarryoverPolicy::FirstHalf => ids.iter().take(take).map(|s| s.to_string()).collect(),
        CarryoverPolicy::Alternating => ids.iter().step_by(2).map(|s| s.to_string()).collect(),
        CarryoverPolicy::Random => {
            use rand::seq::SliceRandom;
            let mut pool: Vec<&str> = ids.to_vec();
            pool.shuffle(&mut rand::rng());
            pool.into_iter().take(take).map(|s| s.to_string()).collect()
        }
    }
}

/// Compute this session's exclusion increment
///
/// Applied per phase, never across phases, so each phase contributes
/// half of its own ids regardless of phase sizes.
pub fn carryover_ids(session: &Session, policy: CarryoverPolicy) -> HashSet<String> {
    let mut out = HashSet::new();
    for kind in PhaseKind::ALL {
        let ids: Vec<&str> = session.phase(kind).iter().map(|c| c.id.as_str()).collect();
        out.extend(half_of(&ids, policy));
    }
    debug!(date = %session.date, ?policy, count = out.len(), "carryover_ids: computed");
    out
}
