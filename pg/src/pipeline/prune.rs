//! Variation Pruner - bounds the selector context size
//!
//! Deterministic: drops candidates below the score threshold, then keeps
//! the top N. Input arrives sorted from the Filter Engine, so truncation
//! keeps the best-scoring candidates and preserves their order.

use tracing::debug;

use super::error::RunError;
use super::filter::ScoredVariation;
use crate::config::GenerationConfig;
use crate::domain::PhaseKind;

/// Prune one phase's scored candidates
///
/// An empty result is an error, not a value: a session cannot be built
/// with an empty mandatory phase, and callers need to distinguish this
/// data-coverage gap from a model failure.
pub fn prune(
    scored: Vec<ScoredVariation>,
    settings: &GenerationConfig,
    phase: PhaseKind,
    day_index: usize,
) -> Result<Vec<ScoredVariation>, RunError> {
    let before = scored.len();
    let mut kept: Vec<ScoredVariation> = scored.into_iter().filter(|s| s.score >= settings.min_score).collect();
    kept.truncate(settings.max_candidates);

    debug!(%phase, day_index, before, after = kept.len(), "prune: done");

    if kept.is_empty() {
        return Err(RunError::EmptyCandidates { phase, day_index });
    }
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Variation;

    fn scored(id: &str, score: usize) -> ScoredVariation {
        ScoredVariation {
            variation: Variation {
                id: id.to_string(),
                name: id.to_uppercase(),
                disciplines: vec!["d".to_string()],
                tags: vec![],
            },
            score,
        }
    }

    fn settings(min_score: usize, max_candidates: usize) -> GenerationConfig {
        GenerationConfig {
            min_score,
            max_candidates,
            ..GenerationConfig::default()
        }
    }

    #[test]
    fn test_prune_drops_below_threshold() {
        let input = vec![scored("a", 3), scored("b", 1), scored("c", 0)];
        let kept = prune(input, &settings(1, 10), PhaseKind::Workout, 0).unwrap();
        let ids: Vec<&str> = kept.iter().map(|s| s.variation.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_prune_truncates_to_max_candidates() {
        let input = vec![scored("a", 5), scored("b", 4), scored("c", 3), scored("d", 2)];
        let kept = prune(input, &settings(1, 2), PhaseKind::Warmup, 1).unwrap();
        let ids: Vec<&str> = kept.iter().map(|s| s.variation.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_prune_preserves_input_order() {
        let input = vec![scored("a", 2), scored("b", 2), scored("c", 2)];
        let kept = prune(input, &settings(1, 10), PhaseKind::Cooldown, 0).unwrap();
        let ids: Vec<&str> = kept.iter().map(|s| s.variation.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_prune_empty_result_is_error() {
        let input = vec![scored("a", 0)];
        let result = prune(input, &settings(1, 10), PhaseKind::Cooldown, 2);
        assert!(matches!(
            result,
            Err(RunError::EmptyCandidates {
                phase: PhaseKind::Cooldown,
                day_index: 2
            })
        ));
    }

    #[test]
    fn test_prune_empty_input_is_error() {
        let result = prune(Vec::new(), &settings(1, 10), PhaseKind::Warmup, 0);
        assert!(matches!(result, Err(RunError::EmptyCandidates { .. })));
    }
}
