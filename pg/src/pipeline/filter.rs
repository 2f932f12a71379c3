//! Filter Engine - deterministic hard filter and scoring pass
//!
//! Step A removes everything that may not appear in this phase: ids already
//! excluded (previous week's blacklist or this week's accumulator) and
//! variations outside the phase's structural category. Step B scores each
//! survivor by tag overlap with the day's selected focus. No randomness
//! anywhere: identical inputs produce the identical ordered list.

use std::collections::HashSet;

use tracing::debug;

use crate::domain::{PhaseKind, Variation};

/// Tags that admit a variation into the warmup phase
const WARMUP_TAGS: &[&str] = &["cardio", "mobility", "core"];

/// Tags that admit a variation into the cooldown phase
const COOLDOWN_TAGS: &[&str] = &["mobility", "flexibility"];

/// A catalog entry with its match score for the current phase and day
///
/// Transient: created and discarded within one day's processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredVariation {
    pub variation: Variation,
    pub score: usize,
}

/// True if the variation belongs to the phase's structural category
///
/// The workout admits the day's primary-focus tags; warmup and cooldown
/// have fixed category tag sets.
pub fn admissible(phase: PhaseKind, variation: &Variation, day_tags: &[String]) -> bool {
    match phase {
        PhaseKind::Warmup => variation.tags.iter().any(|t| WARMUP_TAGS.contains(&t.as_str())),
        PhaseKind::Workout => variation.has_any_tag(day_tags),
        PhaseKind::Cooldown => variation.tags.iter().any(|t| COOLDOWN_TAGS.contains(&t.as_str())),
    }
}

/// Run both filter steps for one phase of one day
///
/// Output is sorted by score descending; the sort is stable so ties keep
/// catalog order.
pub fn filter_and_score(
    catalog: &[Variation],
    excluded: &HashSet<String>,
    phase: PhaseKind,
    day_tags: &[String],
) -> Vec<ScoredVariation> {
    let mut scored: Vec<ScoredVariation> = catalog
        .iter()
        .filter(|v| !excluded.contains(&v.id))
        .filter(|v| admissible(phase, v, day_tags))
        .map(|v| ScoredVariation {
            variation: v.clone(),
            score: v.tags.iter().filter(|t| day_tags.contains(t)).count(),
        })
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score));

    debug!(
        %phase,
        catalog_size = catalog.len(),
        excluded = excluded.len(),
        survivors = scored.len(),
        "filter_and_score: done"
    );
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variation(id: &str, disciplines: &[&str], tags: &[&str]) -> Variation {
        Variation {
            id: id.to_string(),
            name: id.to_uppercase(),
            disciplines: disciplines.iter().map(|s| s.to_string()).collect(),
            tags: tags.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn tags(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn catalog() -> Vec<Variation> {
        vec![
            variation("v1", &["calisthenics"], &["pull", "core"]),
            variation("v2", &["kettlebell"], &["push", "cardio"]),
            variation("v3", &["calisthenics"], &["mobility", "flexibility"]),
            variation("v4", &["kettlebell"], &["pull", "legs"]),
            variation("v5", &["yoga"], &["flexibility"]),
        ]
    }

    #[test]
    fn test_hard_filter_removes_excluded_ids() {
        let excluded: HashSet<String> = ["v1".to_string(), "v4".to_string()].into();
        let result = filter_and_score(&catalog(), &excluded, PhaseKind::Workout, &tags(&["pull", "push"]));

        assert!(result.iter().all(|s| s.variation.id != "v1" && s.variation.id != "v4"));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].variation.id, "v2");
    }

    #[test]
    fn test_warmup_admits_cardio_mobility_core() {
        let result = filter_and_score(&catalog(), &HashSet::new(), PhaseKind::Warmup, &tags(&["pull"]));
        let ids: Vec<&str> = result.iter().map(|s| s.variation.id.as_str()).collect();
        // v1 (core), v2 (cardio), v3 (mobility); never v4/v5
        assert!(ids.contains(&"v1"));
        assert!(ids.contains(&"v2"));
        assert!(ids.contains(&"v3"));
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_cooldown_admits_mobility_flexibility() {
        let result = filter_and_score(&catalog(), &HashSet::new(), PhaseKind::Cooldown, &tags(&["pull"]));
        let ids: Vec<&str> = result.iter().map(|s| s.variation.id.as_str()).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&"v3"));
        assert!(ids.contains(&"v5"));
    }

    #[test]
    fn test_workout_admits_day_focus_tags_only() {
        let result = filter_and_score(&catalog(), &HashSet::new(), PhaseKind::Workout, &tags(&["legs"]));
        let ids: Vec<&str> = result.iter().map(|s| s.variation.id.as_str()).collect();
        assert_eq!(ids, vec!["v4"]);
    }

    #[test]
    fn test_score_is_tag_intersection_size() {
        let result = filter_and_score(
            &catalog(),
            &HashSet::new(),
            PhaseKind::Workout,
            &tags(&["pull", "core", "legs"]),
        );

        let v1 = result.iter().find(|s| s.variation.id == "v1").unwrap();
        let v4 = result.iter().find(|s| s.variation.id == "v4").unwrap();
        assert_eq!(v1.score, 2); // pull + core
        assert_eq!(v4.score, 2); // pull + legs
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let result = filter_and_score(
            &catalog(),
            &HashSet::new(),
            PhaseKind::Workout,
            &tags(&["pull", "core", "legs"]),
        );

        // v1 and v4 both score 2; v1 precedes v4 in the catalog
        let ids: Vec<&str> = result.iter().map(|s| s.variation.id.as_str()).collect();
        assert_eq!(ids, vec!["v1", "v4"]);
    }

    #[test]
    fn test_higher_scores_sort_first() {
        let extra = vec![
            variation("a", &["d1"], &["pull"]),
            variation("b", &["d1"], &["pull", "core", "legs"]),
        ];
        let result = filter_and_score(&extra, &HashSet::new(), PhaseKind::Workout, &tags(&["pull", "core", "legs"]));
        let ids: Vec<&str> = result.iter().map(|s| s.variation.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_deterministic_same_inputs_same_output() {
        let excluded: HashSet<String> = ["v2".to_string()].into();
        let day_tags = tags(&["pull", "core"]);

        let first = filter_and_score(&catalog(), &excluded, PhaseKind::Workout, &day_tags);
        let second = filter_and_score(&catalog(), &excluded, PhaseKind::Workout, &day_tags);
        assert_eq!(first, second);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_catalog() -> impl Strategy<Value = Vec<Variation>> {
            proptest::collection::vec(proptest::collection::vec("[a-e]{1,4}", 0..5), 1..20).prop_map(|tag_sets| {
                tag_sets
                    .into_iter()
                    .enumerate()
                    .map(|(i, tags)| Variation {
                        id: format!("v{i}"),
                        name: format!("V{i}"),
                        disciplines: vec!["d".to_string()],
                        tags,
                    })
                    .collect()
            })
        }

        proptest! {
            #[test]
            fn filter_and_score_is_deterministic(
                catalog in arb_catalog(),
                day_tags in proptest::collection::vec("[a-e]{1,4}", 0..5),
            ) {
                let excluded = HashSet::new();
                let a = filter_and_score(&catalog, &excluded, PhaseKind::Workout, &day_tags);
                let b = filter_and_score(&catalog, &excluded, PhaseKind::Workout, &day_tags);
                prop_assert_eq!(a, b);
            }

            #[test]
            fn score_never_exceeds_tag_count(
                catalog in arb_catalog(),
                day_tags in proptest::collection::vec("[a-e]{1,4}", 0..5),
            ) {
                let excluded = HashSet::new();
                for scored in filter_and_score(&catalog, &excluded, PhaseKind::Workout, &day_tags) {
                    prop_assert!(scored.score <= scored.variation.tags.len());
                    prop_assert!(scored.score >= 1); // workout admission requires overlap
                }
            }
        }
    }
}
