//! Phase Selectors - one structured call per session phase
//!
//! The three phase calls for a day are independent and run concurrently.
//! Each selector only sees its own pruned candidate list; everything it
//! returns is validated against that list, the phase's count bounds, and
//! (for the workout) the two-discipline rule.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info};

use super::error::RunError;
use super::filter::ScoredVariation;
use crate::domain::{ChosenVariation, PhaseKind, TrainingDayPlan};
use crate::llm::{LlmClient, SchemaSpec, StructuredRequest, TokenUsage, complete_typed};
use crate::prompts::{PromptLoader, SelectPhaseVars};

#[derive(Debug, Deserialize)]
struct PhaseSelectionOutput {
    variation_ids: Vec<String>,
}

fn node_name(phase: PhaseKind) -> &'static str {
    match phase {
        PhaseKind::Warmup => "selector.warmup",
        PhaseKind::Workout => "selector.workout",
        PhaseKind::Cooldown => "selector.cooldown",
    }
}

fn phase_selection_schema(phase: PhaseKind) -> SchemaSpec {
    let (min, max) = phase.bounds();
    SchemaSpec::new(
        "phase_selection",
        format!("Variation ids chosen for the {phase} phase"),
        serde_json::json!({
            "type": "object",
            "properties": {
                "variation_ids": {
                    "type": "array",
                    "items": { "type": "string" },
                    "minItems": min,
                    "maxItems": max,
                    "description": "Ids taken verbatim from the candidate list"
                }
            },
            "required": ["variation_ids"],
            "additionalProperties": false
        }),
    )
}

/// Run one Phase Selector
///
/// `candidates` is the pruned, score-ordered list for this phase; the
/// returned choices preserve the model's ordering (performance order).
pub async fn select_phase(
    llm: &Arc<dyn LlmClient>,
    prompts: &PromptLoader,
    day: &TrainingDayPlan,
    system_rationale: &str,
    phase: PhaseKind,
    candidates: &[ScoredVariation],
    max_tokens: u32,
) -> Result<(Vec<ChosenVariation>, TokenUsage), RunError> {
    let node = node_name(phase);
    debug!(%phase, date = %day.date, candidates = candidates.len(), "select_phase: called");

    let system_instruction = prompts
        .render("select-phase", &SelectPhaseVars::for_phase(phase))
        .map_err(|e| RunError::schema(node, format!("prompt rendering failed: {e}")))?;

    let candidate_context: Vec<serde_json::Value> = candidates
        .iter()
        .map(|s| {
            serde_json::json!({
                "id": s.variation.id,
                "name": s.variation.name,
                "disciplines": s.variation.disciplines,
                "tags": s.variation.tags,
                "score": s.score,
            })
        })
        .collect();

    let request = StructuredRequest {
        system_instruction,
        context: serde_json::json!({
            "day": day,
            "system_rationale": system_rationale,
            "candidates": candidate_context,
        }),
        schema: phase_selection_schema(phase),
        max_tokens,
    };

    let (output, usage): (PhaseSelectionOutput, TokenUsage) = complete_typed(llm, request)
        .await
        .map_err(|e| RunError::from_llm(node, e))?;

    let chosen = validate_selection(node, phase, candidates, output.variation_ids)?;

    info!(%phase, date = %day.date, count = chosen.len(), "Phase Selector chose variations");
    Ok((chosen, usage))
}

/// Check a selection against the candidate list and phase constraints
fn validate_selection(
    node: &'static str,
    phase: PhaseKind,
    candidates: &[ScoredVariation],
    ids: Vec<String>,
) -> Result<Vec<ChosenVariation>, RunError> {
    let (min, max) = phase.bounds();
    if ids.len() < min || ids.len() > max {
        return Err(RunError::schema(
            node,
            format!("{} variations chosen, {phase} requires between {min} and {max}", ids.len()),
        ));
    }

    let mut seen = HashSet::new();
    for id in &ids {
        if !seen.insert(id.as_str()) {
            return Err(RunError::schema(node, format!("variation {id} chosen more than once")));
        }
    }

    let by_id: HashMap<&str, &ScoredVariation> = candidates.iter().map(|s| (s.variation.id.as_str(), s)).collect();

    let mut chosen = Vec::with_capacity(ids.len());
    for id in &ids {
        let Some(scored) = by_id.get(id.as_str()) else {
            return Err(RunError::schema(node, format!("variation {id} is not in the candidate list")));
        };
        chosen.push(ChosenVariation {
            id: scored.variation.id.clone(),
            name: scored.variation.name.clone(),
        });
    }

    if phase == PhaseKind::Workout {
        let disciplines: HashSet<&str> = ids
            .iter()
            .filter_map(|id| by_id.get(id.as_str()))
            .flat_map(|s| s.variation.disciplines.iter().map(|d| d.as_str()))
            .collect();
        if disciplines.len() < 2 {
            return Err(RunError::schema(
                node,
                format!("workout covers {} discipline(s), at least 2 required", disciplines.len()),
            ));
        }
    }

    Ok(chosen)
}
