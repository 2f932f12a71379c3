//! Strategy Planner - the weekly plan LLM node
//!
//! One structured call turning the cleaned profile into the permanent
//! WeeklyPlan. Schema-invalid output fails the run; there is no rule-based
//! fallback planner by design.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use super::error::RunError;
use crate::domain::{CleanedProfile, WeeklyPlan};
use crate::llm::{LlmClient, SchemaSpec, StructuredRequest, TokenUsage, complete_typed};
use crate::prompts::{PromptLoader, WeeklyPlanVars};

const NODE: &str = "strategy";

/// JSON Schema for the weekly plan output
fn weekly_plan_schema() -> SchemaSpec {
    SchemaSpec::new(
        "weekly_plan",
        "The weekly training plan: training days, per-day purpose, and overall rationale",
        serde_json::json!({
            "type": "object",
            "properties": {
                "system_rationale": {
                    "type": "string",
                    "description": "How the week fits together as one training system"
                },
                "days": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "date": { "type": "string", "description": "ISO date, YYYY-MM-DD" },
                            "weekday": { "type": "string" },
                            "purpose": { "type": "string", "description": "Strength-oriented purpose of this day" }
                        },
                        "required": ["date", "weekday", "purpose"],
                        "additionalProperties": false
                    }
                }
            },
            "required": ["system_rationale", "days"],
            "additionalProperties": false
        }),
    )
}

/// Run the Strategy Planner for one user
pub async fn plan_week(
    llm: &Arc<dyn LlmClient>,
    prompts: &PromptLoader,
    profile: &CleanedProfile,
    start_date: NaiveDate,
    max_tokens: u32,
) -> Result<(WeeklyPlan, TokenUsage), RunError> {
    debug!(%start_date, "plan_week: called");

    let system_instruction = prompts
        .render(
            "weekly-plan",
            &WeeklyPlanVars {
                start_date: start_date.to_string(),
            },
        )
        .map_err(|e| RunError::schema(NODE, format!("prompt rendering failed: {e}")))?;

    let request = StructuredRequest {
        system_instruction,
        context: serde_json::json!({
            "profile": profile,
            "start_date": start_date.to_string(),
        }),
        schema: weekly_plan_schema(),
        max_tokens,
    };

    let (plan, usage): (WeeklyPlan, TokenUsage) = complete_typed(llm, request)
        .await
        .map_err(|e| RunError::from_llm(NODE, e))?;

    validate_plan(&plan)?;

    info!(days = plan.day_count(), "Strategy Planner produced weekly plan");
    Ok((plan, usage))
}

/// Structural validation of the decoded plan
fn validate_plan(plan: &WeeklyPlan) -> Result<(), RunError> {
    if plan.days.is_empty() {
        return Err(RunError::schema(NODE, "weekly plan has no training days"));
    }
    if plan.days.len() > 7 {
        return Err(RunError::schema(NODE, format!("weekly plan has {} days", plan.days.len())));
    }
    if plan.days.iter().any(|d| d.purpose.trim().is_empty()) {
        return Err(RunError::schema(NODE, "a training day has an empty purpose"));
    }
    if plan.days.windows(2).any(|w| w[0].date >= w[1].date) {
        return Err(RunError::schema(NODE, "training days are not in chronological order"));
    }
    Ok(())
}
