//! Day Orchestrator - maps a day's purpose onto catalog tags
//!
//! One structured call per training day. The model picks from the catalog's
//! actual tag vocabulary; anything it invents outside that vocabulary is
//! dropped, and a selection with no known tags left is a contract violation.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info, warn};

use super::error::RunError;
use crate::domain::TrainingDayPlan;
use crate::llm::{LlmClient, SchemaSpec, StructuredRequest, TokenUsage, complete_typed};
use crate::prompts::PromptLoader;

const NODE: &str = "orchestrator";

#[derive(Debug, Deserialize)]
struct DayTagsOutput {
    tags: Vec<String>,
}

fn day_tags_schema() -> SchemaSpec {
    SchemaSpec::new(
        "day_tags",
        "Semantic tags describing this training day's primary focus",
        serde_json::json!({
            "type": "object",
            "properties": {
                "tags": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Tags chosen from the provided catalog vocabulary"
                }
            },
            "required": ["tags"],
            "additionalProperties": false
        }),
    )
}

/// Run the Day Orchestrator for one training day
///
/// Returns the day's focus tags, restricted to tags that actually occur in
/// the catalog and deduplicated in catalog-vocabulary order.
pub async fn select_day_tags(
    llm: &Arc<dyn LlmClient>,
    prompts: &PromptLoader,
    day: &TrainingDayPlan,
    system_rationale: &str,
    catalog_tags: &[String],
    max_tokens: u32,
) -> Result<(Vec<String>, TokenUsage), RunError> {
    debug!(date = %day.date, "select_day_tags: called");

    let system_instruction = prompts
        .render("day-tags", &serde_json::json!({}))
        .map_err(|e| RunError::schema(NODE, format!("prompt rendering failed: {e}")))?;

    let request = StructuredRequest {
        system_instruction,
        context: serde_json::json!({
            "day": day,
            "system_rationale": system_rationale,
            "available_tags": catalog_tags,
        }),
        schema: day_tags_schema(),
        max_tokens,
    };

    let (output, usage): (DayTagsOutput, TokenUsage) = complete_typed(llm, request)
        .await
        .map_err(|e| RunError::from_llm(NODE, e))?;

    let requested = output.tags.len();
    // Intersect with the vocabulary; catalog order makes the result stable
    let tags: Vec<String> = catalog_tags.iter().filter(|t| output.tags.contains(t)).cloned().collect();

    if tags.len() < requested {
        warn!(
            date = %day.date,
            dropped = requested - tags.len(),
            "Day Orchestrator returned tags outside the catalog vocabulary"
        );
    }

    if tags.is_empty() {
        return Err(RunError::schema(
            NODE,
            format!("no usable tags for {} ({} returned, none in catalog)", day.date, requested),
        ));
    }

    info!(date = %day.date, ?tags, "Day Orchestrator selected focus tags");
    Ok((tags, usage))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::mock::MockLlmClient;

    fn day() -> TrainingDayPlan {
        TrainingDayPlan {
            date: "2026-08-24".parse().unwrap(),
            weekday: "monday".to_string(),
            purpose: "pulling strength".to_string(),
        }
    }

    fn vocabulary() -> Vec<String> {
        ["core", "legs", "pull", "push"].iter().map(|s| s.to_string()).collect()
    }

    async fn run_with(client: MockLlmClient) -> Result<(Vec<String>, TokenUsage), RunError> {
        let client: Arc<dyn LlmClient> = Arc::new(client);
        let prompts = PromptLoader::new().unwrap();
        select_day_tags(&client, &prompts, &day(), "pull/push split", &vocabulary(), 500).await
    }

    #[tokio::test]
    async fn test_known_tags_pass_through() {
        let (tags, _) = run_with(MockLlmClient::new(|req| {
            assert_eq!(req.schema.name, "day_tags");
            assert_eq!(req.context["day"]["purpose"], "pulling strength");
            Ok(serde_json::json!({ "tags": ["pull", "core"] }))
        }))
        .await
        .unwrap();
        assert_eq!(tags, vec!["core", "pull"]);
    }

    #[tokio::test]
    async fn test_unknown_tags_are_dropped() {
        let (tags, _) = run_with(MockLlmClient::new(|_| {
            Ok(serde_json::json!({ "tags": ["pull", "grip-strength"] }))
        }))
        .await
        .unwrap();
        assert_eq!(tags, vec!["pull"]);
    }

    #[tokio::test]
    async fn test_all_unknown_tags_is_schema_violation() {
        let result = run_with(MockLlmClient::new(|_| {
            Ok(serde_json::json!({ "tags": ["grip-strength", "breathing"] }))
        }))
        .await;
        assert!(matches!(result, Err(RunError::Schema { node: "orchestrator", .. })));
    }

    #[tokio::test]
    async fn test_empty_tag_list_is_schema_violation() {
        let result = run_with(MockLlmClient::new(|_| Ok(serde_json::json!({ "tags": [] })))).await;
        assert!(matches!(result, Err(RunError::Schema { node: "orchestrator", .. })));
    }
}
