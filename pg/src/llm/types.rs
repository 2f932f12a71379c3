//! LLM request/response types for plangen
//!
//! Every probabilistic node makes the same kind of call: a system
//! instruction, a JSON bag of context variables, and a JSON Schema the
//! response must conform to exactly. There is no free-form fallback; a
//! response that does not match the schema fails the node.

use serde::Serialize;
use tracing::debug;

/// The output schema a structured call must conform to
#[derive(Debug, Clone, Serialize)]
pub struct SchemaSpec {
    /// Schema name (doubles as the forced tool name for providers that
    /// implement structured output via tool use)
    pub name: String,

    /// One-line description of what the output represents
    pub description: String,

    /// JSON Schema for the output object
    pub schema: serde_json::Value,
}

impl SchemaSpec {
    /// Create a new schema spec
    pub fn new(name: impl Into<String>, description: impl Into<String>, schema: serde_json::Value) -> Self {
        let name = name.into();
        debug!(%name, "SchemaSpec::new: called");
        Self {
            name,
            description: description.into(),
            schema,
        }
    }
}

/// A structured completion request - everything needed for one LLM call
#[derive(Debug, Clone)]
pub struct StructuredRequest {
    /// System instruction (rendered from a Handlebars template)
    pub system_instruction: String,

    /// Context variables serialized into the user message
    pub context: serde_json::Value,

    /// Required output schema
    pub schema: SchemaSpec,

    /// Max tokens for the response
    pub max_tokens: u32,
}

impl StructuredRequest {
    /// Render the context variables as the user message body
    pub fn context_message(&self) -> String {
        serde_json::to_string_pretty(&self.context).unwrap_or_else(|_| self.context.to_string())
    }
}

/// Response from a structured completion request
#[derive(Debug, Clone)]
pub struct StructuredResponse {
    /// The schema-conforming output object, not yet decoded into a
    /// node-specific type
    pub value: serde_json::Value,

    /// Token usage for cost tracking
    pub usage: TokenUsage,
}

/// Token usage for cost tracking
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    /// Accumulate another call's usage into this one
    pub fn add(&mut self, other: TokenUsage) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_message_is_pretty_json() {
        let request = StructuredRequest {
            system_instruction: "Plan the week".to_string(),
            context: serde_json::json!({ "days": 3 }),
            schema: SchemaSpec::new("weekly_plan", "A weekly plan", serde_json::json!({ "type": "object" })),
            max_tokens: 1000,
        };

        let message = request.context_message();
        assert!(message.contains("\"days\": 3"));
    }

    #[test]
    fn test_token_usage_add() {
        let mut usage = TokenUsage {
            input_tokens: 100,
            output_tokens: 10,
        };
        usage.add(TokenUsage {
            input_tokens: 50,
            output_tokens: 5,
        });
        assert_eq!(usage.input_tokens, 150);
        assert_eq!(usage.output_tokens, 15);
    }
}
