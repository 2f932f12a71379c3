//! LlmClient trait definition

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

use super::{LlmError, StructuredRequest, StructuredResponse};

/// Stateless structured-output LLM client - each call is independent
///
/// This is the core abstraction for the four probabilistic pipeline nodes.
/// Each call carries its own system instruction, context variables, and
/// output schema; no conversation state is kept between calls.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single structured completion request (blocking until complete)
    ///
    /// The returned value is guaranteed to be the provider's schema-targeted
    /// output, but typed decoding happens at the call site so each node can
    /// report its own schema violation.
    async fn complete(&self, request: StructuredRequest) -> Result<StructuredResponse, LlmError>;
}

/// Complete a request and decode the response into a node-specific type
///
/// Decode failure is a schema violation: the provider returned JSON that
/// does not match the contract the node declared.
pub async fn complete_typed<T: DeserializeOwned>(
    llm: &Arc<dyn LlmClient>,
    request: StructuredRequest,
) -> Result<(T, super::TokenUsage), LlmError> {
    let schema_name = request.schema.name.clone();
    debug!(%schema_name, "complete_typed: called");

    let response = llm.complete(request).await?;
    let decoded = serde_json::from_value(response.value.clone())
        .map_err(|e| LlmError::SchemaViolation(format!("{schema_name}: {e}")))?;
    Ok((decoded, response.usage))
}
