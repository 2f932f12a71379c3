//! Generation run error taxonomy
//!
//! Every failure mode of a run is a distinct variant so callers can tell a
//! data-coverage gap apart from a misbehaving model or a broken store.
//! Nothing here is ever downgraded to a default plan.

use thiserror::Error;

use crate::domain::PhaseKind;
use crate::llm::LlmError;

/// A failed generation run
#[derive(Debug, Error)]
pub enum RunError {
    /// Profile or catalog unreadable or empty; raised before any LLM call
    #[error("Load failure: {reason}")]
    Load { reason: String },

    /// An LLM response did not satisfy its node's output contract
    #[error("Schema violation in {node}: {reason}")]
    Schema { node: &'static str, reason: String },

    /// Pruning left a mandatory phase with zero candidates
    #[error("No candidates left for {phase} on day {day_index} after filtering and pruning")]
    EmptyCandidates { phase: PhaseKind, day_index: usize },

    /// Transport-level LLM failure (timeout, network, API error)
    #[error("LLM call failed in {node}: {source}")]
    Llm {
        node: &'static str,
        #[source]
        source: LlmError,
    },

    /// The final write transaction failed; no partial persistence stands
    #[error("Persistence failure: {reason}")]
    Persistence { reason: String },
}

impl RunError {
    /// Classify an LLM error for a given node
    ///
    /// Schema violations get their own variant; everything else is a
    /// transport failure. Both abort the run.
    pub fn from_llm(node: &'static str, source: LlmError) -> Self {
        match source {
            LlmError::SchemaViolation(reason) => RunError::Schema { node, reason },
            source => RunError::Llm { node, source },
        }
    }

    /// Convenience constructor for schema violations detected after decode
    /// (constraint checks on an otherwise well-formed response)
    pub fn schema(node: &'static str, reason: impl Into<String>) -> Self {
        RunError::Schema {
            node,
            reason: reason.into(),
        }
    }
}
