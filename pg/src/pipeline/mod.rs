//! The generation pipeline
//!
//! Deterministic stages (context load, filter, prune, invalidate, persist)
//! interleave with four structured-LLM nodes (strategy, orchestrator, and
//! the three phase selectors). The engine folds them over the week's
//! training days.

pub mod context;
pub mod engine;
pub mod error;
pub mod filter;
pub mod invalidate;
pub mod orchestrator;
pub mod persist;
pub mod prune;
pub mod selector;
pub mod strategy;

pub use context::{RunContext, load_context};
pub use engine::{GenerationEngine, RunReport, RunState};
pub use error::RunError;
pub use filter::{ScoredVariation, filter_and_score};
pub use invalidate::{CarryoverPolicy, carryover_ids};
pub use persist::persist_run;
pub use prune::prune;
