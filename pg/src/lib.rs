//! Plangen - personalized weekly training plan generator
//!
//! A multi-stage pipeline that mixes deterministic filtering and scoring
//! with structured LLM calls, producing a week of fully populated training
//! sessions and rotating a per-user exclusion window between weeks.

pub mod cli;
pub mod config;
pub mod domain;
pub mod llm;
pub mod pipeline;
pub mod prompts;
