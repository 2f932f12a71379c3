//! Prompt templates for the probabilistic pipeline nodes

pub mod embedded;
mod loader;

pub use loader::{PromptLoader, SelectPhaseVars, WeeklyPlanVars};
