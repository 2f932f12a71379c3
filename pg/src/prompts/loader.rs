//! Prompt loader
//!
//! Renders system-instruction templates from embedded defaults, with an
//! optional override directory for tuning prompts without a rebuild.

use std::path::Path;

use eyre::{Context, Result};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::{debug, info};

use super::embedded;
use crate::domain::PhaseKind;

/// Template variables for the Strategy Planner system instruction
#[derive(Debug, Clone, Serialize)]
pub struct WeeklyPlanVars {
    /// First candidate training date, ISO formatted
    pub start_date: String,
}

/// Template variables for a Phase Selector system instruction
#[derive(Debug, Clone, Serialize)]
pub struct SelectPhaseVars {
    pub phase: String,
    pub instruction: String,
    pub min: usize,
    pub max: usize,
    pub require_disciplines: bool,
}

impl SelectPhaseVars {
    /// Build the selector variables for one phase
    pub fn for_phase(kind: PhaseKind) -> Self {
        let (min, max) = kind.bounds();
        let instruction = match kind {
            PhaseKind::Warmup => embedded::WARMUP_INSTRUCTION,
            PhaseKind::Workout => embedded::WORKOUT_INSTRUCTION,
            PhaseKind::Cooldown => embedded::COOLDOWN_INSTRUCTION,
        };
        Self {
            phase: kind.label().to_string(),
            instruction: instruction.to_string(),
            min,
            max,
            require_disciplines: kind == PhaseKind::Workout,
        }
    }
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    handlebars: Handlebars<'static>,
}

impl PromptLoader {
    /// Create a loader with the embedded templates registered
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);

        for (name, template) in embedded::TEMPLATES {
            handlebars
                .register_template_string(name, template)
                .context(format!("Failed to register embedded template '{name}'"))?;
        }

        debug!(count = embedded::TEMPLATES.len(), "PromptLoader::new: registered embedded templates");
        Ok(Self { handlebars })
    }

    /// Create a loader that prefers `<name>.hbs` files from a directory,
    /// falling back to the embedded template for any missing file
    pub fn with_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let mut loader = Self::new()?;
        let dir = dir.as_ref();

        for (name, _) in embedded::TEMPLATES {
            let path = dir.join(format!("{name}.hbs"));
            if path.exists() {
                loader
                    .handlebars
                    .register_template_file(name, &path)
                    .context(format!("Failed to load template override {}", path.display()))?;
                info!(%name, path = %path.display(), "Loaded prompt template override");
            }
        }

        Ok(loader)
    }

    /// Render a template with the given variables
    pub fn render<T: Serialize>(&self, name: &str, vars: &T) -> Result<String> {
        self.handlebars
            .render(name, vars)
            .context(format!("Failed to render template '{name}'"))
    }
}
