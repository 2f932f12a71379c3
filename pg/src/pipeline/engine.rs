//! Generation engine - the run reducer
//!
//! A run is a fold: `process_day` consumes the current state and returns
//! the next one, so each day's processing sees exactly the exclusions
//! accumulated by the days before it. Within a day the three phase
//! selections are independent and run concurrently; days themselves are
//! strictly sequential.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use planstore::PlanStore;
use tracing::{debug, info};

use super::context::{RunContext, load_context};
use super::error::RunError;
use super::filter::{ScoredVariation, filter_and_score};
use super::invalidate::carryover_ids;
use super::orchestrator::select_day_tags;
use super::persist::persist_run;
use super::prune::prune;
use super::selector::select_phase;
use super::strategy::plan_week;
use crate::config::GenerationConfig;
use crate::domain::{PhaseKind, Session, SessionsRecord, WeeklyPlan};
use crate::llm::{LlmClient, TokenUsage};
use crate::prompts::PromptLoader;

/// Accumulated state of one generation run
///
/// `session_used_ids` only ever grows; the initial blacklist is kept
/// separately in the context and never mutated.
#[derive(Debug, Clone)]
pub struct RunState {
    pub day_index: usize,
    pub weekly_plan: WeeklyPlan,
    pub session_used_ids: HashSet<String>,
    pub sessions: Vec<Session>,
    pub usage: TokenUsage,
}

impl RunState {
    fn new(weekly_plan: WeeklyPlan, usage: TokenUsage) -> Self {
        Self {
            day_index: 0,
            weekly_plan,
            session_used_ids: HashSet::new(),
            sessions: Vec::new(),
            usage,
        }
    }

    fn is_done(&self) -> bool {
        self.day_index >= self.weekly_plan.days.len()
    }
}

/// Summary of a committed run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub record_id: String,
    pub sessions: Vec<Session>,
    pub usage: TokenUsage,
}

/// Drives a full generation run for one user
pub struct GenerationEngine {
    store: PlanStore,
    llm: Arc<dyn LlmClient>,
    prompts: PromptLoader,
    settings: GenerationConfig,
    max_tokens: u32,
}

impl GenerationEngine {
    pub fn new(
        store: PlanStore,
        llm: Arc<dyn LlmClient>,
        prompts: PromptLoader,
        settings: GenerationConfig,
        max_tokens: u32,
    ) -> Self {
        Self {
            store,
            llm,
            prompts,
            settings,
            max_tokens,
        }
    }

    /// Run the whole pipeline: load, plan, fold over days, persist
    ///
    /// Nothing is written until every day has a complete session; any
    /// failure before the final transaction leaves the store untouched.
    pub async fn run(&self, user_id: &str, start_date: NaiveDate) -> Result<RunReport, RunError> {
        info!(%user_id, %start_date, "Starting generation run");

        let ctx = load_context(&self.store, user_id)?;

        let (weekly_plan, usage) =
            plan_week(&self.llm, &self.prompts, &ctx.profile, start_date, self.max_tokens).await?;

        let mut state = RunState::new(weekly_plan, usage);
        while !state.is_done() {
            state = self.process_day(state, &ctx).await?;
        }

        let generated_at = planstore::now_ms();
        let record = SessionsRecord::new(user_id, generated_at, state.weekly_plan, state.sessions);
        persist_run(&self.store, &record, &state.session_used_ids)?;

        info!(
            record_id = %record.id,
            sessions = record.sessions.len(),
            input_tokens = state.usage.input_tokens,
            output_tokens = state.usage.output_tokens,
            "Generation run committed"
        );

        Ok(RunReport {
            record_id: record.id,
            sessions: record.sessions,
            usage: state.usage,
        })
    }

    /// Process one training day: tags, three concurrent phase selections,
    /// session assembly, exclusion increment
    async fn process_day(&self, mut state: RunState, ctx: &RunContext) -> Result<RunState, RunError> {
        let day = state.weekly_plan.days[state.day_index].clone();
        let rationale = state.weekly_plan.system_rationale.clone();
        debug!(day_index = state.day_index, date = %day.date, "process_day: called");

        let (day_tags, tag_usage) = select_day_tags(
            &self.llm,
            &self.prompts,
            &day,
            &rationale,
            &ctx.catalog_tags,
            self.max_tokens,
        )
        .await?;
        state.usage.add(tag_usage);

        // Exclusions visible to this day: last week's blacklist plus
        // everything carried over from earlier days of this run
        let excluded: HashSet<String> = ctx
            .initial_blacklist
            .union(&state.session_used_ids)
            .cloned()
            .collect();

        let candidates_for = |phase: PhaseKind| -> Result<Vec<ScoredVariation>, RunError> {
            let scored = filter_and_score(&ctx.catalog, &excluded, phase, &day_tags);
            prune(scored, &self.settings, phase, state.day_index)
        };

        let warmup_candidates = candidates_for(PhaseKind::Warmup)?;
        let workout_candidates = candidates_for(PhaseKind::Workout)?;
        let cooldown_candidates = candidates_for(PhaseKind::Cooldown)?;

        let ((warmup, wu), (workout, xu), (cooldown, cu)) = tokio::try_join!(
            select_phase(
                &self.llm,
                &self.prompts,
                &day,
                &rationale,
                PhaseKind::Warmup,
                &warmup_candidates,
                self.max_tokens,
            ),
            select_phase(
                &self.llm,
                &self.prompts,
                &day,
                &rationale,
                PhaseKind::Workout,
                &workout_candidates,
                self.max_tokens,
            ),
            select_phase(
                &self.llm,
                &self.prompts,
                &day,
                &rationale,
                PhaseKind::Cooldown,
                &cooldown_candidates,
                self.max_tokens,
            ),
        )?;
        state.usage.add(wu);
        state.usage.add(xu);
        state.usage.add(cu);

        let session = Session {
            date: day.date,
            discipline: ctx.profile.preferred_discipline.clone(),
            warmup,
            workout,
            cooldown,
        };

        let increment = carryover_ids(&session, self.settings.carryover);
        state.session_used_ids.extend(increment);
        state.sessions.push(session);
        state.day_index += 1;

        debug!(
            day_index = state.day_index,
            used = state.session_used_ids.len(),
            "process_day: done"
        );
        Ok(state)
    }
}
