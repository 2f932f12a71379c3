//! Context Loader / Cleaner
//!
//! One read of the profile record, one read of the catalog, projected down
//! to the minimal field set the rest of the pipeline needs. Both reads
//! happen before any LLM call so a broken store fails the run cheaply.

use std::collections::HashSet;

use planstore::PlanStore;
use tracing::{debug, info};

use super::error::RunError;
use crate::domain::{CleanedProfile, UserProfile, Variation, distinct_tags};

/// Everything a generation run reads from the store
///
/// `initial_blacklist` is captured once here and never mutated during the
/// run; only the run state's own accumulator grows.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub profile: CleanedProfile,
    pub catalog: Vec<Variation>,
    pub catalog_tags: Vec<String>,
    pub initial_blacklist: HashSet<String>,
}

/// Load and clean the run context for one user
pub fn load_context(store: &PlanStore, user_id: &str) -> Result<RunContext, RunError> {
    debug!(%user_id, "load_context: called");

    let profile: UserProfile = store
        .try_get(user_id)
        .map_err(|e| RunError::Load {
            reason: format!("failed to read profile for {user_id}: {e}"),
        })?
        .ok_or_else(|| RunError::Load {
            reason: format!("no profile found for user {user_id}"),
        })?;

    let catalog: Vec<Variation> = store.list().map_err(|e| RunError::Load {
        reason: format!("failed to read variation catalog: {e}"),
    })?;

    if catalog.is_empty() {
        return Err(RunError::Load {
            reason: "variation catalog is empty".to_string(),
        });
    }

    let catalog_tags = distinct_tags(&catalog);
    let initial_blacklist: HashSet<String> = profile.blacklisted_variation_ids.iter().cloned().collect();

    info!(
        %user_id,
        catalog_size = catalog.len(),
        tags = catalog_tags.len(),
        blacklisted = initial_blacklist.len(),
        "Loaded run context"
    );

    Ok(RunContext {
        profile: profile.cleaned(),
        catalog,
        catalog_tags,
        initial_blacklist,
    })
}
