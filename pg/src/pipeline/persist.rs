//! Persistence transaction for a completed run
//!
//! Two effects, in order: append the immutable sessions record, then
//! replace the profile's blacklist with this week's accumulated ids (the
//! rolling one-week exclusion window - replace, never merge). If the
//! profile update fails the appended record is deleted so the store never
//! holds a half-committed run.
//!
//! Concurrency caveat: a profile edit that lands between the read and the
//! write here is overwritten. Single-writer per user is assumed.

use std::collections::HashSet;

use planstore::PlanStore;
use tracing::{debug, error, info};

use super::error::RunError;
use crate::domain::{SessionsRecord, UserProfile};

/// Commit one completed run
///
/// On success the new blacklist is exactly `session_used_ids`, sorted for
/// stable serialization.
pub fn persist_run(
    store: &PlanStore,
    record: &SessionsRecord,
    session_used_ids: &HashSet<String>,
) -> Result<(), RunError> {
    debug!(record_id = %record.id, used = session_used_ids.len(), "persist_run: called");

    store.put_new(record).map_err(|e| RunError::Persistence {
        reason: format!("failed to append sessions record {}: {e}", record.id),
    })?;

    let mut profile: UserProfile = match store.get(record.user_id.as_str()) {
        Ok(profile) => profile,
        Err(e) => {
            rollback_record(store, record);
            return Err(RunError::Persistence {
                reason: format!("failed to re-read profile {}: {e}", record.user_id),
            });
        }
    };

    let mut blacklist: Vec<String> = session_used_ids.iter().cloned().collect();
    blacklist.sort();
    profile.blacklisted_variation_ids = blacklist;
    profile.updated_at = planstore::now_ms();

    if let Err(e) = store.put(&profile) {
        rollback_record(store, record);
        return Err(RunError::Persistence {
            reason: format!("failed to rotate blacklist for {}: {e}", record.user_id),
        });
    }

    info!(
        record_id = %record.id,
        sessions = record.sessions.len(),
        blacklisted = profile.blacklisted_variation_ids.len(),
        "Persisted generation run"
    );
    Ok(())
}

fn rollback_record(store: &PlanStore, record: &SessionsRecord) {
    if let Err(e) = store.delete::<SessionsRecord>(&record.id) {
        // The record exists but the blacklist was not rotated; surfaced so
        // an operator can delete it by hand.
        error!(record_id = %record.id, error = %e, "Rollback of sessions record failed");
    }
}
