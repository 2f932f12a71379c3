//! Assembled sessions and the persisted weekly record

use chrono::NaiveDate;
use planstore::Record;
use serde::{Deserialize, Serialize};

use super::plan::WeeklyPlan;

/// The three structural phases of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    Warmup,
    Workout,
    Cooldown,
}

impl PhaseKind {
    /// All phases in session order
    pub const ALL: [PhaseKind; 3] = [PhaseKind::Warmup, PhaseKind::Workout, PhaseKind::Cooldown];

    /// Inclusive (min, max) count of variations this phase must contain
    pub fn bounds(self) -> (usize, usize) {
        match self {
            PhaseKind::Warmup => (3, 5),
            PhaseKind::Workout => (4, 6),
            PhaseKind::Cooldown => (3, 4),
        }
    }

    /// Display label
    pub fn label(self) -> &'static str {
        match self {
            PhaseKind::Warmup => "warmup",
            PhaseKind::Workout => "workout",
            PhaseKind::Cooldown => "cooldown",
        }
    }
}

impl std::fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A variation chosen into a session phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChosenVariation {
    pub id: String,
    pub name: String,
}

/// One day's concrete set of exercises
///
/// Immutable once appended to the run's session list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub date: NaiveDate,
    pub discipline: String,
    pub warmup: Vec<ChosenVariation>,
    pub workout: Vec<ChosenVariation>,
    pub cooldown: Vec<ChosenVariation>,
}

impl Session {
    /// Chosen variations for one phase
    pub fn phase(&self, kind: PhaseKind) -> &[ChosenVariation] {
        match kind {
            PhaseKind::Warmup => &self.warmup,
            PhaseKind::Workout => &self.workout,
            PhaseKind::Cooldown => &self.cooldown,
        }
    }

    /// Ids of every chosen variation across all phases
    pub fn all_ids(&self) -> Vec<&str> {
        PhaseKind::ALL
            .iter()
            .flat_map(|kind| self.phase(*kind).iter().map(|c| c.id.as_str()))
            .collect()
    }
}

/// Immutable record of one completed generation run
///
/// Keyed by user id + generation timestamp so the sessions collection is
/// append-only history: one record per completed run, never overwritten.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionsRecord {
    /// `<user_id>-<generated_at>`
    pub id: String,

    /// Owning user
    pub user_id: String,

    /// Generation timestamp (Unix milliseconds)
    pub generated_at: i64,

    /// The weekly plan this run was generated against
    pub weekly_plan: WeeklyPlan,

    /// Fully populated sessions, one per training day
    pub sessions: Vec<Session>,
}

impl SessionsRecord {
    /// Build the record for a completed run
    pub fn new(user_id: impl Into<String>, generated_at: i64, weekly_plan: WeeklyPlan, sessions: Vec<Session>) -> Self {
        let user_id = user_id.into();
        Self {
            id: format!("{user_id}-{generated_at}"),
            user_id,
            generated_at,
            weekly_plan,
            sessions,
        }
    }
}

impl Record for SessionsRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn collection() -> &'static str {
        "sessions"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TrainingDayPlan;

    fn chosen(id: &str) -> ChosenVariation {
        ChosenVariation {
            id: id.to_string(),
            name: id.to_uppercase(),
        }
    }

    fn session() -> Session {
        Session {
            date: NaiveDate::from_ymd_opt(2026, 8, 24).unwrap(),
            discipline: "calisthenics".to_string(),
            warmup: vec![chosen("w1"), chosen("w2"), chosen("w3")],
            workout: vec![chosen("x1"), chosen("x2"), chosen("x3"), chosen("x4")],
            cooldown: vec![chosen("c1"), chosen("c2"), chosen("c3")],
        }
    }

    #[test]
    fn test_phase_bounds() {
        assert_eq!(PhaseKind::Warmup.bounds(), (3, 5));
        assert_eq!(PhaseKind::Workout.bounds(), (4, 6));
        assert_eq!(PhaseKind::Cooldown.bounds(), (3, 4));
    }

    #[test]
    fn test_session_phase_accessor() {
        let s = session();
        assert_eq!(s.phase(PhaseKind::Warmup).len(), 3);
        assert_eq!(s.phase(PhaseKind::Workout).len(), 4);
        assert_eq!(s.phase(PhaseKind::Cooldown).len(), 3);
    }

    #[test]
    fn test_session_all_ids_spans_phases() {
        let s = session();
        let ids = s.all_ids();
        assert_eq!(ids.len(), 10);
        assert!(ids.contains(&"w1"));
        assert!(ids.contains(&"x4"));
        assert!(ids.contains(&"c3"));
    }

    #[test]
    fn test_sessions_record_id_is_timestamp_keyed() {
        let plan = WeeklyPlan {
            system_rationale: "r".to_string(),
            days: vec![TrainingDayPlan {
                date: NaiveDate::from_ymd_opt(2026, 8, 24).unwrap(),
                weekday: "monday".to_string(),
                purpose: "pull".to_string(),
            }],
        };
        let record = SessionsRecord::new("u-1", 1_700_000_000_000, plan, vec![session()]);
        assert_eq!(record.id, "u-1-1700000000000");
        assert_eq!(record.user_id, "u-1");
    }

    #[test]
    fn test_sessions_record_serde() {
        let plan = WeeklyPlan {
            system_rationale: "r".to_string(),
            days: vec![],
        };
        let record = SessionsRecord::new("u-1", 42, plan, vec![]);
        let json = serde_json::to_string(&record).unwrap();
        let deserialized: SessionsRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record.id, deserialized.id);
        assert_eq!(record.generated_at, 42);
    }
}
