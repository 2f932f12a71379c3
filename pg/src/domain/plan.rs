//! Weekly plan structure
//!
//! The WeeklyPlan is the permanent output of the Strategy Planner: which
//! days to train, what each day is for, and the overall rationale tying the
//! week together. The per-day loop reads it but never mutates it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One training day within the weekly plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingDayPlan {
    /// Calendar date of this session
    pub date: NaiveDate,

    /// Weekday name, as planned (e.g. "monday")
    pub weekday: String,

    /// What this day's session is for, in coaching terms
    pub purpose: String,
}

/// Permanent structural schedule for a training week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyPlan {
    /// Why the week is structured this way (holistic coverage rationale)
    pub system_rationale: String,

    /// Training days in chronological order
    pub days: Vec<TrainingDayPlan>,
}

impl WeeklyPlan {
    /// Number of training days in the week
    pub fn day_count(&self) -> usize {
        self.days.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_serde_roundtrip() {
        let plan = WeeklyPlan {
            system_rationale: "push/pull/legs split".to_string(),
            days: vec![TrainingDayPlan {
                date: NaiveDate::from_ymd_opt(2026, 8, 24).unwrap(),
                weekday: "monday".to_string(),
                purpose: "upper-body pulling strength".to_string(),
            }],
        };

        let json = serde_json::to_string(&plan).unwrap();
        let deserialized: WeeklyPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(plan, deserialized);
        assert_eq!(deserialized.day_count(), 1);
    }

    #[test]
    fn test_date_parses_from_iso_string() {
        let json = r#"{
            "system_rationale": "r",
            "days": [{ "date": "2026-08-26", "weekday": "wednesday", "purpose": "legs" }]
        }"#;
        let plan: WeeklyPlan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.days[0].date, NaiveDate::from_ymd_opt(2026, 8, 26).unwrap());
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        let json = r#"{
            "system_rationale": "r",
            "days": [{ "date": "not-a-date", "weekday": "wednesday", "purpose": "legs" }]
        }"#;
        assert!(serde_json::from_str::<WeeklyPlan>(json).is_err());
    }
}
