//! User profile record and its cleaned projection
//!
//! The full profile is owned by the profile store and read-only during a
//! generation run. The pipeline only ever sees [`CleanedProfile`], the
//! minimal field set the downstream LLM nodes need.

use planstore::{Record, now_ms};
use serde::{Deserialize, Serialize};

/// Physiological baseline scores, 0-10 each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BaselineMetrics {
    pub mobility: u8,
    pub flexibility: u8,
    pub rotation: u8,
}

/// Full user profile as persisted in the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique user identifier
    pub user_id: String,

    /// Physiological baseline scores
    pub metrics: BaselineMetrics,

    /// Reported discomforts (e.g. "lower back", "left knee")
    pub discomforts: Vec<String>,

    /// Training objectives in the user's words
    pub objectives: Vec<String>,

    /// Preferred training discipline
    pub preferred_discipline: String,

    /// Variation ids excluded from selection this week
    ///
    /// Replaced wholesale at the end of every successful run, so exclusions
    /// rotate on a weekly window rather than accumulating forever.
    #[serde(default)]
    pub blacklisted_variation_ids: Vec<String>,

    /// Last update timestamp (Unix milliseconds)
    #[serde(default)]
    pub updated_at: i64,
}

impl UserProfile {
    /// Create a new profile with an empty blacklist
    pub fn new(user_id: impl Into<String>, metrics: BaselineMetrics, preferred_discipline: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            metrics,
            discomforts: Vec::new(),
            objectives: Vec::new(),
            preferred_discipline: preferred_discipline.into(),
            blacklisted_variation_ids: Vec::new(),
            updated_at: now_ms(),
        }
    }

    /// Project down to the fields the pipeline needs
    pub fn cleaned(&self) -> CleanedProfile {
        CleanedProfile {
            metrics: self.metrics,
            discomforts: self.discomforts.clone(),
            objectives: self.objectives.clone(),
            preferred_discipline: self.preferred_discipline.clone(),
        }
    }
}

impl Record for UserProfile {
    fn id(&self) -> &str {
        &self.user_id
    }

    fn collection() -> &'static str {
        "profiles"
    }
}

/// Minimal profile projection fed to the LLM nodes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanedProfile {
    pub metrics: BaselineMetrics,
    pub discomforts: Vec<String>,
    pub objectives: Vec<String>,
    pub preferred_discipline: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> UserProfile {
        let mut profile = UserProfile::new(
            "u-1",
            BaselineMetrics {
                mobility: 6,
                flexibility: 4,
                rotation: 5,
            },
            "calisthenics",
        );
        profile.discomforts = vec!["lower back".to_string()];
        profile.objectives = vec!["build pulling strength".to_string()];
        profile
    }

    #[test]
    fn test_cleaned_projection_fields() {
        let profile = sample();
        let cleaned = profile.cleaned();

        assert_eq!(cleaned.metrics, profile.metrics);
        assert_eq!(cleaned.discomforts, profile.discomforts);
        assert_eq!(cleaned.objectives, profile.objectives);
        assert_eq!(cleaned.preferred_discipline, "calisthenics");
    }

    #[test]
    fn test_profile_serde() {
        let profile = sample();
        let json = serde_json::to_string(&profile).unwrap();
        let deserialized: UserProfile = serde_json::from_str(&json).unwrap();

        assert_eq!(profile.user_id, deserialized.user_id);
        assert_eq!(profile.metrics, deserialized.metrics);
        assert_eq!(profile.preferred_discipline, deserialized.preferred_discipline);
    }

    #[test]
    fn test_blacklist_defaults_empty() {
        // Older profile records have no blacklist field
        let json = r#"{
            "user_id": "u-2",
            "metrics": { "mobility": 5, "flexibility": 5, "rotation": 5 },
            "discomforts": [],
            "objectives": [],
            "preferred_discipline": "kettlebell",
            "updated_at": 0
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert!(profile.blacklisted_variation_ids.is_empty());
    }
}
