//! Exercise variation catalog entries
//!
//! Read-only reference data: every performable exercise with its discipline
//! and semantic tag sets. Tags drive both the structural phase filters and
//! the per-day scoring pass.

use planstore::Record;
use serde::{Deserialize, Serialize};

/// One performable exercise in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variation {
    /// Unique variation identifier
    pub id: String,

    /// Human-readable name
    pub name: String,

    /// Disciplines this variation belongs to (e.g. "calisthenics", "kettlebell")
    pub disciplines: Vec<String>,

    /// Semantic tags (e.g. "pull", "mobility", "core")
    pub tags: Vec<String>,
}

impl Variation {
    /// True if any of this variation's tags appears in `tags`
    pub fn has_any_tag(&self, tags: &[String]) -> bool {
        self.tags.iter().any(|t| tags.iter().any(|other| other == t))
    }
}

impl Record for Variation {
    fn id(&self) -> &str {
        &self.id
    }

    fn collection() -> &'static str {
        "variations"
    }
}

/// All distinct tags present across the catalog, sorted
pub fn distinct_tags(catalog: &[Variation]) -> Vec<String> {
    let mut tags: Vec<String> = catalog.iter().flat_map(|v| v.tags.iter().cloned()).collect();
    tags.sort();
    tags.dedup();
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variation(id: &str, tags: &[&str]) -> Variation {
        Variation {
            id: id.to_string(),
            name: id.to_uppercase(),
            disciplines: vec!["calisthenics".to_string()],
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_has_any_tag() {
        let v = variation("v1", &["pull", "core"]);
        assert!(v.has_any_tag(&["core".to_string()]));
        assert!(v.has_any_tag(&["push".to_string(), "pull".to_string()]));
        assert!(!v.has_any_tag(&["legs".to_string()]));
        assert!(!v.has_any_tag(&[]));
    }

    #[test]
    fn test_distinct_tags_sorted_and_deduped() {
        let catalog = vec![
            variation("v1", &["pull", "core"]),
            variation("v2", &["core", "legs"]),
            variation("v3", &["pull"]),
        ];
        assert_eq!(distinct_tags(&catalog), vec!["core", "legs", "pull"]);
    }

    #[test]
    fn test_distinct_tags_empty_catalog() {
        assert!(distinct_tags(&[]).is_empty());
    }
}
