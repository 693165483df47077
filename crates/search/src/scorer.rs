//! Scoring infrastructure for catalog search
//!
//! This module provides:
//! - Scorer trait for pluggable scoring algorithms
//! - FieldWeightScorer, the default weighted substring scorer

use partstore_core::Component;

/// Score a single field against the search term.
///
/// 0 if the term does not occur, 2 for a match at the start of the field,
/// 1 for a match anywhere else. An empty term occurs at position 0 of every
/// field and therefore counts as a prefix match.
fn substring_score(needle: &str, haystack: &str) -> f32 {
    match haystack.to_lowercase().find(needle) {
        None => 0.0,
        Some(0) => 2.0,
        Some(_) => 1.0,
    }
}

/// Pluggable scoring interface
///
/// Scorers take a search term and a component and return a relevance score.
/// Higher scores indicate more relevant components; anything at or below
/// zero is treated as "no match" by the ranking step.
///
/// # Thread Safety
///
/// Scorers must be Send + Sync so a backend can serve concurrent searches.
pub trait Scorer: Send + Sync {
    /// Score a component against a search term
    fn score(&self, term: &str, component: &Component) -> f32;

    /// Name for debugging and logging
    fn name(&self) -> &str;
}

/// Weighted substring scorer, the default ranking policy.
///
/// Each of the three searchable fields is scored with [`substring_score`]
/// and combined as a weighted sum. The value field carries the highest
/// weight and the category the lowest: a search for "10k" should rank a
/// value match above an incidental category hit. Matching is
/// case-insensitive, applied identically to all three fields.
#[derive(Debug, Clone)]
pub struct FieldWeightScorer {
    /// Weight of a category match
    w_category: f32,
    /// Weight of a value match
    w_value: f32,
    /// Weight of a description match
    w_description: f32,
}

impl Default for FieldWeightScorer {
    fn default() -> Self {
        FieldWeightScorer {
            w_category: 1.0,
            w_value: 3.0,
            w_description: 2.0,
        }
    }
}

impl FieldWeightScorer {
    /// Create a scorer with custom field weights
    pub fn new(w_category: f32, w_value: f32, w_description: f32) -> Self {
        FieldWeightScorer {
            w_category,
            w_value,
            w_description,
        }
    }
}

impl Scorer for FieldWeightScorer {
    fn score(&self, term: &str, component: &Component) -> f32 {
        let needle = term.to_lowercase();
        self.w_category * substring_score(&needle, &component.category)
            + self.w_value * substring_score(&needle, &component.value)
            + self.w_description * substring_score(&needle, &component.description)
    }

    fn name(&self) -> &str {
        "field-weight"
    }
}
