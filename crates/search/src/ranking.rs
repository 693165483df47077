//! Turn scored candidates into an ordered result list

use crate::scorer::Scorer;
use partstore_core::Component;
use std::cmp::Ordering;

/// Rank candidate components against a search term.
///
/// Components scoring at or below zero are dropped. The rest are ordered by
/// descending score; equal scores fall back to ascending id so the result
/// is deterministic and stable across calls.
pub fn rank(candidates: Vec<Component>, term: &str, scorer: &dyn Scorer) -> Vec<Component> {
    let mut scored: Vec<(f32, Component)> = candidates
        .into_iter()
        .filter_map(|comp| {
            let score = scorer.score(term, &comp);
            (score > 0.0).then_some((score, comp))
        })
        .collect();
    scored.sort_by(|(score_a, comp_a), (score_b, comp_b)| {
        score_b
            .partial_cmp(score_a)
            .unwrap_or(Ordering::Equal)
            .then_with(|| comp_a.id.cmp(&comp_b.id))
    });
    scored.into_iter().map(|(_, comp)| comp).collect()
}
