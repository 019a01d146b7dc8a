//! Recency-weighted preference inference
//!
//! Turns a user's visit history into a ranked, normalized list of place
//! category affinities. Each visit contributes an exponentially decayed
//! weight, so recent visits count more than old ones but no visit is ever
//! discarded. Scores are normalized to a probability-like distribution.
//!
//! The computation is pure: it takes a visit snapshot and a reference
//! instant, touches no storage, and is deterministic for a given input.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime};

use crate::models::{PreferenceScore, Visit};

/// Default decay half-life: a visit from 30 days ago counts half as much
/// as one from right now.
pub const DEFAULT_HALF_LIFE_DAYS: f64 = 30.0;

/// Decay configuration for the aggregator
#[derive(Debug, Clone, Copy)]
pub struct DecayConfig {
    /// Half-life of a visit's weight, in days
    pub half_life_days: f64,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            half_life_days: DEFAULT_HALF_LIFE_DAYS,
        }
    }
}

impl DecayConfig {
    /// Weight contributed by a visit of the given age
    ///
    /// Monotonically non-increasing in age. Future-dated visits clamp to
    /// age zero and contribute a full weight of 1.0.
    #[must_use]
    pub fn weight(&self, age: Duration) -> f64 {
        let age_secs = age.num_seconds().max(0) as f64;
        let half_life_secs = self.half_life_days * 86_400.0;
        0.5_f64.powf(age_secs / half_life_secs)
    }
}

/// Compute ranked category preferences from a visit snapshot
///
/// Groups visits by `place_type`, sums decayed weights per category,
/// normalizes so scores sum to 1.0, and sorts descending by score with
/// ties broken by category name. An empty snapshot yields an empty vec;
/// "no history" is a normal state for a new user, not an error.
///
/// Repeat visits to the same place all count; visits with identical
/// timestamps are not deduplicated.
#[must_use]
pub fn score_visits(
    user_id: i64,
    visits: &[Visit],
    now: NaiveDateTime,
    config: &DecayConfig,
) -> Vec<PreferenceScore> {
    if visits.is_empty() {
        return Vec::new();
    }

    // BTreeMap keeps category iteration order deterministic
    let mut weights: BTreeMap<&str, f64> = BTreeMap::new();
    for visit in visits {
        let weight = config.weight(now - visit.created_at);
        *weights.entry(visit.place_type.as_str()).or_insert(0.0) += weight;
    }

    let total: f64 = weights.values().sum();

    let mut scores: Vec<PreferenceScore> = weights
        .into_iter()
        .map(|(category, weight)| PreferenceScore {
            user_id,
            category: category.to_string(),
            score: weight / total,
        })
        .collect();

    // Descending by score; the map already yielded categories in
    // ascending name order, so a stable sort resolves ties lexicographically
    scores.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn visit(user_id: i64, place_type: &str, created_at: NaiveDateTime) -> Visit {
        Visit {
            id: 0,
            user_id,
            coordinates: None,
            place_name: String::new(),
            place_type: place_type.to_string(),
            address: None,
            created_at,
        }
    }

    #[test]
    fn empty_history_yields_empty_result() {
        let scores = score_visits(7, &[], ts(20, 12), &DecayConfig::default());
        assert!(scores.is_empty());
    }

    #[test]
    fn single_visit_scores_one() {
        let visits = vec![visit(7, "museum", ts(10, 9))];
        let scores = score_visits(7, &visits, ts(20, 12), &DecayConfig::default());

        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].category, "museum");
        assert!((scores[0].score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn scores_sum_to_one() {
        let visits = vec![
            visit(7, "coffee_shop", ts(1, 8)),
            visit(7, "gym", ts(5, 18)),
            visit(7, "coffee_shop", ts(12, 8)),
            visit(7, "museum", ts(15, 14)),
        ];
        let scores = score_visits(7, &visits, ts(20, 12), &DecayConfig::default());

        let sum: f64 = scores.iter().map(|s| s.score).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn frequent_category_ranks_first() {
        // 8 coffee shop visits vs 3 museum visits, all within 30 days
        let mut visits = Vec::new();
        for day in 1..=8 {
            visits.push(visit(7, "coffee_shop", ts(day, 8)));
        }
        for day in [3, 9, 15] {
            visits.push(visit(7, "museum", ts(day, 14)));
        }

        let scores = score_visits(7, &visits, ts(20, 12), &DecayConfig::default());
        assert_eq!(scores[0].category, "coffee_shop");
        assert_eq!(scores[1].category, "museum");
        assert!(scores[0].score > scores[1].score);
    }

    #[test]
    fn decay_is_monotonic() {
        let config = DecayConfig::default();
        let recent = config.weight(Duration::days(1));
        let old = config.weight(Duration::days(40));
        assert!(recent > old);
        assert!(old > 0.0);
    }

    #[test]
    fn future_visit_clamps_to_full_weight() {
        let config = DecayConfig::default();
        assert!((config.weight(Duration::days(-3)) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn half_life_halves_weight() {
        let config = DecayConfig {
            half_life_days: 10.0,
        };
        assert!((config.weight(Duration::days(10)) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn recency_outweighs_equal_count() {
        // Same visit count per category; the more recent category wins
        let visits = vec![
            visit(7, "library", ts(1, 10)),
            visit(7, "library", ts(2, 10)),
            visit(7, "bar", ts(18, 22)),
            visit(7, "bar", ts(19, 22)),
        ];
        let scores = score_visits(7, &visits, ts(20, 12), &DecayConfig::default());
        assert_eq!(scores[0].category, "bar");
    }

    #[test]
    fn ties_break_lexicographically() {
        // Identical timestamps and counts give identical scores
        let visits = vec![
            visit(7, "zoo", ts(10, 10)),
            visit(7, "aquarium", ts(10, 10)),
        ];
        let scores = score_visits(7, &visits, ts(20, 12), &DecayConfig::default());
        assert_eq!(scores[0].category, "aquarium");
        assert_eq!(scores[1].category, "zoo");
        assert!((scores[0].score - scores[1].score).abs() < 1e-12);
    }

    #[test]
    fn duplicate_timestamps_all_count() {
        let visits = vec![
            visit(7, "gym", ts(10, 7)),
            visit(7, "gym", ts(10, 7)),
            visit(7, "cafe", ts(10, 7)),
        ];
        let scores = score_visits(7, &visits, ts(20, 12), &DecayConfig::default());
        assert_eq!(scores[0].category, "gym");
        assert!((scores[0].score - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn recomputation_is_idempotent() {
        let visits = vec![
            visit(7, "coffee_shop", ts(2, 8)),
            visit(7, "museum", ts(15, 14)),
        ];
        let now = ts(20, 12);
        let first = score_visits(7, &visits, now, &DecayConfig::default());
        let second = score_visits(7, &visits, now, &DecayConfig::default());
        assert_eq!(first, second);
    }
}
