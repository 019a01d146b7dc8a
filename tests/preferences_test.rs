//! Property-based and scenario tests for preference aggregation

use chrono::{NaiveDate, NaiveDateTime};
use proptest::prelude::*;

use checkin_history::models::Visit;
use checkin_history::preferences::{score_visits, DecayConfig};

fn base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 8, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn visit(place_type: &str, hours_before_now: i64) -> Visit {
    Visit {
        id: 0,
        user_id: 1,
        coordinates: None,
        place_name: String::new(),
        place_type: place_type.to_string(),
        address: None,
        created_at: base_time() - chrono::Duration::hours(hours_before_now),
    }
}

proptest! {
    /// For any non-empty visit set, scores form a probability distribution
    #[test]
    fn scores_sum_to_one(
        categories in prop::collection::vec(prop::sample::select(
            vec!["coffee_shop", "museum", "gym", "bar", "library", "park"]
        ), 1..50),
        ages in prop::collection::vec(0i64..24 * 365, 1..50),
    ) {
        let visits: Vec<Visit> = categories
            .iter()
            .zip(ages.iter().cycle())
            .map(|(&category, &age)| visit(category, age))
            .collect();

        let scores = score_visits(1, &visits, base_time(), &DecayConfig::default());

        let sum: f64 = scores.iter().map(|s| s.score).sum();
        prop_assert!((sum - 1.0).abs() < 1e-6);

        for score in &scores {
            prop_assert!(score.score > 0.0);
            prop_assert!(score.score <= 1.0 + 1e-9);
        }
    }

    /// Ranking is sorted descending by score
    #[test]
    fn scores_are_sorted_descending(
        ages in prop::collection::vec(0i64..24 * 365, 2..40),
    ) {
        let categories = ["a", "b", "c", "d"];
        let visits: Vec<Visit> = ages
            .iter()
            .enumerate()
            .map(|(i, &age)| visit(categories[i % categories.len()], age))
            .collect();

        let scores = score_visits(1, &visits, base_time(), &DecayConfig::default());

        for pair in scores.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }

    /// Older duplicates never contribute more than newer ones
    #[test]
    fn decay_weight_is_monotone(age_a in 0i64..10_000, age_b in 0i64..10_000) {
        let config = DecayConfig::default();
        let (younger, older) = if age_a <= age_b { (age_a, age_b) } else { (age_b, age_a) };

        let w_young = config.weight(chrono::Duration::hours(younger));
        let w_old = config.weight(chrono::Duration::hours(older));

        prop_assert!(w_young >= w_old);
        prop_assert!(w_old > 0.0);
    }
}

#[test]
fn aggregation_is_deterministic_across_calls() {
    let visits = vec![
        visit("coffee_shop", 3),
        visit("museum", 100),
        visit("coffee_shop", 50),
        visit("gym", 7),
    ];

    let now = base_time();
    let first = score_visits(1, &visits, now, &DecayConfig::default());
    let second = score_visits(1, &visits, now, &DecayConfig::default());

    assert_eq!(first, second);
}

#[test]
fn seed_pattern_repeated_visits_reinforce() {
    // 8 coffee shop visits and 3 museum visits within 30 days
    let mut visits = Vec::new();
    for day in 0..8 {
        visits.push(visit("coffee_shop", day * 24));
    }
    for day in [2, 11, 25] {
        visits.push(visit("museum", day * 24));
    }

    let scores = score_visits(1, &visits, base_time(), &DecayConfig::default());

    assert_eq!(scores.len(), 2);
    assert_eq!(scores[0].category, "coffee_shop");
    assert!(scores[0].score > scores[1].score);
}

#[test]
fn zero_visits_yield_empty_ranking() {
    let scores = score_visits(1, &[], base_time(), &DecayConfig::default());
    assert!(scores.is_empty());
}
