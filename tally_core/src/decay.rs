//! Widmark blood-alcohol estimate over the drink log.
//!
//! Each drink contributes `grams / (mass * ratio) - elimination * hours`,
//! floored at zero on its own before the contributions are summed. A fully
//! metabolized drink therefore adds exactly nothing and never offsets newer
//! drinks. The sum is floored again.

use crate::types::unix_seconds;
use crate::{DrinkEvent, SubjectProfile};
use chrono::{DateTime, Utc};

/// Estimated promille (g/L) for all events at `now`
pub fn estimate(events: &[DrinkEvent], profile: &SubjectProfile, now: DateTime<Utc>) -> f64 {
    let total: f64 = events
        .iter()
        .map(|event| contribution(event, profile, now))
        .sum();

    let total = total.max(0.0);
    tracing::debug!(
        "Estimated {:.5} promille from {} drinks",
        total,
        events.len()
    );
    total
}

/// One drink's clamped contribution at `now`
///
/// Drinks stamped after `now` are treated as just consumed.
pub fn contribution(event: &DrinkEvent, profile: &SubjectProfile, now: DateTime<Utc>) -> f64 {
    let hours = hours_since(event.timestamp, now).max(0.0);
    let decayed = instantaneous(event, profile) - profile.elimination_rate * hours;
    // NaN (corrupt numbers) falls out as 0 here too
    decayed.max(0.0)
}

/// Peak contribution of a drink, before any elimination
pub fn instantaneous(event: &DrinkEvent, profile: &SubjectProfile) -> f64 {
    event.grams_alcohol() / (profile.mass_kg * profile.distribution_ratio)
}

fn hours_since(timestamp: f64, now: DateTime<Utc>) -> f64 {
    (unix_seconds(now) - timestamp) / 3600.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NewDrink;
    use chrono::{Duration, TimeZone};

    fn at(hours_ago: f64, now: DateTime<Utc>, volume_ml: f64, abv: f64) -> DrinkEvent {
        let mut event = NewDrink::new("Beer (25cl ~5%)", volume_ml, abv).into_event(now);
        event.timestamp -= hours_ago * 3600.0;
        event
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 5, 22, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_log_is_zero() {
        assert_eq!(estimate(&[], &SubjectProfile::default(), now()), 0.0);
    }

    #[test]
    fn test_single_beer_at_time_zero() {
        let profile = SubjectProfile::default();
        let events = vec![at(0.0, now(), 250.0, 0.05)];

        let expected = (250.0 * 0.05 * 0.8) / (80.0 * 0.68);
        let bac = estimate(&events, &profile, now());
        assert!((bac - expected).abs() < 1e-12);
        assert!((bac - 0.1838).abs() < 1e-4);
    }

    #[test]
    fn test_decreases_by_elimination_rate_per_hour() {
        let profile = SubjectProfile::default();
        let events = vec![at(0.0, now(), 500.0, 0.08)];

        let peak = estimate(&events, &profile, now());
        let later = estimate(&events, &profile, now() + Duration::hours(1));
        assert!((peak - later - 0.15).abs() < 1e-9);
    }

    #[test]
    fn test_floored_at_zero_after_metabolized() {
        let profile = SubjectProfile::default();
        let events = vec![at(0.0, now(), 250.0, 0.05)];

        // 0.1838 is gone after ~1.23h
        assert_eq!(estimate(&events, &profile, now() + Duration::hours(2)), 0.0);
        assert_eq!(estimate(&events, &profile, now() + Duration::days(365)), 0.0);
    }

    #[test]
    fn test_contribution_is_monotonic_non_increasing() {
        let profile = SubjectProfile::default();
        let event = at(0.0, now(), 40.0, 0.40);

        let mut previous = contribution(&event, &profile, now());
        for minutes in (0..600).step_by(7) {
            let value = contribution(&event, &profile, now() + Duration::minutes(minutes));
            assert!(value >= 0.0);
            assert!(value <= previous);
            previous = value;
        }
    }

    #[test]
    fn test_old_drink_does_not_offset_new_one() {
        let profile = SubjectProfile::default();
        let old = at(10.0, now(), 250.0, 0.05);
        let fresh = at(0.0, now(), 250.0, 0.05);

        let alone = estimate(&[fresh.clone()], &profile, now());
        let both = estimate(&[old, fresh], &profile, now());
        // Sum-then-floor would give a lower value here
        assert_eq!(alone, both);
    }

    #[test]
    fn test_future_drink_counts_as_just_consumed() {
        let profile = SubjectProfile::default();
        let event = at(-1.0, now(), 250.0, 0.05);
        assert_eq!(
            contribution(&event, &profile, now()),
            instantaneous(&event, &profile)
        );
    }

    #[test]
    fn test_zero_volume_or_abv_contributes_nothing() {
        let profile = SubjectProfile::default();
        let events = vec![at(0.0, now(), 0.0, 0.4), at(0.0, now(), 330.0, 0.0)];
        assert_eq!(estimate(&events, &profile, now()), 0.0);
    }
}
