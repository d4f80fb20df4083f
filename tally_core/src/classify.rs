//! Threshold classification of a metric into status tiers.
//!
//! A table holds breakpoints ordered from most to least severe. The first
//! breakpoint whose condition holds wins, otherwise the baseline tier applies.
//! Tiers are always derived on demand and never stored.

use crate::{AlcoholTier, Error, ReminderTier, Result};
use chrono::Duration;
use std::cmp::Ordering;
use std::fmt::Debug;

/// How a value is compared against a breakpoint threshold
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    /// `value >= threshold`; a value on the boundary belongs to this tier
    AtLeast,
    /// `value > threshold`
    Above,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Breakpoint<T, S> {
    pub threshold: T,
    pub bound: Bound,
    pub tier: S,
}

impl<T: PartialOrd, S> Breakpoint<T, S> {
    pub fn at_least(threshold: T, tier: S) -> Self {
        Self {
            threshold,
            bound: Bound::AtLeast,
            tier,
        }
    }

    pub fn above(threshold: T, tier: S) -> Self {
        Self {
            threshold,
            bound: Bound::Above,
            tier,
        }
    }

    fn matches(&self, value: &T) -> bool {
        match self.bound {
            Bound::AtLeast => value >= &self.threshold,
            Bound::Above => value > &self.threshold,
        }
    }
}

/// Ordered breakpoint table, most severe first
#[derive(Clone, Debug)]
pub struct BreakpointTable<T, S> {
    breakpoints: Vec<Breakpoint<T, S>>,
    baseline: S,
}

pub type AlcoholTable = BreakpointTable<f64, AlcoholTier>;
pub type ReminderTable = BreakpointTable<Duration, ReminderTier>;

impl<T, S> BreakpointTable<T, S>
where
    T: PartialOrd + Debug,
    S: Copy,
{
    /// Build a table; thresholds must be comparable and strictly descending
    pub fn new(breakpoints: Vec<Breakpoint<T, S>>, baseline: S) -> Result<Self> {
        for bp in &breakpoints {
            if bp.threshold.partial_cmp(&bp.threshold).is_none() {
                return Err(Error::Config(format!(
                    "Breakpoint threshold {:?} is not comparable",
                    bp.threshold
                )));
            }
        }

        for pair in breakpoints.windows(2) {
            if pair[1].threshold.partial_cmp(&pair[0].threshold) != Some(Ordering::Less) {
                return Err(Error::Config(format!(
                    "Breakpoint thresholds must be strictly descending, got {:?} after {:?}",
                    pair[1].threshold, pair[0].threshold
                )));
            }
        }

        Ok(Self {
            breakpoints,
            baseline,
        })
    }

    /// Map a value to exactly one tier. Incomparable values (NaN) get the baseline.
    pub fn classify(&self, value: &T) -> S {
        self.breakpoints
            .iter()
            .find(|bp| bp.matches(value))
            .map(|bp| bp.tier)
            .unwrap_or(self.baseline)
    }

    /// The breakpoint one step more severe than where `value` currently sits
    ///
    /// Returns `None` when `value` is already in the most severe tier.
    pub fn next_breakpoint(&self, value: &T) -> Option<&Breakpoint<T, S>> {
        let current = self
            .breakpoints
            .iter()
            .position(|bp| bp.matches(value))
            .unwrap_or(self.breakpoints.len());
        current.checked_sub(1).map(|idx| &self.breakpoints[idx])
    }

    pub fn breakpoints(&self) -> &[Breakpoint<T, S>] {
        &self.breakpoints
    }

    pub fn baseline(&self) -> S {
        self.baseline
    }
}

/// Alcohol tiers: over the limit at `legal_limit`, under it for anything above zero
pub fn alcohol_table(legal_limit: f64) -> Result<AlcoholTable> {
    BreakpointTable::new(
        vec![
            Breakpoint::at_least(legal_limit, AlcoholTier::OverLimit),
            Breakpoint::above(0.0, AlcoholTier::UnderLimit),
        ],
        AlcoholTier::Sober,
    )
}

/// Reminder tiers by elapsed time since the last event
///
/// `danger_zone` must be positive so that a fresh event starts out `Safe`.
pub fn reminder_table(
    danger_zone: Duration,
    warning: Duration,
    critical: Duration,
) -> Result<ReminderTable> {
    if danger_zone <= Duration::zero() {
        return Err(Error::Config(format!(
            "Danger zone threshold must be positive, got {}s",
            danger_zone.num_seconds()
        )));
    }

    BreakpointTable::new(
        vec![
            Breakpoint::at_least(critical, ReminderTier::Critical),
            Breakpoint::at_least(warning, ReminderTier::Warning),
            Breakpoint::at_least(danger_zone, ReminderTier::DangerZone),
        ],
        ReminderTier::Safe,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_reminder() -> ReminderTable {
        reminder_table(
            Duration::minutes(2),
            Duration::minutes(15),
            Duration::minutes(60),
        )
        .unwrap()
    }

    #[test]
    fn test_alcohol_tiers() {
        let table = alcohol_table(0.5).unwrap();
        assert_eq!(table.classify(&0.0), AlcoholTier::Sober);
        assert_eq!(table.classify(&0.0001), AlcoholTier::UnderLimit);
        assert_eq!(table.classify(&0.4999), AlcoholTier::UnderLimit);
        assert_eq!(table.classify(&0.5), AlcoholTier::OverLimit);
        assert_eq!(table.classify(&3.0), AlcoholTier::OverLimit);
    }

    #[test]
    fn test_classify_is_total() {
        let table = alcohol_table(0.5).unwrap();
        assert_eq!(table.classify(&f64::NAN), AlcoholTier::Sober);
        assert_eq!(table.classify(&f64::NEG_INFINITY), AlcoholTier::Sober);
        assert_eq!(table.classify(&-1.0), AlcoholTier::Sober);
        assert_eq!(table.classify(&f64::INFINITY), AlcoholTier::OverLimit);
    }

    #[test]
    fn test_reminder_boundaries_belong_to_more_severe_tier() {
        let table = default_reminder();
        assert_eq!(table.classify(&Duration::zero()), ReminderTier::Safe);
        assert_eq!(table.classify(&Duration::seconds(119)), ReminderTier::Safe);
        assert_eq!(table.classify(&Duration::minutes(2)), ReminderTier::DangerZone);
        assert_eq!(table.classify(&Duration::minutes(15)), ReminderTier::Warning);
        assert_eq!(table.classify(&Duration::minutes(60)), ReminderTier::Critical);
        assert_eq!(table.classify(&Duration::days(3)), ReminderTier::Critical);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let table = default_reminder();
        let elapsed = Duration::seconds(901);
        assert_eq!(table.classify(&elapsed), table.classify(&elapsed));
    }

    #[test]
    fn test_next_breakpoint() {
        let table = default_reminder();

        let next = table.next_breakpoint(&Duration::seconds(30)).unwrap();
        assert_eq!(next.tier, ReminderTier::DangerZone);
        assert_eq!(next.threshold, Duration::minutes(2));

        let next = table.next_breakpoint(&Duration::minutes(20)).unwrap();
        assert_eq!(next.tier, ReminderTier::Critical);

        assert!(table.next_breakpoint(&Duration::hours(2)).is_none());
    }

    #[test]
    fn test_rejects_unordered_thresholds() {
        let result = reminder_table(
            Duration::minutes(15),
            Duration::minutes(2),
            Duration::minutes(60),
        );
        assert!(matches!(result, Err(Error::Config(_))));

        // Equal thresholds would make one tier unreachable
        assert!(alcohol_table(0.0).is_err());
    }

    #[test]
    fn test_zero_elapsed_is_always_safe() {
        let table = reminder_table(
            Duration::seconds(1),
            Duration::minutes(15),
            Duration::minutes(60),
        )
        .unwrap();
        assert_eq!(table.classify(&Duration::zero()), ReminderTier::Safe);

        for danger_zone in [Duration::zero(), Duration::seconds(-60)] {
            let result = reminder_table(danger_zone, Duration::minutes(15), Duration::minutes(60));
            assert!(matches!(result, Err(Error::Config(_))));
        }
    }

    #[test]
    fn test_rejects_nan_threshold() {
        assert!(matches!(alcohol_table(f64::NAN), Err(Error::Config(_))));
    }

    #[test]
    fn test_empty_table_always_baseline() {
        let table: BreakpointTable<i32, ReminderTier> =
            BreakpointTable::new(vec![], ReminderTier::Safe).unwrap();
        assert_eq!(table.classify(&i32::MAX), ReminderTier::Safe);
        assert!(table.next_breakpoint(&0).is_none());
        assert!(table.breakpoints().is_empty());
        assert_eq!(table.baseline(), ReminderTier::Safe);
    }
}
