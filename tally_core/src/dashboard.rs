//! Per-request recomputation of the alcohol and reminder pages.
//!
//! Every interaction rebuilds a [`DashboardContext`] and recomputes the
//! views from what is on disk. Nothing survives between requests except the
//! two stores' files, so there is no "current tier" to keep in sync.

use crate::classify::{AlcoholTable, ReminderTable};
use crate::event_log::counts;
use crate::reminder::elapsed_between;
use crate::{decay, AlcoholTier, Config, DrinkEvent, ReminderTier, Result, SubjectProfile};
use chrono::{DateTime, Duration, Utc};

/// Inputs shared by one recomputation
#[derive(Clone, Debug)]
pub struct DashboardContext {
    pub now: DateTime<Utc>,
    pub profile: SubjectProfile,
    pub alcohol_table: AlcoholTable,
    pub reminder_table: ReminderTable,
}

impl DashboardContext {
    pub fn from_config(config: &Config, now: DateTime<Utc>) -> Result<Self> {
        Ok(Self {
            now,
            profile: config.profile(),
            alcohol_table: config.alcohol_table()?,
            reminder_table: config.reminder_table()?,
        })
    }
}

/// What the alcohol page shows
#[derive(Clone, Debug, PartialEq)]
pub struct AlcoholView {
    /// Promille
    pub metric: f64,
    pub tier: AlcoholTier,
    pub counts: Vec<(String, usize)>,
    pub total_drinks: usize,
}

/// What the reminder page shows
#[derive(Clone, Debug, PartialEq)]
pub struct ReminderView {
    pub last: DateTime<Utc>,
    pub elapsed: Duration,
    pub tier: ReminderTier,
    /// Time left before escalating, `None` once critical
    pub until_next: Option<(ReminderTier, Duration)>,
}

pub fn alcohol_view(ctx: &DashboardContext, events: &[DrinkEvent]) -> AlcoholView {
    let metric = decay::estimate(events, &ctx.profile, ctx.now);
    AlcoholView {
        metric,
        tier: ctx.alcohol_table.classify(&metric),
        counts: counts(events),
        total_drinks: events.len(),
    }
}

pub fn reminder_view(ctx: &DashboardContext, last: DateTime<Utc>) -> ReminderView {
    let elapsed = elapsed_between(last, ctx.now);
    let until_next = ctx
        .reminder_table
        .next_breakpoint(&elapsed)
        .map(|bp| (bp.tier, bp.threshold - elapsed));

    ReminderView {
        last,
        elapsed,
        tier: ctx.reminder_table.classify(&elapsed),
        until_next,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NewDrink;
    use chrono::TimeZone;

    fn ctx(now: DateTime<Utc>) -> DashboardContext {
        DashboardContext::from_config(&Config::default(), now).unwrap()
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 21, 23, 0, 0).unwrap()
    }

    #[test]
    fn test_alcohol_view_sober_on_empty_log() {
        let view = alcohol_view(&ctx(t0()), &[]);
        assert_eq!(view.metric, 0.0);
        assert_eq!(view.tier, AlcoholTier::Sober);
        assert!(view.counts.is_empty());
    }

    #[test]
    fn test_alcohol_view_tiers_over_time() {
        let wine = NewDrink::new("Wine (20cl ~12%)", 200.0, 0.12);
        let events: Vec<_> = (0..2).map(|_| wine.clone().into_event(t0())).collect();

        // 2 x 19.2g / 54.4 = 0.706
        let view = alcohol_view(&ctx(t0()), &events);
        assert_eq!(view.tier, AlcoholTier::OverLimit);
        assert_eq!(view.counts, vec![("Wine (20cl ~12%)".to_string(), 2)]);
        assert_eq!(view.total_drinks, 2);

        let view = alcohol_view(&ctx(t0() + Duration::hours(1)), &events);
        assert_eq!(view.tier, AlcoholTier::UnderLimit);

        let view = alcohol_view(&ctx(t0() + Duration::hours(4)), &events);
        assert_eq!(view.tier, AlcoholTier::Sober);
    }

    #[test]
    fn test_reminder_view_walks_through_tiers() {
        let cases = [
            (Duration::zero(), ReminderTier::Safe),
            (Duration::minutes(2), ReminderTier::DangerZone),
            (Duration::minutes(16), ReminderTier::Warning),
            (Duration::minutes(61), ReminderTier::Critical),
        ];
        for (elapsed, tier) in cases {
            let view = reminder_view(&ctx(t0() + elapsed), t0());
            assert_eq!(view.elapsed, elapsed);
            assert_eq!(view.tier, tier);
        }
    }

    #[test]
    fn test_reminder_countdown() {
        let view = reminder_view(&ctx(t0() + Duration::seconds(30)), t0());
        assert_eq!(
            view.until_next,
            Some((ReminderTier::DangerZone, Duration::seconds(90)))
        );

        let view = reminder_view(&ctx(t0() + Duration::hours(3)), t0());
        assert_eq!(view.until_next, None);
    }

    #[test]
    fn test_recording_cycles_back_to_safe() {
        let late = reminder_view(&ctx(t0() + Duration::hours(2)), t0());
        assert_eq!(late.tier, ReminderTier::Critical);

        let reset = reminder_view(&ctx(t0() + Duration::hours(2)), t0() + Duration::hours(2));
        assert_eq!(reset.tier, ReminderTier::Safe);
    }
}
