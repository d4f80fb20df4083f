//! Count-based rewards unlocked while drinking.
//!
//! Only the append path evaluates milestones. A milestone fires when the
//! drink just logged brings its count exactly to the rule's threshold, so
//! each crossing fires once and later reads of the log never re-fire it.
//! Resetting the log re-arms every milestone.

use crate::catalog::DrinkMenu;
use crate::event_log::count_by_name;
use crate::DrinkEvent;

/// A reward unlocked by the drink just logged
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Milestone {
    pub drink_id: String,
    pub drink_name: String,
    pub count: usize,
    pub reward: String,
}

/// Milestones reached by the last event of `events_after_append`
pub fn milestones_reached(events_after_append: &[DrinkEvent], menu: &DrinkMenu) -> Vec<Milestone> {
    let Some(appended) = events_after_append.last() else {
        return Vec::new();
    };

    let Some(preset) = menu.find_by_name(&appended.name) else {
        return Vec::new();
    };

    let Some(ref rule) = preset.milestone else {
        return Vec::new();
    };

    let count = count_by_name(events_after_append, &appended.name);
    if count != rule.count {
        return Vec::new();
    }

    tracing::info!(
        "Milestone reached: {} x {} unlocks {}",
        count,
        preset.name,
        rule.reward
    );
    vec![Milestone {
        drink_id: preset.id.clone(),
        drink_name: preset.name.clone(),
        count,
        reward: rule.reward.clone(),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_menu;
    use crate::event_log::EventLogStore;
    use chrono::Utc;

    #[test]
    fn test_third_beer_fires_once() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = EventLogStore::new(temp_dir.path().join("drinks.json"));
        let menu = default_menu();
        let beer = menu.get("beer").unwrap();

        let mut fired = Vec::new();
        for _ in 0..5 {
            let log = store.append(beer.to_new_drink(), Utc::now()).unwrap();
            fired.push(milestones_reached(&log, menu).len());
        }
        assert_eq!(fired, vec![0, 0, 1, 0, 0]);

        // Re-reading the log is not a crossing
        let log = store.load();
        assert_eq!(count_by_name(&log, &beer.name), 5);
    }

    #[test]
    fn test_milestone_details() {
        let menu = default_menu();
        let strong = menu.get("strong_beer").unwrap();
        let now = Utc::now();
        let log = vec![
            strong.to_new_drink().into_event(now),
            strong.to_new_drink().into_event(now),
        ];

        let reached = milestones_reached(&log, menu);
        assert_eq!(
            reached,
            vec![Milestone {
                drink_id: "strong_beer".into(),
                drink_name: "Strong Beer (33cl ~8%)".into(),
                count: 2,
                reward: "car keys".into(),
            }]
        );
    }

    #[test]
    fn test_other_drinks_do_not_trigger() {
        let menu = default_menu();
        let now = Utc::now();
        let beer = menu.get("beer").unwrap().to_new_drink();
        let wine = menu.get("wine").unwrap().to_new_drink();

        // Third beer is not the last event, so nothing fires on the wine
        let log = vec![
            beer.clone().into_event(now),
            beer.clone().into_event(now),
            beer.into_event(now),
            wine.into_event(now),
        ];
        assert!(milestones_reached(&log, menu).is_empty());
    }

    #[test]
    fn test_custom_drink_and_empty_log() {
        let menu = default_menu();
        assert!(milestones_reached(&[], menu).is_empty());

        let custom = crate::NewDrink::new("Homebrew", 500.0, 0.06).into_event(Utc::now());
        let log = vec![custom.clone(), custom.clone(), custom];
        assert!(milestones_reached(&log, menu).is_empty());
    }
}
