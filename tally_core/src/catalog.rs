//! Default drink menu.
//!
//! This module provides the built-in drinks offered by the alcohol tracker,
//! along with the count-based milestone each drink unlocks.

use crate::types::NewDrink;
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Cached default menu - built once and reused across all operations
static DEFAULT_MENU: Lazy<DrinkMenu> = Lazy::new(build_default_menu);

/// A drink that can be logged with a single command
#[derive(Clone, Debug, PartialEq)]
pub struct DrinkPreset {
    pub id: String,
    pub name: String,
    pub volume_ml: f64,
    pub abv: f64,
    pub milestone: Option<MilestoneRule>,
}

impl DrinkPreset {
    /// Fields to hand to the drink log
    pub fn to_new_drink(&self) -> NewDrink {
        NewDrink::new(self.name.clone(), self.volume_ml, self.abv)
    }
}

/// Unlocked when the drink's count reaches `count`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MilestoneRule {
    pub count: usize,
    pub reward: String,
}

/// Ordered list of drink presets
#[derive(Clone, Debug)]
pub struct DrinkMenu {
    pub drinks: Vec<DrinkPreset>,
}

/// Get a reference to the cached default menu
pub fn default_menu() -> &'static DrinkMenu {
    &DEFAULT_MENU
}

/// Builds the default menu
///
/// **Note**: prefer `default_menu()` which returns a cached reference.
pub fn build_default_menu() -> DrinkMenu {
    let preset = |id: &str, name: &str, volume_ml: f64, abv: f64, count: usize, reward: &str| {
        DrinkPreset {
            id: id.into(),
            name: name.into(),
            volume_ml,
            abv,
            milestone: Some(MilestoneRule {
                count,
                reward: reward.into(),
            }),
        }
    };

    DrinkMenu {
        drinks: vec![
            preset("beer", "Beer (25cl ~5%)", 250.0, 0.05, 3, "car keys"),
            preset("strong_beer", "Strong Beer (33cl ~8%)", 330.0, 0.08, 2, "car keys"),
            preset("wine", "Wine (20cl ~12%)", 200.0, 0.12, 3, "the closet"),
            preset("shot", "Shot (4cl ~40%)", 40.0, 0.40, 3, "flight to Mexico"),
            // ABV is a rough average for mixed drinks
            preset("cocktail", "Cocktail (~25cl)", 250.0, 0.20, 2, "the closet"),
        ],
    }
}

impl DrinkMenu {
    /// Look up a preset by id (case-insensitive)
    pub fn get(&self, id: &str) -> Option<&DrinkPreset> {
        let id = id.to_lowercase();
        self.drinks.iter().find(|d| d.id == id)
    }

    /// Look up a preset by its display name, as stored in the drink log
    pub fn find_by_name(&self, name: &str) -> Option<&DrinkPreset> {
        self.drinks.iter().find(|d| d.name == name)
    }

    /// Validate the menu for consistency
    ///
    /// Returns a list of validation errors (empty if valid)
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut ids = HashSet::new();
        let mut names = HashSet::new();

        for drink in &self.drinks {
            if !ids.insert(drink.id.as_str()) {
                errors.push(format!("Duplicate drink id '{}'", drink.id));
            }
            if !names.insert(drink.name.as_str()) {
                errors.push(format!("Duplicate drink name '{}'", drink.name));
            }
            if let Err(e) = drink.to_new_drink().validate() {
                errors.push(format!("Drink '{}': {}", drink.id, e));
            }
            if let Some(ref rule) = drink.milestone {
                if rule.count == 0 {
                    errors.push(format!("Drink '{}' has a milestone at count 0", drink.id));
                }
            }
        }

        errors
    }
}
