//! Global simulation parameters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::building_data::AmountMap;

/// Parameters bundle loaded alongside the definition catalogs.
///
/// # Example RON
///
/// ```ron
/// GameParams(
///     starting_storage: {"Credits": 1000.0, "Processors": 1.0},
///     starting_resources: {"Credits": 500.0},
///     starting_buildings: {"Solar Panels": 1},
///     starting_unlocks: ["Solar Panels", "Credits"],
///     ticks_per_processor_cycle: 4,
///     ticks_per_conflict_cycle: 20,
///     ideology_base_cost: 100.0,
///     ideology_scale_factor: 2.0,
///     fight_ratio: 0.1,
/// )
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameParams {
    /// Base storage per resource before building contributions.
    #[serde(default)]
    pub starting_storage: AmountMap,

    /// Starting count per resource.
    #[serde(default)]
    pub starting_resources: AmountMap,

    /// Starting owned units per building (all start active).
    #[serde(default)]
    pub starting_buildings: BTreeMap<String, u32>,

    /// Names unlocked at simulation start.
    #[serde(default)]
    pub starting_unlocks: Vec<String>,

    /// Processor claim of the first program at simulation start.
    #[serde(default = "default_starting_program_processors")]
    pub starting_program_processors: u32,

    /// Resource whose storage is the shared processor pool.
    #[serde(default = "default_processor_resource")]
    pub processor_resource: String,

    /// Wall-clock interval between driver ticks in milliseconds.
    #[serde(default = "default_timer_interval_ms")]
    pub timer_interval_ms: u32,

    /// Driver ticks per player-facing second.
    #[serde(default = "default_intervals_per_second")]
    pub intervals_per_second: u32,

    /// In-game seconds that elapse per tick.
    #[serde(default = "default_game_seconds_per_tick")]
    pub game_seconds_per_tick: u32,

    /// Ticks between automation program executions.
    #[serde(default = "default_ticks_per_processor_cycle")]
    pub ticks_per_processor_cycle: u32,

    /// Ticks between adversary growth and combat resolutions.
    #[serde(default = "default_ticks_per_conflict_cycle")]
    pub ticks_per_conflict_cycle: u32,

    /// Score needed for the first ideology rank.
    #[serde(default = "default_ideology_base_cost")]
    pub ideology_base_cost: f64,

    /// Growth of the rank threshold per rank. Must exceed 1.
    #[serde(default = "default_ideology_scale_factor")]
    pub ideology_scale_factor: f64,

    /// Fraction of all combatants that fight each conflict cycle.
    #[serde(default = "default_fight_ratio")]
    pub fight_ratio: f64,

    /// Number of automation program slots.
    #[serde(default = "default_max_program_count")]
    pub max_program_count: usize,

    /// Recognized command categories.
    #[serde(default)]
    pub command_categories: Vec<String>,

    /// Recognized building categories.
    #[serde(default)]
    pub building_categories: Vec<String>,

    /// Recognized research categories.
    #[serde(default)]
    pub research_categories: Vec<String>,

    /// Recognized project categories.
    #[serde(default)]
    pub project_categories: Vec<String>,

    /// Recognized adversary categories.
    #[serde(default)]
    pub adversary_categories: Vec<String>,
}

const fn default_starting_program_processors() -> u32 {
    1
}

fn default_processor_resource() -> String {
    "Processors".to_string()
}

const fn default_timer_interval_ms() -> u32 {
    250
}

const fn default_intervals_per_second() -> u32 {
    4
}

const fn default_game_seconds_per_tick() -> u32 {
    60
}

const fn default_ticks_per_processor_cycle() -> u32 {
    4
}

const fn default_ticks_per_conflict_cycle() -> u32 {
    20
}

const fn default_ideology_base_cost() -> f64 {
    100.0
}

const fn default_ideology_scale_factor() -> f64 {
    2.0
}

const fn default_fight_ratio() -> f64 {
    0.1
}

const fn default_max_program_count() -> usize {
    5
}

impl Default for GameParams {
    fn default() -> Self {
        Self {
            starting_storage: AmountMap::new(),
            starting_resources: AmountMap::new(),
            starting_buildings: BTreeMap::new(),
            starting_unlocks: Vec::new(),
            starting_program_processors: default_starting_program_processors(),
            processor_resource: default_processor_resource(),
            timer_interval_ms: default_timer_interval_ms(),
            intervals_per_second: default_intervals_per_second(),
            game_seconds_per_tick: default_game_seconds_per_tick(),
            ticks_per_processor_cycle: default_ticks_per_processor_cycle(),
            ticks_per_conflict_cycle: default_ticks_per_conflict_cycle(),
            ideology_base_cost: default_ideology_base_cost(),
            ideology_scale_factor: default_ideology_scale_factor(),
            fight_ratio: default_fight_ratio(),
            max_program_count: default_max_program_count(),
            command_categories: Vec::new(),
            building_categories: Vec::new(),
            research_categories: Vec::new(),
            project_categories: Vec::new(),
            adversary_categories: Vec::new(),
        }
    }
}

impl GameParams {
    /// Validate scalar parameters.
    ///
    /// Returns a list of validation errors.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        // The rank loop only terminates when thresholds grow.
        if !(self.ideology_scale_factor > 1.0) {
            errors.push(format!(
                "ideology_scale_factor must be greater than 1, got {}",
                self.ideology_scale_factor
            ));
        }
        if !(self.ideology_base_cost > 0.0) {
            errors.push(format!(
                "ideology_base_cost must be positive, got {}",
                self.ideology_base_cost
            ));
        }
        if !(0.0..=1.0).contains(&self.fight_ratio) {
            errors.push(format!(
                "fight_ratio must be within [0, 1], got {}",
                self.fight_ratio
            ));
        }
        if self.ticks_per_processor_cycle == 0 {
            errors.push("ticks_per_processor_cycle must be at least 1".to_string());
        }
        if self.ticks_per_conflict_cycle == 0 {
            errors.push("ticks_per_conflict_cycle must be at least 1".to_string());
        }
        if self.intervals_per_second == 0 {
            errors.push("intervals_per_second must be at least 1".to_string());
        }
        if self.max_program_count == 0 {
            errors.push("max_program_count must be at least 1".to_string());
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_are_valid() {
        assert!(GameParams::default().validate().is_empty());
    }

    #[test]
    fn test_non_growing_scale_factor_rejected() {
        for factor in [1.0, 0.5, f64::NAN] {
            let params = GameParams {
                ideology_scale_factor: factor,
                ..GameParams::default()
            };
            let errors = params.validate();
            assert_eq!(errors.len(), 1, "factor {factor}: {errors:?}");
            assert!(errors[0].contains("ideology_scale_factor"));
        }
    }

    #[test]
    fn test_zero_cycle_lengths_rejected() {
        let params = GameParams {
            ticks_per_processor_cycle: 0,
            ticks_per_conflict_cycle: 0,
            ..GameParams::default()
        };
        assert_eq!(params.validate().len(), 2);
    }

    #[test]
    fn test_parse_partial_ron() {
        let params: GameParams =
            ron::from_str(r#"GameParams(starting_resources: {"Credits": 500.0})"#).unwrap();
        assert_eq!(params.max_program_count, 5);
        assert_eq!(params.processor_resource, "Processors");
        assert_eq!(params.starting_resources.get("Credits"), Some(&500.0));
    }
}
