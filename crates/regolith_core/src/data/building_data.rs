//! Building and command data structures for data-driven definitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Amounts keyed by resource name, as authored in data files.
pub type AmountMap = BTreeMap<String, f64>;

/// Data-driven building definition.
///
/// # Example RON
///
/// ```ron
/// BuildingData(
///     name: "Regolith Excavator",
///     category: "Mining",
///     description: "Digs up regolith, burning energy to do it.",
///     cost_scaling: 1.15,
///     base_cost: {"Credits": 100.0},
///     production: {"Regolith": 1.0},
///     upkeep: {"Energy": 0.5},
///     can_deactivate: true,
/// )
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingData {
    /// Unique display name; also the lookup key.
    pub name: String,

    /// Category, checked against `GameParams::building_categories`.
    pub category: String,

    /// Flavor text for the presentation layer.
    #[serde(default)]
    pub description: String,

    /// Multiplier applied to the base cost per owned unit.
    pub cost_scaling: f64,

    /// Cost of the first unit.
    #[serde(default)]
    pub base_cost: AmountMap,

    /// Per-unit production each tick.
    #[serde(default)]
    pub production: AmountMap,

    /// Per-unit upkeep each tick. Units that cannot pay do not produce.
    #[serde(default)]
    pub upkeep: AmountMap,

    /// Per-unit storage capacity contribution.
    #[serde(default)]
    pub storage: AmountMap,

    /// Whether the player may toggle units inactive.
    #[serde(default)]
    pub can_deactivate: bool,
}

impl BuildingData {
    /// Check if this building has an upkeep requirement.
    #[must_use]
    pub fn has_upkeep(&self) -> bool {
        !self.upkeep.is_empty()
    }

    /// All resource names this building references.
    pub fn referenced_resources(&self) -> impl Iterator<Item = &str> {
        self.base_cost
            .keys()
            .chain(self.production.keys())
            .chain(self.upkeep.keys())
            .chain(self.storage.keys())
            .map(String::as_str)
    }
}

/// Data-driven manual command definition.
///
/// Commands are run by the player directly or by automation programs.
///
/// # Example RON
///
/// ```ron
/// CommandData(
///     name: "Sell Cloud Compute",
///     category: "Computation",
///     cost: {"Energy": 1.0},
///     production: {"Credits": 2.0},
///     ideology: {"Science": 1.0},
/// )
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandData {
    /// Unique display name; also the lookup key.
    pub name: String,

    /// Category, checked against `GameParams::command_categories`.
    pub category: String,

    /// Flavor text for the presentation layer.
    #[serde(default)]
    pub description: String,

    /// Cost per execution.
    #[serde(default)]
    pub cost: AmountMap,

    /// Resources produced per execution.
    #[serde(default)]
    pub production: AmountMap,

    /// Signed ideology score change per execution, keyed by ideology name.
    #[serde(default)]
    pub ideology: AmountMap,
}
