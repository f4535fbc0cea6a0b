//! Adversary, defender and ideology data structures.

use serde::{Deserialize, Serialize};

/// Data-driven defender definition.
///
/// A defender's troops are the count of a resource, so they are bought and
/// stored like any other resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefenderData {
    /// Unique display name; also the lookup key.
    pub name: String,

    /// Resource holding the defender count.
    pub resource: String,

    /// Fraction of defenders retained each conflict cycle.
    pub decay_rate: f64,
}

/// Data-driven adversary definition.
///
/// # Example RON
///
/// ```ron
/// AdversaryData(
///     name: "Raiders",
///     category: "Terrestrial",
///     defender: "Security Drones",
///     initial_strength: 0.0,
///     spawn_rate: 0.5,
///     decay_rate: 0.01,
///     surge_interval: 2400,
///     first_surge_strength: 50.0,
///     surge_scale_factor: 1.5,
/// )
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdversaryData {
    /// Unique display name; also the lookup key.
    pub name: String,

    /// Category, checked against `GameParams::adversary_categories`.
    pub category: String,

    /// Flavor text for the presentation layer.
    #[serde(default)]
    pub description: String,

    /// Defender this adversary fights.
    pub defender: String,

    /// Strength at simulation start.
    #[serde(default)]
    pub initial_strength: f64,

    /// Strength added each conflict cycle.
    pub spawn_rate: f64,

    /// Fraction of strength lost each conflict cycle.
    pub decay_rate: f64,

    /// Ticks between surges.
    pub surge_interval: u64,

    /// Strength added by the first surge.
    pub first_surge_strength: f64,

    /// Multiplier applied to surge strength and spawn rate after each surge.
    pub surge_scale_factor: f64,
}

/// Data-driven ideology definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdeologyData {
    /// Unique display name; also the lookup key.
    pub name: String,

    /// Flavor text for the presentation layer.
    #[serde(default)]
    pub description: String,
}

/// Data-driven resource definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceData {
    /// Unique display name; also the lookup key.
    pub name: String,

    /// Flavor text for the presentation layer.
    #[serde(default)]
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_adversary() {
        let adversary: AdversaryData = ron::from_str(
            r#"AdversaryData(
                name: "Raiders",
                category: "Terrestrial",
                defender: "Security Drones",
                spawn_rate: 0.5,
                decay_rate: 0.01,
                surge_interval: 2400,
                first_surge_strength: 50.0,
                surge_scale_factor: 1.5,
            )"#,
        )
        .unwrap();
        assert_eq!(adversary.defender, "Security Drones");
        assert_eq!(adversary.surge_interval, 2400);
        assert!(adversary.initial_strength.abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_defender() {
        let defender: DefenderData = ron::from_str(
            r#"DefenderData(name: "Security Drones", resource: "Drones", decay_rate: 0.99)"#,
        )
        .unwrap();
        assert_eq!(defender.resource, "Drones");
    }
}
