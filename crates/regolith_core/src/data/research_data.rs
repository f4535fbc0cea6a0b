//! Research and project data structures.

use serde::{Deserialize, Serialize};

use super::building_data::AmountMap;

/// Data-driven research definition.
///
/// # Example RON
///
/// ```ron
/// ResearchData(
///     name: "Efficient Building Design",
///     category: "Production",
///     cost: {"Credits": 250.0},
///     ideology: Some("Science"),
///     cost_modifiers: {"Regolith": 0.9},
/// )
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchData {
    /// Unique display name; also the lookup key.
    pub name: String,

    /// Category, checked against `GameParams::research_categories`.
    pub category: String,

    /// Flavor text for the presentation layer.
    #[serde(default)]
    pub description: String,

    /// One-time purchase cost.
    #[serde(default)]
    pub cost: AmountMap,

    /// Ideology this research is aligned with, for presentation.
    #[serde(default)]
    pub ideology: Option<String>,

    /// Names unlocked when purchased.
    #[serde(default)]
    pub unlocks: Vec<String>,

    /// Building cost multipliers per resource, active once purchased.
    #[serde(default)]
    pub cost_modifiers: AmountMap,
}

impl ResearchData {
    /// Check if purchasing this research unlocks a name.
    #[must_use]
    pub fn unlocks_name(&self, name: &str) -> bool {
        self.unlocks.iter().any(|u| u == name)
    }
}

/// Data-driven multi-turn project definition.
///
/// Projects accumulate progress from resources the player chooses to pour in.
/// Each resource converts to progress at its `resource_rates` entry.
///
/// # Example RON
///
/// ```ron
/// ProjectData(
///     name: "Robot Pension Fund",
///     category: "Robot Welfare",
///     base_cost: 1000.0,
///     repeatable: true,
///     cost_scaling: 1.5,
///     resource_rates: {"Credits": 1.0, "Boredom": 0.25},
/// )
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectData {
    /// Unique display name; also the lookup key.
    pub name: String,

    /// Category, checked against `GameParams::project_categories`.
    pub category: String,

    /// Flavor text for the presentation layer.
    #[serde(default)]
    pub description: String,

    /// Progress required for the first completion.
    pub base_cost: f64,

    /// Whether the project can be completed more than once.
    #[serde(default)]
    pub repeatable: bool,

    /// Cost multiplier per completion (repeatable projects).
    #[serde(default = "default_scaling")]
    pub cost_scaling: f64,

    /// Progress gained per unit of each accepted resource.
    pub resource_rates: AmountMap,

    /// Names unlocked on each completion.
    #[serde(default)]
    pub unlocks: Vec<String>,

    /// Ideology this project is aligned with, for presentation.
    #[serde(default)]
    pub ideology: Option<String>,
}

const fn default_scaling() -> f64 {
    1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_research() {
        let research: ResearchData = ron::from_str(
            r#"ResearchData(
                name: "Efficient Building Design",
                category: "Production",
                cost: {"Credits": 250.0},
                unlocks: ["Smelter"],
                cost_modifiers: {"Regolith": 0.9},
            )"#,
        )
        .unwrap();
        assert!(research.unlocks_name("Smelter"));
        assert!(!research.unlocks_name("Forge"));
        assert_eq!(research.cost_modifiers.get("Regolith"), Some(&0.9));
        assert!(research.ideology.is_none());
    }

    #[test]
    fn test_parse_project_defaults() {
        let project: ProjectData = ron::from_str(
            r#"ProjectData(
                name: "Monument",
                category: "Temporal Constructs",
                base_cost: 10.0,
                resource_rates: {"Credits": 1.0},
            )"#,
        )
        .unwrap();
        assert!(!project.repeatable);
        assert!((project.cost_scaling - 1.0).abs() < f64::EPSILON);
    }
}
