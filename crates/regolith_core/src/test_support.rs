//! Small data set shared by this crate's unit tests.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::data::GameData;
use crate::simulation::Simulation;

const SAMPLE_DATA: &str = r#"
GameData(
    resources: [
        ResourceData(name: "Credits"),
        ResourceData(name: "Energy"),
        ResourceData(name: "Regolith"),
        ResourceData(name: "Processors"),
        ResourceData(name: "Land"),
        ResourceData(name: "Boredom"),
        ResourceData(name: "Drones"),
    ],
    ideologies: [
        IdeologyData(name: "Efficiency"),
        IdeologyData(name: "Whimsy"),
    ],
    buildings: [
        BuildingData(
            name: "Solar Panels",
            category: "Power",
            cost_scaling: 1.15,
            base_cost: {"Credits": 10.0},
            production: {"Energy": 1.0},
            can_deactivate: true,
        ),
        BuildingData(
            name: "Storage Facility",
            category: "Storage",
            cost_scaling: 1.5,
            base_cost: {"Credits": 50.0, "Land": 1.0},
            storage: {"Credits": 500.0, "Energy": 100.0, "Regolith": 100.0},
        ),
        BuildingData(
            name: "Regolith Mine",
            category: "Mining",
            cost_scaling: 1.25,
            base_cost: {"Credits": 20.0, "Regolith": 50.0},
            production: {"Regolith": 1.0},
            upkeep: {"Energy": 2.0},
            can_deactivate: true,
        ),
        BuildingData(
            name: "Server Rack",
            category: "Processors",
            cost_scaling: 2.0,
            base_cost: {"Credits": 100.0},
            storage: {"Processors": 1.0},
        ),
    ],
    commands: [
        CommandData(
            name: "Sell Cloud Compute",
            category: "Computation",
            cost: {"Energy": 1.0},
            production: {"Credits": 2.0},
            ideology: {"Efficiency": 1.0},
        ),
        CommandData(
            name: "Gather Regolith",
            category: "Manual Operation",
            production: {"Regolith": 1.0},
        ),
        CommandData(
            name: "Idle",
            category: "Computation",
            ideology: {"Whimsy": 1.0},
        ),
        CommandData(
            name: "Build Drone",
            category: "Manual Operation",
            cost: {"Credits": 5.0},
            production: {"Drones": 1.0},
        ),
    ],
    research: [
        ResearchData(
            name: "Efficient Building Design",
            category: "Production",
            cost: {"Credits": 100.0},
            ideology: Some("Efficiency"),
            unlocks: ["Regolith Mine"],
            cost_modifiers: {"Regolith": 0.9},
        ),
        ResearchData(
            name: "Advanced Scheduling",
            category: "Programming",
            cost: {"Credits": 10000.0},
            unlocks: ["Server Rack"],
        ),
    ],
    projects: [
        ProjectData(
            name: "Robot Poetry",
            category: "Robot Welfare",
            base_cost: 10.0,
            repeatable: true,
            cost_scaling: 2.0,
            resource_rates: {"Credits": 1.0},
            ideology: Some("Whimsy"),
        ),
        ProjectData(
            name: "Monument",
            category: "Temporal Constructs",
            base_cost: 500.0,
            resource_rates: {"Regolith": 1.0},
            unlocks: ["Build Drone"],
        ),
    ],
    events: [
        EventData(
            name: "Arrival",
            ticks_required: 5,
            unlocks: ["Gather Regolith"],
            flavor_text: "The lander settles into the dust.",
        ),
        EventData(
            name: "Restless Robots",
            ticks_required: 600,
            income: {"Boredom": 1.0},
        ),
        EventData(
            name: "Boredom Sets In",
            ticks_required: 900,
            options: [
                EventOptionData(label: "Spend all boredom", outcomes: [
                    SetResource(resource: "Boredom", amount: 0.0),
                ]),
                EventOptionData(label: "Maybe later", outcomes: [Defer]),
                EventOptionData(label: "Sell spare parts", outcomes: [
                    AddResource(resource: "Credits", amount: 50.0),
                    Unlock("Storage Facility"),
                ]),
            ],
        ),
    ],
    defenders: [
        DefenderData(name: "Security Drones", resource: "Drones", decay_rate: 0.75),
    ],
    adversaries: [
        AdversaryData(
            name: "Raiders",
            category: "Terrestrial",
            defender: "Security Drones",
            spawn_rate: 0.5,
            decay_rate: 0.5,
            surge_interval: 40,
            first_surge_strength: 8.0,
            surge_scale_factor: 2.0,
        ),
    ],
    params: GameParams(
        starting_storage: {
            "Credits": 1000.0,
            "Energy": 100.0,
            "Regolith": 200.0,
            "Processors": 1.0,
            "Land": 10.0,
            "Boredom": 100.0,
            "Drones": 100.0,
        },
        starting_resources: {"Credits": 500.0, "Regolith": 100.0, "Land": 5.0, "Drones": 10.0},
        starting_buildings: {"Solar Panels": 1},
        starting_unlocks: [
            "Credits",
            "Energy",
            "Solar Panels",
            "Sell Cloud Compute",
            "Idle",
            "Efficient Building Design",
            "Robot Poetry",
        ],
        ticks_per_processor_cycle: 4,
        ticks_per_conflict_cycle: 20,
        ideology_base_cost: 100.0,
        ideology_scale_factor: 2.0,
        fight_ratio: 0.25,
        max_program_count: 5,
        command_categories: ["Computation", "Manual Operation", "Science"],
        building_categories: ["Mining", "Power", "Storage", "Processors", "Economy"],
        research_categories: ["Production", "Programming", "Defensive", "Offensive"],
        project_categories: ["Robot Welfare", "Temporal Constructs"],
        adversary_categories: ["Terrestrial", "Orbital"],
    ),
)
"#;

pub(crate) fn sample_data() -> GameData {
    GameData::from_ron_str(SAMPLE_DATA).unwrap()
}

pub(crate) fn sample_catalog() -> Catalog {
    Catalog::from_data(sample_data()).unwrap()
}

pub(crate) fn sample_simulation() -> Simulation {
    Simulation::new(Arc::new(sample_catalog()))
}
