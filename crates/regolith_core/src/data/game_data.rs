//! Complete static data set consumed by the simulation.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::building_data::{AmountMap, BuildingData, CommandData};
use super::conflict_data::{AdversaryData, DefenderData, IdeologyData, ResourceData};
use super::event_data::{EventData, EventOutcomeData};
use super::params::GameParams;
use super::research_data::{ProjectData, ResearchData};

/// Every definition list plus the parameters bundle.
///
/// Loaded from RON files by the driver; see [`crate::catalog::Catalog`] for
/// the resolved, simulation-facing form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameData {
    /// Resource definitions.
    #[serde(default)]
    pub resources: Vec<ResourceData>,
    /// Building definitions.
    #[serde(default)]
    pub buildings: Vec<BuildingData>,
    /// Manual command definitions.
    #[serde(default)]
    pub commands: Vec<CommandData>,
    /// Research definitions.
    #[serde(default)]
    pub research: Vec<ResearchData>,
    /// Project definitions.
    #[serde(default)]
    pub projects: Vec<ProjectData>,
    /// Narrative event definitions.
    #[serde(default)]
    pub events: Vec<EventData>,
    /// Ideology definitions.
    #[serde(default)]
    pub ideologies: Vec<IdeologyData>,
    /// Defender definitions.
    #[serde(default)]
    pub defenders: Vec<DefenderData>,
    /// Adversary definitions.
    #[serde(default)]
    pub adversaries: Vec<AdversaryData>,
    /// Global parameters.
    #[serde(default)]
    pub params: GameParams,
}

fn check_duplicates<'a>(kind: &str, names: impl Iterator<Item = &'a str>, errors: &mut Vec<String>) {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            errors.push(format!("Duplicate {kind} name '{name}'"));
        }
    }
}

fn check_category(kind: &str, name: &str, category: &str, allowed: &[String], errors: &mut Vec<String>) {
    if !allowed.iter().any(|c| c == category) {
        errors.push(format!("Invalid {kind} category '{category}' for '{name}'"));
    }
}

fn check_non_negative(owner: &str, field: &str, amounts: &AmountMap, errors: &mut Vec<String>) {
    for (resource, amount) in amounts {
        if !(*amount >= 0.0) {
            errors.push(format!("'{owner}' has negative {field} {amount} for '{resource}'"));
        }
    }
}

/// One file of a data directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFile {
    /// `resources.ron`: list of [`ResourceData`]
    Resources,
    /// `buildings.ron`: list of [`BuildingData`]
    Buildings,
    /// `commands.ron`: list of [`CommandData`]
    Commands,
    /// `research.ron`: list of [`ResearchData`]
    Research,
    /// `projects.ron`: list of [`ProjectData`]
    Projects,
    /// `events.ron`: list of [`EventData`]
    Events,
    /// `ideologies.ron`: list of [`IdeologyData`]
    Ideologies,
    /// `defenders.ron`: list of [`DefenderData`]
    Defenders,
    /// `adversaries.ron`: list of [`AdversaryData`]
    Adversaries,
    /// `params.ron`: a single [`GameParams`]
    Params,
}

impl DataFile {
    /// Every file, in load order.
    pub const ALL: [Self; 10] = [
        Self::Resources,
        Self::Buildings,
        Self::Commands,
        Self::Research,
        Self::Projects,
        Self::Events,
        Self::Ideologies,
        Self::Defenders,
        Self::Adversaries,
        Self::Params,
    ];

    /// File name inside a data directory.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Resources => "resources.ron",
            Self::Buildings => "buildings.ron",
            Self::Commands => "commands.ron",
            Self::Research => "research.ron",
            Self::Projects => "projects.ron",
            Self::Events => "events.ron",
            Self::Ideologies => "ideologies.ron",
            Self::Defenders => "defenders.ron",
            Self::Adversaries => "adversaries.ron",
            Self::Params => "params.ron",
        }
    }
}

fn parse_file<T: serde::de::DeserializeOwned>(path: &str, text: &str) -> crate::error::Result<T> {
    ron::from_str(text).map_err(|e| crate::error::GameError::DataParseError {
        path: path.to_string(),
        message: e.to_string(),
    })
}

impl GameData {
    /// Parse one data file and store its contents, replacing the previous
    /// contents of that section.
    ///
    /// `path` is only used in error messages.
    pub fn load_file(&mut self, file: DataFile, path: &str, text: &str) -> crate::error::Result<()> {
        match file {
            DataFile::Resources => self.resources = parse_file(path, text)?,
            DataFile::Buildings => self.buildings = parse_file(path, text)?,
            DataFile::Commands => self.commands = parse_file(path, text)?,
            DataFile::Research => self.research = parse_file(path, text)?,
            DataFile::Projects => self.projects = parse_file(path, text)?,
            DataFile::Events => self.events = parse_file(path, text)?,
            DataFile::Ideologies => self.ideologies = parse_file(path, text)?,
            DataFile::Defenders => self.defenders = parse_file(path, text)?,
            DataFile::Adversaries => self.adversaries = parse_file(path, text)?,
            DataFile::Params => self.params = parse_file(path, text)?,
        }
        Ok(())
    }

    /// Parse a complete data set from a single RON document.
    pub fn from_ron_str(ron: &str) -> crate::error::Result<Self> {
        parse_file("<inline>", ron)
    }

    /// Find a resource by name.
    #[must_use]
    pub fn get_resource(&self, name: &str) -> Option<&ResourceData> {
        self.resources.iter().find(|r| r.name == name)
    }

    /// Find a building by name.
    #[must_use]
    pub fn get_building(&self, name: &str) -> Option<&BuildingData> {
        self.buildings.iter().find(|b| b.name == name)
    }

    /// Find an ideology by name.
    #[must_use]
    pub fn get_ideology(&self, name: &str) -> Option<&IdeologyData> {
        self.ideologies.iter().find(|i| i.name == name)
    }

    /// Find a defender by name.
    #[must_use]
    pub fn get_defender(&self, name: &str) -> Option<&DefenderData> {
        self.defenders.iter().find(|d| d.name == name)
    }

    /// Check whether any unlockable kind has an entry with this name.
    #[must_use]
    pub fn is_unlockable(&self, name: &str) -> bool {
        self.commands.iter().any(|c| c.name == name)
            || self.buildings.iter().any(|b| b.name == name)
            || self.resources.iter().any(|r| r.name == name)
            || self.research.iter().any(|r| r.name == name)
            || self.projects.iter().any(|p| p.name == name)
    }

    fn check_resources<'a>(
        &self,
        owner: &str,
        names: impl Iterator<Item = &'a str>,
        errors: &mut Vec<String>,
    ) {
        for name in names {
            if self.get_resource(name).is_none() {
                errors.push(format!("'{owner}' references unknown resource '{name}'"));
            }
        }
    }

    fn check_ideologies<'a>(
        &self,
        owner: &str,
        names: impl Iterator<Item = &'a str>,
        errors: &mut Vec<String>,
    ) {
        for name in names {
            if self.get_ideology(name).is_none() {
                errors.push(format!("'{owner}' references unknown ideology '{name}'"));
            }
        }
    }

    fn check_unlocks(&self, owner: &str, unlocks: &[String], errors: &mut Vec<String>) {
        for name in unlocks {
            if !self.is_unlockable(name) {
                errors.push(format!("'{owner}' unlocks unknown name '{name}'"));
            }
        }
    }

    /// Validate internal consistency of the data set.
    ///
    /// Checks for:
    /// - Categories are members of the recognized enumerations
    /// - Names are unique within each kind
    /// - Resource, building, ideology and defender references resolve
    /// - Scaling factors are usable
    /// - Parameters are usable (see [`GameParams::validate`])
    ///
    /// Returns a list of validation errors.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let params = &self.params;
        let mut errors = params.validate();

        check_duplicates("resource", self.resources.iter().map(|r| r.name.as_str()), &mut errors);
        check_duplicates("building", self.buildings.iter().map(|b| b.name.as_str()), &mut errors);
        check_duplicates("command", self.commands.iter().map(|c| c.name.as_str()), &mut errors);
        check_duplicates("research", self.research.iter().map(|r| r.name.as_str()), &mut errors);
        check_duplicates("project", self.projects.iter().map(|p| p.name.as_str()), &mut errors);
        check_duplicates("event", self.events.iter().map(|e| e.name.as_str()), &mut errors);
        check_duplicates("ideology", self.ideologies.iter().map(|i| i.name.as_str()), &mut errors);
        check_duplicates("defender", self.defenders.iter().map(|d| d.name.as_str()), &mut errors);
        check_duplicates("adversary", self.adversaries.iter().map(|a| a.name.as_str()), &mut errors);

        for building in &self.buildings {
            check_category("building", &building.name, &building.category, &params.building_categories, &mut errors);
            self.check_resources(&building.name, building.referenced_resources(), &mut errors);
            check_non_negative(&building.name, "base_cost", &building.base_cost, &mut errors);
            check_non_negative(&building.name, "upkeep", &building.upkeep, &mut errors);
            check_non_negative(&building.name, "storage", &building.storage, &mut errors);
            if !(building.cost_scaling > 0.0) {
                errors.push(format!(
                    "Building '{}' has non-positive cost_scaling {}",
                    building.name, building.cost_scaling
                ));
            }
        }

        for command in &self.commands {
            check_category("command", &command.name, &command.category, &params.command_categories, &mut errors);
            self.check_resources(
                &command.name,
                command.cost.keys().chain(command.production.keys()).map(String::as_str),
                &mut errors,
            );
            self.check_ideologies(&command.name, command.ideology.keys().map(String::as_str), &mut errors);
            check_non_negative(&command.name, "cost", &command.cost, &mut errors);
        }

        for research in &self.research {
            check_category("research", &research.name, &research.category, &params.research_categories, &mut errors);
            self.check_resources(
                &research.name,
                research.cost.keys().chain(research.cost_modifiers.keys()).map(String::as_str),
                &mut errors,
            );
            self.check_ideologies(&research.name, research.ideology.iter().map(String::as_str), &mut errors);
            self.check_unlocks(&research.name, &research.unlocks, &mut errors);
            check_non_negative(&research.name, "cost", &research.cost, &mut errors);
            for (resource, factor) in &research.cost_modifiers {
                if !(*factor >= 0.0) {
                    errors.push(format!(
                        "Research '{}' has negative cost modifier {} for '{}'",
                        research.name, factor, resource
                    ));
                }
            }
        }

        for project in &self.projects {
            check_category("project", &project.name, &project.category, &params.project_categories, &mut errors);
            self.check_resources(&project.name, project.resource_rates.keys().map(String::as_str), &mut errors);
            self.check_ideologies(&project.name, project.ideology.iter().map(String::as_str), &mut errors);
            self.check_unlocks(&project.name, &project.unlocks, &mut errors);
            check_non_negative(&project.name, "resource_rate", &project.resource_rates, &mut errors);
            if !(project.base_cost > 0.0) {
                errors.push(format!(
                    "Project '{}' has non-positive base_cost {}",
                    project.name, project.base_cost
                ));
            }
        }

        for event in &self.events {
            self.check_resources(
                &event.name,
                event.income.keys().chain(event.resources_required.keys()).map(String::as_str),
                &mut errors,
            );
            for building in event.buildings_required.keys() {
                if self.get_building(building).is_none() {
                    errors.push(format!("'{}' references unknown building '{}'", event.name, building));
                }
            }
            self.check_unlocks(&event.name, &event.unlocks, &mut errors);
            for option in &event.options {
                for outcome in &option.outcomes {
                    match outcome {
                        EventOutcomeData::SetResource { resource, .. }
                        | EventOutcomeData::AddResource { resource, .. } => {
                            self.check_resources(&event.name, std::iter::once(resource.as_str()), &mut errors);
                        }
                        EventOutcomeData::Unlock(name) => {
                            self.check_unlocks(&event.name, std::slice::from_ref(name), &mut errors);
                        }
                        EventOutcomeData::Defer => {}
                    }
                }
            }
        }

        for defender in &self.defenders {
            self.check_resources(&defender.name, std::iter::once(defender.resource.as_str()), &mut errors);
            if !(defender.decay_rate >= 0.0) {
                errors.push(format!(
                    "Defender '{}' has negative decay_rate {}",
                    defender.name, defender.decay_rate
                ));
            }
        }

        for adversary in &self.adversaries {
            check_category("adversary", &adversary.name, &adversary.category, &params.adversary_categories, &mut errors);
            if self.get_defender(&adversary.defender).is_none() {
                errors.push(format!(
                    "Adversary '{}' references unknown defender '{}'",
                    adversary.name, adversary.defender
                ));
            }
            if !(0.0..=1.0).contains(&adversary.decay_rate) {
                errors.push(format!(
                    "Adversary '{}' decay_rate {} outside [0, 1]",
                    adversary.name, adversary.decay_rate
                ));
            }
        }

        if self.get_resource(&params.processor_resource).is_none() {
            errors.push(format!(
                "Processor resource '{}' not found",
                params.processor_resource
            ));
        }
        self.check_resources(
            "starting_storage",
            params.starting_storage.keys().map(String::as_str),
            &mut errors,
        );
        self.check_resources(
            "starting_resources",
            params.starting_resources.keys().map(String::as_str),
            &mut errors,
        );
        for building in params.starting_buildings.keys() {
            if self.get_building(building).is_none() {
                errors.push(format!("Starting building '{building}' not found"));
            }
        }

        errors
    }
}
