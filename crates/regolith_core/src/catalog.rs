//! Resolved, read-only definition catalog.
//!
//! [`Catalog::from_data`] turns loader-facing [`GameData`] into the form the
//! simulation consumes: every name reference becomes a typed id, every
//! number becomes [`Fixed`], and every table keeps its definition order.
//! A catalog is built once, wrapped in an `Arc` and shared by simulations.

use std::collections::HashMap;

use crate::data::{
    AdversaryData, AmountMap, BuildingData, CommandData, EventData, EventOutcomeData, GameData,
    GameParams, ProjectData, ResearchData,
};
use crate::error::{GameError, Result};
use crate::ids::{
    AdversaryId, BuildingId, CommandId, DefenderId, DenseId, EventId, IdeologyId, ProjectId,
    ResearchId, ResourceId, Unlockable,
};
use crate::math::{checked_from_f64, Fixed};

/// Per-resource amounts, sorted by resource id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceAmounts(Vec<(ResourceId, Fixed)>);

impl ResourceAmounts {
    /// Build from unsorted entries.
    #[must_use]
    pub fn new(mut entries: Vec<(ResourceId, Fixed)>) -> Self {
        entries.sort_by_key(|(id, _)| *id);
        Self(entries)
    }

    /// Iterate `(resource, amount)` pairs in resource order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceId, Fixed)> + '_ {
        self.0.iter().copied()
    }

    /// Amount for one resource, if listed.
    #[must_use]
    pub fn get(&self, resource: ResourceId) -> Option<Fixed> {
        self.0
            .binary_search_by_key(&resource, |(id, _)| *id)
            .ok()
            .map(|i| self.0[i].1)
    }

    /// Number of listed resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no resources are listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Position of a resource within this list.
    #[must_use]
    pub fn position(&self, resource: ResourceId) -> Option<usize> {
        self.0.binary_search_by_key(&resource, |(id, _)| *id).ok()
    }
}

impl FromIterator<(ResourceId, Fixed)> for ResourceAmounts {
    fn from_iter<T: IntoIterator<Item = (ResourceId, Fixed)>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// A definition table indexed by dense id and by name.
#[derive(Debug, Clone)]
pub struct Registry<I, D> {
    defs: Vec<D>,
    by_name: HashMap<String, I>,
}

impl<I: DenseId, D> Registry<I, D> {
    fn from_parts(defs: Vec<D>, by_name: HashMap<String, I>) -> Self {
        Self { defs, by_name }
    }

    /// Look up a definition by id.
    #[must_use]
    pub fn get(&self, id: I) -> Option<&D> {
        self.defs.get(id.index())
    }

    /// Resolve a name to an id.
    #[must_use]
    pub fn id_of(&self, name: &str) -> Option<I> {
        self.by_name.get(name).copied()
    }

    /// Look up a definition by name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&D> {
        self.id_of(name).and_then(|id| self.get(id))
    }

    /// Iterate `(id, definition)` pairs in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (I, &D)> {
        self.defs
            .iter()
            .enumerate()
            .map(|(i, def)| (I::from_index(i), def))
    }

    /// Iterate ids in definition order.
    pub fn ids(&self) -> impl Iterator<Item = I> {
        (0..self.defs.len()).map(I::from_index)
    }

    /// Number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Check if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

/// Resolved resource definition.
#[derive(Debug, Clone)]
pub struct ResourceDef {
    /// Display name.
    pub name: String,
    /// Flavor text.
    pub description: String,
}

/// Resolved building definition.
#[derive(Debug, Clone)]
pub struct BuildingDef {
    /// Display name.
    pub name: String,
    /// Category.
    pub category: String,
    /// Flavor text.
    pub description: String,
    /// Cost multiplier per owned unit.
    pub cost_scaling: Fixed,
    /// Cost of the first unit.
    pub base_cost: ResourceAmounts,
    /// Per-unit production per tick.
    pub production: ResourceAmounts,
    /// Per-unit upkeep per tick.
    pub upkeep: ResourceAmounts,
    /// Per-active-unit storage contribution.
    pub storage: ResourceAmounts,
    /// Whether the active count can be lowered by the player.
    pub can_deactivate: bool,
}

/// Resolved manual command definition.
#[derive(Debug, Clone)]
pub struct CommandDef {
    /// Display name.
    pub name: String,
    /// Category.
    pub category: String,
    /// Flavor text.
    pub description: String,
    /// Cost per run.
    pub cost: ResourceAmounts,
    /// Production per run.
    pub production: ResourceAmounts,
    /// Ideology score deltas per run.
    pub ideology: Vec<(IdeologyId, Fixed)>,
}

/// Resolved research definition.
#[derive(Debug, Clone)]
pub struct ResearchDef {
    /// Display name.
    pub name: String,
    /// Category.
    pub category: String,
    /// Flavor text.
    pub description: String,
    /// One-time cost.
    pub cost: ResourceAmounts,
    /// Associated ideology, if any.
    pub ideology: Option<IdeologyId>,
    /// Unlocked on purchase.
    pub unlocks: Vec<Unlockable>,
    /// Building cost factors applied while purchased.
    pub cost_modifiers: ResourceAmounts,
}

/// Resolved project definition.
#[derive(Debug, Clone)]
pub struct ProjectDef {
    /// Display name.
    pub name: String,
    /// Category.
    pub category: String,
    /// Flavor text.
    pub description: String,
    /// Progress required for the first completion.
    pub base_cost: Fixed,
    /// Whether the project can complete more than once.
    pub repeatable: bool,
    /// Cost multiplier per completion.
    pub cost_scaling: Fixed,
    /// Progress credited per unit of each accepted resource.
    pub resource_rates: ResourceAmounts,
    /// Unlocked on completion.
    pub unlocks: Vec<Unlockable>,
    /// Associated ideology, if any.
    pub ideology: Option<IdeologyId>,
}

/// Resolved event outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// Set a resource count.
    SetResource(ResourceId, Fixed),
    /// Add a signed amount to a resource count.
    AddResource(ResourceId, Fixed),
    /// Unlock something.
    Unlock(Unlockable),
    /// Keep the event active.
    Defer,
}

/// Resolved event option.
#[derive(Debug, Clone)]
pub struct EventOptionDef {
    /// Option label.
    pub label: String,
    /// Outcomes applied in order.
    pub outcomes: Vec<EventOutcome>,
}

impl EventOptionDef {
    /// Check if choosing this option leaves the event active.
    #[must_use]
    pub fn defers(&self) -> bool {
        self.outcomes.contains(&EventOutcome::Defer)
    }
}

/// Resolved narrative event definition.
#[derive(Debug, Clone)]
pub struct EventDef {
    /// Display name.
    pub name: String,
    /// Tick count at which the event triggers.
    pub ticks_required: u64,
    /// Resource thresholds, carried for presentation only.
    pub resources_required: ResourceAmounts,
    /// Building thresholds, carried for presentation only.
    pub buildings_required: Vec<(BuildingId, u32)>,
    /// Unlocked on trigger.
    pub unlocks: Vec<Unlockable>,
    /// Income applied every tick while ongoing.
    pub income: ResourceAmounts,
    /// Narrative text.
    pub flavor_text: String,
    /// Mechanics summary.
    pub mechanics_text: String,
    /// Options besides the built-in acknowledgement.
    pub options: Vec<EventOptionDef>,
}

impl EventDef {
    /// Find an option by label.
    #[must_use]
    pub fn option(&self, label: &str) -> Option<&EventOptionDef> {
        self.options.iter().find(|o| o.label == label)
    }

    /// Check if the event carries nonzero ongoing income.
    #[must_use]
    pub fn has_income(&self) -> bool {
        self.income.iter().any(|(_, amount)| amount != Fixed::ZERO)
    }
}

/// Resolved ideology definition.
#[derive(Debug, Clone)]
pub struct IdeologyDef {
    /// Display name.
    pub name: String,
    /// Flavor text.
    pub description: String,
}

/// Resolved defender definition.
#[derive(Debug, Clone)]
pub struct DefenderDef {
    /// Display name.
    pub name: String,
    /// Resource holding the defender count.
    pub resource: ResourceId,
    /// Fraction of defenders retained each conflict cycle.
    pub decay_rate: Fixed,
}

/// Resolved adversary definition.
#[derive(Debug, Clone)]
pub struct AdversaryDef {
    /// Display name.
    pub name: String,
    /// Category.
    pub category: String,
    /// Flavor text.
    pub description: String,
    /// Defender this adversary fights.
    pub defender: DefenderId,
    /// Strength at simulation start.
    pub initial_strength: Fixed,
    /// Strength added each conflict cycle.
    pub spawn_rate: Fixed,
    /// Fraction of strength lost each conflict cycle.
    pub decay_rate: Fixed,
    /// Ticks between surges.
    pub surge_interval: u64,
    /// Strength added by the first surge.
    pub first_surge_strength: Fixed,
    /// Surge compounding factor.
    pub surge_scale_factor: Fixed,
}

/// Conversion between ticks and player-facing time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeScale {
    /// Wall-clock interval between driver ticks in milliseconds.
    pub timer_interval_ms: u32,
    /// Driver ticks per player-facing second.
    pub intervals_per_second: u32,
    /// In-game seconds that elapse per tick.
    pub game_seconds_per_tick: u32,
}

impl TimeScale {
    /// Render a tick as in-game time, `Day D HH:MM`.
    #[must_use]
    pub fn timestamp(&self, tick: u64) -> String {
        let seconds = tick.saturating_mul(u64::from(self.game_seconds_per_tick));
        let day = seconds / 86_400 + 1;
        let hours = seconds % 86_400 / 3_600;
        let minutes = seconds % 3_600 / 60;
        format!("Day {day} {hours:02}:{minutes:02}")
    }

    /// Convert a per-tick rate to a per-second rate.
    #[must_use]
    pub fn per_second(&self, per_tick: Fixed) -> Fixed {
        per_tick.saturating_mul_int(i64::from(self.intervals_per_second))
    }
}

/// Resolved global parameters.
#[derive(Debug, Clone)]
pub struct CatalogParams {
    /// Base storage per resource.
    pub starting_storage: ResourceAmounts,
    /// Starting resource counts.
    pub starting_resources: ResourceAmounts,
    /// Starting owned buildings.
    pub starting_buildings: Vec<(BuildingId, u32)>,
    /// Names unlocked at start; unknown names are reported at construction.
    pub starting_unlocks: Vec<String>,
    /// Processor claim of the first program at start.
    pub starting_program_processors: u32,
    /// Resource whose storage is the processor pool.
    pub processor_resource: ResourceId,
    /// Tick to time conversion.
    pub time: TimeScale,
    /// Ticks between program executions.
    pub ticks_per_processor_cycle: u32,
    /// Ticks between conflict resolutions.
    pub ticks_per_conflict_cycle: u32,
    /// Score needed for the first ideology rank.
    pub ideology_base_cost: Fixed,
    /// Growth of the rank threshold per rank.
    pub ideology_scale_factor: Fixed,
    /// Fraction of combatants that fight each cycle.
    pub fight_ratio: Fixed,
    /// Number of automation programs.
    pub max_program_count: usize,
}

/// The complete resolved definition set.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Resources.
    pub resources: Registry<ResourceId, ResourceDef>,
    /// Buildings.
    pub buildings: Registry<BuildingId, BuildingDef>,
    /// Manual commands.
    pub commands: Registry<CommandId, CommandDef>,
    /// Research.
    pub research: Registry<ResearchId, ResearchDef>,
    /// Projects.
    pub projects: Registry<ProjectId, ProjectDef>,
    /// Narrative events.
    pub events: Registry<EventId, EventDef>,
    /// Ideologies.
    pub ideologies: Registry<IdeologyId, IdeologyDef>,
    /// Defenders.
    pub defenders: Registry<DefenderId, DefenderDef>,
    /// Adversaries.
    pub adversaries: Registry<AdversaryId, AdversaryDef>,
    /// Global parameters.
    pub params: CatalogParams,
}

fn index_names<'a, I: DenseId>(names: impl Iterator<Item = &'a str>) -> HashMap<String, I> {
    names
        .enumerate()
        .map(|(i, name)| (name.to_string(), I::from_index(i)))
        .collect()
}

fn to_fixed(owner: &str, field: &str, value: f64) -> Result<Fixed> {
    checked_from_f64(value).ok_or_else(|| GameError::ValueOutOfRange {
        field: format!("{owner}.{field}"),
        value,
    })
}

fn resolve<I: DenseId>(names: &HashMap<String, I>, owner: &str, name: &str) -> Result<I> {
    names.get(name).copied().ok_or_else(|| {
        GameError::InvalidData(vec![format!(
            "'{owner}' references unknown {} '{name}'",
            I::KIND
        )])
    })
}

/// Name tables for every kind, built before any definition is converted.
struct Names {
    resources: HashMap<String, ResourceId>,
    buildings: HashMap<String, BuildingId>,
    commands: HashMap<String, CommandId>,
    research: HashMap<String, ResearchId>,
    projects: HashMap<String, ProjectId>,
    events: HashMap<String, EventId>,
    ideologies: HashMap<String, IdeologyId>,
    defenders: HashMap<String, DefenderId>,
    adversaries: HashMap<String, AdversaryId>,
}

impl Names {
    fn new(data: &GameData) -> Self {
        Self {
            resources: index_names(data.resources.iter().map(|r| r.name.as_str())),
            buildings: index_names(data.buildings.iter().map(|b| b.name.as_str())),
            commands: index_names(data.commands.iter().map(|c| c.name.as_str())),
            research: index_names(data.research.iter().map(|r| r.name.as_str())),
            projects: index_names(data.projects.iter().map(|p| p.name.as_str())),
            events: index_names(data.events.iter().map(|e| e.name.as_str())),
            ideologies: index_names(data.ideologies.iter().map(|i| i.name.as_str())),
            defenders: index_names(data.defenders.iter().map(|d| d.name.as_str())),
            adversaries: index_names(data.adversaries.iter().map(|a| a.name.as_str())),
        }
    }

    /// Search order: commands, buildings, resources, research, projects.
    fn unlockable(&self, name: &str) -> Option<Unlockable> {
        if let Some(id) = self.commands.get(name) {
            return Some(Unlockable::Command(*id));
        }
        if let Some(id) = self.buildings.get(name) {
            return Some(Unlockable::Building(*id));
        }
        if let Some(id) = self.resources.get(name) {
            return Some(Unlockable::Resource(*id));
        }
        if let Some(id) = self.research.get(name) {
            return Some(Unlockable::Research(*id));
        }
        self.projects.get(name).map(|id| Unlockable::Project(*id))
    }

    fn amounts(&self, owner: &str, field: &str, map: &AmountMap) -> Result<ResourceAmounts> {
        map.iter()
            .map(|(name, value)| {
                Ok((
                    resolve(&self.resources, owner, name)?,
                    to_fixed(owner, field, *value)?,
                ))
            })
            .collect::<Result<Vec<_>>>()
            .map(ResourceAmounts::new)
    }

    fn unlock(&self, owner: &str, name: &str) -> Result<Unlockable> {
        self.unlockable(name).ok_or_else(|| {
            GameError::InvalidData(vec![format!("'{owner}' unlocks unknown name '{name}'")])
        })
    }

    fn unlocks(&self, owner: &str, names: &[String]) -> Result<Vec<Unlockable>> {
        names.iter().map(|name| self.unlock(owner, name)).collect()
    }

    fn ideology(&self, owner: &str, name: Option<&String>) -> Result<Option<IdeologyId>> {
        name.map(|n| resolve(&self.ideologies, owner, n)).transpose()
    }

    fn building(&self, data: &BuildingData) -> Result<BuildingDef> {
        let owner = data.name.as_str();
        Ok(BuildingDef {
            name: data.name.clone(),
            category: data.category.clone(),
            description: data.description.clone(),
            cost_scaling: to_fixed(owner, "cost_scaling", data.cost_scaling)?,
            base_cost: self.amounts(owner, "base_cost", &data.base_cost)?,
            production: self.amounts(owner, "production", &data.production)?,
            upkeep: self.amounts(owner, "upkeep", &data.upkeep)?,
            storage: self.amounts(owner, "storage", &data.storage)?,
            can_deactivate: data.can_deactivate,
        })
    }

    fn command(&self, data: &CommandData) -> Result<CommandDef> {
        let owner = data.name.as_str();
        let ideology = data
            .ideology
            .iter()
            .map(|(name, delta)| {
                Ok((
                    resolve(&self.ideologies, owner, name)?,
                    to_fixed(owner, "ideology", *delta)?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(CommandDef {
            name: data.name.clone(),
            category: data.category.clone(),
            description: data.description.clone(),
            cost: self.amounts(owner, "cost", &data.cost)?,
            production: self.amounts(owner, "production", &data.production)?,
            ideology,
        })
    }

    fn research(&self, data: &ResearchData) -> Result<ResearchDef> {
        let owner = data.name.as_str();
        Ok(ResearchDef {
            name: data.name.clone(),
            category: data.category.clone(),
            description: data.description.clone(),
            cost: self.amounts(owner, "cost", &data.cost)?,
            ideology: self.ideology(owner, data.ideology.as_ref())?,
            unlocks: self.unlocks(owner, &data.unlocks)?,
            cost_modifiers: self.amounts(owner, "cost_modifiers", &data.cost_modifiers)?,
        })
    }

    fn project(&self, data: &ProjectData) -> Result<ProjectDef> {
        let owner = data.name.as_str();
        Ok(ProjectDef {
            name: data.name.clone(),
            category: data.category.clone(),
            description: data.description.clone(),
            base_cost: to_fixed(owner, "base_cost", data.base_cost)?,
            repeatable: data.repeatable,
            cost_scaling: to_fixed(owner, "cost_scaling", data.cost_scaling)?,
            resource_rates: self.amounts(owner, "resource_rates", &data.resource_rates)?,
            unlocks: self.unlocks(owner, &data.unlocks)?,
            ideology: self.ideology(owner, data.ideology.as_ref())?,
        })
    }

    fn event(&self, data: &EventData) -> Result<EventDef> {
        let owner = data.name.as_str();
        let buildings_required = data
            .buildings_required
            .iter()
            .map(|(name, count)| Ok((resolve(&self.buildings, owner, name)?, *count)))
            .collect::<Result<Vec<_>>>()?;
        let options = data
            .options
            .iter()
            .map(|option| {
                let outcomes = option
                    .outcomes
                    .iter()
                    .map(|outcome| {
                        Ok(match outcome {
                            EventOutcomeData::SetResource { resource, amount } => {
                                EventOutcome::SetResource(
                                    resolve(&self.resources, owner, resource)?,
                                    to_fixed(owner, "outcome", *amount)?,
                                )
                            }
                            EventOutcomeData::AddResource { resource, amount } => {
                                EventOutcome::AddResource(
                                    resolve(&self.resources, owner, resource)?,
                                    to_fixed(owner, "outcome", *amount)?,
                                )
                            }
                            EventOutcomeData::Unlock(name) => {
                                EventOutcome::Unlock(self.unlock(owner, name)?)
                            }
                            EventOutcomeData::Defer => EventOutcome::Defer,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(EventOptionDef {
                    label: option.label.clone(),
                    outcomes,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(EventDef {
            name: data.name.clone(),
            ticks_required: data.ticks_required,
            resources_required: self.amounts(owner, "resources_required", &data.resources_required)?,
            buildings_required,
            unlocks: self.unlocks(owner, &data.unlocks)?,
            income: self.amounts(owner, "income", &data.income)?,
            flavor_text: data.flavor_text.clone(),
            mechanics_text: data.mechanics_text.clone(),
            options,
        })
    }

    fn adversary(&self, data: &AdversaryData) -> Result<AdversaryDef> {
        let owner = data.name.as_str();
        Ok(AdversaryDef {
            name: data.name.clone(),
            category: data.category.clone(),
            description: data.description.clone(),
            defender: resolve(&self.defenders, owner, &data.defender)?,
            initial_strength: to_fixed(owner, "initial_strength", data.initial_strength)?,
            spawn_rate: to_fixed(owner, "spawn_rate", data.spawn_rate)?,
            decay_rate: to_fixed(owner, "decay_rate", data.decay_rate)?,
            surge_interval: data.surge_interval,
            first_surge_strength: to_fixed(owner, "first_surge_strength", data.first_surge_strength)?,
            surge_scale_factor: to_fixed(owner, "surge_scale_factor", data.surge_scale_factor)?,
        })
    }

    fn params(&self, params: &GameParams) -> Result<CatalogParams> {
        let owner = "params";
        let starting_buildings = params
            .starting_buildings
            .iter()
            .map(|(name, count)| Ok((resolve(&self.buildings, owner, name)?, *count)))
            .collect::<Result<Vec<_>>>()?;

        // Rounding to fixed-point can collapse a valid f64 scale onto 1.
        let ideology_base_cost = to_fixed(owner, "ideology_base_cost", params.ideology_base_cost)?;
        let ideology_scale_factor =
            to_fixed(owner, "ideology_scale_factor", params.ideology_scale_factor)?;
        let mut errors = Vec::new();
        if ideology_scale_factor <= Fixed::ONE {
            errors.push(format!(
                "ideology_scale_factor {} is not greater than 1 in fixed-point",
                params.ideology_scale_factor
            ));
        }
        if ideology_base_cost <= Fixed::ZERO {
            errors.push(format!(
                "ideology_base_cost {} is not positive in fixed-point",
                params.ideology_base_cost
            ));
        }
        if !errors.is_empty() {
            return Err(GameError::InvalidData(errors));
        }

        Ok(CatalogParams {
            starting_storage: self.amounts(owner, "starting_storage", &params.starting_storage)?,
            starting_resources: self.amounts(owner, "starting_resources", &params.starting_resources)?,
            starting_buildings,
            starting_unlocks: params.starting_unlocks.clone(),
            starting_program_processors: params.starting_program_processors,
            processor_resource: resolve(&self.resources, owner, &params.processor_resource)?,
            time: TimeScale {
                timer_interval_ms: params.timer_interval_ms,
                intervals_per_second: params.intervals_per_second,
                game_seconds_per_tick: params.game_seconds_per_tick,
            },
            ticks_per_processor_cycle: params.ticks_per_processor_cycle,
            ticks_per_conflict_cycle: params.ticks_per_conflict_cycle,
            ideology_base_cost,
            ideology_scale_factor,
            fight_ratio: to_fixed(owner, "fight_ratio", params.fight_ratio)?,
            max_program_count: params.max_program_count,
        })
    }
}

impl Catalog {
    /// Validate and resolve a data set.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidData`] listing every validation problem,
    /// or [`GameError::ValueOutOfRange`] for a number that does not fit the
    /// fixed-point range.
    pub fn from_data(data: GameData) -> Result<Self> {
        let errors = data.validate();
        if !errors.is_empty() {
            return Err(GameError::InvalidData(errors));
        }

        let names = Names::new(&data);

        let resources = data
            .resources
            .iter()
            .map(|r| ResourceDef {
                name: r.name.clone(),
                description: r.description.clone(),
            })
            .collect();
        let buildings = data
            .buildings
            .iter()
            .map(|b| names.building(b))
            .collect::<Result<Vec<_>>>()?;
        let commands = data
            .commands
            .iter()
            .map(|c| names.command(c))
            .collect::<Result<Vec<_>>>()?;
        let research = data
            .research
            .iter()
            .map(|r| names.research(r))
            .collect::<Result<Vec<_>>>()?;
        let projects = data
            .projects
            .iter()
            .map(|p| names.project(p))
            .collect::<Result<Vec<_>>>()?;
        let events = data
            .events
            .iter()
            .map(|e| names.event(e))
            .collect::<Result<Vec<_>>>()?;
        let ideologies = data
            .ideologies
            .iter()
            .map(|i| IdeologyDef {
                name: i.name.clone(),
                description: i.description.clone(),
            })
            .collect();
        let defenders = data
            .defenders
            .iter()
            .map(|d| {
                Ok(DefenderDef {
                    name: d.name.clone(),
                    resource: resolve(&names.resources, &d.name, &d.resource)?,
                    decay_rate: to_fixed(&d.name, "decay_rate", d.decay_rate)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let adversaries = data
            .adversaries
            .iter()
            .map(|a| names.adversary(a))
            .collect::<Result<Vec<_>>>()?;
        let params = names.params(&data.params)?;

        Ok(Self {
            resources: Registry::from_parts(resources, names.resources),
            buildings: Registry::from_parts(buildings, names.buildings),
            commands: Registry::from_parts(commands, names.commands),
            research: Registry::from_parts(research, names.research),
            projects: Registry::from_parts(projects, names.projects),
            events: Registry::from_parts(events, names.events),
            ideologies: Registry::from_parts(ideologies, names.ideologies),
            defenders: Registry::from_parts(defenders, names.defenders),
            adversaries: Registry::from_parts(adversaries, names.adversaries),
            params,
        })
    }

    /// Resolve a resource name.
    #[must_use]
    pub fn resource_id(&self, name: &str) -> Option<ResourceId> {
        self.resources.id_of(name)
    }

    /// Resolve a building name.
    #[must_use]
    pub fn building_id(&self, name: &str) -> Option<BuildingId> {
        self.buildings.id_of(name)
    }

    /// Resolve a command name.
    #[must_use]
    pub fn command_id(&self, name: &str) -> Option<CommandId> {
        self.commands.id_of(name)
    }

    /// Resolve a research name.
    #[must_use]
    pub fn research_id(&self, name: &str) -> Option<ResearchId> {
        self.research.id_of(name)
    }

    /// Resolve a project name.
    #[must_use]
    pub fn project_id(&self, name: &str) -> Option<ProjectId> {
        self.projects.id_of(name)
    }

    /// Resolve an event name.
    #[must_use]
    pub fn event_id(&self, name: &str) -> Option<EventId> {
        self.events.id_of(name)
    }

    /// Resolve an ideology name.
    #[must_use]
    pub fn ideology_id(&self, name: &str) -> Option<IdeologyId> {
        self.ideologies.id_of(name)
    }

    /// Resolve a name to an unlockable entry.
    ///
    /// Searches commands, buildings, resources, research and projects, in
    /// that order; the first match wins.
    #[must_use]
    pub fn unlockable(&self, name: &str) -> Option<Unlockable> {
        if let Some(id) = self.command_id(name) {
            return Some(Unlockable::Command(id));
        }
        if let Some(id) = self.building_id(name) {
            return Some(Unlockable::Building(id));
        }
        if let Some(id) = self.resource_id(name) {
            return Some(Unlockable::Resource(id));
        }
        if let Some(id) = self.research_id(name) {
            return Some(Unlockable::Research(id));
        }
        self.project_id(name).map(Unlockable::Project)
    }

    /// Display name of an unlockable entry.
    #[must_use]
    pub fn unlockable_name(&self, unlock: Unlockable) -> Option<&str> {
        match unlock {
            Unlockable::Command(id) => self.commands.get(id).map(|d| d.name.as_str()),
            Unlockable::Building(id) => self.buildings.get(id).map(|d| d.name.as_str()),
            Unlockable::Resource(id) => self.resources.get(id).map(|d| d.name.as_str()),
            Unlockable::Research(id) => self.research.get(id).map(|d| d.name.as_str()),
            Unlockable::Project(id) => self.projects.get(id).map(|d| d.name.as_str()),
        }
    }
}
