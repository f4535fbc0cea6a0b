//! Core simulation loop.
//!
//! [`Simulation`] owns the mutable [`SimulationState`] and a shared,
//! read-only [`Catalog`]. The driver calls [`Simulation::advance_tick`] once
//! per external clock tick and may call player actions between ticks.
//!
//! # Determinism
//!
//! All operations in this module are fully deterministic:
//! - No floating-point math (uses fixed-point via [`Fixed`])
//! - No randomness and no wall-clock reads
//! - Iteration follows catalog definition order and program order
//! - Same inputs always produce same outputs
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use regolith_core::catalog::Catalog;
//! use regolith_core::data::{GameData, ResourceData};
//! use regolith_core::simulation::Simulation;
//!
//! let data = GameData {
//!     resources: vec![ResourceData {
//!         name: "Processors".to_string(),
//!         description: String::new(),
//!     }],
//!     ..GameData::default()
//! };
//! let mut sim = Simulation::new(Arc::new(Catalog::from_data(data).unwrap()));
//!
//! let events = sim.advance_tick();
//! assert!(events.processor_cycle);
//! assert_eq!(sim.tick(), 1);
//! ```

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::buildings::{production_system, storage_system, BuildingState};
use crate::catalog::{Catalog, EventOutcome};
use crate::conflict::{conflict_system, AdversaryState};
use crate::costs::CostModel;
use crate::data::{GameData, ACKNOWLEDGE_OPTION};
use crate::error::{ActionError, GameError, Result};
use crate::events::{event_income_system, event_trigger_system, EventLedger, EventState};
use crate::ideology::IdeologyTrack;
use crate::ids::{
    AdversaryId, BuildingId, CommandId, DenseId, EventId, IdeologyId, ProjectId, ResearchId,
    ResourceId, Unlockable,
};
use crate::math::Fixed;
use crate::programs::{processor_allocation_system, processor_capacity, CycleTimer, Program};
use crate::projects::{project_payment_system, ProjectState};
use crate::resources::{ResourceLedger, ResourceState};

/// Outcome of a player action.
pub type ActionResult<T = ()> = std::result::Result<T, ActionError>;

fn rejected<T>(error: ActionError) -> ActionResult<T> {
    tracing::debug!(%error, "Action rejected");
    Err(error)
}

fn unknown<I: DenseId>(id: I) -> ActionError {
    ActionError::UnknownId {
        kind: I::KIND,
        id: id.raw(),
    }
}

/// Runtime state of a manual command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommandState {
    /// Whether the command is visible to the player.
    pub unlocked: bool,
}

/// Runtime state of a research item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResearchState {
    /// Research has been bought.
    pub purchased: bool,
    /// Whether the research is visible to the player.
    pub unlocked: bool,
}

/// Coarse markers telling the presentation layer to resynchronize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DirtyFlags {
    /// Event lists changed structurally.
    pub events: bool,
    /// A project completed.
    pub projects: bool,
}

impl DirtyFlags {
    /// Both flags set.
    pub const ALL: Self = Self {
        events: true,
        projects: true,
    };

    /// Both flags cleared.
    pub const CLEAN: Self = Self {
        events: false,
        projects: false,
    };
}

/// Events generated during a simulation tick.
///
/// These can be used by the driver or presentation layer for notifications.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickEvents {
    /// Automation programs executed this tick.
    pub processor_cycle: bool,
    /// Adversaries grew and combat resolved this tick.
    pub conflict_cycle: bool,
    /// Events that triggered.
    pub triggered_events: Vec<EventId>,
    /// Projects that completed.
    pub completed_projects: Vec<ProjectId>,
    /// Adversaries that surged.
    pub surged_adversaries: Vec<AdversaryId>,
    /// Buildings with units that could not pay upkeep, and how many.
    pub starved_buildings: Vec<(BuildingId, u32)>,
}

/// Every mutable entity of a running game.
///
/// Vectors are indexed by the matching catalog id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimulationState {
    /// Ticks advanced so far.
    pub tick: u64,
    /// Resource counts, storage and income.
    pub resources: ResourceLedger,
    /// Building ownership.
    pub buildings: Vec<BuildingState>,
    /// Command unlock flags.
    pub commands: Vec<CommandState>,
    /// Research flags.
    pub research: Vec<ResearchState>,
    /// Project progress and payments.
    pub projects: Vec<ProjectState>,
    /// Event flags and lists.
    pub events: EventLedger,
    /// Ideology scores.
    pub ideologies: Vec<IdeologyTrack>,
    /// Adversary forces.
    pub adversaries: Vec<AdversaryState>,
    /// Automation programs, in allocation order.
    pub programs: Vec<Program>,
    /// Processors not claimed by any program.
    pub free_processors: u32,
    /// Countdown to the next program execution.
    pub processor_timer: CycleTimer,
    /// Countdown to the next conflict resolution.
    pub conflict_timer: CycleTimer,
    /// Presentation resync markers.
    pub dirty: DirtyFlags,
}

impl SimulationState {
    /// Seed the starting state from a catalog.
    ///
    /// Unlocks, storage and processor allocation are applied by
    /// [`Simulation::new`].
    #[must_use]
    pub fn new(catalog: &Catalog) -> Self {
        let params = &catalog.params;

        let mut resources = ResourceLedger::new(catalog.resources.len());
        for (id, amount) in params.starting_resources.iter() {
            if let Some(r) = resources.get_mut(id) {
                r.count = amount;
            }
        }

        let mut buildings = vec![BuildingState::default(); catalog.buildings.len()];
        for (id, owned) in &params.starting_buildings {
            if let Some(b) = buildings.get_mut(id.index()) {
                *b = BuildingState::with_owned(*owned);
            }
        }

        let mut programs = vec![Program::default(); params.max_program_count];
        if let Some(first) = programs.first_mut() {
            first.assigned_processors = params.starting_program_processors;
        }

        Self {
            tick: 0,
            resources,
            buildings,
            commands: vec![CommandState::default(); catalog.commands.len()],
            research: vec![ResearchState::default(); catalog.research.len()],
            projects: catalog
                .projects
                .iter()
                .map(|(_, def)| ProjectState::from_def(def))
                .collect(),
            events: EventLedger::new(catalog.events.len()),
            ideologies: vec![
                IdeologyTrack::new(params.ideology_base_cost, params.ideology_scale_factor);
                catalog.ideologies.len()
            ],
            adversaries: catalog
                .adversaries
                .iter()
                .map(|(_, def)| AdversaryState::from_def(def))
                .collect(),
            programs,
            free_processors: 0,
            processor_timer: CycleTimer::new(params.ticks_per_processor_cycle),
            conflict_timer: CycleTimer::new(params.ticks_per_conflict_cycle),
            dirty: DirtyFlags::ALL,
        }
    }

    /// Describe every table whose length disagrees with the catalog.
    #[must_use]
    pub fn shape_mismatches(&self, catalog: &Catalog) -> Vec<String> {
        let checks = [
            ("resources", self.resources.len(), catalog.resources.len()),
            ("buildings", self.buildings.len(), catalog.buildings.len()),
            ("commands", self.commands.len(), catalog.commands.len()),
            ("research", self.research.len(), catalog.research.len()),
            ("projects", self.projects.len(), catalog.projects.len()),
            ("events", self.events.states.len(), catalog.events.len()),
            ("ideologies", self.ideologies.len(), catalog.ideologies.len()),
            ("adversaries", self.adversaries.len(), catalog.adversaries.len()),
        ];
        let mut errors: Vec<String> = checks
            .iter()
            .filter(|(_, have, want)| have != want)
            .map(|(table, have, want)| format!("{table}: {have} entries, catalog has {want}"))
            .collect();

        for (id, def) in catalog.projects.iter() {
            if let Some(state) = self.projects.get(id.index()) {
                if state.payments.len() != def.resource_rates.len() {
                    errors.push(format!("project '{}' payment table mismatch", def.name));
                }
            }
        }
        errors
    }

    fn apply_unlock(&mut self, unlock: Unlockable) {
        match unlock {
            Unlockable::Command(id) => {
                if let Some(c) = self.commands.get_mut(id.index()) {
                    c.unlocked = true;
                }
            }
            Unlockable::Building(id) => {
                if let Some(b) = self.buildings.get_mut(id.index()) {
                    b.unlocked = true;
                }
            }
            Unlockable::Resource(id) => {
                if let Some(r) = self.resources.get_mut(id) {
                    r.unlocked = true;
                }
            }
            Unlockable::Research(id) => {
                if let Some(r) = self.research.get_mut(id.index()) {
                    r.unlocked = true;
                }
            }
            Unlockable::Project(id) => {
                if let Some(p) = self.projects.get_mut(id.index()) {
                    p.unlocked = true;
                }
            }
        }
    }

    fn refresh_storage_and_processors(&mut self, catalog: &Catalog) {
        let params = &catalog.params;
        storage_system(catalog, params, &self.buildings, &mut self.resources);
        let capacity = processor_capacity(self.resources.storage(params.processor_resource));
        self.free_processors = processor_allocation_system(&mut self.programs, capacity);
    }

    fn refresh_ideologies(&mut self, catalog: &Catalog) {
        let params = &catalog.params;
        for track in &mut self.ideologies {
            track.refresh(params.ideology_base_cost, params.ideology_scale_factor);
        }
    }

    /// Pay for and apply one command run.
    fn execute_command(&mut self, catalog: &Catalog, id: CommandId) -> ActionResult {
        execute_command(catalog, id, &mut self.resources, &mut self.ideologies)
    }

    fn run_programs(&mut self, catalog: &Catalog) {
        let Self {
            programs,
            resources,
            ideologies,
            ..
        } = self;
        for program in programs.iter_mut() {
            program.step(|command| {
                // Unaffordable runs are silent no-ops inside programs.
                let _ = execute_command(catalog, command, resources, ideologies);
            });
        }
    }

    fn on_project_completed(&mut self, catalog: &Catalog, id: ProjectId) {
        let Some(def) = catalog.projects.get(id) else {
            return;
        };
        let count = self.projects.get(id.index()).map_or(0, |p| p.purchase_count);
        tracing::info!(project = %def.name, completions = count, "Project completed");
        for unlock in &def.unlocks {
            self.apply_unlock(*unlock);
        }
        self.dirty.projects = true;
    }

    fn on_event_triggered(&mut self, catalog: &Catalog, id: EventId) {
        let Some(def) = catalog.events.get(id) else {
            return;
        };
        tracing::info!(
            event = %def.name,
            tick = self.tick,
            ongoing = def.has_income(),
            "Event triggered"
        );
        for unlock in &def.unlocks {
            self.apply_unlock(*unlock);
        }
        self.dirty.events = true;
    }
}

fn execute_command(
    catalog: &Catalog,
    id: CommandId,
    resources: &mut ResourceLedger,
    ideologies: &mut [IdeologyTrack],
) -> ActionResult {
    let def = catalog.commands.get(id).ok_or_else(|| unknown(id))?;
    if !resources.spend(&def.cost) {
        return Err(ActionError::CannotAfford(def.name.clone()));
    }
    for (resource, amount) in def.production.iter() {
        resources.add_clamped(resource, amount);
    }
    let params = &catalog.params;
    for (ideology, delta) in &def.ideology {
        if let Some(track) = ideologies.get_mut(ideology.index()) {
            track.add(*delta);
            track.refresh(params.ideology_base_cost, params.ideology_scale_factor);
        }
    }
    Ok(())
}

/// The core game simulation.
///
/// This struct owns all game state and provides methods to advance the
/// simulation deterministically. Systems run in a fixed order each tick.
///
/// # System Execution Order
///
/// Each tick, systems run in this order:
/// 1. **Storage** - Recompute storage caps from active buildings
/// 2. **Allocation** - Distribute processors across programs
/// 3. **Production** - Reset income, apply ongoing events, buildings and upkeep
/// 4. **Projects** - Drain payments, complete funded projects
/// 5. **Programs** - On processor cycles, execute one instruction per program
/// 6. **Conflict** - On conflict cycles, grow adversaries and resolve combat
/// 7. **Clamp** - Limit every count to `[0, storage]`
/// 8. **Events** - Increment the tick counter, trigger due events
/// 9. **Ideology** - Refresh ranks from scores
#[derive(Debug, Clone)]
pub struct Simulation {
    catalog: Arc<Catalog>,
    state: SimulationState,
}

impl Simulation {
    /// Create a simulation at tick 0 from a catalog.
    ///
    /// Starting unlocks are applied (unknown names are logged and skipped),
    /// storage and processor allocation are computed, and counts are clamped
    /// to storage. No tick is advanced.
    #[must_use]
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let state = SimulationState::new(&catalog);
        let mut sim = Self {
            catalog: Arc::clone(&catalog),
            state,
        };
        for name in &catalog.params.starting_unlocks {
            let _ = sim.unlock(name);
        }
        sim.state.refresh_storage_and_processors(&catalog);
        sim.state.resources.clamp_to_storage();
        sim
    }

    /// Validate data, build a catalog and create a simulation.
    ///
    /// # Errors
    ///
    /// Returns an error if the data fails validation.
    pub fn from_data(data: GameData) -> Result<Self> {
        Ok(Self::new(Arc::new(Catalog::from_data(data)?)))
    }

    /// Resume from a state snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidState`] if the snapshot's tables do not
    /// match the catalog.
    pub fn restore(catalog: Arc<Catalog>, state: SimulationState) -> Result<Self> {
        let mismatches = state.shape_mismatches(&catalog);
        if !mismatches.is_empty() {
            return Err(GameError::InvalidState(mismatches.join("; ")));
        }
        Ok(Self { catalog, state })
    }

    /// Shared catalog.
    #[must_use]
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Full state snapshot.
    #[must_use]
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Ticks advanced so far.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.state.tick
    }

    /// Cost model over the current state.
    #[must_use]
    pub fn cost_model(&self) -> CostModel<'_> {
        CostModel::new(&self.catalog, &self.state)
    }

    /// Advance the simulation by one tick.
    ///
    /// Runs all systems in deterministic order (see [`Simulation`]) and
    /// returns what happened.
    pub fn advance_tick(&mut self) -> TickEvents {
        let catalog = Arc::clone(&self.catalog);
        let state = &mut self.state;
        let mut events = TickEvents::default();

        // 1-2. Storage and processor allocation
        state.refresh_storage_and_processors(&catalog);

        // 3. Income, ongoing events, buildings
        state.resources.reset_income();
        event_income_system(&catalog, &state.events, &mut state.resources);
        events.starved_buildings =
            production_system(&catalog, &state.buildings, &mut state.resources);

        // 4. Projects
        events.completed_projects =
            project_payment_system(&catalog, &mut state.projects, &mut state.resources);
        for id in &events.completed_projects {
            state.on_project_completed(&catalog, *id);
        }

        // 5. Programs
        if state.processor_timer.tick() {
            events.processor_cycle = true;
            state.run_programs(&catalog);
        }

        // 6. Conflict
        if state.conflict_timer.tick() {
            events.conflict_cycle = true;
            events.surged_adversaries =
                conflict_system(&catalog, &mut state.adversaries, &mut state.resources);
        }

        // 7. Storage is a hard ceiling
        state.resources.clamp_to_storage();

        // 8. Events see the new tick count
        state.tick += 1;
        events.triggered_events = event_trigger_system(&catalog, &mut state.events, state.tick);
        for id in &events.triggered_events {
            state.on_event_triggered(&catalog, *id);
        }

        // 9. Ideology ranks
        state.refresh_ideologies(&catalog);

        #[cfg(debug_assertions)]
        {
            let hash = self.state_hash();
            tracing::debug!(tick = self.state.tick, state_hash = hash, "Simulation state hash");
        }

        #[cfg(feature = "debug-validation")]
        {
            let violations = crate::invariants::check_invariants(&self.catalog, &self.state);
            assert!(
                violations.is_empty(),
                "Invariant violations after tick {}: {:?}",
                self.state.tick,
                violations
            );
        }

        events
    }

    // ========================================================================
    // Player actions
    // ========================================================================

    /// Run a command once if affordable.
    ///
    /// Production is clamped to storage immediately and the command's
    /// ideology deltas are applied.
    pub fn run_command(&mut self, id: CommandId) -> ActionResult {
        let catalog = Arc::clone(&self.catalog);
        match self.state.execute_command(&catalog, id) {
            Ok(()) => Ok(()),
            Err(error) => rejected(error),
        }
    }

    /// Buy one unit of a building.
    pub fn purchase_building(&mut self, id: BuildingId) -> ActionResult {
        let catalog = Arc::clone(&self.catalog);
        let Some(def) = catalog.buildings.get(id) else {
            return rejected(unknown(id));
        };
        let Some(cost) = self.cost_model().building_cost(id) else {
            return rejected(unknown(id));
        };
        if !self.state.resources.spend(&cost) {
            return rejected(ActionError::CannotAfford(def.name.clone()));
        }
        if let Some(b) = self.state.buildings.get_mut(id.index()) {
            b.add_unit();
        }
        self.state.refresh_storage_and_processors(&catalog);
        Ok(())
    }

    /// Buy a research item and apply its unlocks.
    pub fn purchase_research(&mut self, id: ResearchId) -> ActionResult {
        let catalog = Arc::clone(&self.catalog);
        let Some(def) = catalog.research.get(id) else {
            return rejected(unknown(id));
        };
        if self.is_research_purchased(id) {
            return rejected(ActionError::AlreadyPurchased(def.name.clone()));
        }
        let Some(cost) = self.cost_model().research_cost(id) else {
            return rejected(unknown(id));
        };
        if !self.state.resources.spend(&cost) {
            return rejected(ActionError::CannotAfford(def.name.clone()));
        }
        if let Some(r) = self.state.research.get_mut(id.index()) {
            r.purchased = true;
        }
        for unlock in &def.unlocks {
            self.state.apply_unlock(*unlock);
        }
        self.state.refresh_storage_and_processors(&catalog);
        Ok(())
    }

    /// Shift a building's active count, clamped to `[0, total]`.
    pub fn set_building_active_delta(&mut self, id: BuildingId, delta: i64) -> ActionResult {
        let catalog = Arc::clone(&self.catalog);
        let Some(def) = catalog.buildings.get(id) else {
            return rejected(unknown(id));
        };
        if !def.can_deactivate {
            return rejected(ActionError::NotDeactivatable(def.name.clone()));
        }
        if let Some(b) = self.state.buildings.get_mut(id.index()) {
            b.shift_active(delta);
        }
        self.state.refresh_storage_and_processors(&catalog);
        Ok(())
    }

    /// Remove one owned unit of a building.
    pub fn remove_building(&mut self, id: BuildingId) -> ActionResult {
        let catalog = Arc::clone(&self.catalog);
        let Some(def) = catalog.buildings.get(id) else {
            return rejected(unknown(id));
        };
        let removed = self
            .state
            .buildings
            .get_mut(id.index())
            .is_some_and(BuildingState::remove_unit);
        if !removed {
            return rejected(ActionError::NoBuildingsOwned(def.name.clone()));
        }
        self.state.refresh_storage_and_processors(&catalog);
        Ok(())
    }

    /// Resolve an active event with one of its options.
    ///
    /// [`ACKNOWLEDGE_OPTION`] is always accepted. Deferring options leave the
    /// event active; any other option applies its outcomes and completes the
    /// event.
    pub fn process_event_option(&mut self, id: EventId, option: &str) -> ActionResult {
        let catalog = Arc::clone(&self.catalog);
        let Some(def) = catalog.events.get(id) else {
            return rejected(unknown(id));
        };
        let Some(state) = self.state.events.get(id) else {
            return rejected(unknown(id));
        };
        if state.completed {
            return rejected(ActionError::EventCompleted(def.name.clone()));
        }
        if state.ongoing {
            return rejected(ActionError::EventOngoing(def.name.clone()));
        }
        if !self.state.events.is_active(id) {
            return rejected(ActionError::EventNotActive(def.name.clone()));
        }

        if option != ACKNOWLEDGE_OPTION {
            let Some(chosen) = def.option(option) else {
                return rejected(ActionError::InvalidOption {
                    event: def.name.clone(),
                    option: option.to_string(),
                });
            };
            if chosen.defers() {
                return Ok(());
            }
            for outcome in &chosen.outcomes {
                match outcome {
                    EventOutcome::SetResource(resource, amount) => {
                        self.state.resources.set_clamped(*resource, *amount);
                    }
                    EventOutcome::AddResource(resource, amount) => {
                        self.state.resources.add_clamped(*resource, *amount);
                    }
                    EventOutcome::Unlock(unlock) => self.state.apply_unlock(*unlock),
                    EventOutcome::Defer => {}
                }
            }
        }

        self.state.events.complete(id);
        self.state.dirty.events = true;
        Ok(())
    }

    /// Record that the presentation layer has shown an event.
    pub fn mark_event_displayed(&mut self, id: EventId) -> ActionResult {
        match self.state.events.get_mut(id) {
            Some(state) => {
                state.displayed = true;
                Ok(())
            }
            None => rejected(unknown(id)),
        }
    }

    /// Unlock a command, building, resource, research or project by name.
    ///
    /// Names are searched in that order.
    pub fn unlock(&mut self, name: &str) -> ActionResult<Unlockable> {
        let Some(unlock) = self.catalog.unlockable(name) else {
            tracing::warn!(name, "Unlock target not found");
            return Err(ActionError::UnknownName(name.to_string()));
        };
        self.state.apply_unlock(unlock);
        Ok(unlock)
    }

    /// Change a project's drain rate for one resource, clamped to zero.
    pub fn modify_project_payment(
        &mut self,
        project: ProjectId,
        resource: ResourceId,
        delta: Fixed,
    ) -> ActionResult {
        let catalog = Arc::clone(&self.catalog);
        let Some(def) = catalog.projects.get(project) else {
            return rejected(unknown(project));
        };
        let Some(state) = self.state.projects.get_mut(project.index()) else {
            return rejected(unknown(project));
        };
        if state.is_finished(def) {
            return rejected(ActionError::ProjectFinished(def.name.clone()));
        }
        let Some(slot) = def
            .resource_rates
            .position(resource)
            .and_then(|i| state.payments.get_mut(i))
        else {
            let resource_name = catalog
                .resources
                .get(resource)
                .map_or_else(|| resource.to_string(), |r| r.name.clone());
            return rejected(ActionError::ResourceNotAccepted {
                project: def.name.clone(),
                resource: resource_name,
            });
        };
        *slot = slot.saturating_add(delta).max(Fixed::ZERO);
        Ok(())
    }

    // ========================================================================
    // Program editing
    // ========================================================================

    fn program_mut(&mut self, program: usize) -> ActionResult<&mut Program> {
        self.state
            .programs
            .get_mut(program)
            .ok_or(ActionError::ProgramOutOfRange(program))
    }

    /// Append a command to a program. Restarts that program.
    pub fn append_program_command(&mut self, program: usize, command: CommandId) -> ActionResult {
        if self.catalog.commands.get(command).is_none() {
            return rejected(unknown(command));
        }
        match self.program_mut(program) {
            Ok(p) => {
                p.append(command);
                Ok(())
            }
            Err(error) => rejected(error),
        }
    }

    /// Remove an entry from a program. Restarts that program.
    pub fn remove_program_command(&mut self, program: usize, entry: usize) -> ActionResult {
        match self.program_mut(program).and_then(|p| p.remove(program, entry)) {
            Ok(_) => Ok(()),
            Err(error) => rejected(error),
        }
    }

    /// Move an entry within a program. Restarts that program.
    pub fn move_program_command(&mut self, program: usize, from: usize, to: usize) -> ActionResult {
        match self
            .program_mut(program)
            .and_then(|p| p.move_entry(program, from, to))
        {
            Ok(()) => Ok(()),
            Err(error) => rejected(error),
        }
    }

    /// Shift an entry's repeat target, keeping it at least 1.
    pub fn adjust_repeat_target(&mut self, program: usize, entry: usize, delta: i64) -> ActionResult {
        match self
            .program_mut(program)
            .and_then(|p| p.adjust_repeat(program, entry, delta))
        {
            Ok(()) => Ok(()),
            Err(error) => rejected(error),
        }
    }

    /// Shift a program's processor claim, clamped to `[0, current + free]`.
    pub fn adjust_program_processors(&mut self, program: usize, delta: i64) -> ActionResult {
        let catalog = Arc::clone(&self.catalog);
        let free = self.state.free_processors;
        let p = match self.program_mut(program) {
            Ok(p) => p,
            Err(error) => return rejected(error),
        };
        let current = p.assigned_processors;
        let ceiling = i64::from(current) + i64::from(free);
        let target = i64::from(current).saturating_add(delta).clamp(0, ceiling);
        p.assigned_processors = u32::try_from(target).unwrap_or(current);
        self.state.refresh_storage_and_processors(&catalog);
        Ok(())
    }

    /// Restart every program from its first instruction.
    pub fn restart_all_programs(&mut self) {
        for program in &mut self.state.programs {
            program.restart();
        }
    }

    // ========================================================================
    // Presentation support
    // ========================================================================

    /// Return the dirty flags and clear them.
    pub fn take_dirty_flags(&mut self) -> DirtyFlags {
        std::mem::replace(&mut self.state.dirty, DirtyFlags::CLEAN)
    }

    /// Calculate a hash of the current simulation state.
    ///
    /// Two simulations with identical state produce identical hashes.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.state.hash(&mut hasher);
        hasher.finish()
    }

    // ========================================================================
    // Read-only accessors
    // ========================================================================

    /// Resource state.
    #[must_use]
    pub fn resource(&self, id: ResourceId) -> Option<&ResourceState> {
        self.state.resources.get(id)
    }

    /// Building state.
    #[must_use]
    pub fn building(&self, id: BuildingId) -> Option<&BuildingState> {
        self.state.buildings.get(id.index())
    }

    /// Command state.
    #[must_use]
    pub fn command(&self, id: CommandId) -> Option<&CommandState> {
        self.state.commands.get(id.index())
    }

    /// Research state.
    #[must_use]
    pub fn research(&self, id: ResearchId) -> Option<&ResearchState> {
        self.state.research.get(id.index())
    }

    /// Check whether a research item was bought.
    #[must_use]
    pub fn is_research_purchased(&self, id: ResearchId) -> bool {
        self.research(id).is_some_and(|r| r.purchased)
    }

    /// Project state.
    #[must_use]
    pub fn project(&self, id: ProjectId) -> Option<&ProjectState> {
        self.state.projects.get(id.index())
    }

    /// Event state.
    #[must_use]
    pub fn event(&self, id: EventId) -> Option<&EventState> {
        self.state.events.get(id)
    }

    /// Triggered events awaiting acknowledgement, most recent first.
    #[must_use]
    pub fn active_events(&self) -> &[EventId] {
        &self.state.events.active
    }

    /// Events with ongoing income, most recent first.
    #[must_use]
    pub fn ongoing_events(&self) -> &[EventId] {
        &self.state.events.ongoing
    }

    /// In-game time at which an event triggered.
    #[must_use]
    pub fn event_timestamp(&self, id: EventId) -> Option<String> {
        let tick = self.event(id)?.triggered_tick?;
        Some(self.catalog.params.time.timestamp(tick))
    }

    /// Ideology track.
    #[must_use]
    pub fn ideology(&self, id: IdeologyId) -> Option<&IdeologyTrack> {
        self.state.ideologies.get(id.index())
    }

    /// Adversary state.
    #[must_use]
    pub fn adversary(&self, id: AdversaryId) -> Option<&AdversaryState> {
        self.state.adversaries.get(id.index())
    }

    /// Program by index.
    #[must_use]
    pub fn program(&self, index: usize) -> Option<&Program> {
        self.state.programs.get(index)
    }

    /// All programs in allocation order.
    #[must_use]
    pub fn programs(&self) -> &[Program] {
        &self.state.programs
    }

    /// Processors not claimed by any program.
    #[must_use]
    pub const fn free_processors(&self) -> u32 {
        self.state.free_processors
    }
}
