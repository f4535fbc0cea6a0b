//! Headless runner implementation.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use regolith_core::catalog::Catalog;
use regolith_core::data::ACKNOWLEDGE_OPTION;
use regolith_core::error::ActionError;
use regolith_core::ids::EventId;
use regolith_core::math::{checked_from_f64, Fixed};
use regolith_core::simulation::Simulation;

use crate::protocol::{
    AdversaryReport, BuildingReport, Command, IdeologyReport, ProgramEntryReport, ProgramReport,
    ResourceReport, Response, StateReport,
};

fn resolve<I>(found: Option<I>, name: &str) -> Result<I, ActionError> {
    found.ok_or_else(|| ActionError::UnknownName(name.to_string()))
}

fn to_f64(value: Fixed) -> f64 {
    value.to_num::<f64>()
}

/// Drives one simulation from protocol commands.
pub struct HeadlessRunner {
    sim: Simulation,
}

impl HeadlessRunner {
    /// Start a fresh simulation over a catalog.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self::from_simulation(Simulation::new(catalog))
    }

    /// Drive an existing simulation.
    pub fn from_simulation(sim: Simulation) -> Self {
        Self { sim }
    }

    /// The driven simulation.
    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    /// Serve commands until `quit` or end of input.
    ///
    /// Every input line gets exactly one response line. Blank lines are
    /// skipped. Only IO failures end the session early.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        output.write_all(Response::ready(self.sim.tick()).to_json_line().as_bytes())?;
        output.flush()?;

        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let response = match Command::from_json(line) {
                Ok(cmd) => self.handle(cmd),
                Err(e) => {
                    tracing::warn!("Malformed command: {}", e);
                    Response::error(format!("Invalid command: {e}"), None)
                }
            };
            let quit = matches!(response, Response::Bye { .. });

            output.write_all(response.to_json_line().as_bytes())?;
            output.flush()?;
            if quit {
                break;
            }
        }

        tracing::info!("Session ended at tick {}", self.sim.tick());
        Ok(())
    }

    /// Apply one command and build its response.
    pub fn handle(&mut self, cmd: Command) -> Response {
        let name = cmd.name();
        tracing::debug!(cmd = name, "Handling command");

        match self.dispatch(cmd) {
            Ok(Some(response)) => response,
            Ok(None) => Response::ack(name),
            Err(e) => Response::error(e.to_string(), Some(name)),
        }
    }

    fn dispatch(&mut self, cmd: Command) -> Result<Option<Response>, ActionError> {
        let catalog = Arc::clone(self.sim.catalog());
        match cmd {
            Command::Tick { count } => {
                for _ in 0..count {
                    let events = self.sim.advance_tick();
                    for id in events.triggered_events {
                        if let Some(def) = catalog.events.get(id) {
                            tracing::debug!("Event '{}' triggered at tick {}", def.name, self.sim.tick());
                        }
                    }
                }
                return Ok(Some(Response::State(Box::new(self.state_report()))));
            }
            Command::Query => return Ok(Some(Response::State(Box::new(self.state_report())))),
            Command::Hash => {
                return Ok(Some(Response::StateHash {
                    tick: self.sim.tick(),
                    hash: self.sim.state_hash(),
                }))
            }
            Command::Quit => return Ok(Some(Response::Bye { tick: self.sim.tick() })),

            Command::RunCommand { name } => {
                let id = resolve(catalog.command_id(&name), &name)?;
                self.sim.run_command(id)?;
            }
            Command::PurchaseBuilding { name } => {
                let id = resolve(catalog.building_id(&name), &name)?;
                self.sim.purchase_building(id)?;
            }
            Command::PurchaseResearch { name } => {
                let id = resolve(catalog.research_id(&name), &name)?;
                self.sim.purchase_research(id)?;
            }
            Command::SetBuildingActive { name, delta } => {
                let id = resolve(catalog.building_id(&name), &name)?;
                self.sim.set_building_active_delta(id, delta)?;
            }
            Command::RemoveBuilding { name } => {
                let id = resolve(catalog.building_id(&name), &name)?;
                self.sim.remove_building(id)?;
            }
            Command::EventOption { event, option } => {
                let id = resolve(catalog.event_id(&event), &event)?;
                let option = option.as_deref().unwrap_or(ACKNOWLEDGE_OPTION);
                self.sim.process_event_option(id, option)?;
            }
            Command::AppendProgramCommand { program, command } => {
                let id = resolve(catalog.command_id(&command), &command)?;
                self.sim.append_program_command(program, id)?;
            }
            Command::RemoveProgramCommand { program, entry } => {
                self.sim.remove_program_command(program, entry)?;
            }
            Command::MoveProgramCommand { program, from, to } => {
                self.sim.move_program_command(program, from, to)?;
            }
            Command::AdjustRepeat {
                program,
                entry,
                delta,
            } => {
                self.sim.adjust_repeat_target(program, entry, delta)?;
            }
            Command::AdjustProcessors { program, delta } => {
                self.sim.adjust_program_processors(program, delta)?;
            }
            Command::RestartPrograms => self.sim.restart_all_programs(),
            Command::ProjectPayment {
                project,
                resource,
                delta,
            } => {
                let project_id = resolve(catalog.project_id(&project), &project)?;
                let resource_id = resolve(catalog.resource_id(&resource), &resource)?;
                let Some(delta) = checked_from_f64(delta) else {
                    return Ok(Some(Response::error(
                        format!("Payment delta {delta} is outside the representable range"),
                        Some("project_payment"),
                    )));
                };
                self.sim.modify_project_payment(project_id, resource_id, delta)?;
            }
        }
        Ok(None)
    }

    /// Build the player-facing state report.
    ///
    /// Locked resources and buildings are left out.
    pub fn state_report(&self) -> StateReport {
        let catalog = self.sim.catalog();
        let state = self.sim.state();
        let costs = self.sim.cost_model();

        let resources = catalog
            .resources
            .iter()
            .filter_map(|(id, def)| {
                let r = self.sim.resource(id).filter(|r| r.unlocked)?;
                Some(ResourceReport {
                    name: def.name.clone(),
                    count: to_f64(r.count),
                    storage: to_f64(r.storage),
                    income: to_f64(r.income),
                })
            })
            .collect();

        let buildings = catalog
            .buildings
            .iter()
            .filter_map(|(id, def)| {
                let b = self.sim.building(id).filter(|b| b.unlocked)?;
                let next_cost = costs
                    .building_cost(id)
                    .map(|cost| {
                        cost.iter()
                            .filter_map(|(resource, amount)| {
                                let name = &catalog.resources.get(resource)?.name;
                                Some((name.clone(), to_f64(amount)))
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                Some(BuildingReport {
                    name: def.name.clone(),
                    total: b.total,
                    active: b.active,
                    next_cost,
                })
            })
            .collect();

        let event_names = |ids: &[EventId]| -> Vec<String> {
            ids.iter()
                .filter_map(|id| catalog.events.get(*id).map(|d| d.name.clone()))
                .collect()
        };

        let programs = self
            .sim
            .programs()
            .iter()
            .map(|program| ProgramReport {
                processors: program.assigned_processors,
                instruction_pointer: program.instruction_pointer,
                entries: program
                    .entries
                    .iter()
                    .map(|entry| ProgramEntryReport {
                        command: catalog
                            .commands
                            .get(entry.command)
                            .map_or_else(|| entry.command.to_string(), |d| d.name.clone()),
                        count: entry.count,
                        max_count: entry.max_count,
                    })
                    .collect(),
            })
            .collect();

        let ideologies = catalog
            .ideologies
            .iter()
            .zip(&state.ideologies)
            .map(|((_, def), track)| IdeologyReport {
                name: def.name.clone(),
                score: to_f64(track.total_score),
                rank: track.band.rank,
            })
            .collect();

        let adversaries = catalog
            .adversaries
            .iter()
            .zip(&state.adversaries)
            .map(|((_, def), a)| AdversaryReport {
                name: def.name.clone(),
                strength: to_f64(a.strength),
                effectiveness: to_f64(a.effectiveness),
            })
            .collect();

        StateReport {
            tick: state.tick,
            timestamp: catalog.params.time.timestamp(state.tick),
            resources,
            buildings,
            active_events: event_names(self.sim.active_events()),
            ongoing_events: event_names(self.sim.ongoing_events()),
            programs,
            free_processors: self.sim.free_processors(),
            ideologies,
            adversaries,
            hash: self.sim.state_hash(),
        }
    }
}

/// Run `runs` independent simulations for `ticks` ticks each.
///
/// Returns the final state hash of every run; a deterministic simulation
/// yields identical hashes.
pub fn run_determinism_check(catalog: &Arc<Catalog>, ticks: u64, runs: u32) -> Vec<u64> {
    (0..runs)
        .map(|run| {
            let mut sim = Simulation::new(Arc::clone(catalog));
            for _ in 0..ticks {
                sim.advance_tick();
            }
            let hash = sim.state_hash();
            tracing::debug!("Run {} finished with hash {:016x}", run, hash);
            hash
        })
        .collect()
}
