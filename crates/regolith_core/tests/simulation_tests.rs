//! Simulation tests that verify the economic invariants end to end.
//!
//! Each test builds a simulation from the shipped data set, adjusted where a
//! scenario needs a specific starting position.

use std::collections::BTreeMap;

use proptest::prelude::*;
use regolith_core::conflict::resolve_combat;
use regolith_core::costs::scaled_cost;
use regolith_core::data::GameData;
use regolith_core::error::ActionError;
use regolith_core::ideology::rank_band;
use regolith_core::invariants::check_invariants;
use regolith_core::math::{pow_saturating, Fixed};
use regolith_core::programs::{processor_allocation_system, Program};
use regolith_test_utils::determinism::{apply_action, strategies::arb_action_script, PlayerAction};
use regolith_test_utils::fixtures::{
    fixed, fixed_f, run_ticks, simulation_from, standard_game_data, standard_simulation,
};

fn with_buildings(mut data: GameData, buildings: &[(&str, u32)]) -> GameData {
    data.params.starting_buildings = buildings
        .iter()
        .map(|(name, count)| ((*name).to_string(), *count))
        .collect::<BTreeMap<_, _>>();
    data
}

// =============================================================================
// Storage
// =============================================================================

#[test]
fn test_overflow_is_lost_at_storage_cap() {
    let mut data = with_buildings(standard_game_data(), &[("Solar Panels", 50)]);
    data.params.starting_resources.insert("Energy".to_string(), 95.0);
    let mut sim = simulation_from(data);
    let energy = sim.catalog().resource_id("Energy").unwrap();

    sim.advance_tick();

    let r = sim.resource(energy).unwrap();
    assert_eq!(r.storage, fixed(100));
    assert_eq!(r.count, fixed(100));
    assert_eq!(r.income, fixed(50));
}

#[test]
fn test_storage_follows_active_buildings() {
    let mut sim = standard_simulation();
    let catalog = sim.catalog().clone();
    let credits = catalog.resource_id("Credits").unwrap();
    let facility = catalog.building_id("Storage Facility").unwrap();

    // Base 1000 plus one starting facility.
    assert_eq!(sim.resource(credits).unwrap().storage, fixed(1500));
    sim.remove_building(facility).unwrap();
    assert_eq!(sim.resource(credits).unwrap().storage, fixed(1000));
    assert_eq!(sim.resource(credits).unwrap().count, fixed(500));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_counts_never_exceed_storage(script in arb_action_script(150)) {
        let mut sim = standard_simulation();
        for action in &script {
            apply_action(&mut sim, action);
            if matches!(action, PlayerAction::Tick) {
                let violations = check_invariants(sim.catalog(), sim.state());
                prop_assert!(violations.is_empty(), "{:?}", violations);
            }
        }
    }
}

// =============================================================================
// Costs
// =============================================================================

#[test]
fn test_building_cost_grows_with_owned_count() {
    let mut sim = standard_simulation();
    let panels = sim.catalog().building_id("Solar Panels").unwrap();
    let credits = sim.catalog().resource_id("Credits").unwrap();

    let mut last = Fixed::ZERO;
    for _ in 0..10 {
        let cost = sim.cost_model().building_cost(panels).unwrap();
        let price = cost.get(credits).unwrap();
        assert!(price >= last, "{price} < {last}");
        last = price;
        sim.purchase_building(panels).unwrap();
    }
    // One starting unit plus ten bought: 10 * 1.15^11 = 46.52
    assert_eq!(sim.cost_model().building_cost(panels).unwrap().get(credits), Some(fixed(46)));
}

#[test]
fn test_research_discount_is_table_driven() {
    let mut data = standard_game_data();
    data.params.starting_resources.insert("Regolith".to_string(), 200.0);
    data.params.starting_storage.insert("Credits".to_string(), 5000.0);
    data.params.starting_resources.insert("Credits".to_string(), 5000.0);
    let mut sim = simulation_from(data);
    let catalog = sim.catalog().clone();
    let drill = catalog.building_id("Ice Drill").unwrap();
    let regolith = catalog.resource_id("Regolith").unwrap();
    let credits = catalog.resource_id("Credits").unwrap();
    let design = catalog.research_id("Efficient Building Design").unwrap();

    assert_eq!(sim.cost_model().building_cost(drill).unwrap().get(regolith), Some(fixed(50)));
    sim.purchase_research(design).unwrap();
    let cost = sim.cost_model().building_cost(drill).unwrap();
    assert_eq!(cost.get(regolith), Some(fixed(45)));
    assert_eq!(cost.get(credits), Some(fixed(80)));
}

#[test]
fn test_research_and_command_costs_are_unscaled() {
    let sim = standard_simulation();
    let catalog = sim.catalog().clone();
    let sell = catalog.command_id("Sell Regolith").unwrap();
    let drones = catalog.research_id("Drone Swarms").unwrap();
    let regolith = catalog.resource_id("Regolith").unwrap();

    assert_eq!(sim.cost_model().command_cost(sell).unwrap().get(regolith), Some(fixed(5)));
    assert_eq!(
        sim.cost_model().research_cost(drones).unwrap().get(regolith),
        Some(fixed(150))
    );
}

proptest! {
    #[test]
    fn prop_cost_non_decreasing_in_count(
        base in 1i32..1000,
        scaling_pct in 100i32..300,
        count in 0u32..30,
    ) {
        let base = fixed(base);
        let scaling = fixed(scaling_pct) / fixed(100);
        let now = scaled_cost(base, scaling, count, Fixed::ONE);
        let next = scaled_cost(base, scaling, count + 1, Fixed::ONE);
        prop_assert!(next >= now, "{} -> {}", now, next);
    }

    #[test]
    fn prop_pow_saturates_instead_of_wrapping(exp in 0u32..200) {
        prop_assert!(pow_saturating(fixed(3), exp) >= Fixed::ONE);
    }
}

// =============================================================================
// Upkeep
// =============================================================================

#[test]
fn test_upkeep_pays_per_unit_without_partial_credit() {
    let mut data = with_buildings(standard_game_data(), &[("Regolith Excavator", 5)]);
    data.params.starting_resources.insert("Energy".to_string(), 3.0);
    let mut sim = simulation_from(data);
    let catalog = sim.catalog().clone();
    let excavator = catalog.building_id("Regolith Excavator").unwrap();
    let energy = catalog.resource_id("Energy").unwrap();
    let regolith = catalog.resource_id("Regolith").unwrap();

    let events = sim.advance_tick();

    assert_eq!(sim.resource(regolith).unwrap().count, fixed(3));
    assert_eq!(sim.resource(energy).unwrap().count, Fixed::ZERO);
    // Upkeep is booked for every active unit, paid or not.
    assert_eq!(sim.resource(energy).unwrap().income, fixed(-5));
    assert_eq!(sim.resource(regolith).unwrap().income, fixed(3));
    assert_eq!(events.starved_buildings, vec![(excavator, 2)]);
}

#[test]
fn test_inactive_buildings_cost_nothing() {
    let mut data = with_buildings(standard_game_data(), &[("Regolith Excavator", 2)]);
    data.params.starting_resources.insert("Energy".to_string(), 10.0);
    let mut sim = simulation_from(data);
    let excavator = sim.catalog().building_id("Regolith Excavator").unwrap();
    let energy = sim.catalog().resource_id("Energy").unwrap();

    sim.set_building_active_delta(excavator, -2).unwrap();
    sim.advance_tick();
    assert_eq!(sim.resource(energy).unwrap().count, fixed(10));
}

#[test]
fn test_storage_buildings_cannot_be_toggled() {
    let mut sim = standard_simulation();
    let facility = sim.catalog().building_id("Storage Facility").unwrap();
    assert_eq!(
        sim.set_building_active_delta(facility, -1),
        Err(ActionError::NotDeactivatable("Storage Facility".to_string()))
    );
}

// =============================================================================
// Programs
// =============================================================================

#[test]
fn test_program_wraps_after_last_instruction() {
    let mut sim = standard_simulation();
    let sell = sim.catalog().command_id("Sell Cloud Compute").unwrap();
    let gather = sim.catalog().command_id("Gather Regolith").unwrap();
    sim.append_program_command(0, sell).unwrap();
    sim.append_program_command(0, gather).unwrap();

    // First processor cycle fires on tick 1.
    sim.advance_tick();
    let program = sim.program(0).unwrap();
    assert_eq!(program.instruction_pointer, 1);

    // Second firing on tick 5 runs off the end.
    run_ticks(&mut sim, 4);
    let program = sim.program(0).unwrap();
    assert_eq!(program.instruction_pointer, 0);
    assert!(program.entries.iter().all(|e| e.count == 0));
}

#[test]
fn test_program_counts_failed_attempts() {
    let mut data = standard_game_data();
    data.params.starting_resources.insert("Credits".to_string(), 0.0);
    let mut sim = simulation_from(data);
    let survey = sim.catalog().command_id("Survey Land").unwrap();
    let land = sim.catalog().resource_id("Land").unwrap();
    sim.append_program_command(0, survey).unwrap();
    sim.adjust_repeat_target(0, 0, 1).unwrap();

    sim.advance_tick();
    assert_eq!(sim.program(0).unwrap().entries[0].count, 1);
    assert_eq!(sim.resource(land).unwrap().count, fixed(100));
}

#[test]
fn test_allocation_is_in_program_order() {
    let mut programs = vec![
        Program {
            assigned_processors: 3,
            ..Program::default()
        },
        Program {
            assigned_processors: 5,
            ..Program::default()
        },
    ];
    let free = processor_allocation_system(&mut programs, 6);
    assert_eq!(programs[0].assigned_processors, 3);
    assert_eq!(programs[1].assigned_processors, 3);
    assert_eq!(free, 0);
}

#[test]
fn test_losing_server_racks_shrinks_claims() {
    let mut data = with_buildings(standard_game_data(), &[("Server Rack", 3), ("Solar Panels", 5)]);
    data.params.starting_resources.insert("Energy".to_string(), 100.0);
    let mut sim = simulation_from(data);
    let rack = sim.catalog().building_id("Server Rack").unwrap();

    sim.adjust_program_processors(0, 3).unwrap();
    assert_eq!(sim.program(0).unwrap().assigned_processors, 4);
    assert_eq!(sim.free_processors(), 0);

    sim.remove_building(rack).unwrap();
    sim.remove_building(rack).unwrap();
    sim.advance_tick();
    assert_eq!(sim.program(0).unwrap().assigned_processors, 2);
}

// =============================================================================
// Conflict
// =============================================================================

proptest! {
    #[test]
    fn prop_combat_never_overkills(
        attackers in 0i32..100_000,
        defenders in 0i32..100_000,
        ratio_pct in 0i32..=100,
    ) {
        let ratio = fixed(ratio_pct) / fixed(100);
        let outcome = resolve_combat(fixed(attackers), fixed(defenders), ratio);
        prop_assert!(outcome.active_fighters <= fixed(attackers).min(fixed(defenders)));
        prop_assert!(outcome.attackers >= Fixed::ZERO);
        prop_assert!(outcome.defenders >= Fixed::ZERO);
        prop_assert!(outcome.effectiveness >= Fixed::ZERO && outcome.effectiveness <= Fixed::ONE);
    }
}

#[test]
fn test_defenders_decay_and_fight() {
    let mut data = standard_game_data();
    data.params.starting_resources.insert("Drones".to_string(), 40.0);
    if let Some(swarm) = data.adversaries.iter_mut().find(|a| a.name == "Scavenger Swarm") {
        swarm.initial_strength = 20.0;
        swarm.spawn_rate = 0.0;
        swarm.decay_rate = 0.0;
    }
    let mut sim = simulation_from(data);
    let catalog = sim.catalog().clone();
    let drones = catalog.resource_id("Drones").unwrap();
    let swarm = catalog.adversaries.id_of("Scavenger Swarm").unwrap();

    let events = sim.advance_tick();
    assert!(events.conflict_cycle);

    // Drones retain 0.95: 40 -> 38. Total 58 * 0.1 = 5.8 fighters.
    let adversary = sim.adversary(swarm).unwrap();
    let expected = fixed(20) - fixed_f(5.8);
    assert!((adversary.strength - expected).abs() < fixed_f(0.001));
    assert!(sim.resource(drones).unwrap().count < fixed(33));
    assert!(adversary.effectiveness > Fixed::ZERO);
}

#[test]
fn test_conflict_runs_every_cycle_length() {
    let mut sim = standard_simulation();
    let mut fired = Vec::new();
    for tick in 1..=45 {
        if sim.advance_tick().conflict_cycle {
            fired.push(tick);
        }
    }
    assert_eq!(fired, vec![1, 21, 41]);
}

// =============================================================================
// Ideology
// =============================================================================

#[test]
fn test_rank_of_350() {
    let band = rank_band(fixed(350), fixed(100), fixed(2));
    assert_eq!(band.rank, 2);
    assert_eq!(band.local_score, fixed(50));
    assert_eq!(band.local_threshold, fixed(400));

    let negative = rank_band(fixed(-350), fixed(100), fixed(2));
    assert_eq!(negative.rank, -2);
    assert_eq!(negative.local_score, fixed(50));
}

proptest! {
    #[test]
    fn prop_rank_decomposes_score(score in -100_000i32..100_000) {
        let base = fixed(100);
        let scale = fixed(2);
        let band = rank_band(fixed(score), base, scale);

        let mut consumed = Fixed::ZERO;
        for rank in 0..band.rank.unsigned_abs() {
            consumed += base * pow_saturating(scale, rank);
        }
        prop_assert_eq!(consumed + band.local_score, fixed(score.abs()));
        prop_assert!(band.local_score < band.local_threshold);
        prop_assert_eq!(band.rank < 0, score < 0 && band.rank != 0);
    }
}

#[test]
fn test_commands_move_ideology() {
    let mut data = standard_game_data();
    data.params.starting_resources.insert("Energy".to_string(), 50.0);
    data.params.starting_resources.insert("Regolith".to_string(), 100.0);
    let mut sim = simulation_from(data);
    let catalog = sim.catalog().clone();
    let turret = catalog.command_id("Build Turret").unwrap();
    let military = catalog.ideology_id("Military").unwrap();

    for _ in 0..5 {
        sim.run_command(turret).unwrap();
    }
    let track = sim.ideology(military).unwrap();
    assert_eq!(track.total_score, fixed(10));
    assert_eq!(track.rank(), 0);
}

// =============================================================================
// Projects
// =============================================================================

#[test]
fn test_project_completion_scales_next_cost() {
    let mut data = standard_game_data();
    if let Some(slam) = data.projects.iter_mut().find(|p| p.name == "Robot Poetry Slam") {
        slam.base_cost = 10.0;
        slam.cost_scaling = 2.0;
        slam.resource_rates = [("Credits".to_string(), 1.0)].into_iter().collect();
    }
    let mut sim = simulation_from(data);
    let catalog = sim.catalog().clone();
    let slam = catalog.project_id("Robot Poetry Slam").unwrap();
    let credits = catalog.resource_id("Credits").unwrap();
    let haiku = catalog.command_id("Write Haiku").unwrap();

    sim.modify_project_payment(slam, credits, fixed(10)).unwrap();
    sim.take_dirty_flags();
    let events = sim.advance_tick();
    assert_eq!(events.completed_projects, vec![slam]);

    let state = sim.project(slam).unwrap();
    assert_eq!(state.purchase_count, 1);
    assert_eq!(state.progress, Fixed::ZERO);
    assert_eq!(sim.cost_model().project_cost(slam), Some(fixed(20)));
    assert!(sim.command(haiku).unwrap().unlocked);
    assert!(sim.take_dirty_flags().projects);
}

#[test]
fn test_project_payment_rejects_unlisted_resource() {
    let mut sim = standard_simulation();
    let slam = sim.catalog().project_id("Robot Poetry Slam").unwrap();
    let ice = sim.catalog().resource_id("Ice").unwrap();
    assert!(matches!(
        sim.modify_project_payment(slam, ice, fixed(1)),
        Err(ActionError::ResourceNotAccepted { .. })
    ));
}

// =============================================================================
// Events
// =============================================================================

#[test]
fn test_event_lifecycle_with_income() {
    let mut data = standard_game_data();
    if let Some(restless) = data.events.iter_mut().find(|e| e.name == "Restless Robots") {
        restless.ticks_required = 5;
    }
    let mut sim = simulation_from(data);
    let restless = sim.catalog().event_id("Restless Robots").unwrap();

    run_ticks(&mut sim, 4);
    assert!(!sim.event(restless).unwrap().triggered);
    assert!(!sim.active_events().contains(&restless));

    sim.advance_tick();
    assert!(sim.event(restless).unwrap().triggered);
    assert!(sim.active_events().contains(&restless));
    assert!(sim.ongoing_events().contains(&restless));

    // Ongoing events offer no options and stay listed.
    assert!(matches!(
        sim.process_event_option(restless, "OK"),
        Err(ActionError::EventOngoing(_))
    ));
    assert!(sim.active_events().contains(&restless));
}

#[test]
fn test_event_acknowledgement_completes() {
    let mut data = standard_game_data();
    if let Some(sale) = data.events.iter_mut().find(|e| e.name == "First Sale") {
        sale.ticks_required = 5;
    }
    let mut sim = simulation_from(data);
    let sale = sim.catalog().event_id("First Sale").unwrap();
    let sell = sim.catalog().command_id("Sell Regolith").unwrap();

    run_ticks(&mut sim, 4);
    assert!(!sim.event(sale).unwrap().triggered);
    let events = sim.advance_tick();
    assert!(events.triggered_events.contains(&sale));
    assert!(sim.command(sell).unwrap().unlocked);
    assert_eq!(sim.active_events().first(), Some(&sale));

    sim.take_dirty_flags();
    sim.process_event_option(sale, "OK").unwrap();
    assert!(!sim.active_events().contains(&sale));
    assert!(sim.event(sale).unwrap().completed);
    assert!(sim.take_dirty_flags().events);
}

#[test]
fn test_event_requirements_are_not_evaluated() {
    let mut data = standard_game_data();
    if let Some(restless) = data.events.iter_mut().find(|e| e.name == "Restless Robots") {
        restless.income.clear();
    }
    let mut sim = simulation_from(data);
    let art = sim.catalog().event_id("Robot Art Movement").unwrap();
    let boredom = sim.catalog().resource_id("Boredom").unwrap();

    let required = sim.catalog().events.get(art).unwrap().ticks_required;
    run_ticks(&mut sim, required);
    assert!(sim.resource(boredom).unwrap().count < fixed(100));
    assert!(sim.event(art).unwrap().triggered);
}

#[test]
fn test_starting_state_is_consistent() {
    let sim = standard_simulation();
    assert_eq!(check_invariants(sim.catalog(), sim.state()), Vec::<String>::new());
}
