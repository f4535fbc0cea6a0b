//! Determinism testing utilities.
//!
//! Provides a harness for verifying that the simulation
//! produces identical results given identical inputs.
//!
//! # Testing Strategy
//!
//! The tick function must be bit-for-bit reproducible. Sources of
//! non-determinism include:
//!
//! - **Floating-point math**: Different CPUs can produce different results.
//!   We use fixed-point arithmetic via [`regolith_core::math::Fixed`] throughout.
//!
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   The simulation iterates catalog definition order and program order only.
//!
//! - **Wall-clock reads**: The simulation never looks at the clock; the
//!   driver decides when to tick.
//!
//! # Test Levels
//!
//! 1. **Unit tests**: Individual system determinism
//! 2. **Property tests**: Random action scripts must still replay identically
//! 3. **Integration tests**: Full scenarios are reproducible
//! 4. **Parallel tests**: Running N simulations in parallel all match

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::thread;

use regolith_core::simulation::{Simulation, SimulationState};

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of ticks simulated.
    pub ticks: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for deterministic simulation).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the simulation was deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the simulation produced different hashes across runs.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Simulation is non-deterministic!\n\
                 Runs: {}\n\
                 Ticks: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.ticks,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a simulation multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run the simulation
/// * `ticks` - Number of ticks to simulate per run
/// * `setup` - Function to create initial simulation state
/// * `step` - Function to advance simulation by one tick
/// * `hash` - Function to compute state hash
///
/// # Example
///
/// ```
/// use regolith_test_utils::determinism::verify_determinism;
/// use regolith_test_utils::fixtures::standard_simulation;
///
/// let result = verify_determinism(
///     3,   // Run 3 times
///     100, // 100 ticks each
///     standard_simulation,
///     |sim| { sim.advance_tick(); },
///     |sim| sim.state_hash(),
/// );
/// result.assert_deterministic();
/// ```
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    ticks: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for _ in 0..ticks {
            step(&mut state);
        }

        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        ticks,
    }
}

/// Replay an action script on `runs` fresh simulations and compare hashes.
pub fn verify_script_determinism<F>(setup_fn: F, script: &[PlayerAction], runs: usize) -> DeterminismResult
where
    F: Fn() -> Simulation,
{
    let hashes: Vec<u64> = (0..runs)
        .map(|_| {
            let mut sim = setup_fn();
            for action in script {
                apply_action(&mut sim, action);
            }
            sim.state_hash()
        })
        .collect();

    let ticks = script.iter().filter(|a| matches!(a, PlayerAction::Tick)).count() as u64;
    DeterminismResult {
        is_deterministic: hashes.windows(2).all(|w| w[0] == w[1]),
        hashes,
        ticks,
    }
}

/// Run N simulations on scoped threads and collect final hashes.
///
/// This is useful for catching non-determinism that only manifests
/// under thread scheduling variations, memory layout differences, etc.
///
/// # Panics
///
/// Panics if a simulation thread panics.
pub fn run_parallel_simulations<F>(setup_fn: F, num_sims: usize, num_ticks: u64) -> DeterminismResult
where
    F: Fn() -> Simulation + Sync,
{
    let hashes: Vec<u64> = thread::scope(|s| {
        let handles: Vec<_> = (0..num_sims)
            .map(|_| {
                s.spawn(|| {
                    let mut sim = setup_fn();
                    for _ in 0..num_ticks {
                        sim.advance_tick();
                    }
                    sim.state_hash()
                })
            })
            .collect();

        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    DeterminismResult {
        is_deterministic: hashes.windows(2).all(|w| w[0] == w[1]),
        hashes,
        ticks: num_ticks,
    }
}

/// Compare two simulation runs tick-by-tick, finding first divergence.
///
/// Useful for debugging non-determinism by finding exactly when
/// simulations start to differ.
///
/// # Returns
///
/// `None` if simulations are deterministic, `Some(tick)` if they diverge
/// at that tick.
pub fn find_first_divergence<F>(setup_fn: F, num_ticks: u64) -> Option<u64>
where
    F: Fn() -> Simulation,
{
    let mut sim1 = setup_fn();
    let mut sim2 = setup_fn();

    if sim1.state_hash() != sim2.state_hash() {
        return Some(0);
    }

    for tick in 1..=num_ticks {
        sim1.advance_tick();
        sim2.advance_tick();

        if sim1.state_hash() != sim2.state_hash() {
            tracing::warn!(tick, "Simulations diverged");
            return Some(tick);
        }
    }

    None
}

/// Verify that a RON snapshot round-trip preserves simulation state exactly
/// and that the restored simulation keeps evolving identically.
pub fn verify_snapshot_determinism<F>(setup_fn: F, num_ticks: u64) -> bool
where
    F: Fn() -> Simulation,
{
    let mut sim = setup_fn();
    for _ in 0..num_ticks {
        sim.advance_tick();
    }

    let Ok(text) = ron::to_string(sim.state()) else {
        return false;
    };
    let Ok(state) = ron::from_str::<SimulationState>(&text) else {
        return false;
    };
    let Ok(mut restored) = Simulation::restore(Arc::clone(sim.catalog()), state) else {
        return false;
    };

    if restored.state_hash() != sim.state_hash() {
        return false;
    }
    for _ in 0..num_ticks {
        sim.advance_tick();
        restored.advance_tick();
    }
    restored.state_hash() == sim.state_hash()
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

// ============================================================================
// Player actions
// ============================================================================

/// One step of a scripted game, using raw ids so scripts are independent of
/// any particular catalog. Unknown ids are simply rejected by the simulation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PlayerAction {
    /// Advance one tick.
    Tick,
    /// Run a command once.
    RunCommand(u32),
    /// Buy one building.
    PurchaseBuilding(u32),
    /// Buy a research item.
    PurchaseResearch(u32),
    /// Shift a building's active count.
    SetBuildingActive(u32, i64),
    /// Remove one building.
    RemoveBuilding(u32),
    /// Resolve an event with the option at an index, or `OK` when `None`.
    EventOption(u32, Option<usize>),
    /// Append a command to a program.
    AppendProgramCommand(usize, u32),
    /// Remove a program entry.
    RemoveProgramCommand(usize, usize),
    /// Move a program entry.
    MoveProgramCommand(usize, usize, usize),
    /// Shift an entry's repeat target.
    AdjustRepeat(usize, usize, i64),
    /// Shift a program's processor claim.
    AdjustProcessors(usize, i64),
    /// Change a project payment by a whole amount.
    ProjectPayment(u32, u32, i32),
    /// Restart every program.
    RestartPrograms,
}

/// Apply one scripted action, ignoring rejections.
pub fn apply_action(sim: &mut Simulation, action: &PlayerAction) {
    use regolith_core::data::ACKNOWLEDGE_OPTION;
    use regolith_core::ids::{BuildingId, CommandId, EventId, ProjectId, ResearchId, ResourceId};
    use regolith_core::math::Fixed;

    let _ = match *action {
        PlayerAction::Tick => {
            sim.advance_tick();
            Ok(())
        }
        PlayerAction::RunCommand(c) => sim.run_command(CommandId::new(c)),
        PlayerAction::PurchaseBuilding(b) => sim.purchase_building(BuildingId::new(b)),
        PlayerAction::PurchaseResearch(r) => sim.purchase_research(ResearchId::new(r)),
        PlayerAction::SetBuildingActive(b, delta) => {
            sim.set_building_active_delta(BuildingId::new(b), delta)
        }
        PlayerAction::RemoveBuilding(b) => sim.remove_building(BuildingId::new(b)),
        PlayerAction::EventOption(e, option) => {
            let id = EventId::new(e);
            let label = option
                .and_then(|i| sim.catalog().events.get(id)?.options.get(i))
                .map_or_else(|| ACKNOWLEDGE_OPTION.to_string(), |o| o.label.clone());
            sim.process_event_option(id, &label)
        }
        PlayerAction::AppendProgramCommand(p, c) => sim.append_program_command(p, CommandId::new(c)),
        PlayerAction::RemoveProgramCommand(p, e) => sim.remove_program_command(p, e),
        PlayerAction::MoveProgramCommand(p, from, to) => sim.move_program_command(p, from, to),
        PlayerAction::AdjustRepeat(p, e, delta) => sim.adjust_repeat_target(p, e, delta),
        PlayerAction::AdjustProcessors(p, delta) => sim.adjust_program_processors(p, delta),
        PlayerAction::ProjectPayment(p, r, delta) => {
            sim.modify_project_payment(ProjectId::new(p), ResourceId::new(r), Fixed::from_num(delta))
        }
        PlayerAction::RestartPrograms => {
            sim.restart_all_programs();
            Ok(())
        }
    };
}

/// Proptest strategies for determinism testing.
///
/// These strategies generate random but reproducible inputs for
/// property-based testing of simulation determinism.
pub mod strategies {
    use proptest::prelude::*;

    use super::PlayerAction;

    /// Raw ids slightly past the standard catalog sizes, so some actions
    /// exercise the unknown-id path.
    fn arb_raw_id() -> impl Strategy<Value = u32> {
        0u32..12
    }

    fn arb_program() -> impl Strategy<Value = usize> {
        0usize..6
    }

    /// Generate a single player action, weighted toward ticks and commands.
    pub fn arb_action() -> impl Strategy<Value = PlayerAction> {
        prop_oneof![
            6 => Just(PlayerAction::Tick),
            4 => arb_raw_id().prop_map(PlayerAction::RunCommand),
            2 => arb_raw_id().prop_map(PlayerAction::PurchaseBuilding),
            1 => arb_raw_id().prop_map(PlayerAction::PurchaseResearch),
            1 => (arb_raw_id(), -3i64..3).prop_map(|(b, d)| PlayerAction::SetBuildingActive(b, d)),
            1 => arb_raw_id().prop_map(PlayerAction::RemoveBuilding),
            1 => (arb_raw_id(), proptest::option::of(0usize..4))
                .prop_map(|(e, o)| PlayerAction::EventOption(e, o)),
            2 => (arb_program(), arb_raw_id())
                .prop_map(|(p, c)| PlayerAction::AppendProgramCommand(p, c)),
            1 => (arb_program(), 0usize..4).prop_map(|(p, e)| PlayerAction::RemoveProgramCommand(p, e)),
            1 => (arb_program(), 0usize..4, 0usize..4)
                .prop_map(|(p, f, t)| PlayerAction::MoveProgramCommand(p, f, t)),
            1 => (arb_program(), 0usize..4, -3i64..5)
                .prop_map(|(p, e, d)| PlayerAction::AdjustRepeat(p, e, d)),
            1 => (arb_program(), -2i64..3).prop_map(|(p, d)| PlayerAction::AdjustProcessors(p, d)),
            1 => (0u32..3, arb_raw_id(), -5i32..10)
                .prop_map(|(p, r, d)| PlayerAction::ProjectPayment(p, r, d)),
            1 => Just(PlayerAction::RestartPrograms),
        ]
    }

    /// Generate a sequence of player actions.
    pub fn arb_action_script(max_len: usize) -> impl Strategy<Value = Vec<PlayerAction>> {
        prop::collection::vec(arb_action(), 1..=max_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::standard_simulation;
    use proptest::prelude::*;

    #[test]
    fn test_verify_determinism_basic() {
        let result = verify_determinism(
            3,
            500,
            standard_simulation,
            |sim| {
                sim.advance_tick();
            },
            |sim| sim.state_hash(),
        );
        result.assert_deterministic();
        assert_eq!(result.unique_hashes().len(), 1);
    }

    #[test]
    fn test_verify_determinism_detects_divergence() {
        use std::cell::Cell;

        let counter = Cell::new(0u64);
        let result = verify_determinism(
            2,
            1,
            || {
                counter.set(counter.get() + 1);
                counter.get()
            },
            |_| {},
            |n| *n,
        );
        assert!(!result.is_deterministic);
        assert_eq!(result.unique_hashes().len(), 2);
    }

    #[test]
    fn test_parallel_simulations_match() {
        let result = run_parallel_simulations(standard_simulation, 4, 300);
        result.assert_deterministic();
        assert_eq!(result.hashes.len(), 4);
    }

    #[test]
    fn test_no_divergence() {
        assert_eq!(find_first_divergence(standard_simulation, 200), None);
    }

    #[test]
    fn test_snapshot_roundtrip() {
        assert!(verify_snapshot_determinism(standard_simulation, 150));
    }

    #[test]
    fn test_script_changes_state() {
        let script = vec![
            PlayerAction::Tick,
            PlayerAction::RunCommand(0),
            PlayerAction::PurchaseBuilding(0),
            PlayerAction::Tick,
        ];
        let idle = standard_simulation();
        let mut scripted = standard_simulation();
        for action in &script {
            apply_action(&mut scripted, action);
        }
        assert_ne!(idle.state_hash(), scripted.state_hash());
        verify_script_determinism(standard_simulation, &script, 3).assert_deterministic();
    }

    #[test]
    fn test_compute_hash_stable() {
        assert_eq!(compute_hash(&(1u32, "a")), compute_hash(&(1u32, "a")));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_random_scripts_replay_identically(
            script in strategies::arb_action_script(120)
        ) {
            let result = verify_script_determinism(standard_simulation, &script, 2);
            prop_assert!(result.is_deterministic, "script diverged: {:?}", script);
        }
    }
}
