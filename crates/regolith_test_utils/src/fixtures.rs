//! Test fixtures and helpers.
//!
//! The standard data set is the one shipped in `assets/data`, compiled in so
//! tests do not depend on the working directory.

use std::sync::Arc;

use fixed::types::I32F32;
use regolith_core::catalog::Catalog;
use regolith_core::data::{DataFile, GameData};
use regolith_core::simulation::Simulation;

const STANDARD_DATA: [(DataFile, &str); 10] = [
    (DataFile::Resources, include_str!("../../../assets/data/resources.ron")),
    (DataFile::Buildings, include_str!("../../../assets/data/buildings.ron")),
    (DataFile::Commands, include_str!("../../../assets/data/commands.ron")),
    (DataFile::Research, include_str!("../../../assets/data/research.ron")),
    (DataFile::Projects, include_str!("../../../assets/data/projects.ron")),
    (DataFile::Events, include_str!("../../../assets/data/events.ron")),
    (DataFile::Ideologies, include_str!("../../../assets/data/ideologies.ron")),
    (DataFile::Defenders, include_str!("../../../assets/data/defenders.ron")),
    (DataFile::Adversaries, include_str!("../../../assets/data/adversaries.ron")),
    (DataFile::Params, include_str!("../../../assets/data/params.ron")),
];

/// Parse the shipped data set.
///
/// # Panics
///
/// Panics if a shipped data file fails to parse.
#[must_use]
pub fn standard_game_data() -> GameData {
    let mut data = GameData::default();
    for (file, text) in STANDARD_DATA {
        if let Err(e) = data.load_file(file, file.file_name(), text) {
            panic!("shipped data file {} is broken: {e}", file.file_name());
        }
    }
    data
}

/// Build a catalog from game data.
///
/// # Panics
///
/// Panics if the data fails validation.
#[must_use]
pub fn catalog_from(data: GameData) -> Arc<Catalog> {
    match Catalog::from_data(data) {
        Ok(catalog) => Arc::new(catalog),
        Err(e) => panic!("test data failed validation: {e}"),
    }
}

/// Catalog built from the shipped data set.
#[must_use]
pub fn standard_catalog() -> Arc<Catalog> {
    catalog_from(standard_game_data())
}

/// Fresh simulation over the shipped data set.
#[must_use]
pub fn standard_simulation() -> Simulation {
    Simulation::new(standard_catalog())
}

/// Fresh simulation over modified data.
#[must_use]
pub fn simulation_from(data: GameData) -> Simulation {
    Simulation::new(catalog_from(data))
}

/// Advance a simulation by `ticks` ticks.
pub fn run_ticks(sim: &mut Simulation, ticks: u64) {
    for _ in 0..ticks {
        sim.advance_tick();
    }
}

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> I32F32 {
    I32F32::from_num(n)
}

/// Create a fixed-point number from a float (for tests only).
///
/// Note: In real simulation code, never use floats.
/// This is only for convenient test setup.
#[must_use]
pub fn fixed_f(n: f64) -> I32F32 {
    I32F32::from_num(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_data_validates() {
        let data = standard_game_data();
        assert_eq!(data.validate(), Vec::<String>::new());
    }

    #[test]
    fn test_standard_simulation_starts_at_tick_zero() {
        let sim = standard_simulation();
        assert_eq!(sim.tick(), 0);
        let land = sim.catalog().resource_id("Land").unwrap();
        assert_eq!(sim.resource(land).unwrap().count, fixed(100));
    }
}
