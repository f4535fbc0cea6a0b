//! # Regolith Core
//!
//! Deterministic tick simulation for the Regolith incremental economy.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No IO
//! - No wall-clock reads or randomness
//! - No floating-point math in the tick (uses fixed-point)
//!
//! This separation enables:
//! - Headless drivers and scripted runs
//! - Bit-exact determinism testing
//! - Serializable state snapshots
//!
//! ## Crate Structure
//!
//! - [`data`] - Serde schema for static definitions
//! - [`catalog`] - Validated, id-resolved definitions shared by the simulation
//! - [`resources`] - Per-resource count, storage and income bookkeeping
//! - [`costs`] - Building, research, project and ideology cost formulas
//! - [`buildings`] - Storage contributions, production and upkeep
//! - [`programs`] - Processor allocation and automation programs
//! - [`conflict`] - Adversary growth and combat
//! - [`ideology`] - Score to rank conversion
//! - [`projects`] - Multi-tick funded projects
//! - [`events`] - Narrative event lifecycle
//! - [`simulation`] - Core simulation loop and player actions
//! - [`math`] - Fixed-point math utilities

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod buildings;
pub mod catalog;
pub mod conflict;
pub mod costs;
pub mod data;
pub mod error;
pub mod events;
pub mod ideology;
pub mod ids;
pub mod invariants;
pub mod math;
pub mod programs;
pub mod projects;
pub mod resources;
pub mod simulation;

#[cfg(test)]
mod test_support;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::catalog::Catalog;
    pub use crate::data::GameData;
    pub use crate::error::{ActionError, GameError, Result};
    pub use crate::ids::{
        AdversaryId, BuildingId, CommandId, DefenderId, DenseId, EventId, IdeologyId, ProjectId,
        ResearchId, ResourceId, Unlockable,
    };
    pub use crate::math::Fixed;
    pub use crate::simulation::{ActionResult, Simulation, SimulationState, TickEvents};
}
