//! Data structures for static game definitions.
//!
//! This module contains pure data structures that define resources,
//! buildings, commands, research, projects, events and the conflict roster.
//! All structs are designed to be deserialized from RON files.
//!
//! **Note:** This module contains no IO - it only defines data types.
//! File loading is handled by `regolith_headless`.

mod building_data;
mod conflict_data;
mod event_data;
mod game_data;
mod params;
mod research_data;

pub use building_data::{AmountMap, BuildingData, CommandData};
pub use conflict_data::{AdversaryData, DefenderData, IdeologyData, ResourceData};
pub use event_data::{EventData, EventOptionData, EventOutcomeData, ACKNOWLEDGE_OPTION};
pub use game_data::{DataFile, GameData};
pub use params::GameParams;
pub use research_data::{ProjectData, ResearchData};
