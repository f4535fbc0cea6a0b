//! Error types for the game simulation.
//!
//! Two families exist. [`GameError`] covers static data and configuration
//! problems, which are fatal: a simulation is never constructed from data
//! that produced one. [`ActionError`] covers player actions that had no
//! effect (unaffordable, unknown id, wrong state); these are ordinary
//! outcomes during play and leave the state untouched.

use thiserror::Error;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Fatal data and configuration errors.
#[derive(Debug, Error)]
pub enum GameError {
    /// Data file parsing error.
    #[error("Failed to parse data file '{path}': {message}")]
    DataParseError {
        /// Path to the file that failed to parse.
        path: String,
        /// Error message.
        message: String,
    },

    /// Static data failed validation.
    #[error("Invalid game data ({} problem(s)): {}", .0.len(), .0.join("; "))]
    InvalidData(Vec<String>),

    /// A state snapshot does not fit the catalog it was paired with.
    #[error("Invalid simulation state: {0}")]
    InvalidState(String),

    /// A numeric value cannot be represented in the simulation's fixed-point range.
    #[error("Value out of range for '{field}': {value}")]
    ValueOutOfRange {
        /// Field the value was read from.
        field: String,
        /// Offending value.
        value: f64,
    },
}

/// Reasons a player action was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// An id did not belong to the simulation's catalog.
    #[error("Unknown {kind} id {id}")]
    UnknownId {
        /// Kind of entity referenced.
        kind: &'static str,
        /// Raw id value.
        id: u32,
    },

    /// A name did not match any catalog entry.
    #[error("Unknown name: {0}")]
    UnknownName(String),

    /// Not enough resources to pay a cost.
    #[error("Cannot afford {0}")]
    CannotAfford(String),

    /// Research can only be purchased once.
    #[error("Already purchased: {0}")]
    AlreadyPurchased(String),

    /// Building does not allow toggling its active count.
    #[error("Building cannot be deactivated: {0}")]
    NotDeactivatable(String),

    /// No units of a building are owned.
    #[error("No buildings owned: {0}")]
    NoBuildingsOwned(String),

    /// Event has not triggered or was already resolved.
    #[error("Event not active: {0}")]
    EventNotActive(String),

    /// Event was already resolved.
    #[error("Event already completed: {0}")]
    EventCompleted(String),

    /// Ongoing events carry no player options.
    #[error("Event is ongoing: {0}")]
    EventOngoing(String),

    /// Option label not offered by the event.
    #[error("Invalid option '{option}' for event '{event}'")]
    InvalidOption {
        /// Event name.
        event: String,
        /// Rejected option label.
        option: String,
    },

    /// Program index past the program list.
    #[error("Program {0} out of range")]
    ProgramOutOfRange(usize),

    /// Entry index past a program's instruction list.
    #[error("Entry {entry} out of range for program {program}")]
    EntryOutOfRange {
        /// Program index.
        program: usize,
        /// Entry index.
        entry: usize,
    },

    /// Project does not accept payments in this resource.
    #[error("Project '{project}' does not accept '{resource}'")]
    ResourceNotAccepted {
        /// Project name.
        project: String,
        /// Resource name.
        resource: String,
    },

    /// Non-repeatable project already completed.
    #[error("Project already finished: {0}")]
    ProjectFinished(String),
}
