//! JSON-lines protocol for driving a simulation.
//!
//! One JSON object per line in each direction:
//!
//! **Input (stdin):** commands from the controller, tagged by `cmd`
//! **Output (stdout):** responses, tagged by `type`
//!
//! Catalog entries are addressed by display name; the runner resolves them.
//!
//! # Example Session
//!
//! ```text
//! <- {"type":"ready","version":"1.0","tick":0}
//! -> {"cmd":"run_command","name":"Gather Regolith"}
//! <- {"type":"ack","cmd":"run_command"}
//! -> {"cmd":"tick","count":60}
//! <- {"type":"state","tick":60,"timestamp":"Day 1 01:00",...}
//! -> {"cmd":"purchase_building","name":"Solar Panels"}
//! <- {"type":"error","message":"Cannot afford ...","cmd":"purchase_building"}
//! -> {"cmd":"quit"}
//! <- {"type":"bye","tick":60}
//! ```

use serde::{Deserialize, Serialize};

/// Protocol version reported in the `ready` response.
pub const PROTOCOL_VERSION: &str = "1.0";

// ============================================================================
// Input Commands (controller -> runner)
// ============================================================================

/// Commands accepted by the headless runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    /// Advance the simulation by N ticks (default: 1).
    Tick {
        #[serde(default = "default_tick_count")]
        count: u32,
    },

    /// Report the current state without advancing time.
    Query,

    /// Run a manual command once.
    RunCommand { name: String },

    /// Buy one unit of a building.
    PurchaseBuilding { name: String },

    /// Buy a research entry.
    PurchaseResearch { name: String },

    /// Shift the active count of a building.
    SetBuildingActive { name: String, delta: i64 },

    /// Demolish one unit of a building.
    RemoveBuilding { name: String },

    /// Choose an event option; no option acknowledges the event.
    EventOption {
        event: String,
        #[serde(default)]
        option: Option<String>,
    },

    /// Append a command to a program.
    AppendProgramCommand { program: usize, command: String },

    /// Remove a program entry.
    RemoveProgramCommand { program: usize, entry: usize },

    /// Move a program entry.
    MoveProgramCommand {
        program: usize,
        from: usize,
        to: usize,
    },

    /// Change the repeat target of a program entry.
    AdjustRepeat {
        program: usize,
        entry: usize,
        delta: i64,
    },

    /// Change a program's processor claim.
    AdjustProcessors { program: usize, delta: i64 },

    /// Reset every program to its first entry.
    RestartPrograms,

    /// Change a project's per-tick payment for one resource.
    ProjectPayment {
        project: String,
        resource: String,
        delta: f64,
    },

    /// Report the state hash.
    Hash,

    /// End the session.
    Quit,
}

fn default_tick_count() -> u32 {
    1
}

// ============================================================================
// Output Responses (runner -> controller)
// ============================================================================

/// Responses sent by the headless runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    /// Runner is ready for commands.
    Ready { version: String, tick: u64 },

    /// Command applied.
    Ack { cmd: String },

    /// Command rejected or malformed.
    Error {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        cmd: Option<String>,
    },

    /// Full state snapshot.
    State(Box<StateReport>),

    /// State hash for determinism checks.
    StateHash { tick: u64, hash: u64 },

    /// Session ended.
    Bye { tick: u64 },
}

/// Player-facing view of the simulation state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateReport {
    pub tick: u64,
    pub timestamp: String,
    pub resources: Vec<ResourceReport>,
    pub buildings: Vec<BuildingReport>,
    pub active_events: Vec<String>,
    pub ongoing_events: Vec<String>,
    pub programs: Vec<ProgramReport>,
    pub free_processors: u32,
    pub ideologies: Vec<IdeologyReport>,
    pub adversaries: Vec<AdversaryReport>,
    pub hash: u64,
}

/// One unlocked resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceReport {
    pub name: String,
    pub count: f64,
    pub storage: f64,
    /// Net change per tick from the last tick.
    pub income: f64,
}

/// One unlocked building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingReport {
    pub name: String,
    pub total: u32,
    pub active: u32,
    /// Price of the next unit, by resource name.
    pub next_cost: Vec<(String, f64)>,
}

/// One automation program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramReport {
    pub processors: u32,
    pub instruction_pointer: usize,
    pub entries: Vec<ProgramEntryReport>,
}

/// One program entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramEntryReport {
    pub command: String,
    pub count: u32,
    pub max_count: u32,
}

/// One ideology track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdeologyReport {
    pub name: String,
    pub score: f64,
    pub rank: i32,
}

/// One adversary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdversaryReport {
    pub name: String,
    pub strength: f64,
    pub effectiveness: f64,
}

// ============================================================================
// Helpers
// ============================================================================

impl Response {
    /// Create a ready response.
    pub fn ready(tick: u64) -> Self {
        Self::Ready {
            version: PROTOCOL_VERSION.to_string(),
            tick,
        }
    }

    /// Create an acknowledgment.
    pub fn ack(cmd: &str) -> Self {
        Self::Ack {
            cmd: cmd.to_string(),
        }
    }

    /// Create an error response.
    pub fn error(message: impl Into<String>, cmd: Option<&str>) -> Self {
        Self::Error {
            message: message.into(),
            cmd: cmd.map(String::from),
        }
    }

    /// Serialize to JSON line (with newline).
    pub fn to_json_line(&self) -> String {
        let mut json = serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"type":"error","message":"Serialization failed: {e}"}}"#)
        });
        json.push('\n');
        json
    }
}

impl Command {
    /// Parse from a JSON line.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Command name for acknowledgments.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Tick { .. } => "tick",
            Self::Query => "query",
            Self::RunCommand { .. } => "run_command",
            Self::PurchaseBuilding { .. } => "purchase_building",
            Self::PurchaseResearch { .. } => "purchase_research",
            Self::SetBuildingActive { .. } => "set_building_active",
            Self::RemoveBuilding { .. } => "remove_building",
            Self::EventOption { .. } => "event_option",
            Self::AppendProgramCommand { .. } => "append_program_command",
            Self::RemoveProgramCommand { .. } => "remove_program_command",
            Self::MoveProgramCommand { .. } => "move_program_command",
            Self::AdjustRepeat { .. } => "adjust_repeat",
            Self::AdjustProcessors { .. } => "adjust_processors",
            Self::RestartPrograms => "restart_programs",
            Self::ProjectPayment { .. } => "project_payment",
            Self::Hash => "hash",
            Self::Quit => "quit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tick_command() {
        let cmd = Command::from_json(r#"{"cmd":"tick","count":60}"#).unwrap();
        assert_eq!(cmd, Command::Tick { count: 60 });
    }

    #[test]
    fn test_default_tick_count() {
        let cmd = Command::from_json(r#"{"cmd":"tick"}"#).unwrap();
        assert_eq!(cmd, Command::Tick { count: 1 });
    }

    #[test]
    fn test_parse_named_commands() {
        let cmd = Command::from_json(r#"{"cmd":"run_command","name":"Gather Regolith"}"#).unwrap();
        assert_eq!(
            cmd,
            Command::RunCommand {
                name: "Gather Regolith".to_string()
            }
        );

        let cmd = Command::from_json(
            r#"{"cmd":"project_payment","project":"Lunar Time Capsule","resource":"Water","delta":0.5}"#,
        )
        .unwrap();
        assert!(matches!(cmd, Command::ProjectPayment { delta, .. } if delta == 0.5));
    }

    #[test]
    fn test_event_option_defaults_to_acknowledge() {
        let cmd = Command::from_json(r#"{"cmd":"event_option","event":"Touchdown"}"#).unwrap();
        assert_eq!(
            cmd,
            Command::EventOption {
                event: "Touchdown".to_string(),
                option: None
            }
        );
    }

    #[test]
    fn test_unknown_command_is_rejected() {
        assert!(Command::from_json(r#"{"cmd":"teleport"}"#).is_err());
        assert!(Command::from_json(r#"{"cmd":"remove_program_command","program":0}"#).is_err());
    }

    #[test]
    fn test_command_names_match_tags() {
        let cmd = Command::AdjustRepeat {
            program: 0,
            entry: 1,
            delta: 2,
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains(&format!(r#""cmd":"{}""#, cmd.name())));
    }

    #[test]
    fn test_serialize_responses() {
        let json = Response::ready(0).to_json_line();
        assert!(json.contains(r#""type":"ready""#));
        assert!(json.ends_with('\n'));

        let json = Response::error("nope", None).to_json_line();
        assert!(!json.contains(r#""cmd""#));

        let json = Response::StateHash { tick: 7, hash: 99 }.to_json_line();
        assert!(json.contains(r#""type":"state_hash""#));
        assert!(json.contains(r#""hash":99"#));
    }

    #[test]
    fn test_serialize_state_response() {
        let report = StateReport {
            tick: 100,
            timestamp: "Day 1 01:40".to_string(),
            resources: vec![ResourceReport {
                name: "Credits".to_string(),
                count: 500.0,
                storage: 1000.0,
                income: 0.0,
            }],
            buildings: vec![],
            active_events: vec![],
            ongoing_events: vec![],
            programs: vec![],
            free_processors: 0,
            ideologies: vec![],
            adversaries: vec![],
            hash: 12345,
        };
        let json = Response::State(Box::new(report)).to_json_line();
        assert!(json.contains(r#""type":"state""#));
        assert!(json.contains(r#""tick":100"#));
        assert!(json.contains(r#""name":"Credits""#));
    }
}
