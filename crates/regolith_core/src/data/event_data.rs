//! Narrative event data structures.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::building_data::AmountMap;

/// Label every event accepts as a plain acknowledgement.
pub const ACKNOWLEDGE_OPTION: &str = "OK";

/// Effect applied when the player picks an event option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventOutcomeData {
    /// Set a resource count (clamped to storage).
    SetResource {
        /// Resource name.
        resource: String,
        /// New count.
        amount: f64,
    },
    /// Add a signed amount to a resource count (clamped to `[0, storage]`).
    AddResource {
        /// Resource name.
        resource: String,
        /// Signed delta.
        amount: f64,
    },
    /// Unlock a command, building, resource, research or project.
    Unlock(String),
    /// Acknowledge without resolving; the event stays active.
    Defer,
}

/// A player-facing choice on an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventOptionData {
    /// Button label; also the option key.
    pub label: String,
    /// Outcomes applied in order.
    #[serde(default)]
    pub outcomes: Vec<EventOutcomeData>,
}

impl EventOptionData {
    /// Check if choosing this option leaves the event active.
    #[must_use]
    pub fn defers(&self) -> bool {
        self.outcomes
            .iter()
            .any(|o| matches!(o, EventOutcomeData::Defer))
    }
}

/// Data-driven narrative event.
///
/// Only `ticks_required` gates triggering. `resources_required` and
/// `buildings_required` are accepted by the schema and kept in the catalog
/// for presentation, but are not evaluated.
///
/// # Example RON
///
/// ```ron
/// EventData(
///     name: "Boredom Sets In",
///     ticks_required: 600,
///     flavor_text: "The robots are restless.",
///     options: [
///         EventOptionData(label: "Spend all boredom", outcomes: [
///             SetResource(resource: "Boredom", amount: 0.0),
///         ]),
///         EventOptionData(label: "Maybe later", outcomes: [Defer]),
///     ],
/// )
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventData {
    /// Unique display name; also the lookup key.
    pub name: String,

    /// Tick count at which the event triggers.
    pub ticks_required: u64,

    /// Resource thresholds (not evaluated by the trigger check).
    #[serde(default)]
    pub resources_required: AmountMap,

    /// Building count thresholds (not evaluated by the trigger check).
    #[serde(default)]
    pub buildings_required: BTreeMap<String, u32>,

    /// Names unlocked when the event triggers.
    #[serde(default)]
    pub unlocks: Vec<String>,

    /// Income applied every tick while the event is ongoing.
    #[serde(default)]
    pub income: AmountMap,

    /// Narrative text.
    #[serde(default)]
    pub flavor_text: String,

    /// Mechanics summary shown alongside the narrative.
    #[serde(default)]
    pub mechanics_text: String,

    /// Player options besides the built-in acknowledgement.
    #[serde(default)]
    pub options: Vec<EventOptionData>,
}

impl EventData {
    /// Find an option by label.
    #[must_use]
    pub fn option(&self, label: &str) -> Option<&EventOptionData> {
        self.options.iter().find(|o| o.label == label)
    }

    /// Check if this event carries ongoing income.
    #[must_use]
    pub fn has_income(&self) -> bool {
        self.income.values().any(|v| *v != 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_event_with_options() {
        let event: EventData = ron::from_str(
            r#"EventData(
                name: "Boredom Sets In",
                ticks_required: 600,
                options: [
                    EventOptionData(label: "Spend all boredom", outcomes: [
                        SetResource(resource: "Boredom", amount: 0.0),
                    ]),
                    EventOptionData(label: "Maybe later", outcomes: [Defer]),
                ],
            )"#,
        )
        .unwrap();

        assert_eq!(event.options.len(), 2);
        assert!(!event.option("Spend all boredom").unwrap().defers());
        assert!(event.option("Maybe later").unwrap().defers());
        assert!(event.option("Never").is_none());
        assert!(!event.has_income());
    }

    #[test]
    fn test_has_income_ignores_zero_entries() {
        let mut event: EventData =
            ron::from_str(r#"EventData(name: "Quiet", ticks_required: 0)"#).unwrap();
        event.income.insert("Credits".to_string(), 0.0);
        assert!(!event.has_income());
        event.income.insert("Energy".to_string(), -1.0);
        assert!(event.has_income());
    }
}
