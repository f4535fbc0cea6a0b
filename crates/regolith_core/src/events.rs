//! Narrative event lifecycle.
//!
//! An event moves `dormant -> triggered -> completed`. Events with ongoing
//! income are also flagged `ongoing`; they feed income every tick and offer
//! no options, so they are never completed.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::ids::{DenseId, EventId};
use crate::resources::ResourceLedger;

/// Runtime flags of one event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventState {
    /// Trigger condition has been met.
    pub triggered: bool,
    /// Player resolved the event.
    pub completed: bool,
    /// Event feeds income every tick.
    pub ongoing: bool,
    /// Presentation layer has shown the event. Not part of game logic.
    pub displayed: bool,
    /// Tick count at which the event triggered.
    pub triggered_tick: Option<u64>,
}

/// All event states plus the active and ongoing lists.
///
/// Both lists are ordered most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventLedger {
    /// States indexed by [`EventId`].
    pub states: Vec<EventState>,
    /// Triggered events awaiting acknowledgement.
    pub active: Vec<EventId>,
    /// Triggered events with ongoing income.
    pub ongoing: Vec<EventId>,
}

impl EventLedger {
    /// Create a ledger with `len` dormant events.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            states: vec![EventState::default(); len],
            active: Vec::new(),
            ongoing: Vec::new(),
        }
    }

    /// Get an event state.
    #[must_use]
    pub fn get(&self, id: EventId) -> Option<&EventState> {
        self.states.get(id.index())
    }

    /// Get a mutable event state.
    pub fn get_mut(&mut self, id: EventId) -> Option<&mut EventState> {
        self.states.get_mut(id.index())
    }

    /// Check whether an event is in the active list.
    #[must_use]
    pub fn is_active(&self, id: EventId) -> bool {
        self.active.contains(&id)
    }

    /// Mark an event completed and drop it from the active list.
    pub fn complete(&mut self, id: EventId) {
        self.active.retain(|e| *e != id);
        if let Some(state) = self.get_mut(id) {
            state.completed = true;
        }
    }
}

/// Trigger every dormant event whose tick threshold has been reached.
///
/// Only `ticks_required` is evaluated; resource and building requirements in
/// the definitions are not checked. Newly triggered events go to the front
/// of the active list, and to the front of the ongoing list when they carry
/// income.
///
/// # Arguments
/// * `catalog` - Event definitions
/// * `events` - Event ledger
/// * `tick` - Current tick count
///
/// # Returns
/// Events triggered by this call, in definition order
pub fn event_trigger_system(catalog: &Catalog, events: &mut EventLedger, tick: u64) -> Vec<EventId> {
    let mut triggered = Vec::new();

    for (id, def) in catalog.events.iter() {
        let Some(state) = events.states.get_mut(id.index()) else {
            continue;
        };
        if state.triggered || tick < def.ticks_required {
            continue;
        }

        state.triggered = true;
        state.triggered_tick = Some(tick);
        events.active.insert(0, id);
        if def.has_income() {
            state.ongoing = true;
            events.ongoing.insert(0, id);
        }
        triggered.push(id);
    }

    triggered
}

/// Apply the income of every ongoing event to both count and income.
pub fn event_income_system(catalog: &Catalog, events: &EventLedger, resources: &mut ResourceLedger) {
    for id in &events.ongoing {
        let Some(def) = catalog.events.get(*id) else {
            continue;
        };
        resources.produce(&def.income, 1);
    }
}
