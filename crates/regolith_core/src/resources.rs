//! Per-resource count, storage and income bookkeeping.
//!
//! The ledger is the leaf every other subsystem writes through. Counts may
//! temporarily exceed storage during a tick; [`ResourceLedger::clamp_to_storage`]
//! restores `0 <= count <= storage` at the end of every tick.

use serde::{Deserialize, Serialize};

use crate::catalog::ResourceAmounts;
use crate::ids::{DenseId, ResourceId};
use crate::math::Fixed;

/// Runtime state of one resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceState {
    /// Current amount held.
    pub count: Fixed,
    /// Storage cap, recomputed every tick.
    pub storage: Fixed,
    /// Net change recorded during the last tick (diagnostic only).
    pub income: Fixed,
    /// Whether the resource is visible to the player.
    pub unlocked: bool,
}

/// All resource states, indexed by [`ResourceId`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceLedger {
    resources: Vec<ResourceState>,
}

impl ResourceLedger {
    /// Create a ledger with `len` empty resources.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            resources: vec![ResourceState::default(); len],
        }
    }

    /// Number of tracked resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Check if no resources are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Get a resource state.
    #[must_use]
    pub fn get(&self, id: ResourceId) -> Option<&ResourceState> {
        self.resources.get(id.index())
    }

    /// Get a mutable resource state.
    pub fn get_mut(&mut self, id: ResourceId) -> Option<&mut ResourceState> {
        self.resources.get_mut(id.index())
    }

    /// Current count, or zero for an unknown id.
    #[must_use]
    pub fn count(&self, id: ResourceId) -> Fixed {
        self.get(id).map_or(Fixed::ZERO, |r| r.count)
    }

    /// Current storage, or zero for an unknown id.
    #[must_use]
    pub fn storage(&self, id: ResourceId) -> Fixed {
        self.get(id).map_or(Fixed::ZERO, |r| r.storage)
    }

    /// Iterate resources in id order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceId, &ResourceState)> {
        self.resources
            .iter()
            .enumerate()
            .map(|(i, r)| (ResourceId::from_index(i), r))
    }

    /// Check whether every listed amount is covered by the current counts.
    #[must_use]
    pub fn can_afford(&self, cost: &ResourceAmounts) -> bool {
        cost.iter().all(|(id, amount)| amount <= self.count(id))
    }

    /// Pay a cost in full, or not at all.
    ///
    /// Returns `false` and leaves the ledger untouched when unaffordable.
    pub fn spend(&mut self, cost: &ResourceAmounts) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        for (id, amount) in cost.iter() {
            if let Some(r) = self.get_mut(id) {
                r.count -= amount;
            }
        }
        true
    }

    /// Credit `amounts * times` to both count and income.
    pub fn produce(&mut self, amounts: &ResourceAmounts, times: u32) {
        for (id, amount) in amounts.iter() {
            if let Some(r) = self.get_mut(id) {
                let total = amount.saturating_mul_int(i64::from(times));
                r.count = r.count.saturating_add(total);
                r.income = r.income.saturating_add(total);
            }
        }
    }

    /// Record income without touching the count.
    pub fn add_income(&mut self, id: ResourceId, amount: Fixed) {
        if let Some(r) = self.get_mut(id) {
            r.income = r.income.saturating_add(amount);
        }
    }

    /// Add a signed amount to a count, clamped to `[0, storage]`.
    pub fn add_clamped(&mut self, id: ResourceId, amount: Fixed) {
        if let Some(r) = self.get_mut(id) {
            r.count = r.count.saturating_add(amount).min(r.storage).max(Fixed::ZERO);
        }
    }

    /// Set a count, clamped to `[0, storage]`.
    pub fn set_clamped(&mut self, id: ResourceId, amount: Fixed) {
        if let Some(r) = self.get_mut(id) {
            r.count = amount.min(r.storage).max(Fixed::ZERO);
        }
    }

    /// Zero every income accumulator.
    pub fn reset_income(&mut self) {
        for r in &mut self.resources {
            r.income = Fixed::ZERO;
        }
    }

    /// Reset every storage cap to its base value.
    pub fn reset_storage(&mut self, base: &ResourceAmounts) {
        for r in &mut self.resources {
            r.storage = Fixed::ZERO;
        }
        for (id, amount) in base.iter() {
            if let Some(r) = self.get_mut(id) {
                r.storage = amount;
            }
        }
    }

    /// Add to a storage cap.
    pub fn add_storage(&mut self, id: ResourceId, amount: Fixed) {
        if let Some(r) = self.get_mut(id) {
            r.storage = r.storage.saturating_add(amount);
        }
    }

    /// Clamp every count to `[0, storage]`. Overflow is lost.
    pub fn clamp_to_storage(&mut self) {
        for r in &mut self.resources {
            r.count = r.count.min(r.storage).max(Fixed::ZERO);
        }
    }
}
