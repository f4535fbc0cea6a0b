//! Building ownership, storage contribution and per-tick production.
//!
//! Buildings without upkeep produce unconditionally. Buildings with upkeep
//! pay and produce one unit at a time, so a shortfall costs exactly the
//! units that could not pay.

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, CatalogParams};
use crate::ids::{BuildingId, DenseId};
use crate::resources::ResourceLedger;

// ============================================================================
// Building State
// ============================================================================

/// Runtime state of one building type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildingState {
    /// Units owned.
    pub total: u32,
    /// Units currently running. Always `<= total`.
    pub active: u32,
    /// Whether the building is visible to the player.
    pub unlocked: bool,
}

impl BuildingState {
    /// Create a state with `owned` units, all active.
    #[must_use]
    pub const fn with_owned(owned: u32) -> Self {
        Self {
            total: owned,
            active: owned,
            unlocked: false,
        }
    }

    /// Add one purchased unit, active immediately.
    pub fn add_unit(&mut self) {
        self.total = self.total.saturating_add(1);
        self.active = self.active.saturating_add(1).min(self.total);
    }

    /// Remove one owned unit, lowering the active count to match.
    ///
    /// Returns `false` when none are owned.
    pub fn remove_unit(&mut self) -> bool {
        if self.total == 0 {
            return false;
        }
        self.total -= 1;
        self.active = self.active.min(self.total);
        true
    }

    /// Shift the active count by `delta`, clamped to `[0, total]`.
    pub fn shift_active(&mut self, delta: i64) {
        let target = i64::from(self.active).saturating_add(delta);
        let clamped = target.clamp(0, i64::from(self.total));
        self.active = u32::try_from(clamped).unwrap_or(self.total);
    }
}

// ============================================================================
// Systems
// ============================================================================

/// Recompute every resource's storage cap.
///
/// Storage is the base capacity from the parameters plus, for every building,
/// `active * contribution`.
///
/// # Arguments
/// * `catalog` - Building definitions
/// * `params` - Base storage capacities
/// * `buildings` - Building states indexed by [`BuildingId`]
/// * `resources` - Ledger whose storage caps are overwritten
pub fn storage_system(
    catalog: &Catalog,
    params: &CatalogParams,
    buildings: &[BuildingState],
    resources: &mut ResourceLedger,
) {
    resources.reset_storage(&params.starting_storage);

    for (id, def) in catalog.buildings.iter() {
        let Some(state) = buildings.get(id.index()) else {
            continue;
        };
        if state.active == 0 {
            continue;
        }
        for (resource, per_unit) in def.storage.iter() {
            resources.add_storage(resource, per_unit.saturating_mul_int(i64::from(state.active)));
        }
    }
}

/// Apply production and upkeep of every active building.
///
/// For a building with upkeep, the full upkeep of all active units is first
/// recorded as negative income. Each unit then pays its own upkeep bundle;
/// units that cannot pay produce nothing, and units that already paid are
/// not refunded.
///
/// # Arguments
/// * `catalog` - Building definitions
/// * `buildings` - Building states indexed by [`BuildingId`]
/// * `resources` - Ledger receiving production and paying upkeep
///
/// # Returns
/// Number of units per building that failed to pay upkeep this tick
pub fn production_system(
    catalog: &Catalog,
    buildings: &[BuildingState],
    resources: &mut ResourceLedger,
) -> Vec<(BuildingId, u32)> {
    let mut starved = Vec::new();

    for (id, def) in catalog.buildings.iter() {
        let Some(state) = buildings.get(id.index()) else {
            continue;
        };
        if state.active == 0 {
            continue;
        }

        if def.upkeep.is_empty() {
            resources.produce(&def.production, state.active);
            continue;
        }

        for (resource, per_unit) in def.upkeep.iter() {
            resources.add_income(
                resource,
                -per_unit.saturating_mul_int(i64::from(state.active)),
            );
        }

        let mut failed = 0;
        for _ in 0..state.active {
            if resources.spend(&def.upkeep) {
                resources.produce(&def.production, 1);
            } else {
                failed += 1;
            }
        }
        if failed > 0 {
            starved.push((id, failed));
        }
    }

    starved
}
