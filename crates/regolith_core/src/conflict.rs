//! Adversary growth, surges, defender attrition and combat.
//!
//! Adversary strength decays by `1 - decay_rate` each cycle, while a
//! defender's count is multiplied by its `decay_rate` directly (a retention
//! factor). The two conventions differ and both are kept as authored.

use serde::{Deserialize, Serialize};

use crate::catalog::{AdversaryDef, Catalog};
use crate::ids::{AdversaryId, DenseId};
use crate::math::{share_of, Fixed};
use crate::resources::ResourceLedger;

// ============================================================================
// Adversary State
// ============================================================================

/// Runtime state of one adversary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdversaryState {
    /// Current force.
    pub strength: Fixed,
    /// Strength added each conflict cycle; compounds on surges.
    pub spawn_rate: Fixed,
    /// Fraction of strength lost each conflict cycle.
    pub decay_rate: Fixed,
    /// Ticks until the next surge; a surge fires when this goes negative.
    pub ticks_to_surge: i64,
    /// Strength added by the next surge.
    pub next_surge_strength: Fixed,
    /// Multiplier applied to surge strength and spawn rate per surge.
    pub surge_scale_factor: Fixed,
    /// Attacker share of the last combat, in `[0, 1]`.
    pub effectiveness: Fixed,
}

impl AdversaryState {
    /// Initial state for a definition.
    #[must_use]
    pub fn from_def(def: &AdversaryDef) -> Self {
        Self {
            strength: def.initial_strength,
            spawn_rate: def.spawn_rate,
            decay_rate: def.decay_rate,
            ticks_to_surge: i64::try_from(def.surge_interval).unwrap_or(i64::MAX),
            next_surge_strength: def.first_surge_strength,
            surge_scale_factor: def.surge_scale_factor,
            effectiveness: Fixed::ZERO,
        }
    }

    /// Apply one cycle of decay, spawning and surge countdown.
    ///
    /// Returns `true` if a surge fired.
    pub fn grow(&mut self, cycle_ticks: u32, surge_interval: u64) -> bool {
        self.strength = self
            .strength
            .saturating_mul(Fixed::ONE.saturating_sub(self.decay_rate))
            .saturating_add(self.spawn_rate)
            .max(Fixed::ZERO);

        self.ticks_to_surge = self.ticks_to_surge.saturating_sub(i64::from(cycle_ticks));
        if self.ticks_to_surge >= 0 {
            return false;
        }

        self.strength = self.strength.saturating_add(self.next_surge_strength);
        self.ticks_to_surge = i64::try_from(surge_interval).unwrap_or(i64::MAX);
        self.next_surge_strength = self
            .next_surge_strength
            .saturating_mul(self.surge_scale_factor);
        self.spawn_rate = self.spawn_rate.saturating_mul(self.surge_scale_factor);
        true
    }
}

// ============================================================================
// Combat
// ============================================================================

/// Result of one combat resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombatOutcome {
    /// Attackers left.
    pub attackers: Fixed,
    /// Defenders left.
    pub defenders: Fixed,
    /// Combatants removed from each side.
    pub active_fighters: Fixed,
    /// `attackers / (attackers + defenders)` after losses, or zero.
    pub effectiveness: Fixed,
}

/// Resolve one round of combat.
///
/// `min(total * fight_ratio, attackers, defenders)` fighters are removed from
/// both sides, so neither side can go negative.
#[must_use]
pub fn resolve_combat(attackers: Fixed, defenders: Fixed, fight_ratio: Fixed) -> CombatOutcome {
    let attackers = attackers.max(Fixed::ZERO);
    let defenders = defenders.max(Fixed::ZERO);
    let total = attackers.saturating_add(defenders);
    let active_fighters = total
        .saturating_mul(fight_ratio)
        .min(attackers)
        .min(defenders)
        .max(Fixed::ZERO);

    let attackers = attackers - active_fighters;
    let defenders = defenders - active_fighters;

    CombatOutcome {
        attackers,
        defenders,
        active_fighters,
        effectiveness: share_of(attackers, defenders),
    }
}

/// Run one conflict cycle.
///
/// 1. Every adversary decays, spawns and counts down to its surge
/// 2. Every defender's backing resource is multiplied by its retention rate
/// 3. Every adversary fights its defender once, in adversary order
///
/// # Arguments
/// * `catalog` - Adversary and defender definitions
/// * `adversaries` - Adversary states indexed by [`AdversaryId`]
/// * `resources` - Ledger holding defender counts
///
/// # Returns
/// Adversaries that surged this cycle
pub fn conflict_system(
    catalog: &Catalog,
    adversaries: &mut [AdversaryState],
    resources: &mut ResourceLedger,
) -> Vec<AdversaryId> {
    let cycle_ticks = catalog.params.ticks_per_conflict_cycle;
    let mut surged = Vec::new();

    for (id, def) in catalog.adversaries.iter() {
        let Some(state) = adversaries.get_mut(id.index()) else {
            continue;
        };
        if state.grow(cycle_ticks, def.surge_interval) {
            tracing::info!(
                adversary = %def.name,
                strength = %state.strength,
                "Adversary surge"
            );
            surged.push(id);
        }
    }

    for (_, defender) in catalog.defenders.iter() {
        let Some(r) = resources.get_mut(defender.resource) else {
            continue;
        };
        r.count = r.count.saturating_mul(defender.decay_rate).max(Fixed::ZERO);
    }

    for (id, def) in catalog.adversaries.iter() {
        let Some(state) = adversaries.get_mut(id.index()) else {
            continue;
        };
        let Some(defender) = catalog.defenders.get(def.defender) else {
            continue;
        };
        let Some(r) = resources.get_mut(defender.resource) else {
            continue;
        };

        let outcome = resolve_combat(state.strength, r.count, catalog.params.fight_ratio);
        state.strength = outcome.attackers;
        state.effectiveness = outcome.effectiveness;
        r.count = outcome.defenders;
    }

    surged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_catalog;

    fn fx(v: f64) -> Fixed {
        Fixed::from_num(v)
    }

    fn adversary(strength: f64) -> AdversaryState {
        AdversaryState {
            strength: fx(strength),
            spawn_rate: fx(2.0),
            decay_rate: fx(0.5),
            ticks_to_surge: 30,
            next_surge_strength: fx(10.0),
            surge_scale_factor: fx(2.0),
            effectiveness: Fixed::ZERO,
        }
    }

    #[test]
    fn test_grow_decays_then_spawns() {
        let mut state = adversary(10.0);
        assert!(!state.grow(20, 30));
        assert_eq!(state.strength, fx(7.0));
        assert_eq!(state.ticks_to_surge, 10);
    }

    #[test]
    fn test_surge_compounds() {
        let mut state = adversary(0.0);
        state.grow(20, 30);
        assert!(state.grow(20, 30));
        // (2 * 0.5 + 2) + 10
        assert_eq!(state.strength, fx(13.0));
        assert_eq!(state.ticks_to_surge, 30);
        assert_eq!(state.next_surge_strength, fx(20.0));
        assert_eq!(state.spawn_rate, fx(4.0));
    }

    #[test]
    fn test_grow_saturates_on_extreme_decay() {
        let mut state = adversary(10.0);
        state.decay_rate = Fixed::MIN;
        assert!(!state.grow(20, 30));
        assert_eq!(state.strength, Fixed::MAX);
    }

    #[test]
    fn test_surge_waits_until_negative() {
        let mut state = adversary(0.0);
        state.ticks_to_surge = 20;
        assert!(!state.grow(20, 30));
        assert_eq!(state.ticks_to_surge, 0);
        assert!(state.grow(20, 30));
    }

    #[test]
    fn test_combat_removes_equal_fighters() {
        let outcome = resolve_combat(fx(30.0), fx(50.0), fx(0.25));
        assert_eq!(outcome.active_fighters, fx(20.0));
        assert_eq!(outcome.attackers, fx(10.0));
        assert_eq!(outcome.defenders, fx(30.0));
        assert_eq!(outcome.effectiveness, fx(0.25));
    }

    #[test]
    fn test_combat_bounded_by_smaller_side() {
        let outcome = resolve_combat(fx(2.0), fx(1000.0), fx(0.5));
        assert_eq!(outcome.active_fighters, fx(2.0));
        assert_eq!(outcome.attackers, Fixed::ZERO);
        assert_eq!(outcome.effectiveness, Fixed::ZERO);
    }

    #[test]
    fn test_combat_with_no_forces() {
        let outcome = resolve_combat(Fixed::ZERO, Fixed::ZERO, fx(0.1));
        assert_eq!(outcome.active_fighters, Fixed::ZERO);
        assert_eq!(outcome.effectiveness, Fixed::ZERO);
    }

    #[test]
    fn test_conflict_system_applies_defender_retention() {
        let catalog = sample_catalog();
        let drones = catalog.resource_id("Drones").unwrap();
        let mut adversaries: Vec<_> = catalog
            .adversaries
            .iter()
            .map(|(_, def)| AdversaryState::from_def(def))
            .collect();
        for state in &mut adversaries {
            state.strength = Fixed::ZERO;
            state.spawn_rate = Fixed::ZERO;
        }

        let mut resources = ResourceLedger::new(catalog.resources.len());
        let r = resources.get_mut(drones).unwrap();
        r.storage = fx(1000.0);
        r.count = fx(100.0);

        conflict_system(&catalog, &mut adversaries, &mut resources);
        // Retention 0.75, no attackers to fight.
        assert_eq!(resources.count(drones), fx(75.0));
    }
}
