//! Multi-tick projects funded by player-chosen resource drains.

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, ProjectDef};
use crate::costs::scaled_cost;
use crate::ids::{DenseId, ProjectId};
use crate::math::Fixed;
use crate::resources::ResourceLedger;

/// Runtime state of one project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectState {
    /// Completions so far.
    pub purchase_count: u32,
    /// Progress toward the next completion.
    pub progress: Fixed,
    /// Drain rate per accepted resource, aligned with the definition's
    /// `resource_rates`. Never negative.
    pub payments: Vec<Fixed>,
    /// Whether the project is visible to the player.
    pub unlocked: bool,
}

impl ProjectState {
    /// Initial state for a definition.
    #[must_use]
    pub fn from_def(def: &ProjectDef) -> Self {
        Self {
            purchase_count: 0,
            progress: Fixed::ZERO,
            payments: vec![Fixed::ZERO; def.resource_rates.len()],
            unlocked: false,
        }
    }

    /// Check whether a non-repeatable project has completed.
    #[must_use]
    pub fn is_finished(&self, def: &ProjectDef) -> bool {
        !def.repeatable && self.purchase_count > 0
    }
}

/// Progress required for the completion after `completed` ones.
#[must_use]
pub fn project_cost(def: &ProjectDef, completed: u32) -> Fixed {
    scaled_cost(def.base_cost, def.cost_scaling, completed, Fixed::ONE)
}

/// Drain payments into progress and complete funded projects.
///
/// For every nonzero payment the full rate is recorded as negative income,
/// but at most the available count is actually taken. Progress grows by the
/// amount taken times the resource's rate. A project whose progress reaches
/// its cost completes: progress resets to zero (excess is lost) and the
/// completion count increments. Finished non-repeatable projects stop
/// draining.
///
/// # Arguments
/// * `catalog` - Project definitions
/// * `projects` - Project states indexed by [`ProjectId`]
/// * `resources` - Ledger paying for the projects
///
/// # Returns
/// Projects that completed this tick
pub fn project_payment_system(
    catalog: &Catalog,
    projects: &mut [ProjectState],
    resources: &mut ResourceLedger,
) -> Vec<ProjectId> {
    let mut completed = Vec::new();

    for (id, def) in catalog.projects.iter() {
        let Some(state) = projects.get_mut(id.index()) else {
            continue;
        };
        if state.is_finished(def) {
            continue;
        }

        for ((resource, rate), payment) in def.resource_rates.iter().zip(&state.payments) {
            if *payment == Fixed::ZERO {
                continue;
            }
            resources.add_income(resource, -*payment);
            let Some(r) = resources.get_mut(resource) else {
                continue;
            };
            let paid = (*payment).min(r.count.max(Fixed::ZERO));
            r.count -= paid;
            state.progress = state.progress.saturating_add(paid.saturating_mul(rate));
        }

        let cost = project_cost(def, state.purchase_count);
        if state.progress > Fixed::ZERO && state.progress >= cost {
            state.purchase_count = state.purchase_count.saturating_add(1);
            state.progress = Fixed::ZERO;
            if state.is_finished(def) {
                state.payments.iter_mut().for_each(|p| *p = Fixed::ZERO);
            }
            completed.push(id);
        }
    }

    completed
}
