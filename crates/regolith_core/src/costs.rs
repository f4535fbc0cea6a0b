//! Scaled cost computation.
//!
//! Costs are derived on demand from the catalog and the current state; none
//! are cached. Building costs grow with the number owned and are discounted
//! by the `cost_modifiers` tables of purchased research.

use crate::catalog::{Catalog, ResourceAmounts};
use crate::ideology::{rank_band, RankBand};
use crate::ids::{BuildingId, CommandId, DenseId, ProjectId, ResearchId, ResourceId};
use crate::math::{floor_tolerant, pow_saturating, Fixed};
use crate::simulation::SimulationState;

/// `floor(base * scaling^count * modifier)`, saturating.
#[must_use]
pub fn scaled_cost(base: Fixed, scaling: Fixed, count: u32, modifier: Fixed) -> Fixed {
    floor_tolerant(
        base.saturating_mul(pow_saturating(scaling, count))
            .saturating_mul(modifier),
    )
}

/// Read-only view computing costs against one simulation state.
#[derive(Debug, Clone, Copy)]
pub struct CostModel<'a> {
    catalog: &'a Catalog,
    state: &'a SimulationState,
}

impl<'a> CostModel<'a> {
    /// Create a cost model over a catalog and state.
    #[must_use]
    pub fn new(catalog: &'a Catalog, state: &'a SimulationState) -> Self {
        Self { catalog, state }
    }

    /// Product of every purchased research modifier for one resource.
    #[must_use]
    pub fn building_cost_modifier(&self, resource: ResourceId) -> Fixed {
        self.catalog
            .research
            .iter()
            .filter(|(id, _)| {
                self.state
                    .research
                    .get(id.index())
                    .is_some_and(|r| r.purchased)
            })
            .filter_map(|(_, def)| def.cost_modifiers.get(resource))
            .fold(Fixed::ONE, Fixed::saturating_mul)
    }

    /// Cost of the next unit of a building.
    #[must_use]
    pub fn building_cost(&self, id: BuildingId) -> Option<ResourceAmounts> {
        let def = self.catalog.buildings.get(id)?;
        let owned = self.state.buildings.get(id.index())?.total;
        Some(
            def.base_cost
                .iter()
                .map(|(resource, base)| {
                    let modifier = self.building_cost_modifier(resource);
                    (
                        resource,
                        scaled_cost(base, def.cost_scaling, owned, modifier),
                    )
                })
                .collect(),
        )
    }

    /// Per-unit upkeep of a building.
    #[must_use]
    pub fn building_upkeep(&self, id: BuildingId) -> Option<&'a ResourceAmounts> {
        self.catalog.buildings.get(id).map(|def| &def.upkeep)
    }

    /// Cost of one command run. Unscaled.
    #[must_use]
    pub fn command_cost(&self, id: CommandId) -> Option<&'a ResourceAmounts> {
        self.catalog.commands.get(id).map(|def| &def.cost)
    }

    /// Cost of a research item. Unscaled, floored.
    #[must_use]
    pub fn research_cost(&self, id: ResearchId) -> Option<ResourceAmounts> {
        let def = self.catalog.research.get(id)?;
        Some(def.cost.iter().map(|(r, v)| (r, floor_tolerant(v))).collect())
    }

    /// Progress required for the next completion of a project.
    #[must_use]
    pub fn project_cost(&self, id: ProjectId) -> Option<Fixed> {
        let def = self.catalog.projects.get(id)?;
        let completed = self.state.projects.get(id.index())?.purchase_count;
        Some(scaled_cost(
            def.base_cost,
            def.cost_scaling,
            completed,
            Fixed::ONE,
        ))
    }

    /// Rank band for an arbitrary score under the catalog's ideology parameters.
    #[must_use]
    pub fn ideology_rank(&self, score: Fixed) -> RankBand {
        let params = &self.catalog.params;
        rank_band(
            score,
            params.ideology_base_cost,
            params.ideology_scale_factor,
        )
    }
}
