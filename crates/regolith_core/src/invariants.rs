//! Post-tick consistency checks.
//!
//! Every mutation site clamps its values, so a violation here is a
//! programming error. The `debug-validation` feature asserts these after
//! every tick; tests call [`check_invariants`] directly.

use crate::catalog::Catalog;
use crate::math::Fixed;
use crate::programs::processor_capacity;
use crate::simulation::SimulationState;

/// Collect every invariant violation in a state.
///
/// Returns an empty list for a consistent state.
#[must_use]
pub fn check_invariants(catalog: &Catalog, state: &SimulationState) -> Vec<String> {
    let mut errors = state.shape_mismatches(catalog);

    for (id, r) in state.resources.iter() {
        let name = catalog.resources.get(id).map_or("?", |d| d.name.as_str());
        if r.count < Fixed::ZERO {
            errors.push(format!("resource '{name}' count {} is negative", r.count));
        }
        if r.count > r.storage {
            errors.push(format!(
                "resource '{name}' count {} exceeds storage {}",
                r.count, r.storage
            ));
        }
    }

    for ((_, def), b) in catalog.buildings.iter().zip(&state.buildings) {
        if b.active > b.total {
            errors.push(format!(
                "building '{}' active {} exceeds total {}",
                def.name, b.active, b.total
            ));
        }
    }

    let mut claimed: u64 = u64::from(state.free_processors);
    for (index, program) in state.programs.iter().enumerate() {
        claimed += u64::from(program.assigned_processors);
        if !program.entries.is_empty() && program.instruction_pointer >= program.entries.len() {
            errors.push(format!(
                "program {index} pointer {} past {} entries",
                program.instruction_pointer,
                program.entries.len()
            ));
        }
        for entry in &program.entries {
            if entry.max_count == 0 {
                errors.push(format!("program {index} has an entry with zero repeat target"));
            }
        }
    }
    let capacity = processor_capacity(state.resources.storage(catalog.params.processor_resource));
    if claimed != u64::from(capacity) {
        errors.push(format!("processor claims {claimed} do not match capacity {capacity}"));
    }

    for ((_, def), a) in catalog.adversaries.iter().zip(&state.adversaries) {
        if a.strength < Fixed::ZERO {
            errors.push(format!("adversary '{}' strength is negative", def.name));
        }
        if a.effectiveness < Fixed::ZERO || a.effectiveness > Fixed::ONE {
            errors.push(format!(
                "adversary '{}' effectiveness {} outside [0, 1]",
                def.name, a.effectiveness
            ));
        }
    }

    for ((_, def), p) in catalog.projects.iter().zip(&state.projects) {
        if p.payments.iter().any(|v| *v < Fixed::ZERO) {
            errors.push(format!("project '{}' has a negative payment", def.name));
        }
    }

    for id in state.events.active.iter().chain(&state.events.ongoing) {
        match state.events.get(*id) {
            Some(e) if e.triggered => {}
            _ => errors.push(format!("listed event {id} is not triggered")),
        }
    }

    errors
}
