//! Automation programs and processor scheduling.
//!
//! Programs are ordered instruction lists that run on a shared pool of
//! processors. Allocation is greedy in program order, so the order of the
//! program list is significant. Programs execute once per processor cycle,
//! one instruction per firing.

use serde::{Deserialize, Serialize};

use crate::error::ActionError;
use crate::ids::CommandId;
use crate::math::Fixed;

/// One instruction in a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProgramEntry {
    /// Command executed by this instruction.
    pub command: CommandId,
    /// Executions completed in the current pass.
    pub count: u32,
    /// Executions before the pointer advances. At least 1.
    pub max_count: u32,
}

impl ProgramEntry {
    /// Create an entry that runs once per pass.
    #[must_use]
    pub const fn new(command: CommandId) -> Self {
        Self {
            command,
            count: 0,
            max_count: 1,
        }
    }
}

/// A player-defined automation program.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Program {
    /// Instructions in execution order.
    pub entries: Vec<ProgramEntry>,
    /// Index of the next instruction.
    pub instruction_pointer: usize,
    /// Processors claimed from the shared pool.
    pub assigned_processors: u32,
}

impl Program {
    /// Move the pointer to the start and zero every repeat counter.
    pub fn restart(&mut self) {
        self.instruction_pointer = 0;
        for entry in &mut self.entries {
            entry.count = 0;
        }
    }

    /// Append an instruction. Restarts the program.
    pub fn append(&mut self, command: CommandId) {
        self.entries.push(ProgramEntry::new(command));
        self.restart();
    }

    /// Remove an instruction. Restarts the program.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::EntryOutOfRange`] if `index` is past the end.
    pub fn remove(&mut self, program: usize, index: usize) -> Result<ProgramEntry, ActionError> {
        if index >= self.entries.len() {
            return Err(ActionError::EntryOutOfRange {
                program,
                entry: index,
            });
        }
        let removed = self.entries.remove(index);
        self.restart();
        Ok(removed)
    }

    /// Move an instruction from `from` to `to`. Restarts the program.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::EntryOutOfRange`] if either index is past the end.
    pub fn move_entry(&mut self, program: usize, from: usize, to: usize) -> Result<(), ActionError> {
        for entry in [from, to] {
            if entry >= self.entries.len() {
                return Err(ActionError::EntryOutOfRange { program, entry });
            }
        }
        let moved = self.entries.remove(from);
        self.entries.insert(to, moved);
        self.restart();
        Ok(())
    }

    /// Shift an instruction's repeat target by `delta`, keeping it at least 1.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::EntryOutOfRange`] if `index` is past the end.
    pub fn adjust_repeat(&mut self, program: usize, index: usize, delta: i64) -> Result<(), ActionError> {
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(ActionError::EntryOutOfRange {
                program,
                entry: index,
            })?;
        let target = i64::from(entry.max_count).saturating_add(delta).max(1);
        entry.max_count = u32::try_from(target).unwrap_or(u32::MAX);
        Ok(())
    }

    /// Execute the current instruction once per assigned processor.
    ///
    /// `run` is called for every processor; its outcome does not affect
    /// progress. The repeat counter then increments once. When it reaches the
    /// target the pointer advances, and running off the end restarts the
    /// whole program.
    pub fn step(&mut self, mut run: impl FnMut(CommandId)) {
        if self.assigned_processors == 0 || self.entries.is_empty() {
            return;
        }
        if self.instruction_pointer >= self.entries.len() {
            self.restart();
        }

        let pointer = self.instruction_pointer;
        let command = self.entries[pointer].command;
        for _ in 0..self.assigned_processors {
            run(command);
        }

        let entry = &mut self.entries[pointer];
        entry.count = entry.count.saturating_add(1);
        if entry.count >= entry.max_count {
            self.instruction_pointer += 1;
            if self.instruction_pointer >= self.entries.len() {
                self.restart();
            }
        }
    }
}

/// Countdown that fires every `interval` ticks, starting with the first.
///
/// The period is exactly `interval` ticks: after firing the countdown restarts
/// at `interval - 1`, not `interval`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CycleTimer {
    /// Ticks between firings.
    pub interval: u32,
    /// Ticks left before the next firing.
    pub remaining: u32,
}

impl CycleTimer {
    /// Create a timer that fires on its first tick.
    #[must_use]
    pub const fn new(interval: u32) -> Self {
        Self {
            interval,
            remaining: 0,
        }
    }

    /// Advance one tick. Returns `true` when the cycle fires.
    pub fn tick(&mut self) -> bool {
        if self.remaining > 0 {
            self.remaining -= 1;
            false
        } else {
            self.remaining = self.interval.saturating_sub(1);
            true
        }
    }
}

/// Whole processors available from a storage value.
#[must_use]
pub fn processor_capacity(storage: Fixed) -> u32 {
    u32::try_from(storage.floor().to_num::<i64>().max(0)).unwrap_or(u32::MAX)
}

/// Distribute processors across programs in program order.
///
/// Each program keeps its claim if it fits in what is left; otherwise it is
/// clamped to the remainder, and every later program gets nothing.
///
/// # Arguments
/// * `programs` - Programs in priority order; claims are clamped in place
/// * `capacity` - Total processors in the pool
///
/// # Returns
/// Processors left unclaimed
pub fn processor_allocation_system(programs: &mut [Program], capacity: u32) -> u32 {
    let mut free = capacity;
    for program in programs.iter_mut() {
        if program.assigned_processors <= free {
            free -= program.assigned_processors;
        } else {
            program.assigned_processors = free;
            free = 0;
        }
    }
    free
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program(commands: &[u32], processors: u32) -> Program {
        let mut p = Program {
            assigned_processors: processors,
            ..Program::default()
        };
        for c in commands {
            p.append(CommandId::new(*c));
        }
        p
    }

    #[test]
    fn test_allocation_is_greedy_in_order() {
        let mut programs = vec![program(&[], 3), program(&[], 5), program(&[], 2)];
        let free = processor_allocation_system(&mut programs, 6);
        assert_eq!(programs[0].assigned_processors, 3);
        assert_eq!(programs[1].assigned_processors, 3);
        assert_eq!(programs[2].assigned_processors, 0);
        assert_eq!(free, 0);
    }

    #[test]
    fn test_allocation_reports_free() {
        let mut programs = vec![program(&[], 1), program(&[], 0)];
        assert_eq!(processor_allocation_system(&mut programs, 4), 3);
    }

    #[test]
    fn test_step_runs_once_per_processor() {
        let mut p = program(&[7], 3);
        let mut runs = Vec::new();
        p.step(|c| runs.push(c));
        assert_eq!(runs, vec![CommandId::new(7); 3]);
    }

    #[test]
    fn test_step_wraps_and_resets_counters() {
        let mut p = program(&[1, 2], 1);
        p.step(|_| {});
        assert_eq!(p.instruction_pointer, 1);
        assert_eq!(p.entries[0].count, 1);
        p.step(|_| {});
        assert_eq!(p.instruction_pointer, 0);
        assert!(p.entries.iter().all(|e| e.count == 0));
    }

    #[test]
    fn test_repeat_target_holds_pointer() {
        let mut p = program(&[1, 2], 1);
        p.adjust_repeat(0, 0, 2).unwrap();
        assert_eq!(p.entries[0].max_count, 3);
        let mut runs = Vec::new();
        for _ in 0..4 {
            p.step(|c| runs.push(c.0));
        }
        assert_eq!(runs, vec![1, 1, 1, 2]);
    }

    #[test]
    fn test_adjust_repeat_floor_is_one() {
        let mut p = program(&[1], 1);
        p.adjust_repeat(0, 0, -10).unwrap();
        assert_eq!(p.entries[0].max_count, 1);
        assert!(p.adjust_repeat(0, 5, 1).is_err());
    }

    #[test]
    fn test_edits_restart_program() {
        let mut p = program(&[1, 2, 3], 1);
        p.step(|_| {});
        assert_eq!(p.instruction_pointer, 1);

        p.move_entry(0, 2, 0).unwrap();
        assert_eq!(p.instruction_pointer, 0);
        let order: Vec<_> = p.entries.iter().map(|e| e.command.0).collect();
        assert_eq!(order, vec![3, 1, 2]);

        p.step(|_| {});
        p.remove(0, 0).unwrap();
        assert_eq!(p.instruction_pointer, 0);
        assert!(p.entries.iter().all(|e| e.count == 0));
        assert!(p.move_entry(0, 0, 9).is_err());
    }

    #[test]
    fn test_idle_program_does_nothing() {
        let mut p = program(&[1], 0);
        let mut ran = false;
        p.step(|_| ran = true);
        assert!(!ran);
        assert_eq!(p.entries[0].count, 0);
    }

    #[test]
    fn test_cycle_timer_fires_first_then_every_interval() {
        let mut timer = CycleTimer::new(4);
        let fired: Vec<_> = (0..9).map(|_| timer.tick()).collect();
        assert_eq!(
            fired,
            vec![true, false, false, false, true, false, false, false, true]
        );
    }

    #[test]
    fn test_processor_capacity_floors() {
        assert_eq!(processor_capacity(Fixed::from_num(3.7)), 3);
        assert_eq!(processor_capacity(Fixed::from_num(-1)), 0);
    }
}
