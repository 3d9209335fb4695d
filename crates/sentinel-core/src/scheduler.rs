//! Scheduled tasks - delayed one-shots and recurring ticks
//!
//! The scheduler holds no clock of its own. The engine asks for whatever
//! is due at a given time and runs it on the same context that owns the
//! state, so task bodies never race a command.
//!
//! Due times saturate at `u64::MAX`, the end of the clock. A recurring
//! task re-armed past that point stays pending but never fires again.

use sentinel_logic::resources::FuelType;
use serde::{Deserialize, Serialize};

/// Work a timer can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Task {
    /// Every machine burns one unit.
    DecayFuel,
    /// A drained station becomes available again.
    Replenish(FuelType),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    due_ms: u64,
    seq: u64,
    period_ms: Option<u64>,
    task: Task,
    /// Re-armed past the end of the clock.
    parked: bool,
}

/// Pending timers, fired in `(due_ms, seq)` order.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    entries: Vec<Entry>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` once, `delay_ms` after `now_ms`.
    pub fn schedule_once(&mut self, now_ms: u64, delay_ms: u64, task: Task) {
        self.push(now_ms.saturating_add(delay_ms), None, task);
    }

    /// Run `task` every `period_ms`, first at `now_ms + period_ms`.
    ///
    /// Recurring tasks always reschedule; there is no cancellation.
    pub fn schedule_every(&mut self, now_ms: u64, period_ms: u64, task: Task) {
        // A zero period would refire forever within one poll.
        let period_ms = period_ms.max(1);
        self.push(now_ms.saturating_add(period_ms), Some(period_ms), task);
    }

    /// Remove and return the earliest task due at or before `now_ms`,
    /// with the time it was due. Recurring tasks are re-armed one period
    /// after their due time.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<(u64, Task)> {
        let (index, _) = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.parked && e.due_ms <= now_ms)
            .min_by_key(|(_, e)| (e.due_ms, e.seq))?;

        let entry = self.entries.swap_remove(index);
        if let Some(period_ms) = entry.period_ms {
            match entry.due_ms.checked_add(period_ms) {
                Some(next) => self.push(next, Some(period_ms), entry.task),
                None => {
                    self.push(u64::MAX, Some(period_ms), entry.task);
                    if let Some(last) = self.entries.last_mut() {
                        last.parked = true;
                    }
                }
            }
        }
        Some((entry.due_ms, entry.task))
    }

    /// Earliest pending due time.
    pub fn next_due(&self) -> Option<u64> {
        self.entries.iter().map(|e| e.due_ms).min()
    }

    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Count pending entries for `task`.
    pub fn pending_for(&self, task: Task) -> usize {
        self.entries.iter().filter(|e| e.task == task).count()
    }

    fn push(&mut self, due_ms: u64, period_ms: Option<u64>, task: Task) {
        self.entries.push(Entry {
            due_ms,
            seq: self.next_seq,
            period_ms,
            task,
            parked: false,
        });
        self.next_seq = self.next_seq.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(scheduler: &mut Scheduler, now_ms: u64) -> Vec<(u64, Task)> {
        std::iter::from_fn(|| scheduler.pop_due(now_ms)).collect()
    }

    #[test]
    fn one_shot_fires_exactly_once() {
        let mut s = Scheduler::new();
        s.schedule_once(1000, 3000, Task::Replenish(FuelType::Type1));

        assert!(drain(&mut s, 3999).is_empty());
        assert_eq!(
            drain(&mut s, 4000),
            vec![(4000, Task::Replenish(FuelType::Type1))]
        );
        assert!(drain(&mut s, 100_000).is_empty());
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn recurring_task_always_rearms() {
        let mut s = Scheduler::new();
        s.schedule_every(0, 9000, Task::DecayFuel);

        let fired = drain(&mut s, 27_000);
        assert_eq!(
            fired,
            vec![
                (9000, Task::DecayFuel),
                (18_000, Task::DecayFuel),
                (27_000, Task::DecayFuel)
            ]
        );
        assert_eq!(s.pending_for(Task::DecayFuel), 1);
        assert_eq!(s.next_due(), Some(36_000));
    }

    #[test]
    fn ties_fire_in_scheduling_order() {
        let mut s = Scheduler::new();
        s.schedule_once(0, 500, Task::Replenish(FuelType::Type2));
        s.schedule_once(0, 500, Task::Replenish(FuelType::Type1));
        s.schedule_once(0, 100, Task::DecayFuel);

        let tasks: Vec<Task> = drain(&mut s, 500).into_iter().map(|(_, t)| t).collect();
        assert_eq!(
            tasks,
            vec![
                Task::DecayFuel,
                Task::Replenish(FuelType::Type2),
                Task::Replenish(FuelType::Type1)
            ]
        );
    }

    #[test]
    fn interleaves_recurring_and_one_shot() {
        let mut s = Scheduler::new();
        s.schedule_every(0, 9000, Task::DecayFuel);
        s.schedule_once(8000, 3000, Task::Replenish(FuelType::Type1));

        let fired = drain(&mut s, 18_000);
        assert_eq!(
            fired,
            vec![
                (9000, Task::DecayFuel),
                (11_000, Task::Replenish(FuelType::Type1)),
                (18_000, Task::DecayFuel)
            ]
        );
    }

    #[test]
    fn far_future_one_shot_saturates() {
        let mut s = Scheduler::new();
        s.schedule_once(5000, u64::MAX, Task::Replenish(FuelType::Type1));
        assert_eq!(s.next_due(), Some(u64::MAX));
        assert!(drain(&mut s, 1_000_000).is_empty());
        assert_eq!(
            drain(&mut s, u64::MAX),
            vec![(u64::MAX, Task::Replenish(FuelType::Type1))]
        );
    }

    #[test]
    fn recurring_task_parks_at_the_end_of_the_clock() {
        let mut s = Scheduler::new();
        s.schedule_every(u64::MAX - 10, 100, Task::DecayFuel);
        assert_eq!(s.next_due(), Some(u64::MAX));

        assert_eq!(drain(&mut s, u64::MAX), vec![(u64::MAX, Task::DecayFuel)]);
        assert!(drain(&mut s, u64::MAX).is_empty());
        assert_eq!(s.pending_for(Task::DecayFuel), 1);
    }
}
