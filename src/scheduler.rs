use bevy::prelude::*;

use crate::economy::HarborId;
use crate::messages::ReplenishmentDue;

/// Handle of a scheduled callback, used to cancel or re-arm it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScheduledTimer {
    handle: TimerHandle,
    owner: HarborId,
    due: u64,
}

/// Discrete-tick event scheduler.
///
/// Fires each callback exactly once at a future simulated tick. Ticks only
/// advance through `advance_scheduler`, so every peer replaying the same
/// event stream observes the same firing order (due tick, then handle).
#[derive(Resource, Debug, Clone, Default)]
pub struct Scheduler {
    now: u64,
    next_handle: u64,
    pending: Vec<ScheduledTimer>,
}

impl Scheduler {
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Schedule a callback `delay` ticks from now.
    pub fn schedule(&mut self, owner: HarborId, delay: u64) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.push(ScheduledTimer {
            handle,
            owner,
            due: self.now + delay,
        });
        handle
    }

    /// Cancel a pending callback. No-op when it already fired.
    pub fn cancel(&mut self, handle: TimerHandle) {
        self.pending.retain(|t| t.handle != handle);
    }

    /// Ticks left until the callback fires, if it is still pending.
    pub fn remaining(&self, handle: TimerHandle) -> Option<u64> {
        self.pending
            .iter()
            .find(|t| t.handle == handle)
            .map(|t| t.due.saturating_sub(self.now))
    }

    /// Forget all pending callbacks and jump to the given tick. Used when
    /// restoring a snapshot; callers re-arm their timers afterwards.
    pub fn reset_to(&mut self, now: u64) {
        self.now = now;
        self.pending.clear();
    }

    /// Advance one tick and collect everything now due, ordered by due tick
    /// then handle.
    pub fn advance(&mut self) -> Vec<(TimerHandle, HarborId)> {
        self.now += 1;
        let now = self.now;
        let mut due: Vec<ScheduledTimer> = Vec::new();
        self.pending.retain(|t| {
            if t.due <= now {
                due.push(*t);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|t| (t.due, t.handle));
        due.into_iter().map(|t| (t.handle, t.owner)).collect()
    }
}

/// Plugin driving the scheduler one tick per update.
pub struct SchedulerPlugin;

impl Plugin for SchedulerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Scheduler>()
            .add_message::<ReplenishmentDue>()
            .add_systems(Update, advance_scheduler.in_set(crate::SimSet::Timers));
    }
}

/// Pop due callbacks and notify their owners.
pub fn advance_scheduler(
    mut scheduler: ResMut<Scheduler>,
    mut due: MessageWriter<ReplenishmentDue>,
) {
    for (handle, harbor) in scheduler.advance() {
        due.write(ReplenishmentDue { harbor, handle });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_at_the_due_tick() {
        let mut scheduler = Scheduler::default();
        let h = scheduler.schedule(HarborId(1), 2);

        assert!(scheduler.advance().is_empty());
        let fired = scheduler.advance();
        assert_eq!(fired, vec![(h, HarborId(1))]);
        assert!(scheduler.advance().is_empty());
    }

    #[test]
    fn cancel_prevents_firing() {
        let mut scheduler = Scheduler::default();
        let h = scheduler.schedule(HarborId(1), 1);
        scheduler.cancel(h);
        assert!(scheduler.advance().is_empty());
        assert_eq!(scheduler.remaining(h), None);
    }

    #[test]
    fn simultaneous_timers_fire_in_handle_order() {
        let mut scheduler = Scheduler::default();
        let a = scheduler.schedule(HarborId(2), 1);
        let b = scheduler.schedule(HarborId(3), 1);

        let fired = scheduler.advance();
        assert_eq!(fired, vec![(a, HarborId(2)), (b, HarborId(3))]);
    }

    #[test]
    fn remaining_counts_down() {
        let mut scheduler = Scheduler::default();
        let h = scheduler.schedule(HarborId(1), 3);
        assert_eq!(scheduler.remaining(h), Some(3));
        scheduler.advance();
        assert_eq!(scheduler.remaining(h), Some(2));
    }
}
