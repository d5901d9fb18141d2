use serde::{Deserialize, Serialize};

use super::engine::TimerEngine;

/// Which countdown a pause applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerSlot {
    Focus,
    Rest,
}

/// The focus and rest countdowns of one session.
///
/// Both are plain [`TimerEngine`]s; prompts pause and resume them through
/// this type so that every pause has a matching resume on the same slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSet {
    focus: TimerEngine,
    rest: TimerEngine,
}

impl TimerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: TimerSlot) -> &TimerEngine {
        match slot {
            TimerSlot::Focus => &self.focus,
            TimerSlot::Rest => &self.rest,
        }
    }

    pub(crate) fn get_mut(&mut self, slot: TimerSlot) -> &mut TimerEngine {
        match slot {
            TimerSlot::Focus => &mut self.focus,
            TimerSlot::Rest => &mut self.rest,
        }
    }

    pub fn focus(&self) -> &TimerEngine {
        &self.focus
    }

    pub fn rest(&self) -> &TimerEngine {
        &self.rest
    }

    /// The countdown currently advancing, focus first.
    pub fn active_slot(&self) -> Option<TimerSlot> {
        if self.focus.is_active() {
            Some(TimerSlot::Focus)
        } else if self.rest.is_active() {
            Some(TimerSlot::Rest)
        } else {
            None
        }
    }

    /// Pause whichever countdown is advancing and report which one.
    pub(crate) fn pause_active(&mut self) -> Option<TimerSlot> {
        let slot = self.active_slot()?;
        self.get_mut(slot).pause();
        Some(slot)
    }

    pub(crate) fn resume(&mut self, slot: TimerSlot) {
        self.get_mut(slot).resume();
    }

    pub(crate) fn cancel_all(&mut self) {
        self.focus.cancel();
        self.rest.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pause_active_prefers_focus() {
        let mut timers = TimerSet::new();
        timers.get_mut(TimerSlot::Focus).start(10);
        timers.get_mut(TimerSlot::Rest).start(10);
        assert_eq!(timers.pause_active(), Some(TimerSlot::Focus));
        assert!(!timers.focus().is_active());
        assert!(timers.rest().is_active());
    }

    #[test]
    fn pause_active_with_nothing_running() {
        let mut timers = TimerSet::new();
        assert_eq!(timers.pause_active(), None);
    }

    #[test]
    fn resume_targets_the_paused_slot() {
        let mut timers = TimerSet::new();
        timers.get_mut(TimerSlot::Rest).start(5);
        let slot = timers.pause_active().unwrap();
        assert_eq!(slot, TimerSlot::Rest);
        timers.resume(slot);
        assert!(timers.rest().is_active());
        assert!(!timers.focus().is_open());
    }
}
