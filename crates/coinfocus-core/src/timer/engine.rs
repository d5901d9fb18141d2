//! Countdown engine.
//!
//! A single one-second-granularity countdown. It does not use internal
//! threads or clocks - the owner calls `tick()` once per wall-clock second.
//!
//! ## State Transitions
//!
//! ```text
//! Closed -> start -> Active <-> (pause/resume) Paused
//! Active -> time_left == 0 -> owner transitions out (stop/cancel)
//! ```
//!
//! `is_open` and `is_active` are tracked separately so a paused or stopped
//! countdown stays visible to presentation code.
//!
//! ## Usage
//!
//! ```
//! use coinfocus_core::timer::TimerEngine;
//!
//! let mut engine = TimerEngine::new();
//! engine.start(60);
//! assert_eq!(engine.time_left(), 59);
//! engine.tick();
//! assert_eq!(engine.time_left(), 58);
//! ```

use serde::{Deserialize, Serialize};

/// Core countdown engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerEngine {
    is_open: bool,
    is_active: bool,
    /// Activity before the last `pause()`, consumed by `resume()`.
    was_active_before_pause: bool,
    /// Remaining seconds.
    time_left: u64,
    /// Length of the current countdown in seconds.
    total_time: u64,
}

impl TimerEngine {
    /// Create a closed, inactive countdown.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn was_active_before_pause(&self) -> bool {
        self.was_active_before_pause
    }

    pub fn time_left(&self) -> u64 {
        self.time_left
    }

    pub fn total_time(&self) -> u64 {
        self.total_time
    }

    /// True once the countdown has run out while open.
    pub fn is_exhausted(&self) -> bool {
        self.is_open && self.time_left == 0
    }

    /// 0.0 .. 100.0 progress within the current countdown.
    pub fn progress_pct(&self) -> f64 {
        if self.total_time == 0 {
            return 0.0;
        }
        (self.total_time - self.time_left) as f64 / self.total_time as f64 * 100.0
    }

    pub fn minutes_left(&self) -> u64 {
        self.time_left / 60
    }

    pub fn seconds_left(&self) -> u64 {
        self.time_left % 60
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a countdown of `duration_secs`.
    ///
    /// The first second counts as already elapsed, so a 60 second countdown
    /// shows 59 immediately and reaches 0 after 59 ticks.
    pub fn start(&mut self, duration_secs: u64) {
        debug_assert!(duration_secs > 0, "countdown duration must be positive");
        self.total_time = duration_secs;
        self.time_left = duration_secs.saturating_sub(1);
        self.is_active = true;
        self.is_open = true;
        self.was_active_before_pause = false;
    }

    /// Advance one second. Returns true if the countdown was decremented.
    pub fn tick(&mut self) -> bool {
        if self.is_active && self.time_left > 0 {
            self.time_left -= 1;
            true
        } else {
            false
        }
    }

    pub fn pause(&mut self) {
        if self.is_active {
            self.was_active_before_pause = true;
            self.is_active = false;
        } else {
            self.was_active_before_pause = false;
        }
    }

    /// Reactivates only if the countdown was running before `pause()` and
    /// still has time left. A running countdown is left alone.
    pub fn resume(&mut self) {
        if self.is_active {
            return;
        }
        self.is_active = self.was_active_before_pause && self.time_left > 0;
        self.was_active_before_pause = false;
    }

    /// Halt without closing; the remaining time stays visible.
    pub fn stop(&mut self) {
        self.is_active = false;
        self.was_active_before_pause = false;
    }

    pub fn cancel(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_counts_first_second_as_elapsed() {
        let mut engine = TimerEngine::new();
        engine.start(60);
        assert!(engine.is_open());
        assert!(engine.is_active());
        assert_eq!(engine.total_time(), 60);
        assert_eq!(engine.time_left(), 59);
    }

    #[test]
    fn tick_stops_at_zero() {
        let mut engine = TimerEngine::new();
        engine.start(3);
        assert!(engine.tick());
        assert!(engine.tick());
        assert_eq!(engine.time_left(), 0);
        assert!(!engine.tick());
        assert_eq!(engine.time_left(), 0);
        assert!(engine.is_exhausted());
    }

    #[test]
    fn tick_on_closed_timer_is_noop() {
        let mut engine = TimerEngine::new();
        assert!(!engine.tick());
        assert_eq!(engine, TimerEngine::new());
    }

    #[test]
    fn pause_resume_restores_activity() {
        let mut engine = TimerEngine::new();
        engine.start(10);
        engine.pause();
        assert!(!engine.is_active());
        assert!(engine.is_open());
        assert!(engine.was_active_before_pause());
        assert!(!engine.tick());
        assert_eq!(engine.time_left(), 9);

        engine.resume();
        assert!(engine.is_active());
        assert!(!engine.was_active_before_pause());
    }

    #[test]
    fn resume_without_pause_is_noop() {
        let mut engine = TimerEngine::new();
        engine.start(10);
        engine.resume();
        assert!(engine.is_active());
        engine.stop();
        engine.resume();
        assert!(!engine.is_active());
    }

    #[test]
    fn pausing_a_stopped_timer_does_not_reactivate_on_resume() {
        let mut engine = TimerEngine::new();
        engine.start(10);
        engine.stop();
        engine.pause();
        assert!(!engine.was_active_before_pause());
        engine.resume();
        assert!(!engine.is_active());
    }

    #[test]
    fn resume_at_zero_stays_inactive() {
        let mut engine = TimerEngine::new();
        engine.start(2);
        engine.tick();
        engine.pause();
        assert_eq!(engine.time_left(), 0);
        engine.resume();
        assert!(!engine.is_active());
    }

    #[test]
    fn stop_keeps_view_open() {
        let mut engine = TimerEngine::new();
        engine.start(30);
        engine.tick();
        engine.stop();
        assert!(engine.is_open());
        assert!(!engine.is_active());
        assert_eq!(engine.time_left(), 28);
        assert_eq!(engine.total_time(), 30);
    }

    #[test]
    fn cancel_clears_everything() {
        let mut engine = TimerEngine::new();
        engine.start(30);
        engine.pause();
        engine.cancel();
        assert_eq!(engine, TimerEngine::new());
    }

    #[test]
    fn derived_views() {
        let mut engine = TimerEngine::new();
        engine.start(125);
        assert_eq!(engine.minutes_left(), 2);
        assert_eq!(engine.seconds_left(), 4);
        assert!((engine.progress_pct() - 0.8).abs() < 1e-9);
    }
}
