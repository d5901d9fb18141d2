//! Multi-round session state machine.
//!
//! The scheduler owns both countdowns, the reward calculator and the prompt
//! coordinator. It has no thread of its own: the host calls [`tick`] once
//! per second and reacts to the returned [`SessionEvent`]s.
//!
//! ## State Transitions
//!
//! ```text
//! Inactive -> Focusing(1) -> Resting -> Focusing(2) -> ... -> Focusing(n) -> Settling -> Inactive
//!                  |                                               |
//!                  +---------- finish_early -----------------------+--> Settling
//! any --cancel--> Inactive (no reward)
//! ```
//!
//! Misuse (ticking while idle, completing a round outside a round, starting
//! a round past the end) is a no-op returning `None`.
//!
//! [`tick`]: SessionScheduler::tick

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::plan::{RoundPlan, SessionPlan};
use super::settlement::{SettlementReceipt, SettlementSink};
use crate::error::{LedgerError, PromptError, ValidationError};
use crate::events::SessionEvent;
use crate::prompt::{
    ConfirmRequest, InterruptionCoordinator, PendingConfirm, PendingPin, PinRequest, PromptView,
};
use crate::reward::{RewardCalculator, RewardState};
use crate::storage::SessionConfig;
use crate::timer::{TimerEngine, TimerSet, TimerSlot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    #[default]
    Inactive,
    /// A round countdown is open (running or paused).
    Focusing,
    /// Between two rounds.
    Resting,
    /// Reward is final and waits for acknowledgement.
    Settling,
}

/// Read-only view for presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub plan: SessionPlan,
    pub focus: TimerEngine,
    pub rest: TimerEngine,
    pub total_focused_seconds: u64,
    pub reward: RewardState,
    pub prompt: Option<PromptView>,
}

#[derive(Debug)]
pub struct SessionScheduler {
    config: SessionConfig,
    plan: SessionPlan,
    phase: SessionPhase,
    timers: TimerSet,
    rewards: RewardCalculator,
    prompts: InterruptionCoordinator,
}

impl SessionScheduler {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_rewards(config, RewardCalculator::new())
    }

    /// Use a specific calculator, e.g. [`RewardCalculator::seeded`] in tests.
    pub fn with_rewards(config: SessionConfig, rewards: RewardCalculator) -> Self {
        Self {
            config,
            plan: SessionPlan::default(),
            phase: SessionPhase::Inactive,
            timers: TimerSet::new(),
            rewards,
            prompts: InterruptionCoordinator::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn plan(&self) -> &SessionPlan {
        &self.plan
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.plan.is_active
    }

    pub fn timers(&self) -> &TimerSet {
        &self.timers
    }

    pub fn focus_timer(&self) -> &TimerEngine {
        self.timers.focus()
    }

    pub fn rest_timer(&self) -> &TimerEngine {
        self.timers.rest()
    }

    pub fn reward(&self) -> RewardState {
        self.rewards.state()
    }

    pub fn total_focused_seconds(&self) -> u64 {
        self.rewards.total_focused_seconds()
    }

    pub fn pending_prompt(&self) -> Option<&PromptView> {
        self.prompts.pending()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            plan: self.plan.clone(),
            focus: self.timers.focus().clone(),
            rest: self.timers.rest().clone(),
            total_focused_seconds: self.rewards.total_focused_seconds(),
            reward: self.rewards.state(),
            prompt: self.prompts.pending().cloned(),
        }
    }

    /// The receipt that acknowledging now would hand to the ledger.
    pub fn settlement_receipt(&self) -> Option<SettlementReceipt> {
        if self.phase != SessionPhase::Settling {
            return None;
        }
        let now = Utc::now();
        let reward = self.rewards.state();
        Some(SettlementReceipt {
            task_name: self.plan.task_name.clone(),
            start_time: self.plan.session_start_time.unwrap_or(now),
            end_time: now,
            focused_seconds: self.rewards.total_focused_seconds(),
            focused_minutes: self.rewards.focused_minutes(),
            completed_rounds: self.plan.completed_rounds,
            base_coins: reward.base_coins,
            bonus_coins: reward.bonus_coins,
        })
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a new session and its first round.
    ///
    /// Any session still running is torn down first without reward.
    ///
    /// # Errors
    /// Rejects an empty task name and minutes that are not positive or
    /// that round to zero seconds. Nothing changes on error.
    pub fn create_session(
        &mut self,
        task_name: &str,
        total_minutes: f64,
        round_minutes: f64,
    ) -> Result<SessionEvent, ValidationError> {
        let task_name = task_name.trim();
        if task_name.is_empty() {
            return Err(ValidationError::invalid("task_name", "task name is required"));
        }
        let rounds = RoundPlan::from_minutes(total_minutes, round_minutes)?;

        if self.plan.is_active {
            debug!(task = %self.plan.task_name, "replacing running session");
            self.teardown();
        }

        self.rewards.reset();
        let now = Utc::now();
        self.plan = SessionPlan::begin(task_name, &rounds, now);
        self.phase = SessionPhase::Focusing;
        self.timers
            .get_mut(TimerSlot::Focus)
            .start(self.plan.current_round_duration_secs());

        info!(
            task = task_name,
            total_rounds = rounds.total_rounds,
            round_secs = rounds.round_duration_secs,
            last_round_secs = rounds.last_round_duration_secs,
            "session created"
        );
        Ok(SessionEvent::SessionCreated {
            task_name: task_name.to_string(),
            total_rounds: rounds.total_rounds,
            round_duration_secs: rounds.round_duration_secs,
            last_round_duration_secs: rounds.last_round_duration_secs,
            at: now,
        })
    }

    /// Like [`create_session`](Self::create_session) with the configured
    /// round override.
    ///
    /// # Errors
    /// See [`create_session`](Self::create_session).
    pub fn create_session_with_config(
        &mut self,
        task_name: &str,
        total_minutes: f64,
    ) -> Result<SessionEvent, ValidationError> {
        let round_minutes = self.config.round_minutes_for(total_minutes);
        self.create_session(task_name, total_minutes, round_minutes)
    }

    /// Advance one second. Call once per second from the host.
    pub fn tick(&mut self) -> Option<SessionEvent> {
        match self.phase {
            SessionPhase::Focusing => {
                let focus = self.timers.get_mut(TimerSlot::Focus);
                if focus.is_active() && focus.tick() {
                    self.rewards.on_focused_second();
                }
                // A countdown paused at zero never reactivates, so close it
                // here once no prompt holds it.
                if focus.is_exhausted() && !self.prompts.is_pending() {
                    focus.stop();
                    return self.complete_current_round();
                }
                None
            }
            SessionPhase::Resting => {
                let rest = self.timers.get_mut(TimerSlot::Rest);
                if rest.is_active() {
                    rest.tick();
                }
                if rest.is_exhausted() && !self.prompts.is_pending() {
                    rest.stop();
                    debug!(round = self.plan.current_round, "rest finished");
                    return Some(SessionEvent::RestFinished { at: Utc::now() });
                }
                None
            }
            SessionPhase::Inactive | SessionPhase::Settling => None,
        }
    }

    /// Close the current round: rest before the next one, or settle after
    /// the last.
    pub fn complete_current_round(&mut self) -> Option<SessionEvent> {
        if self.phase != SessionPhase::Focusing {
            return None;
        }
        self.timers.get_mut(TimerSlot::Focus).stop();
        self.plan.completed_rounds = (self.plan.completed_rounds + 1).min(self.plan.total_rounds);

        if self.plan.current_round >= self.plan.total_rounds {
            return Some(self.settle(false));
        }

        let accrued_coins = self.rewards.recompute_base();
        let duration_secs = self.config.rest_duration_secs.max(1);
        self.timers.get_mut(TimerSlot::Rest).start(duration_secs);
        self.phase = SessionPhase::Resting;
        info!(
            completed = self.plan.completed_rounds,
            total = self.plan.total_rounds,
            accrued_coins,
            "round completed, resting"
        );
        Some(SessionEvent::RestStarted {
            completed_rounds: self.plan.completed_rounds,
            total_rounds: self.plan.total_rounds,
            accrued_coins,
            duration_secs,
            at: Utc::now(),
        })
    }

    /// Begin the next round. No-op after the last round.
    pub fn start_next_round(&mut self) -> Option<SessionEvent> {
        if !self.plan.is_active
            || !matches!(self.phase, SessionPhase::Focusing | SessionPhase::Resting)
            || self.plan.current_round >= self.plan.total_rounds
        {
            return None;
        }
        self.timers.get_mut(TimerSlot::Rest).cancel();
        self.plan.current_round += 1;
        let duration_secs = self.plan.current_round_duration_secs();
        self.timers.get_mut(TimerSlot::Focus).start(duration_secs);
        self.phase = SessionPhase::Focusing;
        info!(
            round = self.plan.current_round,
            total = self.plan.total_rounds,
            duration_secs,
            "round started"
        );
        Some(SessionEvent::RoundStarted {
            round: self.plan.current_round,
            total_rounds: self.plan.total_rounds,
            duration_secs,
            at: Utc::now(),
        })
    }

    /// Leave the rest view, skipping whatever rest remains.
    pub fn finish_rest(&mut self) -> Option<SessionEvent> {
        if self.phase != SessionPhase::Resting {
            return None;
        }
        self.start_next_round()
    }

    /// Settle now with what has been focused so far.
    pub fn finish_early(&mut self) -> Option<SessionEvent> {
        if !matches!(self.phase, SessionPhase::Focusing | SessionPhase::Resting) {
            return None;
        }
        self.timers.get_mut(TimerSlot::Focus).stop();
        self.timers.get_mut(TimerSlot::Rest).cancel();
        Some(self.settle(true))
    }

    /// Abandon the session. The reward is forfeited.
    pub fn cancel(&mut self) -> Option<SessionEvent> {
        if self.phase == SessionPhase::Inactive && !self.plan.is_active {
            return None;
        }
        info!(
            task = %self.plan.task_name,
            focused_secs = self.rewards.total_focused_seconds(),
            "session cancelled"
        );
        self.teardown();
        Some(SessionEvent::SessionCancelled { at: Utc::now() })
    }

    /// Clear a settled session once its reward has been consumed.
    pub fn reset(&mut self) -> Option<SessionEvent> {
        if self.phase == SessionPhase::Inactive && !self.plan.is_active {
            return None;
        }
        self.teardown();
        debug!("session reset");
        Some(SessionEvent::SessionReset { at: Utc::now() })
    }

    /// Hand the settled reward to `sink`, then reset.
    ///
    /// Returns `Ok(None)` when nothing is waiting for settlement.
    ///
    /// # Errors
    /// Propagates the sink's error; the session stays in settlement so the
    /// acknowledgement can be retried.
    pub fn acknowledge_settlement<S: SettlementSink + ?Sized>(
        &mut self,
        sink: &mut S,
    ) -> Result<Option<String>, LedgerError> {
        let Some(receipt) = self.settlement_receipt() else {
            return Ok(None);
        };
        let id = sink.record_settlement(&receipt)?;
        info!(
            id = %id,
            task = %receipt.task_name,
            coins = receipt.total_coins(),
            "settlement recorded"
        );
        self.reset();
        Ok(Some(id))
    }

    // ── Prompts ──────────────────────────────────────────────────────

    pub fn request_confirm(&mut self, request: ConfirmRequest) -> PendingConfirm {
        self.prompts.request(request, &mut self.timers)
    }

    pub fn request_pin(&mut self, request: PinRequest) -> PendingPin {
        self.prompts.request_pin(request, &mut self.timers)
    }

    /// # Errors
    /// Fails if no yes/no prompt is pending.
    pub fn confirm_prompt(&mut self) -> Result<(), PromptError> {
        self.prompts.confirm(&mut self.timers)
    }

    pub fn cancel_prompt(&mut self) -> bool {
        self.prompts.cancel(&mut self.timers)
    }

    /// # Errors
    /// Fails if no PIN prompt is pending or the input is malformed.
    pub fn submit_pin(&mut self, input: &str) -> Result<(), PromptError> {
        self.prompts.submit_pin(input, &mut self.timers)
    }

    // ── Internals ────────────────────────────────────────────────────

    fn settle(&mut self, early: bool) -> SessionEvent {
        let base_coins = self.rewards.recompute_base();
        let bonus_coins = self.rewards.settle_bonus();
        self.phase = SessionPhase::Settling;
        info!(
            task = %self.plan.task_name,
            focused_secs = self.rewards.total_focused_seconds(),
            base_coins,
            bonus_coins,
            early,
            "session settled"
        );
        SessionEvent::SettlementOpened {
            base_coins,
            bonus_coins,
            focused_minutes: self.rewards.focused_minutes(),
            completed_rounds: self.plan.completed_rounds,
            early,
            at: Utc::now(),
        }
    }

    fn teardown(&mut self) {
        self.prompts.abandon();
        self.timers.cancel_all();
        self.rewards.reset();
        self.plan = SessionPlan::default();
        self.phase = SessionPhase::Inactive;
    }
}

impl Default for SessionScheduler {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler(rest_secs: u64) -> SessionScheduler {
        let config = SessionConfig {
            rest_duration_secs: rest_secs,
            ..SessionConfig::default()
        };
        SessionScheduler::with_rewards(config, RewardCalculator::seeded(42))
    }

    fn run_until_event(s: &mut SessionScheduler, limit: usize) -> Option<SessionEvent> {
        (0..limit).find_map(|_| s.tick())
    }

    #[test]
    fn create_starts_round_one() {
        let mut s = scheduler(5);
        let event = s.create_session("Math", 1.0, 0.4).unwrap();
        assert!(matches!(event, SessionEvent::SessionCreated { total_rounds: 3, .. }));
        assert_eq!(s.phase(), SessionPhase::Focusing);
        assert_eq!(s.plan().current_round, 1);
        assert_eq!(s.focus_timer().total_time(), 24);
        assert_eq!(s.focus_timer().time_left(), 23);
        assert!(s.focus_timer().is_active());
    }

    #[test]
    fn single_round_uses_last_duration() {
        let mut s = scheduler(5);
        s.create_session("Read", 1.5, 10.0).unwrap();
        assert_eq!(s.plan().total_rounds, 1);
        assert_eq!(s.focus_timer().total_time(), 90);
    }

    #[test]
    fn create_rejects_bad_input_without_side_effects() {
        let mut s = scheduler(5);
        assert!(s.create_session("", 1.0, 1.0).is_err());
        assert!(s.create_session("   ", 1.0, 1.0).is_err());
        assert!(s.create_session("Math", 0.0, 1.0).is_err());
        assert!(s.create_session("Math", 1.0, -2.0).is_err());
        assert!(s.create_session("Math", f64::NAN, 1.0).is_err());
        assert_eq!(s.phase(), SessionPhase::Inactive);
        assert!(!s.is_active());
    }

    #[test]
    fn ticks_accrue_focused_seconds() {
        let mut s = scheduler(5);
        s.create_session("Math", 1.0, 1.0).unwrap();
        for _ in 0..10 {
            assert!(s.tick().is_none());
        }
        assert_eq!(s.total_focused_seconds(), 10);
        assert_eq!(s.focus_timer().time_left(), 49);
    }

    #[test]
    fn round_exhaustion_opens_rest_then_rest_finishes_once() {
        let mut s = scheduler(3);
        s.create_session("Math", 0.2, 0.1).unwrap();

        let event = run_until_event(&mut s, 100).unwrap();
        assert!(matches!(
            event,
            SessionEvent::RestStarted {
                completed_rounds: 1,
                total_rounds: 2,
                duration_secs: 3,
                ..
            }
        ));
        assert_eq!(s.phase(), SessionPhase::Resting);
        assert_eq!(s.total_focused_seconds(), 5);

        let finished = run_until_event(&mut s, 10).unwrap();
        assert!(matches!(finished, SessionEvent::RestFinished { .. }));
        for _ in 0..5 {
            assert!(s.tick().is_none());
        }

        let started = s.finish_rest().unwrap();
        assert!(matches!(started, SessionEvent::RoundStarted { round: 2, .. }));
        assert_eq!(s.phase(), SessionPhase::Focusing);
        assert!(!s.rest_timer().is_open());
    }

    #[test]
    fn one_second_round_completes_on_first_tick() {
        let mut s = scheduler(3);
        s.create_session("Blink", 1.0 / 60.0, 1.0).unwrap();
        let event = s.tick().unwrap();
        assert!(event.is_settlement());
        assert_eq!(s.total_focused_seconds(), 0);
        assert_eq!(s.reward(), RewardState::default());
    }

    #[test]
    fn last_round_settles_with_bonus() {
        let mut s = scheduler(3);
        s.create_session("Math", 0.5, 1.0).unwrap();
        let event = run_until_event(&mut s, 100).unwrap();
        match event {
            SessionEvent::SettlementOpened {
                base_coins,
                bonus_coins,
                completed_rounds,
                early,
                ..
            } => {
                assert_eq!(base_coins, 3);
                assert_eq!(bonus_coins, 1);
                assert_eq!(completed_rounds, 1);
                assert!(!early);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(s.phase(), SessionPhase::Settling);
        assert!(s.tick().is_none());
    }

    #[test]
    fn start_next_round_is_noop_past_the_end() {
        let mut s = scheduler(3);
        s.create_session("Math", 1.0, 1.0).unwrap();
        assert!(s.start_next_round().is_none());
        assert_eq!(s.plan().current_round, 1);
    }

    #[test]
    fn start_next_round_skips_ahead() {
        let mut s = scheduler(3);
        s.create_session("Math", 3.0, 2.0).unwrap();
        let event = s.start_next_round().unwrap();
        assert!(matches!(
            event,
            SessionEvent::RoundStarted {
                round: 2,
                duration_secs: 60,
                ..
            }
        ));
        assert_eq!(s.focus_timer().total_time(), 60);
    }

    #[test]
    fn misuse_is_a_noop() {
        let mut s = scheduler(3);
        assert!(s.tick().is_none());
        assert!(s.complete_current_round().is_none());
        assert!(s.start_next_round().is_none());
        assert!(s.finish_rest().is_none());
        assert!(s.finish_early().is_none());
        assert!(s.cancel().is_none());
        assert!(s.reset().is_none());
        assert_eq!(s.acknowledge_settlement(&mut Vec::<SettlementReceipt>::new()).unwrap(), None);
    }

    #[test]
    fn finish_early_keeps_focus_view_and_settles() {
        let mut s = scheduler(3);
        s.create_session("Math", 10.0, 10.0).unwrap();
        for _ in 0..150 {
            s.tick();
        }
        let event = s.finish_early().unwrap();
        match event {
            SessionEvent::SettlementOpened {
                base_coins, early, ..
            } => {
                assert_eq!(base_coins, 13);
                assert!(early);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(s.focus_timer().is_open());
        assert!(!s.focus_timer().is_active());
        assert!(s.finish_early().is_none());
    }

    #[test]
    fn cancel_forfeits_reward() {
        let mut s = scheduler(3);
        s.create_session("Math", 1.0, 1.0).unwrap();
        for _ in 0..30 {
            s.tick();
        }
        assert_eq!(s.reward().base_coins, 3);
        let event = s.cancel().unwrap();
        assert!(matches!(event, SessionEvent::SessionCancelled { .. }));
        assert_eq!(s.reward(), RewardState::default());
        assert_eq!(s.total_focused_seconds(), 0);
        assert_eq!(s.plan(), &SessionPlan::default());
        assert!(!s.focus_timer().is_open());
        assert!(s.settlement_receipt().is_none());
    }

    #[test]
    fn prompt_pauses_focus_and_ticks_do_not_accrue() {
        let mut s = scheduler(3);
        s.create_session("Math", 1.0, 1.0).unwrap();
        s.tick();
        let mut answer = s.request_confirm(ConfirmRequest::new("Give up", "Sure?"));
        for _ in 0..20 {
            assert!(s.tick().is_none());
        }
        assert_eq!(s.total_focused_seconds(), 1);

        assert!(s.cancel_prompt());
        assert_eq!(answer.try_resolved(), Some(false));
        s.tick();
        assert_eq!(s.total_focused_seconds(), 2);
    }

    #[test]
    fn prompt_pauses_rest_countdown() {
        let mut s = scheduler(10);
        s.create_session("Math", 0.2, 0.1).unwrap();
        run_until_event(&mut s, 20).unwrap();
        assert_eq!(s.phase(), SessionPhase::Resting);

        let _answer = s.request_confirm(ConfirmRequest::new("Skip rest", "Start now?"));
        let before = s.rest_timer().time_left();
        for _ in 0..5 {
            s.tick();
        }
        assert_eq!(s.rest_timer().time_left(), before);
        s.confirm_prompt().unwrap();
        assert!(s.rest_timer().is_active());
    }

    #[test]
    fn one_second_round_paused_by_prompt_still_completes() {
        let mut s = scheduler(3);
        s.create_session("Math", 61.0 / 60.0, 1.0).unwrap();
        assert!(s.start_next_round().is_some());
        assert_eq!(s.focus_timer().time_left(), 0);

        let mut answer = s.request_confirm(ConfirmRequest::new("Give up", "Sure?"));
        assert!(s.tick().is_none());
        assert_eq!(s.phase(), SessionPhase::Focusing);

        assert!(s.cancel_prompt());
        assert_eq!(answer.try_resolved(), Some(false));
        assert!(!s.focus_timer().is_active());
        let event = s.tick().unwrap();
        assert!(event.is_settlement());
        assert_eq!(s.phase(), SessionPhase::Settling);
    }

    #[test]
    fn one_second_rest_paused_by_prompt_still_finishes() {
        let mut s = scheduler(1);
        s.create_session("Math", 0.2, 0.1).unwrap();
        let started = run_until_event(&mut s, 20).unwrap();
        assert!(matches!(started, SessionEvent::RestStarted { duration_secs: 1, .. }));

        let _answer = s.request_confirm(ConfirmRequest::new("Skip rest", "Start now?"));
        assert!(s.tick().is_none());
        assert!(s.cancel_prompt());
        assert!(!s.rest_timer().is_active());

        let event = s.tick().unwrap();
        assert!(matches!(event, SessionEvent::RestFinished { .. }));
        assert!(s.tick().is_none());
    }

    #[test]
    fn acknowledge_records_receipt_and_resets() {
        let mut s = scheduler(3);
        s.create_session("Math", 0.5, 1.0).unwrap();
        run_until_event(&mut s, 100).unwrap();

        let mut sink: Vec<SettlementReceipt> = Vec::new();
        let id = s.acknowledge_settlement(&mut sink).unwrap();
        assert_eq!(id.as_deref(), Some("1"));
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].task_name, "Math");
        assert_eq!(sink[0].focused_seconds, 29);
        assert_eq!(sink[0].base_coins, 3);
        assert_eq!(s.phase(), SessionPhase::Inactive);
        assert!(!s.is_active());
    }

    #[test]
    fn create_with_config_applies_round_override() {
        let mut s = scheduler(3);
        s.create_session_with_config("Math", 25.0).unwrap();
        assert_eq!(s.plan().total_rounds, 3);
        assert_eq!(s.plan().last_round_duration_secs, 300);

        let mut whole = SessionScheduler::new(SessionConfig {
            round_override_minutes: 0.0,
            ..SessionConfig::default()
        });
        whole.create_session_with_config("Math", 25.0).unwrap();
        assert_eq!(whole.plan().total_rounds, 1);
    }

    #[test]
    fn recreate_abandons_previous_prompt() {
        let mut s = scheduler(3);
        s.create_session("Math", 1.0, 1.0).unwrap();
        let mut answer = s.request_confirm(ConfirmRequest::new("A", "a"));
        s.create_session("Read", 1.0, 1.0).unwrap();
        assert_eq!(answer.try_resolved(), Some(false));
        assert!(s.pending_prompt().is_none());
        assert!(s.focus_timer().is_active());
        assert_eq!(s.plan().task_name, "Read");
    }

    #[test]
    fn snapshot_serializes() {
        let mut s = scheduler(3);
        s.create_session("Math", 1.0, 1.0).unwrap();
        let json = serde_json::to_value(s.snapshot()).unwrap();
        assert_eq!(json["phase"], "focusing");
        assert_eq!(json["plan"]["task_name"], "Math");
    }
}
