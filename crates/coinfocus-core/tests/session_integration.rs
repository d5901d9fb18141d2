//! Integration tests for the multi-round session flow.
//!
//! These drive the scheduler the way a host does: one `tick()` per second,
//! reacting to the returned events and answering prompts in between.

use coinfocus_core::reward::RewardCalculator;
use coinfocus_core::{
    ConfirmRequest, SessionConfig, SessionEvent, SessionPhase, SessionScheduler, SettlementReceipt,
};

fn scheduler(rest_secs: u64, seed: u64) -> SessionScheduler {
    let config = SessionConfig {
        rest_duration_secs: rest_secs,
        ..SessionConfig::default()
    };
    SessionScheduler::with_rewards(config, RewardCalculator::seeded(seed))
}

/// Tick until settlement, skipping into the next round whenever a rest ends.
fn drive_to_settlement(s: &mut SessionScheduler, limit: usize) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    for _ in 0..limit {
        if let Some(event) = s.tick() {
            let done = event.is_settlement();
            let rest_over = matches!(event, SessionEvent::RestFinished { .. });
            events.push(event);
            if done {
                break;
            }
            if rest_over {
                events.extend(s.finish_rest());
            }
        }
    }
    events
}

#[test]
fn test_one_minute_in_three_rounds_end_to_end() {
    let mut s = scheduler(3, 11);
    s.create_session("Math", 1.0, 0.4).unwrap();
    assert_eq!(s.plan().total_rounds, 3);
    assert_eq!(s.plan().round_duration_secs, 24);
    assert_eq!(s.plan().last_round_duration_secs, 12);

    let events = drive_to_settlement(&mut s, 500);
    let kinds: Vec<&str> = events
        .iter()
        .map(|e| match e {
            SessionEvent::RestStarted { .. } => "rest",
            SessionEvent::RestFinished { .. } => "rest_done",
            SessionEvent::RoundStarted { .. } => "round",
            SessionEvent::SettlementOpened { .. } => "settle",
            _ => "other",
        })
        .collect();
    assert_eq!(
        kinds,
        vec!["rest", "rest_done", "round", "rest", "rest_done", "round", "settle"]
    );

    match &events[0] {
        SessionEvent::RestStarted {
            completed_rounds,
            accrued_coins,
            ..
        } => {
            assert_eq!(*completed_rounds, 1);
            assert_eq!(*accrued_coins, 2);
        }
        other => panic!("unexpected {other:?}"),
    }
    match &events[5] {
        SessionEvent::RoundStarted {
            round,
            duration_secs,
            ..
        } => {
            assert_eq!(*round, 3);
            assert_eq!(*duration_secs, 12);
        }
        other => panic!("unexpected {other:?}"),
    }
    match events.last() {
        Some(SessionEvent::SettlementOpened {
            base_coins,
            bonus_coins,
            completed_rounds,
            early,
            ..
        }) => {
            assert_eq!(*base_coins, 5);
            assert!(*bonus_coins >= 1);
            assert_eq!(*completed_rounds, 3);
            assert!(!early);
        }
        other => panic!("unexpected {other:?}"),
    }

    assert_eq!(s.phase(), SessionPhase::Settling);
    assert_eq!(s.total_focused_seconds(), 23 + 23 + 11);
}

#[test]
fn test_newer_prompt_preempts_older() {
    let mut s = scheduler(3, 1);
    s.create_session("Math", 1.0, 1.0).unwrap();

    let mut a = s.request_confirm(ConfirmRequest::new("A", "first"));
    let mut b = s.request_confirm(ConfirmRequest::new("B", "second"));

    assert_eq!(a.try_resolved(), Some(false));
    assert_eq!(b.try_resolved(), None);
    assert_eq!(s.pending_prompt().map(|p| p.title()), Some("B"));
    assert!(!s.focus_timer().is_active());

    s.confirm_prompt().unwrap();
    assert_eq!(b.try_resolved(), Some(true));
    assert!(s.focus_timer().is_active());
}

#[test]
fn test_accrual_is_monotonic_and_stops_while_paused() {
    let mut s = scheduler(3, 1);
    s.create_session("Math", 2.0, 2.0).unwrap();

    let mut last = 0;
    for _ in 0..20 {
        s.tick();
        let now = s.total_focused_seconds();
        assert_eq!(now, last + 1);
        last = now;
    }

    let _prompt = s.request_confirm(ConfirmRequest::new("Finish early", "Stop now?"));
    for _ in 0..30 {
        s.tick();
        assert_eq!(s.total_focused_seconds(), last);
    }

    s.cancel_prompt();
    s.tick();
    assert_eq!(s.total_focused_seconds(), last + 1);
}

#[test]
fn test_cancel_forfeits_reward() {
    let mut s = scheduler(3, 1);
    s.create_session("Math", 1.0, 0.4).unwrap();
    for _ in 0..40 {
        if let Some(SessionEvent::RestFinished { .. }) = s.tick() {
            s.finish_rest();
        }
    }
    assert!(s.total_focused_seconds() > 0);

    let event = s.cancel().unwrap();
    assert!(matches!(event, SessionEvent::SessionCancelled { .. }));
    assert_eq!(s.reward().total(), 0);
    assert!(s.settlement_receipt().is_none());

    let mut sink: Vec<SettlementReceipt> = Vec::new();
    assert_eq!(s.acknowledge_settlement(&mut sink).unwrap(), None);
    assert!(sink.is_empty());

    for _ in 0..100 {
        assert!(s.tick().is_none());
    }
}

#[test]
fn test_finish_early_during_rest() {
    let mut s = scheduler(30, 4);
    s.create_session("Math", 1.0, 0.4).unwrap();
    let rest = drive_to_settlement(&mut s, 24);
    assert!(matches!(rest.last(), Some(SessionEvent::RestStarted { .. })));

    let event = s.finish_early().unwrap();
    match event {
        SessionEvent::SettlementOpened {
            base_coins,
            completed_rounds,
            early,
            ..
        } => {
            assert_eq!(base_coins, 2);
            assert_eq!(completed_rounds, 1);
            assert!(early);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(!s.rest_timer().is_open());
}

#[test]
fn test_bonus_stays_fixed_through_acknowledgement() {
    let mut s = scheduler(3, 77);
    s.create_session("Read", 10.0, 10.0).unwrap();
    let events = drive_to_settlement(&mut s, 700);
    let Some(SessionEvent::SettlementOpened { bonus_coins, .. }) = events.last().cloned() else {
        panic!("no settlement");
    };

    let receipt = s.settlement_receipt().unwrap();
    assert_eq!(receipt.bonus_coins, bonus_coins);
    assert_eq!(receipt.base_coins, 50);

    let mut sink: Vec<SettlementReceipt> = Vec::new();
    s.acknowledge_settlement(&mut sink).unwrap();
    assert_eq!(sink[0].bonus_coins, bonus_coins);
    assert_eq!(sink[0].total_coins(), 50 + bonus_coins);
}

#[tokio::test]
async fn test_prompt_future_resolves_after_confirm() {
    let mut s = scheduler(3, 1);
    s.create_session("Math", 1.0, 1.0).unwrap();
    let answer = s.request_confirm(ConfirmRequest::new("Skip rest", "Start the next round?"));
    s.confirm_prompt().unwrap();
    assert!(answer.await);
}

#[tokio::test]
async fn test_cancel_resolves_pending_prompt_false() {
    let mut s = scheduler(3, 1);
    s.create_session("Math", 1.0, 1.0).unwrap();
    let answer = s.request_confirm(ConfirmRequest::new("Give up", "Lose this session's coins?"));
    s.cancel();
    assert!(!answer.await);
    assert!(s.pending_prompt().is_none());
}
