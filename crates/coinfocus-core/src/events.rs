use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every session transition produces an Event.
/// Presentation reacts to them (open rest view, open settlement, close all).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    SessionCreated {
        task_name: String,
        total_rounds: u32,
        round_duration_secs: u64,
        last_round_duration_secs: u64,
        at: DateTime<Utc>,
    },
    RoundStarted {
        round: u32,
        total_rounds: u32,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    /// A non-final round ran out; the rest view opens.
    RestStarted {
        completed_rounds: u32,
        total_rounds: u32,
        accrued_coins: u64,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    /// The rest countdown reached zero; the next round may start.
    RestFinished {
        at: DateTime<Utc>,
    },
    /// The reward is final and the settlement view opens.
    SettlementOpened {
        base_coins: u64,
        bonus_coins: u64,
        focused_minutes: f64,
        completed_rounds: u32,
        early: bool,
        at: DateTime<Utc>,
    },
    /// Session forfeited; all session views close.
    SessionCancelled {
        at: DateTime<Utc>,
    },
    /// Settled reward consumed; all session views close.
    SessionReset {
        at: DateTime<Utc>,
    },
}

impl SessionEvent {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            SessionEvent::SessionCreated { at, .. }
            | SessionEvent::RoundStarted { at, .. }
            | SessionEvent::RestStarted { at, .. }
            | SessionEvent::RestFinished { at }
            | SessionEvent::SettlementOpened { at, .. }
            | SessionEvent::SessionCancelled { at }
            | SessionEvent::SessionReset { at } => *at,
        }
    }

    pub fn is_settlement(&self) -> bool {
        matches!(self, SessionEvent::SettlementOpened { .. })
    }
}
