use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Convert user-facing minutes to whole seconds.
///
/// # Errors
/// Rejects non-finite or non-positive minutes and values that round to
/// zero seconds.
pub fn minutes_to_secs(field: &str, minutes: f64) -> Result<u64, ValidationError> {
    if !minutes.is_finite() || minutes <= 0.0 {
        return Err(ValidationError::invalid(
            field,
            format!("expected a positive number of minutes, got {minutes}"),
        ));
    }
    let secs = (minutes * 60.0).round();
    if secs < 1.0 {
        return Err(ValidationError::invalid(
            field,
            format!("{minutes} minutes is shorter than one second"),
        ));
    }
    if secs > u32::MAX as f64 {
        return Err(ValidationError::invalid(field, "duration is too long"));
    }
    Ok(secs as u64)
}

/// Round layout derived from a total and a per-round length.
///
/// The total is never truncated: a remainder becomes a shorter final round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundPlan {
    pub total_secs: u64,
    pub round_duration_secs: u64,
    pub last_round_duration_secs: u64,
    pub total_rounds: u32,
}

impl RoundPlan {
    /// Both arguments must be positive.
    pub fn from_secs(total_secs: u64, round_secs: u64) -> Self {
        debug_assert!(total_secs > 0 && round_secs > 0);
        let round_secs = round_secs.max(1);
        let total_rounds = total_secs.div_ceil(round_secs).max(1);
        let remainder = total_secs % round_secs;
        let last_round_duration_secs = if remainder > 0 { remainder } else { round_secs };
        Self {
            total_secs,
            round_duration_secs: round_secs,
            last_round_duration_secs,
            total_rounds: u32::try_from(total_rounds).unwrap_or(u32::MAX),
        }
    }

    /// # Errors
    /// See [`minutes_to_secs`].
    pub fn from_minutes(total_minutes: f64, round_minutes: f64) -> Result<Self, ValidationError> {
        let total = minutes_to_secs("total_minutes", total_minutes)?;
        let round = minutes_to_secs("round_minutes", round_minutes)?;
        Ok(Self::from_secs(total, round))
    }

    /// Length of the 1-indexed `round`; the final round may be shorter.
    pub fn duration_of(&self, round: u32) -> u64 {
        if round >= self.total_rounds {
            self.last_round_duration_secs
        } else {
            self.round_duration_secs
        }
    }

    pub fn durations(&self) -> Vec<u64> {
        (1..=self.total_rounds).map(|r| self.duration_of(r)).collect()
    }
}

/// Multi-round contract of the running session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPlan {
    pub task_name: String,
    pub is_active: bool,
    pub session_start_time: Option<DateTime<Utc>>,
    pub round_duration_secs: u64,
    pub last_round_duration_secs: u64,
    /// 0 while inactive.
    pub total_rounds: u32,
    /// 1-indexed, 0 while inactive.
    pub current_round: u32,
    pub completed_rounds: u32,
}

impl SessionPlan {
    pub(crate) fn begin(task_name: &str, rounds: &RoundPlan, at: DateTime<Utc>) -> Self {
        Self {
            task_name: task_name.to_string(),
            is_active: true,
            session_start_time: Some(at),
            round_duration_secs: rounds.round_duration_secs,
            last_round_duration_secs: rounds.last_round_duration_secs,
            total_rounds: rounds.total_rounds,
            current_round: 1,
            completed_rounds: 0,
        }
    }

    pub fn is_last_round(&self) -> bool {
        self.is_active && self.current_round == self.total_rounds
    }

    /// Countdown length for the current round.
    pub fn current_round_duration_secs(&self) -> u64 {
        if self.is_last_round() {
            self.last_round_duration_secs
        } else {
            self.round_duration_secs
        }
    }
}
