//! Coin reward accounting.
//!
//! Base coins are a pure function of the focused-second counter and can be
//! recomputed at any time. Bonus coins are drawn once per session at
//! settlement and then held until the reward is reset.

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

/// Base reward rate.
pub const COINS_PER_MINUTE: u64 = 5;

/// Settlement-facing reward pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardState {
    pub base_coins: u64,
    pub bonus_coins: u64,
}

impl RewardState {
    pub fn total(&self) -> u64 {
        self.base_coins + self.bonus_coins
    }
}

/// `ceil(secs / 60 * 5)`, at least 1 once any second was focused.
pub fn base_coins_for(focused_secs: u64) -> u64 {
    if focused_secs == 0 {
        return 0;
    }
    (focused_secs * COINS_PER_MINUTE).div_ceil(60).max(1)
}

/// `floor(random * minutes / 2) + 1`, or 0 when nothing was focused.
pub fn bonus_coins_for<R: Rng + ?Sized>(focused_secs: u64, rng: &mut R) -> u64 {
    if focused_secs == 0 {
        return 0;
    }
    let minutes = focused_secs as f64 / 60.0;
    let draw: f64 = rng.gen();
    (draw * (minutes / 2.0)).floor() as u64 + 1
}

/// Accrues focused seconds and derives the session reward from them.
#[derive(Debug, Clone)]
pub struct RewardCalculator {
    focused_secs: u64,
    state: RewardState,
    bonus_settled: bool,
    rng: Mcg128Xsl64,
}

impl Default for RewardCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl RewardCalculator {
    /// Calculator with an entropy-seeded bonus generator.
    pub fn new() -> Self {
        Self::with_rng(Mcg128Xsl64::from_entropy())
    }

    /// Calculator with a reproducible bonus sequence.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(Mcg128Xsl64::seed_from_u64(seed))
    }

    fn with_rng(rng: Mcg128Xsl64) -> Self {
        Self {
            focused_secs: 0,
            state: RewardState::default(),
            bonus_settled: false,
            rng,
        }
    }

    pub fn state(&self) -> RewardState {
        self.state
    }

    pub fn total_focused_seconds(&self) -> u64 {
        self.focused_secs
    }

    pub fn focused_minutes(&self) -> f64 {
        self.focused_secs as f64 / 60.0
    }

    pub fn is_settled(&self) -> bool {
        self.bonus_settled
    }

    /// Record one second of active focus and refresh the base reward.
    pub fn on_focused_second(&mut self) -> u64 {
        self.focused_secs += 1;
        self.recompute_base()
    }

    /// Idempotent: the same counter always yields the same base reward.
    pub fn recompute_base(&mut self) -> u64 {
        self.state.base_coins = base_coins_for(self.focused_secs);
        self.state.base_coins
    }

    /// Draw the bonus once. Later calls return the value already drawn.
    pub fn settle_bonus(&mut self) -> u64 {
        if !self.bonus_settled {
            self.state.bonus_coins = bonus_coins_for(self.focused_secs, &mut self.rng);
            self.bonus_settled = true;
            tracing::debug!(
                focused_secs = self.focused_secs,
                bonus = self.state.bonus_coins,
                "bonus settled"
            );
        }
        self.state.bonus_coins
    }

    pub fn reset(&mut self) {
        self.focused_secs = 0;
        self.state = RewardState::default();
        self.bonus_settled = false;
    }
}
