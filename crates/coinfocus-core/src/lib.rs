//! # Coinfocus Core Library
//!
//! This library provides the core logic for Coinfocus, a focus timer that
//! pays children in coins for the time they actually spend concentrating.
//! All operations are available through the standalone CLI binary; any
//! other front end is a thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Session Scheduler**: Splits a task into rounds separated by rests and
//!   drives them from a once-per-second `tick()` supplied by the host
//! - **Reward**: Counts focused seconds and turns them into base and bonus coins
//! - **Prompts**: A single pending confirmation or PIN prompt that pauses the
//!   running countdown until it is answered
//! - **Ledger**: JSON-backed coin records with parent approval
//! - **Storage**: TOML-based configuration in the data directory
//!
//! ## Key Components
//!
//! - [`SessionScheduler`]: Multi-round session state machine
//! - [`TimerEngine`]: Single countdown used for both rounds and rests
//! - [`RewardCalculator`]: Focused-second accounting
//! - [`InterruptionCoordinator`]: Blocking prompt arbitration
//! - [`CoinLedger`]: Income and expense records
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod ledger;
pub mod prompt;
pub mod reward;
pub mod session;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, LedgerError, PromptError, ValidationError};
pub use events::SessionEvent;
pub use ledger::{CoinLedger, CoinRecord, ParentLock};
pub use prompt::{
    ConfirmRequest, InterruptionCoordinator, PendingConfirm, PendingPin, PinCode, PinRequest,
};
pub use reward::{RewardCalculator, RewardState};
pub use session::{SessionPhase, SessionPlan, SessionScheduler, SettlementReceipt, SettlementSink};
pub use storage::{Config, SessionConfig};
pub use timer::{TimerEngine, TimerSet, TimerSlot};
