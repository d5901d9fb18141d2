//! Session planning and the interactive terminal host.
//!
//! `session run` drives a [`SessionScheduler`] from a one-second interval
//! and reads single-letter commands from stdin. Every event and prompt is
//! printed to stdout as one JSON object per line.

use std::time::Duration;

use clap::Subcommand;
use coinfocus_core::reward::RewardCalculator;
use coinfocus_core::session::RoundPlan;
use coinfocus_core::{
    CoinLedger, Config, ConfirmRequest, LedgerError, PendingConfirm, PendingPin, PinCode,
    PinRequest, SessionConfig, SessionEvent, SessionPhase, SessionScheduler,
};
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use super::emit;

type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

#[derive(Subcommand)]
pub enum SessionAction {
    /// Print the round layout for a task as JSON
    Plan {
        /// Task length in minutes
        #[arg(long, required_unless_present = "preset", conflicts_with = "preset")]
        minutes: Option<f64>,
        /// Take the task length from the configured presets (1-based)
        #[arg(long)]
        preset: Option<usize>,
        /// Round length in minutes (defaults to the configured override)
        #[arg(long)]
        round: Option<f64>,
    },
    /// Run a session in the terminal.
    ///
    /// Commands on stdin: c = give up, f = finish early, s = skip rest,
    /// y / n = answer the open prompt, four digits = answer a PIN prompt.
    Run {
        /// Task name
        #[arg(long)]
        task: String,
        /// Task length in minutes
        #[arg(long, required_unless_present = "preset", conflicts_with = "preset")]
        minutes: Option<f64>,
        /// Take the task length from the configured presets (1-based)
        #[arg(long)]
        preset: Option<usize>,
        /// Round length in minutes (defaults to the configured override)
        #[arg(long)]
        round: Option<f64>,
        /// Rest between rounds in seconds (defaults to config)
        #[arg(long)]
        rest: Option<u64>,
        /// Fixed bonus seed
        #[arg(long, hide = true)]
        seed: Option<u64>,
    },
}

fn task_minutes(
    config: &SessionConfig,
    minutes: Option<f64>,
    preset: Option<usize>,
) -> CliResult<f64> {
    match (minutes, preset) {
        (Some(minutes), _) => Ok(minutes),
        (None, Some(choice)) => Ok(f64::from(config.preset_minutes(choice)?)),
        (None, None) => Err("either --minutes or --preset is required".into()),
    }
}

pub fn run(action: SessionAction) -> CliResult {
    match action {
        SessionAction::Plan {
            minutes,
            preset,
            round,
        } => {
            let config = Config::load()?;
            let minutes = task_minutes(&config.session, minutes, preset)?;
            let round = round.unwrap_or_else(|| config.session.round_minutes_for(minutes));
            let plan = RoundPlan::from_minutes(minutes, round)?;
            let json = serde_json::to_string_pretty(&json!({
                "total_secs": plan.total_secs,
                "total_rounds": plan.total_rounds,
                "round_duration_secs": plan.round_duration_secs,
                "last_round_duration_secs": plan.last_round_duration_secs,
                "durations": plan.durations(),
            }))?;
            println!("{json}");
            Ok(())
        }
        SessionAction::Run {
            task,
            minutes,
            preset,
            round,
            rest,
            seed,
        } => {
            let mut config = Config::load()?;
            if let Some(rest) = rest {
                config.session.rest_duration_secs = rest;
                config.validate()?;
            }
            let minutes = task_minutes(&config.session, minutes, preset)?;
            let rewards = seed.map(RewardCalculator::seeded).unwrap_or_default();
            let mut scheduler = SessionScheduler::with_rewards(config.session, rewards);
            let created = match round {
                Some(round) => scheduler.create_session(&task, minutes, round)?,
                None => scheduler.create_session_with_config(&task, minutes)?,
            };
            let ledger = CoinLedger::open()?;

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let mut host = LiveSession::new(scheduler, ledger);
            emit(&created)?;
            let result = runtime.block_on(host.run());
            // A blocked stdin read must not keep the process alive.
            runtime.shutdown_background();
            result
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Purpose {
    GiveUp,
    FinishEarly,
    SkipRest,
    Collect,
}

enum HostPrompt {
    Confirm {
        purpose: Purpose,
        pending: PendingConfirm,
    },
    Approve {
        record_id: String,
        pending: PendingPin,
    },
}

enum Answer {
    Confirmed(bool),
    Pin(Option<PinCode>),
}

/// Resolves when the open prompt is answered; never resolves without one.
async fn answer(prompt: &mut Option<HostPrompt>) -> Answer {
    match prompt {
        Some(HostPrompt::Confirm { pending, .. }) => Answer::Confirmed(pending.await),
        Some(HostPrompt::Approve { pending, .. }) => Answer::Pin(pending.await),
        None => std::future::pending().await,
    }
}

struct LiveSession {
    scheduler: SessionScheduler,
    ledger: CoinLedger,
    prompt: Option<HostPrompt>,
    stdin_open: bool,
    done: bool,
}

impl LiveSession {
    fn new(scheduler: SessionScheduler, ledger: CoinLedger) -> Self {
        Self {
            scheduler,
            ledger,
            prompt: None,
            stdin_open: true,
            done: false,
        }
    }

    async fn run(&mut self) -> CliResult {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut ticker = tokio::time::interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        while !self.done {
            tokio::select! {
                biased;
                reply = answer(&mut self.prompt), if self.prompt.is_some() => {
                    self.on_answer(reply)?;
                }
                _ = ticker.tick() => {
                    if let Some(event) = self.scheduler.tick() {
                        self.on_event(event)?;
                    }
                }
                line = lines.next_line(), if self.stdin_open => {
                    match line? {
                        Some(line) => self.on_command(line.trim())?,
                        None => self.on_stdin_closed()?,
                    }
                }
            }
        }
        Ok(())
    }

    fn on_event(&mut self, event: SessionEvent) -> CliResult {
        emit(&event)?;
        match event {
            SessionEvent::RestFinished { .. } => {
                if let Some(next) = self.scheduler.finish_rest() {
                    emit(&next)?;
                }
            }
            SessionEvent::SettlementOpened {
                base_coins,
                bonus_coins,
                ..
            } => {
                if self.stdin_open {
                    let request = ConfirmRequest::new(
                        "Settlement",
                        format!("You earned {} coins", base_coins + bonus_coins),
                    )
                    .confirm_label("Collect")
                    .without_cancel();
                    self.open_confirm(Purpose::Collect, request)?;
                } else {
                    self.collect()?;
                }
            }
            SessionEvent::SessionCancelled { .. } => self.done = true,
            _ => {}
        }
        Ok(())
    }

    fn on_command(&mut self, command: &str) -> CliResult {
        let phase = self.scheduler.phase();
        let in_session = matches!(phase, SessionPhase::Focusing | SessionPhase::Resting);
        match command {
            "" => {}
            "c" if in_session => self.open_confirm(
                Purpose::GiveUp,
                ConfirmRequest::new("Give up", "Stop now? This session's coins will be lost.")
                    .confirm_label("Give up")
                    .cancel_label("Keep going"),
            )?,
            "f" if in_session => self.open_confirm(
                Purpose::FinishEarly,
                ConfirmRequest::new("Finish early", "Finish now and collect what you earned?"),
            )?,
            "s" if phase == SessionPhase::Resting => self.open_confirm(
                Purpose::SkipRest,
                ConfirmRequest::new("Skip rest", "Start the next round now?"),
            )?,
            "y" => {
                if let Err(e) = self.scheduler.confirm_prompt() {
                    eprintln!("error: {e}");
                }
            }
            "n" => {
                if !self.scheduler.cancel_prompt() {
                    eprintln!("error: no prompt is open");
                }
            }
            pin if pin.bytes().all(|b| b.is_ascii_digit()) => {
                if let Err(e) = self.scheduler.submit_pin(pin) {
                    eprintln!("error: {e}");
                }
            }
            other => eprintln!("error: '{other}' is not available now"),
        }
        Ok(())
    }

    fn on_answer(&mut self, reply: Answer) -> CliResult {
        let Some(prompt) = self.prompt.take() else {
            return Ok(());
        };
        match (prompt, reply) {
            (HostPrompt::Confirm { purpose, .. }, Answer::Confirmed(accepted)) => {
                debug!(?purpose, accepted, "prompt answered");
                emit(&json!({ "type": "PromptClosed", "accepted": accepted }))?;
                match (purpose, accepted) {
                    (Purpose::GiveUp, true) => {
                        if let Some(event) = self.scheduler.cancel() {
                            self.on_event(event)?;
                        }
                    }
                    (Purpose::FinishEarly, true) => {
                        if let Some(event) = self.scheduler.finish_early() {
                            self.on_event(event)?;
                        }
                    }
                    (Purpose::SkipRest, true) => {
                        if let Some(event) = self.scheduler.finish_rest() {
                            emit(&event)?;
                        }
                    }
                    // Single-button prompt: closing it also collects.
                    (Purpose::Collect, _) => self.collect()?,
                    _ => {}
                }
            }
            (HostPrompt::Approve { record_id, .. }, Answer::Pin(pin)) => {
                match pin {
                    Some(pin) => match self.ledger.confirm_with_pin(&record_id, Some(pin.as_str())) {
                        Ok(()) => emit(&json!({ "type": "Approved", "id": record_id }))?,
                        Err(LedgerError::PinRejected) => {
                            eprintln!("error: wrong PIN, the coins stay pending");
                        }
                        Err(e) => return Err(e.into()),
                    },
                    None => emit(&json!({ "type": "ApprovalSkipped", "id": record_id }))?,
                }
                self.done = true;
            }
            (prompt, _) => {
                warn!("mismatched prompt answer");
                self.prompt = Some(prompt);
            }
        }
        Ok(())
    }

    fn on_stdin_closed(&mut self) -> CliResult {
        debug!("stdin closed");
        self.stdin_open = false;
        // Nobody can answer any more; the answer branch handles the decline.
        self.scheduler.cancel_prompt();
        Ok(())
    }

    fn open_confirm(&mut self, purpose: Purpose, request: ConfirmRequest) -> CliResult {
        let pending = self.scheduler.request_confirm(request);
        self.prompt = Some(HostPrompt::Confirm { purpose, pending });
        self.emit_prompt()
    }

    fn emit_prompt(&self) -> CliResult {
        if let Some(view) = self.scheduler.pending_prompt() {
            emit(&json!({ "type": "PromptOpened", "prompt": view }))?;
        }
        Ok(())
    }

    /// Record the settled reward as pending income, then offer approval.
    fn collect(&mut self) -> CliResult {
        let Some(id) = self.scheduler.acknowledge_settlement(&mut self.ledger)? else {
            self.done = true;
            return Ok(());
        };
        let amount = self.ledger.get(&id).map(|r| r.amount).unwrap_or_default();
        emit(&json!({ "type": "Recorded", "id": id, "amount": amount }))?;

        if self.stdin_open && self.ledger.lock().is_set() {
            let pending = self
                .scheduler
                .request_pin(PinRequest::new("Parent PIN to approve these coins"));
            self.prompt = Some(HostPrompt::Approve {
                record_id: id,
                pending,
            });
            self.emit_prompt()?;
        } else {
            self.done = true;
        }
        Ok(())
    }
}
