//! Arbitration of blocking prompts against the session countdowns.
//!
//! At most one prompt is pending. A newer request always wins: the stale
//! one resolves to `false` (or `None` for PIN capture) and any countdown it
//! paused is resumed before the new request decides whether to pause.
//! Every pause made here is undone by the resolution of the same request.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;
use tracing::debug;

use super::request::{ConfirmRequest, PinCode, PinRequest, PromptView};
use crate::error::PromptError;
use crate::timer::{TimerSet, TimerSlot};

/// Awaitable answer to a [`ConfirmRequest`].
///
/// Resolves to `false` when declined, superseded, or abandoned.
#[derive(Debug)]
pub struct PendingConfirm {
    rx: oneshot::Receiver<bool>,
}

impl PendingConfirm {
    /// Non-blocking check for hosts that poll instead of awaiting.
    pub fn try_resolved(&mut self) -> Option<bool> {
        match self.rx.try_recv() {
            Ok(answer) => Some(answer),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(false),
        }
    }
}

impl Future for PendingConfirm {
    type Output = bool;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<bool> {
        Pin::new(&mut self.rx).poll(cx).map(|r| r.unwrap_or(false))
    }
}

/// Awaitable answer to a [`PinRequest`].
///
/// Resolves to `None` when cancelled, superseded, or abandoned.
#[derive(Debug)]
pub struct PendingPin {
    rx: oneshot::Receiver<Option<PinCode>>,
}

impl PendingPin {
    pub fn try_resolved(&mut self) -> Option<Option<PinCode>> {
        match self.rx.try_recv() {
            Ok(answer) => Some(answer),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => Some(None),
        }
    }
}

impl Future for PendingPin {
    type Output = Option<PinCode>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<PinCode>> {
        Pin::new(&mut self.rx).poll(cx).map(|r| r.unwrap_or(None))
    }
}

#[derive(Debug)]
enum Responder {
    Confirm(oneshot::Sender<bool>),
    Pin(oneshot::Sender<Option<PinCode>>),
}

impl Responder {
    fn decline(self) {
        // A dropped receiver means the caller stopped waiting; nothing to do.
        match self {
            Responder::Confirm(tx) => {
                let _ = tx.send(false);
            }
            Responder::Pin(tx) => {
                let _ = tx.send(None);
            }
        }
    }
}

#[derive(Debug)]
struct PendingPrompt {
    id: u64,
    view: PromptView,
    responder: Responder,
    paused: Option<TimerSlot>,
}

/// Holds the single in-flight prompt and the countdown it paused.
#[derive(Debug, Default)]
pub struct InterruptionCoordinator {
    pending: Option<PendingPrompt>,
    issued: u64,
}

impl InterruptionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&PromptView> {
        self.pending.as_ref().map(|p| &p.view)
    }

    /// Slot paused by the pending prompt, if any.
    pub fn paused_slot(&self) -> Option<TimerSlot> {
        self.pending.as_ref().and_then(|p| p.paused)
    }

    /// Open a yes/no prompt, superseding any pending one.
    pub fn request(&mut self, request: ConfirmRequest, timers: &mut TimerSet) -> PendingConfirm {
        let (tx, rx) = oneshot::channel();
        let pause = request.pause_timer;
        self.install(PromptView::Confirm(request), Responder::Confirm(tx), pause, timers);
        PendingConfirm { rx }
    }

    /// Open a PIN prompt, superseding any pending one.
    pub fn request_pin(&mut self, request: PinRequest, timers: &mut TimerSet) -> PendingPin {
        let (tx, rx) = oneshot::channel();
        let pause = request.pause_timer;
        self.install(PromptView::Pin(request), Responder::Pin(tx), pause, timers);
        PendingPin { rx }
    }

    /// Accept the pending yes/no prompt.
    pub fn confirm(&mut self, timers: &mut TimerSet) -> Result<(), PromptError> {
        match self.pending.take() {
            Some(PendingPrompt {
                id,
                responder: Responder::Confirm(tx),
                paused,
                ..
            }) => {
                debug!(prompt = id, "prompt confirmed");
                let _ = tx.send(true);
                Self::release(paused, timers);
                Ok(())
            }
            other => {
                self.pending = other;
                Err(PromptError::NothingPending("confirmation"))
            }
        }
    }

    /// Decline the pending prompt of either kind. Returns false if none.
    pub fn cancel(&mut self, timers: &mut TimerSet) -> bool {
        let Some(prompt) = self.pending.take() else {
            return false;
        };
        debug!(prompt = prompt.id, "prompt cancelled");
        prompt.responder.decline();
        Self::release(prompt.paused, timers);
        true
    }

    /// Answer the pending PIN prompt.
    ///
    /// Malformed input is rejected and the prompt stays open.
    pub fn submit_pin(&mut self, input: &str, timers: &mut TimerSet) -> Result<(), PromptError> {
        if !matches!(
            self.pending,
            Some(PendingPrompt {
                responder: Responder::Pin(_),
                ..
            })
        ) {
            return Err(PromptError::NothingPending("PIN"));
        }
        let pin: PinCode = input.parse()?;
        if let Some(PendingPrompt {
            id,
            responder: Responder::Pin(tx),
            paused,
            ..
        }) = self.pending.take()
        {
            debug!(prompt = id, "PIN submitted");
            let _ = tx.send(Some(pin));
            Self::release(paused, timers);
        }
        Ok(())
    }

    /// Drop the pending prompt without touching any countdown.
    ///
    /// Used when the session itself is torn down and the timers are gone.
    pub(crate) fn abandon(&mut self) {
        if let Some(prompt) = self.pending.take() {
            debug!(prompt = prompt.id, "prompt abandoned");
            prompt.responder.decline();
        }
    }

    fn install(
        &mut self,
        view: PromptView,
        responder: Responder,
        pause: bool,
        timers: &mut TimerSet,
    ) {
        if let Some(stale) = self.pending.take() {
            debug!(prompt = stale.id, "prompt superseded");
            stale.responder.decline();
            Self::release(stale.paused, timers);
        }

        let paused = if pause { timers.pause_active() } else { None };
        self.issued += 1;
        debug!(prompt = self.issued, title = view.title(), ?paused, "prompt opened");
        self.pending = Some(PendingPrompt {
            id: self.issued,
            view,
            responder,
            paused,
        });
    }

    fn release(paused: Option<TimerSlot>, timers: &mut TimerSet) {
        if let Some(slot) = paused {
            timers.resume(slot);
        }
    }
}
