use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PromptError;

/// A blocking yes/no prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmRequest {
    pub title: String,
    pub message: String,
    pub confirm_label: String,
    pub cancel_label: String,
    pub show_cancel_button: bool,
    /// Pause the running countdown while the prompt is open.
    pub pause_timer: bool,
}

impl ConfirmRequest {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            confirm_label: "OK".into(),
            cancel_label: "Cancel".into(),
            show_cancel_button: true,
            pause_timer: true,
        }
    }

    pub fn confirm_label(mut self, label: impl Into<String>) -> Self {
        self.confirm_label = label.into();
        self
    }

    pub fn cancel_label(mut self, label: impl Into<String>) -> Self {
        self.cancel_label = label.into();
        self
    }

    /// Notice-style prompt with a single button.
    pub fn without_cancel(mut self) -> Self {
        self.show_cancel_button = false;
        self
    }

    pub fn keep_timer_running(mut self) -> Self {
        self.pause_timer = false;
        self
    }
}

/// A blocking 4-digit PIN capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinRequest {
    pub title: String,
    pub pause_timer: bool,
}

impl PinRequest {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            pause_timer: true,
        }
    }

    pub fn keep_timer_running(mut self) -> Self {
        self.pause_timer = false;
        self
    }
}

/// What is currently pending, for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PromptView {
    Confirm(ConfirmRequest),
    Pin(PinRequest),
}

impl PromptView {
    pub fn title(&self) -> &str {
        match self {
            PromptView::Confirm(req) => &req.title,
            PromptView::Pin(req) => &req.title,
        }
    }
}

/// Exactly four ASCII digits.
#[derive(Clone, PartialEq, Eq)]
pub struct PinCode(String);

impl PinCode {
    pub const LEN: usize = 4;

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PinCode {
    type Err = PromptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() == Self::LEN && s.bytes().all(|b| b.is_ascii_digit()) {
            Ok(PinCode(s.to_string()))
        } else {
            Err(PromptError::MalformedPin)
        }
    }
}

impl fmt::Debug for PinCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PinCode(****)")
    }
}
