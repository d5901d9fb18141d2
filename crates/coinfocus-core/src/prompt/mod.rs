mod coordinator;
mod request;

pub use coordinator::{InterruptionCoordinator, PendingConfirm, PendingPin};
pub use request::{ConfirmRequest, PinCode, PinRequest, PromptView};
