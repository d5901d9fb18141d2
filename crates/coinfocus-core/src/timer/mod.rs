mod engine;
mod set;

pub use engine::TimerEngine;
pub use set::{TimerSet, TimerSlot};
