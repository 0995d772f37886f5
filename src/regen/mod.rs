//! Health regeneration
//!
//! - `state`: per-agent record and the per-tick heal decision
//! - `slots`: dense swap-remove storage for the records
//! - `engine`: lifecycle events and the two-phase tick

pub mod constants;
pub mod engine;
pub mod slots;
pub mod state;

pub use engine::{RegenEngine, TickReport};
pub use slots::SlotTable;
pub use state::{HealthUpdate, RegenState, SlotOutcome, TickMessage};
