pub mod config;
pub mod error;
pub mod types;

pub use config::{RegenConfig, RegenRates};
pub use error::{RegenError, Result};
pub use types::{AgentId, CreatureFamily, HeroId, Seconds, TeamId};
