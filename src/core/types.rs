//! Core type definitions shared by the regeneration systems

use serde::{Deserialize, Serialize};
use std::fmt;

/// Host-provided identity of a battle agent (soldier, hero, mount, animal)
///
/// Opaque to the core: used as a map key and passed back to the host for
/// attribute queries and health writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub u64);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent#{}", self.0)
    }
}

/// Host-provided identity of a persistent character that can earn skill experience
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HeroId(pub u64);

impl fmt::Display for HeroId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hero#{}", self.0)
    }
}

/// Host-provided identity of a mission team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(pub u32);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "team#{}", self.0)
    }
}

/// Creature family of an agent's body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CreatureFamily {
    #[default]
    Human,
    /// Horses, camels and any other non-human body
    Beast,
}

/// Simulation time in seconds
pub type Seconds = f32;
