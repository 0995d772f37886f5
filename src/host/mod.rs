//! Boundary with the host engine
//!
//! The core never owns agents, teams or heroes. Everything it knows about them
//! comes from a [`BattleHost`] snapshot taken at the moment of the call, and
//! every change it makes goes back through the same trait.
//!
//! Queries take `&self` and the trait requires `Sync`, so a single host
//! reference can be shared by every worker of the parallel tick phase.
//! Mutations take `&mut self` and only happen after that phase has joined.

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::{AgentId, CreatureFamily, HeroId, TeamId};

/// Magnitude below which the host treats a health value as exactly zero
pub const HEALTH_SNAP_EPSILON: f32 = 1e-5;

/// Point-in-time view of an agent's attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentInfo {
    pub id: AgentId,
    pub health: f32,
    /// Absolute health maximum ("health limit")
    pub health_limit: f32,
    /// Below this the agent is dying and never regenerates
    pub dying_threshold: f32,
    pub is_mount: bool,
    pub family: CreatureFamily,
    /// Controlled by the local player
    pub is_player_unit: bool,
    /// Persistent character behind this agent, if it is a hero
    pub hero: Option<HeroId>,
    pub is_player_companion: bool,
    /// Medicine skill of the agent's character
    pub medicine: f32,
    pub team: Option<TeamId>,
    /// Mount ridden by this agent
    pub mount: Option<AgentId>,
    /// Agent riding this mount
    pub rider: Option<AgentId>,
    /// Owner of the agent's formation
    pub formation_leader: Option<AgentId>,
}

impl AgentInfo {
    pub fn is_hero(&self) -> bool {
        self.hero.is_some()
    }

    pub fn is_human(&self) -> bool {
        self.family == CreatureFamily::Human
    }
}

/// Point-in-time view of a team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamInfo {
    pub id: TeamId,
    pub is_valid: bool,
    pub is_player_team: bool,
    pub is_player_ally: bool,
    /// The player is the overall commander of this team
    pub is_player_general: bool,
    pub general: Option<AgentId>,
}

/// A hero that is not necessarily on the battlefield (the campaign's main hero)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeroInfo {
    pub id: HeroId,
    pub medicine: f32,
}

/// Capabilities the regeneration core consumes from the host engine
pub trait BattleHost: Sync {
    /// Snapshot of a live agent
    fn agent(&self, id: AgentId) -> Result<AgentInfo>;

    /// Snapshot of a team
    fn team(&self, id: TeamId) -> Result<TeamInfo>;

    /// The mission's main agent, usually the player's character
    fn main_agent(&self) -> Option<AgentId>;

    /// Any agent flagged as the player's unit
    fn player_unit(&self) -> Option<AgentId>;

    /// The campaign's main hero, even when not deployed
    fn main_hero(&self) -> Option<HeroInfo>;

    /// Display name for diagnostics
    fn agent_name(&self, id: AgentId) -> String {
        id.to_string()
    }

    /// Whether skill progression persists beyond this mission (campaign battle
    /// rather than custom battle)
    fn persistent_progression(&self) -> bool;

    /// Whether regeneration should be skipped this tick
    fn regen_paused(&self) -> bool {
        false
    }

    /// Write an agent's health
    fn set_health(&mut self, id: AgentId, health: f32) -> Result<()>;

    /// Award medicine skill experience to a hero
    fn add_medicine_xp(&mut self, hero: HeroId, amount: f32) -> Result<()>;

    /// Show a transient on-screen notification
    fn display_message(&mut self, text: &str);
}

/// Snap near-zero health to exactly zero, the way the host's health setter
/// expects it
pub fn snap_health(value: f32) -> f32 {
    if value.abs() < HEALTH_SNAP_EPSILON {
        0.0
    } else {
        value
    }
}
