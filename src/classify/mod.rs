//! Agent classification
//!
//! Every tracked agent carries a role tag describing its relationship to the
//! player. The tag picks the configured regeneration rate, decides whose
//! medicine skill boosts the agent, and routes experience to commanders.

pub mod commander;
pub mod modifier;

use serde::{Deserialize, Serialize};
use tracing::warn;

pub use commander::{resolve_commander, Commander};
pub use modifier::health_modifier;

use crate::core::error::Result;
use crate::core::types::AgentId;
use crate::host::BattleHost;

/// Relationship of an agent to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RoleTag {
    Mount,
    Animal,
    Player,
    Companion,
    IndependentHero,
    IndependentTroop,
    Subordinate,
    PlayerTroop,
    AlliedHero,
    AlliedTroop,
    EnemyHero,
    EnemyTroop,
    /// Classification failed
    #[default]
    None,
}

impl RoleTag {
    pub const ALL: [RoleTag; 13] = [
        RoleTag::Mount,
        RoleTag::Animal,
        RoleTag::Player,
        RoleTag::Companion,
        RoleTag::IndependentHero,
        RoleTag::IndependentTroop,
        RoleTag::Subordinate,
        RoleTag::PlayerTroop,
        RoleTag::AlliedHero,
        RoleTag::AlliedTroop,
        RoleTag::EnemyHero,
        RoleTag::EnemyTroop,
        RoleTag::None,
    ];

    /// Mounts and animals: healed through their rider, not themselves
    pub fn is_beast(self) -> bool {
        matches!(self, RoleTag::Mount | RoleTag::Animal)
    }

    /// Roles commanded by the player
    pub fn is_player_command(self) -> bool {
        matches!(
            self,
            RoleTag::Player | RoleTag::Companion | RoleTag::Subordinate | RoleTag::PlayerTroop
        )
    }

    /// Allied and enemy roles, commanded by their team's general
    pub fn is_general_command(self) -> bool {
        matches!(
            self,
            RoleTag::AlliedHero | RoleTag::AlliedTroop | RoleTag::EnemyHero | RoleTag::EnemyTroop
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            RoleTag::Mount => "Mount",
            RoleTag::Animal => "Animal",
            RoleTag::Player => "Player",
            RoleTag::Companion => "Companion",
            RoleTag::IndependentHero => "IndependentHero",
            RoleTag::IndependentTroop => "IndependentTroop",
            RoleTag::Subordinate => "Subordinate",
            RoleTag::PlayerTroop => "PlayerTroop",
            RoleTag::AlliedHero => "AlliedHero",
            RoleTag::AlliedTroop => "AlliedTroop",
            RoleTag::EnemyHero => "EnemyHero",
            RoleTag::EnemyTroop => "EnemyTroop",
            RoleTag::None => "None",
        }
    }
}

impl std::fmt::Display for RoleTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify an agent; never fails
///
/// Lookup failures are logged and reported as [`RoleTag::None`].
pub fn classify<H: BattleHost + ?Sized>(host: &H, agent: AgentId) -> RoleTag {
    match try_classify(host, agent) {
        Ok(role) => role,
        Err(e) => {
            warn!(
                "Could not classify {}, treating as unclassified: {}",
                agent, e
            );
            RoleTag::None
        }
    }
}

fn try_classify<H: BattleHost + ?Sized>(host: &H, id: AgentId) -> Result<RoleTag> {
    let agent = host.agent(id)?;

    if agent.is_mount {
        return Ok(RoleTag::Mount);
    }
    if !agent.is_human() {
        return Ok(RoleTag::Animal);
    }
    if agent.is_player_unit {
        return Ok(RoleTag::Player);
    }
    if agent.is_hero() && agent.is_player_companion {
        return Ok(RoleTag::Companion);
    }

    let hero_or = |hero: RoleTag, troop: RoleTag| if agent.is_hero() { hero } else { troop };

    let team = match agent.team {
        Some(team_id) => host.team(team_id)?,
        None => return Ok(hero_or(RoleTag::IndependentHero, RoleTag::IndependentTroop)),
    };

    if !team.is_valid {
        return Ok(hero_or(RoleTag::IndependentHero, RoleTag::IndependentTroop));
    }

    if team.is_player_team {
        let led_by_player = agent
            .formation_leader
            .and_then(|leader| host.agent(leader).ok())
            .is_some_and(|leader| leader.is_player_unit);

        if team.is_player_general || led_by_player {
            return Ok(hero_or(RoleTag::Subordinate, RoleTag::PlayerTroop));
        }
        return Ok(hero_or(RoleTag::AlliedHero, RoleTag::AlliedTroop));
    }

    if team.is_player_ally {
        return Ok(hero_or(RoleTag::AlliedHero, RoleTag::AlliedTroop));
    }

    Ok(hero_or(RoleTag::EnemyHero, RoleTag::EnemyTroop))
}
