//! Commander resolution
//!
//! The commander of an agent is whoever's medicine skill boosts the agent's
//! regeneration and who earns commander experience from it.

use crate::classify::RoleTag;
use crate::core::types::{AgentId, HeroId};
use crate::host::{AgentInfo, BattleHost};

/// The resolved commander of an agent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Commander {
    /// Battlefield agent, when the commander is deployed
    pub agent: Option<AgentId>,
    /// Persistent character, when the commander can earn experience
    pub hero: Option<HeroId>,
    pub medicine: f32,
}

impl Commander {
    fn from_agent(agent: &AgentInfo) -> Self {
        Self {
            agent: Some(agent.id),
            hero: agent.hero,
            medicine: agent.medicine,
        }
    }
}

/// Find the commander for an agent of the given role
///
/// * Player-commanded roles: the team's general, else the mission's main agent,
///   else any unit flagged as the player, else the campaign's main hero.
/// * Allied and enemy roles: the team's general only.
/// * Everything else has no commander.
pub fn resolve_commander<H: BattleHost + ?Sized>(
    host: &H,
    agent: &AgentInfo,
    role: RoleTag,
) -> Option<Commander> {
    if role.is_player_command() {
        team_general(host, agent)
            .or_else(|| deployed(host, host.main_agent()))
            .or_else(|| deployed(host, host.player_unit()))
            .or_else(|| {
                host.main_hero().map(|hero| Commander {
                    agent: None,
                    hero: Some(hero.id),
                    medicine: hero.medicine,
                })
            })
    } else if role.is_general_command() {
        team_general(host, agent)
    } else {
        None
    }
}

fn team_general<H: BattleHost + ?Sized>(host: &H, agent: &AgentInfo) -> Option<Commander> {
    let team = host.team(agent.team?).ok()?;
    deployed(host, team.general)
}

fn deployed<H: BattleHost + ?Sized>(host: &H, id: Option<AgentId>) -> Option<Commander> {
    let info = host.agent(id?).ok()?;
    Some(Commander::from_agent(&info))
}
