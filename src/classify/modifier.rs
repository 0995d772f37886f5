//! Health modifier from medicine skill
//!
//! Bonuses are ADDITIVE: each source adds `skill / 50 * boost%` on top of 1.0.

use crate::classify::{Commander, RoleTag};
use crate::core::config::RegenConfig;
use crate::host::AgentInfo;

/// Medicine skill points per step of boost
pub const MEDICINE_SKILL_STEP: f32 = 50.0;

fn medicine_bonus(skill: f32, boost_percent: f32) -> f32 {
    skill / MEDICINE_SKILL_STEP * boost_percent / 100.0
}

/// Multiplier applied to an agent's base regeneration rate
///
/// * Mounts and animals get their rider's medicine bonus, if ridden.
/// * Everyone else gets their own medicine bonus plus the commander's bonus,
///   when the role has a commander and one was found.
pub fn health_modifier(
    agent: &AgentInfo,
    role: RoleTag,
    rider: Option<&AgentInfo>,
    commander: Option<&Commander>,
    config: &RegenConfig,
) -> f32 {
    let mut modifier = 1.0;

    if role.is_beast() {
        if let Some(rider) = rider {
            modifier += medicine_bonus(rider.medicine, config.medicine_boost);
        }
        return modifier;
    }

    modifier += medicine_bonus(agent.medicine, config.medicine_boost);

    if role.is_player_command() || role.is_general_command() {
        if let Some(commander) = commander {
            modifier += medicine_bonus(commander.medicine, config.commander_medicine_boost);
        }
    }

    modifier
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::test_support::agent;

    fn with_medicine(medicine: f32) -> AgentInfo {
        let mut a = agent(50.0, 100.0);
        a.medicine = medicine;
        a
    }

    fn commander(medicine: f32) -> Commander {
        Commander {
            agent: None,
            hero: None,
            medicine,
        }
    }

    #[test]
    fn test_no_skill_is_identity() {
        let config = RegenConfig::default();
        let a = with_medicine(0.0);
        assert_eq!(health_modifier(&a, RoleTag::EnemyTroop, None, None, &config), 1.0);
    }

    #[test]
    fn test_self_medicine_bonus() {
        // 100 medicine at 50% per 50 points -> +1.0
        let config = RegenConfig::default();
        let a = with_medicine(100.0);
        assert_eq!(health_modifier(&a, RoleTag::IndependentHero, None, None, &config), 2.0);
    }

    #[test]
    fn test_commander_bonus_is_additive() {
        // self 50 -> +0.5, commander 100 at 25% -> +0.5
        let config = RegenConfig::default();
        let a = with_medicine(50.0);
        let cmd = commander(100.0);
        let m = health_modifier(&a, RoleTag::PlayerTroop, None, Some(&cmd), &config);
        assert!((m - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_independent_ignores_commander() {
        let config = RegenConfig::default();
        let a = with_medicine(0.0);
        let cmd = commander(200.0);
        assert_eq!(
            health_modifier(&a, RoleTag::IndependentTroop, None, Some(&cmd), &config),
            1.0
        );
    }

    #[test]
    fn test_mount_uses_rider_only() {
        let config = RegenConfig::default();
        let mut horse = with_medicine(300.0);
        horse.is_mount = true;
        let rider = with_medicine(50.0);
        let cmd = commander(200.0);

        assert_eq!(health_modifier(&horse, RoleTag::Mount, None, Some(&cmd), &config), 1.0);
        let m = health_modifier(&horse, RoleTag::Mount, Some(&rider), Some(&cmd), &config);
        assert!((m - 1.5).abs() < 1e-6);
    }
}
