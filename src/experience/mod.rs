//! Medicine experience for healers
//!
//! Healing earns medicine experience for whoever made it happen: the agent's
//! own hero (or a mount's rider) and the agent's commander. Awards accumulate
//! in an [`ExperienceLedger`] during the mission and are delivered to the host
//! in one go when the mission ends.

use ahash::AHashMap;
use serde::Serialize;
use tracing::{debug, warn};

use crate::classify::{Commander, RoleTag};
use crate::core::config::RegenConfig;
use crate::core::types::HeroId;
use crate::host::{AgentInfo, BattleHost};

/// Experience owed to one hero
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct XpAward {
    pub hero: HeroId,
    pub amount: f32,
}

/// Experience produced by healing one agent once
///
/// Both awards may be present; they are independent.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Attribution {
    /// The agent's hero, or the rider's hero for mounts and animals
    pub own: Option<XpAward>,
    pub commander: Option<XpAward>,
}

impl Attribution {
    pub fn awards(&self) -> impl Iterator<Item = XpAward> {
        self.own.into_iter().chain(self.commander)
    }

    pub fn is_empty(&self) -> bool {
        self.own.is_none() && self.commander.is_none()
    }
}

/// Split the experience earned by healing `healed` health between contributors
///
/// Experience scales with the fraction of the agent's absolute maximum that
/// was restored, so healing from zero to full is worth `xp_gain` to the healer
/// and `commander_xp_gain` to the commander.
pub fn attribute(
    agent: &AgentInfo,
    role: RoleTag,
    rider: Option<&AgentInfo>,
    commander: Option<&Commander>,
    healed: f32,
    config: &RegenConfig,
) -> Attribution {
    if healed <= 0.0 || agent.health_limit <= 0.0 {
        return Attribution::default();
    }
    let xp = healed / agent.health_limit;

    if role.is_beast() {
        return Attribution {
            own: rider.and_then(|r| r.hero).map(|hero| XpAward {
                hero,
                amount: xp * config.xp_gain,
            }),
            commander: None,
        };
    }

    Attribution {
        own: agent.hero.map(|hero| XpAward {
            hero,
            amount: xp * config.xp_gain,
        }),
        commander: commander.and_then(|c| c.hero).map(|hero| XpAward {
            hero,
            amount: xp * config.commander_xp_gain,
        }),
    }
}

/// Result of delivering pending experience
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FlushReport {
    /// Heroes that received their experience
    pub delivered: usize,
    /// Heroes the host refused, with their experience dropped
    pub skipped: usize,
}

/// Pending medicine experience per hero
#[derive(Debug, Clone, Default)]
pub struct ExperienceLedger {
    pending: AHashMap<HeroId, f32>,
}

impl ExperienceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add experience for a hero; amounts accumulate without a cap
    pub fn record(&mut self, hero: HeroId, amount: f32) {
        *self.pending.entry(hero).or_insert(0.0) += amount;
    }

    pub fn merge(&mut self, awards: impl IntoIterator<Item = XpAward>) {
        for award in awards {
            self.record(award.hero, award.amount);
        }
    }

    pub fn get(&self, hero: HeroId) -> Option<f32> {
        self.pending.get(&hero).copied()
    }

    /// Sum of all pending experience
    pub fn total(&self) -> f32 {
        self.pending.values().sum()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop pending experience without delivering it
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Deliver everything pending to the host, then clear
    ///
    /// A hero the host rejects is logged and skipped; the rest still get
    /// their experience.
    pub fn flush<H: BattleHost + ?Sized>(&mut self, host: &mut H) -> FlushReport {
        let mut report = FlushReport::default();

        let mut pending: Vec<(HeroId, f32)> = self.pending.drain().collect();
        pending.sort_by_key(|&(hero, _)| hero);

        for (hero, amount) in pending {
            match host.add_medicine_xp(hero, amount) {
                Ok(()) => {
                    debug!("{} received {:.3} medicine xp", hero, amount);
                    report.delivered += 1;
                }
                Err(e) => {
                    warn!("Skipping {:.3} medicine xp for {}: {}", amount, hero, e);
                    report.skipped += 1;
                }
            }
        }

        report
    }
}
