//! Per-agent regeneration state
//!
//! One [`RegenState`] exists for every tracked agent. Each tick it decides
//! whether its agent heals and by how much, reading the host but never
//! writing to it: the decision is returned as a [`SlotOutcome`] so the engine
//! can evaluate every agent in parallel and apply the results afterwards.

use tracing::Level;

use crate::classify::{health_modifier, resolve_commander, RoleTag};
use crate::core::config::RegenConfig;
use crate::core::error::Result;
use crate::core::types::{AgentId, Seconds};
use crate::experience::{attribute, Attribution};
use crate::formula::{evaluate, FormulaContext, RegenFormula};
use crate::host::{AgentInfo, BattleHost};

/// Health to write back for one agent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthUpdate {
    pub agent: AgentId,
    pub health: f32,
    /// Health actually restored (after capping at the ceiling)
    pub gained: f32,
}

/// A diagnostic produced while processing an agent
#[derive(Debug, Clone, PartialEq)]
pub struct TickMessage {
    pub level: Level,
    pub text: String,
}

/// Everything one agent's tick wants to change
#[derive(Debug, Clone, Default)]
pub struct SlotOutcome {
    pub health: Option<HealthUpdate>,
    pub experience: Attribution,
    pub messages: Vec<TickMessage>,
}

impl SlotOutcome {
    fn push(&mut self, level: Level, text: String) {
        self.messages.push(TickMessage { level, text });
    }
}

/// Regeneration bookkeeping for one agent
#[derive(Debug, Clone, PartialEq)]
pub struct RegenState {
    agent: AgentId,
    /// Health this agent heals up to; fixed at registration
    health_ceiling: f32,
    time_since_last_damage: Seconds,
    role: RoleTag,
}

impl RegenState {
    /// Start tracking an agent
    ///
    /// The ceiling is the absolute maximum when healing to full is enabled,
    /// otherwise the health the agent entered the battle with.
    pub fn new(agent: &AgentInfo, role: RoleTag, config: &RegenConfig) -> Self {
        let health_ceiling = if config.heal_to_full {
            agent.health_limit
        } else {
            agent.health
        };
        Self {
            agent: agent.id,
            health_ceiling,
            time_since_last_damage: 0.0,
            role,
        }
    }

    pub fn agent(&self) -> AgentId {
        self.agent
    }

    pub fn health_ceiling(&self) -> f32 {
        self.health_ceiling
    }

    pub fn time_since_last_damage(&self) -> Seconds {
        self.time_since_last_damage
    }

    pub fn role(&self) -> RoleTag {
        self.role
    }

    pub fn set_role(&mut self, role: RoleTag) {
        self.role = role;
    }

    /// The agent dealt or took damage
    pub fn reset_damage_timer(&mut self) {
        self.time_since_last_damage = 0.0;
    }

    /// Advance this agent by `dt` seconds and decide how much it heals
    ///
    /// Failures are reported as messages; the agent simply tries again next
    /// tick.
    pub fn attempt<H: BattleHost + ?Sized>(
        &mut self,
        host: &H,
        dt: Seconds,
        config: &RegenConfig,
        formula: &dyn RegenFormula,
    ) -> SlotOutcome {
        let mut outcome = SlotOutcome::default();

        self.time_since_last_damage += dt;
        if self.time_since_last_damage < config.regen_delay {
            return outcome;
        }

        if let Err(e) = self.regenerate(host, dt, config, formula, &mut outcome) {
            outcome.push(
                Level::WARN,
                format!(
                    "Failed to heal {}, will try again next tick: {}",
                    host.agent_name(self.agent),
                    e
                ),
            );
        }
        outcome
    }

    fn regenerate<H: BattleHost + ?Sized>(
        &self,
        host: &H,
        dt: Seconds,
        config: &RegenConfig,
        formula: &dyn RegenFormula,
        outcome: &mut SlotOutcome,
    ) -> Result<()> {
        let agent = host.agent(self.agent)?;

        if agent.health < agent.dying_threshold
            || agent.health <= 0.0
            || agent.health >= self.health_ceiling
        {
            return Ok(());
        }

        let role = self.role;
        let rider = if role.is_beast() {
            agent.rider.and_then(|id| host.agent(id).ok())
        } else {
            None
        };
        let commander = if role.is_beast() {
            None
        } else {
            resolve_commander(host, &agent, role)
        };

        let modifier = health_modifier(&agent, role, rider.as_ref(), commander.as_ref(), config);
        if config.verbose_debug {
            outcome.push(
                Level::DEBUG,
                format!(
                    "{} {} modifier {:.3} (medicine {:.0}, rider medicine {}, commander medicine {})",
                    role,
                    host.agent_name(self.agent),
                    modifier,
                    agent.medicine,
                    rider.as_ref().map_or("-".to_string(), |r| format!("{:.0}", r.medicine)),
                    commander.as_ref().map_or("-".to_string(), |c| format!("{:.0}", c.medicine)),
                ),
            );
        }
        let base_rate = config.rates.for_role(role) / 100.0 * agent.health_limit;
        let adjusted_rate = base_rate * modifier;
        if adjusted_rate.is_nan() || adjusted_rate <= 0.0 {
            return Ok(());
        }

        let ctx = FormulaContext::new(&agent, self.health_ceiling, f64::from(adjusted_rate));
        let rate = match evaluate(formula, &ctx) {
            Ok(rate) => rate.max(0.0),
            Err(e) => {
                outcome.push(
                    Level::WARN,
                    format!(
                        "Formula failed for {}, using linear rate instead: {}",
                        host.agent_name(self.agent),
                        e
                    ),
                );
                f64::from(adjusted_rate)
            }
        };

        let delta = (rate * f64::from(dt)) as f32;
        let health = (agent.health + delta).min(self.health_ceiling);
        let gained = health - agent.health;
        if gained <= 0.0 {
            return Ok(());
        }

        outcome.health = Some(HealthUpdate {
            agent: self.agent,
            health,
            gained,
        });

        if host.persistent_progression() {
            outcome.experience = attribute(
                &agent,
                role,
                rider.as_ref(),
                commander.as_ref(),
                gained,
                config,
            );
        }

        if config.verbose_debug {
            for award in outcome.experience.awards() {
                outcome.push(
                    Level::DEBUG,
                    format!(
                        "{} earns {:.4} medicine xp for healing {}",
                        award.hero,
                        award.amount,
                        host.agent_name(self.agent)
                    ),
                );
            }
        }

        if config.verbose_debug {
            outcome.push(
                Level::DEBUG,
                format!(
                    "{} {} health {:.2} -> {:.2} (ceiling {:.2}, base {:.3}/s, modifier {:.3}, rate {:.3}/s, dt {:.3})",
                    role,
                    host.agent_name(self.agent),
                    agent.health,
                    health,
                    self.health_ceiling,
                    base_rate,
                    modifier,
                    rate,
                    dt
                ),
            );
        }

        Ok(())
    }
}
