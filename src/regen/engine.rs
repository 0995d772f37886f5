//! Regeneration engine
//!
//! Owns the per-agent state table and runs the tick in two phases:
//!
//! 1. **Evaluate** (parallel above the configured threshold): every live
//!    record reads the host and produces a [`SlotOutcome`]. Nothing outside
//!    the record itself is written.
//! 2. **Apply** (single-threaded): health writes, messages and experience go
//!    back to the host and the ledger in slot order.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn, Level};

use super::constants::{MAX_LOGGED_MESSAGES_PER_TICK, MAX_NOTIFICATIONS_PER_TICK};
use super::slots::SlotTable;
use super::state::{RegenState, SlotOutcome, TickMessage};
use crate::classify::classify;
use crate::core::config::RegenConfig;
use crate::core::types::{AgentId, Seconds};
use crate::experience::ExperienceLedger;
use crate::formula::RegenFormula;
use crate::host::{snap_health, BattleHost};

/// What one tick did
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TickReport {
    /// Live records evaluated
    pub processed: usize,
    /// Agents whose health was written
    pub healed: usize,
    pub health_restored: f32,
    /// Health writes the host rejected
    pub failed_writes: usize,
    /// Messages beyond the per-tick log cap
    pub suppressed_messages: usize,
}

#[derive(Debug)]
pub struct RegenEngine {
    slots: SlotTable,
    /// Reused between ticks
    outcomes: Vec<SlotOutcome>,
}

impl RegenEngine {
    pub fn new(initial_capacity: usize) -> Self {
        Self {
            slots: SlotTable::with_capacity(initial_capacity),
            outcomes: Vec::with_capacity(initial_capacity),
        }
    }

    pub fn from_config(config: &RegenConfig) -> Self {
        Self::new(config.initial_capacity)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub fn is_tracked(&self, agent: AgentId) -> bool {
        self.slots.contains(agent)
    }

    pub fn state(&self, agent: AgentId) -> Option<&RegenState> {
        self.slots.get(agent)
    }

    pub fn states(&self) -> &[RegenState] {
        self.slots.live()
    }

    /// Start tracking a newly built agent
    ///
    /// Returns false if the agent is already tracked or the host does not know
    /// it.
    pub fn on_agent_created<H: BattleHost + ?Sized>(
        &mut self,
        host: &H,
        agent: AgentId,
        config: &RegenConfig,
    ) -> bool {
        if self.slots.contains(agent) {
            if config.debug {
                debug!("{} is already tracked", host.agent_name(agent));
            }
            return false;
        }

        let info = match host.agent(agent) {
            Ok(info) => info,
            Err(e) => {
                warn!("Not tracking {}: {}", agent, e);
                return false;
            }
        };

        let role = classify(host, agent);
        let state = RegenState::new(&info, role, config);
        if config.debug {
            debug!(
                "Registered {} as {} (ceiling {:.1})",
                host.agent_name(agent),
                role,
                state.health_ceiling()
            );
        }
        self.slots.insert(state).is_some()
    }

    /// Stop tracking an agent; unknown agents are ignored
    pub fn on_agent_removed(&mut self, agent: AgentId, config: &RegenConfig) -> bool {
        let removed = self.slots.remove(agent).is_some();
        if removed && config.debug {
            debug!("Unregistered {}", agent);
        }
        removed
    }

    /// Reset the damage timer of every participant that is tracked
    pub fn on_hit(
        &mut self,
        victim: Option<AgentId>,
        attacker: Option<AgentId>,
        attacker_mount: Option<AgentId>,
    ) {
        for agent in [victim, attacker, attacker_mount].into_iter().flatten() {
            if let Some(state) = self.slots.get_mut(agent) {
                state.reset_damage_timer();
            }
        }
    }

    /// Reclassify an agent in place
    pub fn on_team_changed<H: BattleHost + ?Sized>(&mut self, host: &H, agent: AgentId) {
        if !self.slots.contains(agent) {
            return;
        }
        let role = classify(host, agent);
        if let Some(state) = self.slots.get_mut(agent) {
            if state.role() != role {
                debug!("{} is now {}", host.agent_name(agent), role);
            }
            state.set_role(role);
        }
    }

    /// Forget every tracked agent
    pub fn on_mission_reset(&mut self) {
        self.slots.clear();
        self.outcomes.clear();
    }

    /// Advance every tracked agent by `dt` seconds
    pub fn on_tick<H: BattleHost>(
        &mut self,
        host: &mut H,
        dt: Seconds,
        config: &RegenConfig,
        formula: &dyn RegenFormula,
        ledger: &mut ExperienceLedger,
    ) -> TickReport {
        let mut report = TickReport {
            processed: self.slots.len(),
            ..TickReport::default()
        };

        self.evaluate(host, dt, config, formula);

        let mut logged = 0;
        for outcome in self.outcomes.drain(..) {
            if let Some(update) = outcome.health {
                match host.set_health(update.agent, snap_health(update.health)) {
                    Ok(()) => {
                        report.healed += 1;
                        report.health_restored += update.gained;
                        ledger.merge(outcome.experience.awards());
                    }
                    Err(e) => {
                        warn!("Could not write health for {}: {}", update.agent, e);
                        report.failed_writes += 1;
                    }
                }
            }

            for message in outcome.messages {
                if logged >= MAX_LOGGED_MESSAGES_PER_TICK {
                    report.suppressed_messages += 1;
                    continue;
                }
                if logged < MAX_NOTIFICATIONS_PER_TICK {
                    host.display_message(&message.text);
                }
                log_message(&message);
                logged += 1;
            }
        }

        report
    }

    fn evaluate<H: BattleHost>(
        &mut self,
        host: &H,
        dt: Seconds,
        config: &RegenConfig,
        formula: &dyn RegenFormula,
    ) {
        let states = self.slots.live_mut();
        if states.len() >= config.parallel_threshold {
            states
                .par_iter_mut()
                .map(|state| state.attempt(host, dt, config, formula))
                .collect_into_vec(&mut self.outcomes);
        } else {
            self.outcomes.clear();
            self.outcomes.extend(
                states
                    .iter_mut()
                    .map(|state| state.attempt(host, dt, config, formula)),
            );
        }
    }
}

fn log_message(message: &TickMessage) {
    if message.level == Level::ERROR || message.level == Level::WARN {
        warn!("{}", message.text);
    } else {
        debug!("{}", message.text);
    }
}
