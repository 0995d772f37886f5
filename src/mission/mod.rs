//! Mission lifecycle bridge
//!
//! The host calls into [`MissionBridge`] from its mission callbacks. The bridge
//! owns the engine, the experience ledger, the formula registry and the active
//! configuration snapshot, and forwards each callback to whichever of them
//! cares.

use tracing::{debug, info, warn};

use crate::core::config::RegenConfig;
use crate::core::error::Result;
use crate::core::types::{AgentId, Seconds};
use crate::experience::{ExperienceLedger, FlushReport};
use crate::formula::{FormulaRegistry, LinearFormula, RegenFormula};
use crate::host::BattleHost;
use crate::regen::{RegenEngine, TickReport};

pub struct MissionBridge {
    engine: RegenEngine,
    ledger: ExperienceLedger,
    registry: FormulaRegistry,
    config: RegenConfig,
}

impl MissionBridge {
    /// Bridge with the built-in formulas
    pub fn new(config: RegenConfig) -> Self {
        Self::with_registry(config, FormulaRegistry::with_builtins())
    }

    pub fn with_registry(config: RegenConfig, registry: FormulaRegistry) -> Self {
        debug!("Battle regeneration config: {:?}", config);
        let bridge = Self {
            engine: RegenEngine::from_config(&config),
            ledger: ExperienceLedger::new(),
            registry,
            config,
        };
        bridge.check_formula();
        bridge
    }

    pub fn config(&self) -> &RegenConfig {
        &self.config
    }

    /// Swap the configuration snapshot used from the next call on
    ///
    /// Health ceilings of agents already tracked are not recomputed.
    pub fn set_config(&mut self, config: RegenConfig) {
        debug!("Battle regeneration config: {:?}", config);
        self.config = config;
        self.check_formula();
    }

    pub fn registry(&self) -> &FormulaRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut FormulaRegistry {
        &mut self.registry
    }

    /// Register a formula, replacing any with the same id
    pub fn register_formula(&mut self, formula: Box<dyn RegenFormula>) -> Result<()> {
        self.registry.register(formula)?;
        self.check_formula();
        Ok(())
    }

    pub fn engine(&self) -> &RegenEngine {
        &self.engine
    }

    pub fn ledger(&self) -> &ExperienceLedger {
        &self.ledger
    }

    /// The formula ticks currently run with
    ///
    /// Unknown ids fall back to the first registered formula, and an empty
    /// registry falls back to Linear.
    pub fn active_formula(&self) -> &dyn RegenFormula {
        self.registry
            .get(&self.config.formula)
            .or_else(|| self.registry.iter().next())
            .unwrap_or(&LinearFormula)
    }

    pub fn on_agent_build<H: BattleHost + ?Sized>(&mut self, host: &H, agent: AgentId) -> bool {
        self.engine.on_agent_created(host, agent, &self.config)
    }

    /// The agent was killed, knocked out or fled
    pub fn on_agent_removed(&mut self, agent: AgentId) {
        self.engine.on_agent_removed(agent, &self.config);
    }

    /// The agent was destroyed outright
    pub fn on_agent_deleted(&mut self, agent: AgentId) {
        self.engine.on_agent_removed(agent, &self.config);
    }

    /// A blow landed; both sides and the attacker's mount restart their delay
    pub fn on_register_blow<H: BattleHost + ?Sized>(
        &mut self,
        host: &H,
        attacker: Option<AgentId>,
        victim: Option<AgentId>,
    ) {
        let attacker_mount = attacker
            .and_then(|id| host.agent(id).ok())
            .and_then(|info| info.mount);
        self.engine.on_hit(victim, attacker, attacker_mount);
    }

    pub fn on_agent_team_changed<H: BattleHost + ?Sized>(&mut self, host: &H, agent: AgentId) {
        self.engine.on_team_changed(host, agent);
    }

    /// Run one regeneration tick, unless the host has paused regeneration
    pub fn on_mission_tick<H: BattleHost>(&mut self, host: &mut H, dt: Seconds) -> Option<TickReport> {
        if host.regen_paused() {
            return None;
        }

        let formula = self
            .registry
            .get(&self.config.formula)
            .or_else(|| self.registry.iter().next())
            .unwrap_or(&LinearFormula);
        Some(
            self.engine
                .on_tick(host, dt, &self.config, formula, &mut self.ledger),
        )
    }

    /// Deliver pending experience to the host
    pub fn on_end_mission<H: BattleHost + ?Sized>(&mut self, host: &mut H) -> FlushReport {
        let pending = self.ledger.total();
        let report = self.ledger.flush(host);
        info!(
            "Mission ended: {:.2} medicine xp delivered to {} heroes ({} skipped)",
            pending, report.delivered, report.skipped
        );
        report
    }

    /// The mission restarts from scratch; pending experience is dropped
    pub fn on_mission_restart(&mut self) {
        if !self.ledger.is_empty() {
            debug!("Dropping pending xp for {} heroes", self.ledger.len());
        }
        self.engine.on_mission_reset();
        self.ledger.clear();
    }

    pub fn on_clear_scene(&mut self) {
        self.on_mission_restart();
    }

    /// Warn once about an unusable formula id instead of on every tick
    fn check_formula(&self) {
        if self.registry.resolve(&self.config.formula).is_none() {
            warn!(
                "No formulas registered, {} falls back to {}",
                self.config.formula,
                LinearFormula.id()
            );
        }
    }
}
