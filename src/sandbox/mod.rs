//! In-memory battle host
//!
//! A small stand-in for the real engine: it stores agents, teams and heroes in
//! maps and implements [`BattleHost`] over them. Tests, the CLI skirmish and
//! the benchmarks all drive the regeneration core through it.

use ahash::AHashMap;
use serde::Serialize;

use crate::core::error::{RegenError, Result};
use crate::core::types::{AgentId, CreatureFamily, HeroId, TeamId};
use crate::host::{AgentInfo, BattleHost, HeroInfo, TeamInfo};

/// Team relationships used when creating a sandbox team
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeamSetup {
    pub is_valid: bool,
    pub is_player_team: bool,
    pub is_player_ally: bool,
    pub is_player_general: bool,
    pub general: Option<AgentId>,
}

impl TeamSetup {
    /// The player's own team, commanded by the player
    pub fn player() -> Self {
        Self {
            is_valid: true,
            is_player_team: true,
            is_player_ally: true,
            is_player_general: true,
            general: None,
        }
    }

    pub fn ally() -> Self {
        Self {
            is_valid: true,
            is_player_team: false,
            is_player_ally: true,
            is_player_general: false,
            general: None,
        }
    }

    pub fn enemy() -> Self {
        Self {
            is_valid: true,
            is_player_team: false,
            is_player_ally: false,
            is_player_general: false,
            general: None,
        }
    }
}

/// Experience a hero has received, for reporting
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeroRecord {
    pub id: HeroId,
    pub medicine_xp: f32,
}

/// In-memory [`BattleHost`]
#[derive(Debug, Clone)]
pub struct SandboxHost {
    agents: AHashMap<AgentId, AgentInfo>,
    names: AHashMap<AgentId, String>,
    teams: AHashMap<TeamId, TeamInfo>,
    /// Known heroes and the medicine xp delivered to them
    heroes: AHashMap<HeroId, f32>,
    main_agent: Option<AgentId>,
    main_hero: Option<HeroInfo>,
    persistent_progression: bool,
    paused: bool,
    notifications: Vec<String>,
    next_agent: u64,
    next_team: u32,
}

impl SandboxHost {
    pub fn new() -> Self {
        Self {
            agents: AHashMap::new(),
            names: AHashMap::new(),
            teams: AHashMap::new(),
            heroes: AHashMap::new(),
            main_agent: None,
            main_hero: None,
            persistent_progression: true,
            paused: false,
            notifications: Vec::new(),
            next_agent: 1,
            next_team: 1,
        }
    }

    /// Create a team and return its id
    pub fn add_team(&mut self, setup: TeamSetup) -> TeamId {
        let id = TeamId(self.next_team);
        self.next_team += 1;
        self.teams.insert(
            id,
            TeamInfo {
                id,
                is_valid: setup.is_valid,
                is_player_team: setup.is_player_team,
                is_player_ally: setup.is_player_ally,
                is_player_general: setup.is_player_general,
                general: setup.general,
            },
        );
        id
    }

    /// Spawn a full-health human agent, customised by `setup`
    ///
    /// Any hero the agent carries is registered as a known hero.
    pub fn spawn_agent(&mut self, setup: impl FnOnce(&mut AgentInfo)) -> AgentId {
        let id = AgentId(self.next_agent);
        self.next_agent += 1;

        let mut info = AgentInfo {
            id,
            health: 100.0,
            health_limit: 100.0,
            dying_threshold: 1.0,
            is_mount: false,
            family: CreatureFamily::Human,
            is_player_unit: false,
            hero: None,
            is_player_companion: false,
            medicine: 0.0,
            team: None,
            mount: None,
            rider: None,
            formation_leader: None,
        };
        setup(&mut info);
        info.id = id;

        if let Some(hero) = info.hero {
            self.heroes.entry(hero).or_insert(0.0);
        }
        self.agents.insert(id, info);
        id
    }

    /// Put `rider` on `mount`, linking both ways
    pub fn mount_up(&mut self, rider: AgentId, mount: AgentId) {
        if let Some(r) = self.agents.get_mut(&rider) {
            r.mount = Some(mount);
        }
        if let Some(m) = self.agents.get_mut(&mount) {
            m.rider = Some(rider);
        }
    }

    /// Remove an agent from the battlefield
    pub fn despawn(&mut self, id: AgentId) -> Option<AgentInfo> {
        self.names.remove(&id);
        self.agents.remove(&id)
    }

    pub fn set_name(&mut self, id: AgentId, name: impl Into<String>) {
        self.names.insert(id, name.into());
    }

    /// Direct access to an agent's state
    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut AgentInfo> {
        self.agents.get_mut(&id)
    }

    /// Reduce an agent's health, never below zero
    pub fn damage(&mut self, id: AgentId, amount: f32) {
        if let Some(agent) = self.agents.get_mut(&id) {
            agent.health = (agent.health - amount).max(0.0);
        }
    }

    pub fn health(&self, id: AgentId) -> Option<f32> {
        self.agents.get(&id).map(|a| a.health)
    }

    pub fn set_team(&mut self, id: AgentId, team: Option<TeamId>) {
        if let Some(agent) = self.agents.get_mut(&id) {
            agent.team = team;
        }
    }

    pub fn set_general(&mut self, team: TeamId, general: Option<AgentId>) {
        if let Some(t) = self.teams.get_mut(&team) {
            t.general = general;
        }
    }

    pub fn set_player_general(&mut self, team: TeamId, is_player_general: bool) {
        if let Some(t) = self.teams.get_mut(&team) {
            t.is_player_general = is_player_general;
        }
    }

    pub fn set_main_agent(&mut self, agent: Option<AgentId>) {
        self.main_agent = agent;
    }

    /// Set the campaign's main hero; registers it as a known hero
    pub fn set_main_hero(&mut self, hero: Option<HeroInfo>) {
        if let Some(h) = hero {
            self.heroes.entry(h.id).or_insert(0.0);
        }
        self.main_hero = hero;
    }

    /// Forget a hero, so experience delivered to it fails
    pub fn retire_hero(&mut self, hero: HeroId) {
        self.heroes.remove(&hero);
    }

    pub fn set_persistent_progression(&mut self, enabled: bool) {
        self.persistent_progression = enabled;
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Medicine xp delivered to a hero so far
    pub fn hero_xp(&self, hero: HeroId) -> Option<f32> {
        self.heroes.get(&hero).copied()
    }

    /// All known heroes, sorted by id
    pub fn hero_records(&self) -> Vec<HeroRecord> {
        let mut records: Vec<HeroRecord> = self
            .heroes
            .iter()
            .map(|(&id, &medicine_xp)| HeroRecord { id, medicine_xp })
            .collect();
        records.sort_by_key(|r| r.id);
        records
    }

    pub fn notifications(&self) -> &[String] {
        &self.notifications
    }

    pub fn agent_ids(&self) -> Vec<AgentId> {
        let mut ids: Vec<AgentId> = self.agents.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }
}

impl Default for SandboxHost {
    fn default() -> Self {
        Self::new()
    }
}

impl BattleHost for SandboxHost {
    fn agent(&self, id: AgentId) -> Result<AgentInfo> {
        self.agents
            .get(&id)
            .cloned()
            .ok_or(RegenError::AgentNotFound(id))
    }

    fn team(&self, id: TeamId) -> Result<TeamInfo> {
        self.teams
            .get(&id)
            .cloned()
            .ok_or(RegenError::TeamNotFound(id))
    }

    fn main_agent(&self) -> Option<AgentId> {
        self.main_agent.filter(|id| self.agents.contains_key(id))
    }

    fn player_unit(&self) -> Option<AgentId> {
        self.agents
            .values()
            .filter(|a| a.is_player_unit)
            .map(|a| a.id)
            .min()
    }

    fn main_hero(&self) -> Option<HeroInfo> {
        self.main_hero
    }

    fn agent_name(&self, id: AgentId) -> String {
        self.names
            .get(&id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }

    fn persistent_progression(&self) -> bool {
        self.persistent_progression
    }

    fn regen_paused(&self) -> bool {
        self.paused
    }

    fn set_health(&mut self, id: AgentId, health: f32) -> Result<()> {
        let agent = self
            .agents
            .get_mut(&id)
            .ok_or(RegenError::AgentNotFound(id))?;
        agent.health = health;
        Ok(())
    }

    fn add_medicine_xp(&mut self, hero: HeroId, amount: f32) -> Result<()> {
        let xp = self
            .heroes
            .get_mut(&hero)
            .ok_or(RegenError::HeroNotFound(hero))?;
        *xp += amount;
        Ok(())
    }

    fn display_message(&mut self, text: &str) {
        self.notifications.push(text.to_string());
    }
}
