//! Regeneration configuration with documented defaults
//!
//! The host's settings screen owns these values. The core only ever sees an
//! immutable snapshot: the mission bridge hands the same `RegenConfig` to every
//! call made during one tick, so a settings change mid-tick can never produce a
//! half-applied state.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classify::RoleTag;
use crate::core::error::{RegenError, Result};

/// Largest accepted `initial_capacity`, 512 times the host's default agent cap
pub const MAX_INITIAL_CAPACITY: usize = 1 << 20;

/// Regeneration rate per role, in percent of the agent's absolute maximum
/// health per second
///
/// At the default of 1.0 an agent heals from zero to full in 100 seconds
/// (before medicine bonuses and formula shaping).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegenRates {
    pub player: f32,
    pub companion: f32,
    pub subordinate: f32,
    pub player_troop: f32,
    pub allied_hero: f32,
    pub allied_troop: f32,
    pub independent_hero: f32,
    pub independent_troop: f32,
    pub enemy_hero: f32,
    pub enemy_troop: f32,
    pub mount: f32,
    pub animal: f32,
}

impl Default for RegenRates {
    fn default() -> Self {
        Self {
            player: 1.0,
            companion: 1.0,
            subordinate: 1.0,
            player_troop: 1.0,
            allied_hero: 1.0,
            allied_troop: 1.0,
            independent_hero: 1.0,
            independent_troop: 1.0,
            enemy_hero: 1.0,
            enemy_troop: 1.0,
            mount: 1.0,
            animal: 1.0,
        }
    }
}

impl RegenRates {
    /// Percent-per-second configured for a role
    ///
    /// Agents whose classification failed are treated as enemy troops.
    pub fn for_role(&self, role: RoleTag) -> f32 {
        match role {
            RoleTag::Mount => self.mount,
            RoleTag::Animal => self.animal,
            RoleTag::Player => self.player,
            RoleTag::Companion => self.companion,
            RoleTag::IndependentHero => self.independent_hero,
            RoleTag::IndependentTroop => self.independent_troop,
            RoleTag::Subordinate => self.subordinate,
            RoleTag::PlayerTroop => self.player_troop,
            RoleTag::AlliedHero => self.allied_hero,
            RoleTag::AlliedTroop => self.allied_troop,
            RoleTag::EnemyHero => self.enemy_hero,
            RoleTag::EnemyTroop | RoleTag::None => self.enemy_troop,
        }
    }

    fn entries(&self) -> [(&'static str, f32); 12] {
        [
            ("player", self.player),
            ("companion", self.companion),
            ("subordinate", self.subordinate),
            ("player_troop", self.player_troop),
            ("allied_hero", self.allied_hero),
            ("allied_troop", self.allied_troop),
            ("independent_hero", self.independent_hero),
            ("independent_troop", self.independent_troop),
            ("enemy_hero", self.enemy_hero),
            ("enemy_troop", self.enemy_troop),
            ("mount", self.mount),
            ("animal", self.animal),
        ]
    }
}

/// Configuration snapshot for the regeneration systems
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegenConfig {
    // === RATES ===
    /// Per-role regeneration percentages
    pub rates: RegenRates,

    // === MEDICINE ===
    /// Regen bonus (percent) for every 50 points of the agent's own medicine
    /// skill. Riders apply theirs to their mounts.
    ///
    /// At 50, a 100-medicine hero heals at 2.0x base speed.
    pub medicine_boost: f32,

    /// Regen bonus (percent) for every 50 points of the commander's medicine skill
    pub commander_medicine_boost: f32,

    // === EXPERIENCE ===
    /// Medicine xp earned by an agent (or its rider) for healing from zero to full
    pub xp_gain: f32,

    /// Medicine xp earned by the commander for healing an agent from zero to full
    pub commander_xp_gain: f32,

    // === BEHAVIOUR ===
    /// Heal up to the absolute health maximum instead of the health the agent
    /// entered the battle with. Only read when an agent is registered.
    pub heal_to_full: bool,

    /// Seconds without dealing or taking damage before regeneration resumes
    pub regen_delay: f32,

    /// Id of the selected regeneration formula
    pub formula: String,

    // === DIAGNOSTICS ===
    /// Lifecycle logging (agent registered/unregistered, xp flushed)
    pub debug: bool,

    /// Per-agent, per-tick logging. Very noisy.
    pub verbose_debug: bool,

    // === PERFORMANCE ===
    /// Minimum live agent count before the tick fans out across threads
    pub parallel_threshold: usize,

    /// Slots reserved up front. Matches the host's default agent cap.
    pub initial_capacity: usize,
}

impl Default for RegenConfig {
    fn default() -> Self {
        Self {
            rates: RegenRates::default(),
            medicine_boost: 50.0,
            commander_medicine_boost: 25.0,
            xp_gain: 5.0,
            commander_xp_gain: 0.5,
            heal_to_full: false,
            regen_delay: 0.0,
            formula: crate::formula::LINEAR_ID.to_string(),
            debug: false,
            verbose_debug: false,
            parallel_threshold: 64,
            initial_capacity: 2048,
        }
    }
}

impl RegenConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: RegenConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        for (name, value) in self.rates.entries() {
            if !value.is_finite() || value < 0.0 {
                return Err(RegenError::InvalidConfig(format!(
                    "rates.{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        let scalars = [
            ("medicine_boost", self.medicine_boost),
            ("commander_medicine_boost", self.commander_medicine_boost),
            ("xp_gain", self.xp_gain),
            ("commander_xp_gain", self.commander_xp_gain),
            ("regen_delay", self.regen_delay),
        ];
        for (name, value) in scalars {
            if !value.is_finite() || value < 0.0 {
                return Err(RegenError::InvalidConfig(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        if self.formula.trim().is_empty() {
            return Err(RegenError::InvalidConfig("formula id is empty".into()));
        }

        if self.initial_capacity == 0 || self.initial_capacity > MAX_INITIAL_CAPACITY {
            return Err(RegenError::InvalidConfig(format!(
                "initial_capacity must be between 1 and {}, got {}",
                MAX_INITIAL_CAPACITY, self.initial_capacity
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(RegenConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RegenConfig::from_toml_str(
            r#"
            formula = "02_EveOnline"
            heal_to_full = true

            [rates]
            player = 2.5
            "#,
        )
        .unwrap();

        assert_eq!(config.formula, "02_EveOnline");
        assert!(config.heal_to_full);
        assert_eq!(config.rates.player, 2.5);
        assert_eq!(config.rates.enemy_troop, 1.0);
        assert_eq!(config.medicine_boost, 50.0);
    }

    #[test]
    fn test_negative_rate_rejected() {
        let result = RegenConfig::from_toml_str("[rates]\nanimal = -1.0\n");
        assert!(matches!(result, Err(RegenError::InvalidConfig(_))));
    }

    #[test]
    fn test_empty_formula_rejected() {
        let config = RegenConfig {
            formula: "  ".into(),
            ..RegenConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let result = RegenConfig::from_toml_str("rates = 3");
        assert!(matches!(result, Err(RegenError::TomlError(_))));
    }

    #[test]
    fn test_unclassified_uses_enemy_troop_rate() {
        let rates = RegenRates {
            enemy_troop: 0.25,
            ..RegenRates::default()
        };
        assert_eq!(rates.for_role(RoleTag::None), 0.25);
        assert_eq!(rates.for_role(RoleTag::EnemyTroop), 0.25);
        assert_eq!(rates.for_role(RoleTag::AlliedTroop), 1.0);
    }

    #[test]
    fn test_toml_enemy_troop_rate_covers_unclassified() {
        let config = RegenConfig::from_toml_str("[rates]\nenemy_troop = 0.0\n").unwrap();
        assert_eq!(config.rates.for_role(RoleTag::None), 0.0);
    }

    #[test]
    fn test_initial_capacity_bounds() {
        let huge = RegenConfig {
            initial_capacity: 1_000_000_000_000_000_000,
            ..RegenConfig::default()
        };
        assert!(matches!(huge.validate(), Err(RegenError::InvalidConfig(_))));

        let zero = RegenConfig {
            initial_capacity: 0,
            ..RegenConfig::default()
        };
        assert!(zero.validate().is_err());

        let largest = RegenConfig {
            initial_capacity: MAX_INITIAL_CAPACITY,
            ..RegenConfig::default()
        };
        assert!(largest.validate().is_ok());
    }
}
