//! Regeneration rate models
//!
//! A formula turns the linear per-second rate computed from configuration into
//! the rate actually applied this tick, which lets the heal curve speed up or
//! slow down depending on how hurt the agent is.
//!
//! Formulas come from two places: the built-ins in [`builtins`] and whatever the
//! host registers at runtime. Both go through [`FormulaRegistry`], which keeps
//! them unique by id and ordered by `(priority, id)`.

pub mod builtins;
pub mod curve;
pub mod registry;

use std::panic::{catch_unwind, AssertUnwindSafe};

pub use builtins::{
    EveOnlineFormula, LinearFormula, QuadraticFormula, SineFormula, EVE_ONLINE_ID, LINEAR_ID,
    QUADRATIC_ID, SINE_ID,
};
pub use curve::{sample_curve, CurvePoint};
pub use registry::FormulaRegistry;

use crate::core::error::{RegenError, Result};
use crate::host::AgentInfo;

/// Priority shared by every built-in so host formulas always sort after them
pub const BUILTIN_PRIORITY: i32 = i32::MIN;

/// Inputs to a formula for one agent on one tick
#[derive(Debug, Clone, Copy)]
pub struct FormulaContext<'a> {
    /// The agent being healed, as seen at the start of the tick
    pub agent: &'a AgentInfo,
    /// Health this agent regenerates up to
    pub health_ceiling: f64,
    /// Linear rate after medicine bonuses, in health per second
    pub regen_rate: f64,
    /// Seconds to heal from zero to the ceiling at `regen_rate`
    pub regen_time: f64,
    /// Seconds to heal from zero to the absolute maximum at `regen_rate`
    pub original_regen_time: f64,
}

impl<'a> FormulaContext<'a> {
    pub fn new(agent: &'a AgentInfo, health_ceiling: f32, regen_rate: f64) -> Self {
        let health_ceiling = f64::from(health_ceiling);
        Self {
            agent,
            health_ceiling,
            regen_rate,
            regen_time: health_ceiling / regen_rate,
            original_regen_time: f64::from(agent.health_limit) / regen_rate,
        }
    }

    pub fn health(&self) -> f64 {
        f64::from(self.agent.health)
    }

    pub fn health_limit(&self) -> f64 {
        f64::from(self.agent.health_limit)
    }
}

/// A regeneration rate model
pub trait RegenFormula: Send + Sync {
    /// Display name
    fn name(&self) -> &str;

    /// Stable identifier, used for selection, de-duplication and ordering
    fn id(&self) -> &str;

    /// Sort weight; lower sorts first
    fn priority(&self) -> i32 {
        0
    }

    /// Adjusted regeneration rate in health per second
    fn calculate(&self, ctx: &FormulaContext<'_>) -> Result<f64>;
}

impl std::fmt::Debug for dyn RegenFormula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegenFormula")
            .field("id", &self.id())
            .field("priority", &self.priority())
            .finish()
    }
}

/// Run a formula, turning panics and non-finite results into errors
///
/// Host-registered formulas are third-party code; one of them misbehaving for
/// one agent must not take the whole tick down.
pub fn evaluate(formula: &dyn RegenFormula, ctx: &FormulaContext<'_>) -> Result<f64> {
    let outcome = catch_unwind(AssertUnwindSafe(|| formula.calculate(ctx)));
    let rate = match outcome {
        Ok(result) => result?,
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "panicked".to_string());
            return Err(RegenError::formula(formula.id(), reason));
        }
    };

    if rate.is_finite() {
        Ok(rate)
    } else {
        Err(RegenError::formula(
            formula.id(),
            format!("returned non-finite rate {}", rate),
        ))
    }
}
