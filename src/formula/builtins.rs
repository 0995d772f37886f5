//! Built-in regeneration formulas
//!
//! All four share [`BUILTIN_PRIORITY`] so they always lead the formula list,
//! ordered among themselves by their numbered ids.

use std::f64::consts::FRAC_PI_2;

use super::{FormulaContext, RegenFormula, BUILTIN_PRIORITY};
use crate::core::error::Result;

pub const LINEAR_ID: &str = "00_Linear";
pub const QUADRATIC_ID: &str = "01_Quadratic";
pub const EVE_ONLINE_ID: &str = "02_EveOnline";
pub const SINE_ID: &str = "03_Sine";

/// Constant rate: the configured percentage, unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearFormula;

impl RegenFormula for LinearFormula {
    fn name(&self) -> &str {
        "Linear"
    }

    fn id(&self) -> &str {
        LINEAR_ID
    }

    fn priority(&self) -> i32 {
        BUILTIN_PRIORITY
    }

    fn calculate(&self, ctx: &FormulaContext<'_>) -> Result<f64> {
        Ok(ctx.regen_rate)
    }
}

/// Decelerating heal: starts at twice the linear rate and slows to zero
///
/// Healing is modelled as motion under constant deceleration,
/// `d = v0*t + (a*t^2)/2`, with `v0 = 2 * rate` and `a` chosen so the speed
/// reaches zero after `original_regen_time`. The agent's current health is the
/// distance already covered; solving for `t` tells how far along the curve the
/// agent is, and the speed at that point is the rate.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuadraticFormula;

impl QuadraticFormula {
    /// Real roots of `a*x^2 + b*x + c = 0`, or `None` when the discriminant is negative
    fn solve(a: f64, b: f64, c: f64) -> Option<(f64, f64)> {
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrt_discriminant = discriminant.sqrt();
        Some((
            (-b + sqrt_discriminant) / (2.0 * a),
            (-b - sqrt_discriminant) / (2.0 * a),
        ))
    }
}

impl RegenFormula for QuadraticFormula {
    fn name(&self) -> &str {
        "Quadratic"
    }

    fn id(&self) -> &str {
        QUADRATIC_ID
    }

    fn priority(&self) -> i32 {
        BUILTIN_PRIORITY
    }

    fn calculate(&self, ctx: &FormulaContext<'_>) -> Result<f64> {
        if ctx.regen_rate <= 0.0 {
            return Ok(0.0);
        }

        let max_rate = 2.0 * ctx.regen_rate;
        let change_rate = -max_rate / ctx.original_regen_time;

        let Some((t1, t2)) = Self::solve(change_rate / 2.0, max_rate, -ctx.health()) else {
            return Ok(0.0);
        };

        let in_range = |t: f64| t >= 0.0 && t < ctx.regen_time;
        let rate = if in_range(t1) {
            max_rate * (ctx.regen_time - t1) / ctx.regen_time
        } else if in_range(t2) {
            max_rate * (ctx.regen_time - t2) / ctx.regen_time
        } else {
            0.0
        };

        Ok(rate)
    }
}

/// Capacitor-style curve: slow when nearly empty or nearly full, fastest at a
/// quarter of the absolute maximum
#[derive(Debug, Clone, Copy, Default)]
pub struct EveOnlineFormula;

impl RegenFormula for EveOnlineFormula {
    fn name(&self) -> &str {
        "EVE Online"
    }

    fn id(&self) -> &str {
        EVE_ONLINE_ID
    }

    fn priority(&self) -> i32 {
        BUILTIN_PRIORITY
    }

    fn calculate(&self, ctx: &FormulaContext<'_>) -> Result<f64> {
        let ratio = ctx.health() / ctx.health_limit();
        Ok(10.0 * ctx.regen_rate * (ratio.sqrt() - ratio))
    }
}

/// Accelerating heal: zero at empty, 2.5x the linear rate at the ceiling
#[derive(Debug, Clone, Copy, Default)]
pub struct SineFormula;

impl RegenFormula for SineFormula {
    fn name(&self) -> &str {
        "Sine"
    }

    fn id(&self) -> &str {
        SINE_ID
    }

    fn priority(&self) -> i32 {
        BUILTIN_PRIORITY
    }

    fn calculate(&self, ctx: &FormulaContext<'_>) -> Result<f64> {
        let ratio = ctx.health() / ctx.health_ceiling;
        Ok(2.5 * ctx.regen_rate * (FRAC_PI_2 * ratio).sin())
    }
}
