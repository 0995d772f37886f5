//! Formula curve sampling
//!
//! Evaluates a formula across the whole health range for a reference agent so
//! models can be compared side by side.

use serde::Serialize;

use super::{evaluate, FormulaContext, RegenFormula};
use crate::core::types::{AgentId, CreatureFamily};
use crate::host::AgentInfo;

/// Rate of a formula at one health ratio
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoint {
    /// Health as a fraction of the absolute maximum
    pub health_ratio: f64,
    /// Rate relative to the linear rate (1.0 = same as Linear)
    pub relative_rate: f64,
}

/// Sample `points` evenly spaced health ratios from 0 to 1 inclusive
///
/// The reference agent has 100 health, heals to full and runs at 1 health per
/// second linearly. Points where the formula fails are omitted.
pub fn sample_curve(formula: &dyn RegenFormula, points: usize) -> Vec<CurvePoint> {
    const HEALTH_LIMIT: f32 = 100.0;
    const LINEAR_RATE: f64 = 1.0;

    if points == 0 {
        return Vec::new();
    }

    let steps = points.saturating_sub(1).max(1) as f64;
    (0..points)
        .filter_map(|i| {
            let health_ratio = i as f64 / steps;
            let agent = reference_agent(HEALTH_LIMIT * health_ratio as f32, HEALTH_LIMIT);
            let ctx = FormulaContext::new(&agent, HEALTH_LIMIT, LINEAR_RATE);
            evaluate(formula, &ctx).ok().map(|rate| CurvePoint {
                health_ratio,
                relative_rate: rate / LINEAR_RATE,
            })
        })
        .collect()
}

fn reference_agent(health: f32, health_limit: f32) -> AgentInfo {
    AgentInfo {
        id: AgentId(0),
        health,
        health_limit,
        dying_threshold: 0.0,
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
    }
}
