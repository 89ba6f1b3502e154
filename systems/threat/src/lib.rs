#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that scores candidate attack lanes by walking their paths.

use serde::{Deserialize, Serialize};

use redoubt_core::{BoardHalf, LaneRoute, LaneThreat, StructureCatalog, StructureView};

/// Tuning knobs for lane threat evaluation.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ThreatTuning {
    /// Radius within which a stationary structure can fire on a path cell.
    pub engagement_radius: f32,
}

impl Default for ThreatTuning {
    fn default() -> Self {
        Self {
            engagement_radius: 3.5,
        }
    }
}

/// Pure evaluator that estimates the damage a traversing unit would sustain.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreatEvaluator {
    tuning: ThreatTuning,
}

impl ThreatEvaluator {
    /// Creates an evaluator with the provided tuning.
    #[must_use]
    pub const fn new(tuning: ThreatTuning) -> Self {
        Self { tuning }
    }

    /// Scores the provided lane against the opponent's current fortification.
    ///
    /// For every path cell on the enemy half, every damaging structure within
    /// the engagement radius contributes its per-shot damage scaled by its
    /// remaining health fraction. A defender covering several path cells
    /// contributes once per covered cell; that models sustained fire across
    /// the turns a unit spends in transit. An empty path scores zero.
    #[must_use]
    pub fn evaluate(
        &self,
        route: &LaneRoute,
        defense: &StructureView,
        catalog: &StructureCatalog,
    ) -> LaneThreat {
        let mut threat = LaneThreat::clear(route.spawn());
        let radius_squared = self.tuning.engagement_radius * self.tuning.engagement_radius;

        for &cell in route.path() {
            if cell.half() != BoardHalf::Enemy {
                continue;
            }

            for defender in defense.iter() {
                let damage = catalog.damage_of(defender);
                if damage <= 0.0 {
                    continue;
                }

                let distance = cell.distance_squared(defender.at) as f32;
                if distance > radius_squared {
                    continue;
                }

                let health_fraction = if defender.max_health > 0.0 {
                    defender.health / defender.max_health
                } else {
                    0.0
                };
                threat.total += damage * health_fraction;
                let _ = threat.defenders.insert(defender.at);
            }
        }

        threat
    }
}
