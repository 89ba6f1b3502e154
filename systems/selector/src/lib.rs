#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that picks the board side to fortify and the lane to attack.

use serde::{Deserialize, Serialize};

use redoubt_core::{
    AttackPlan, BoardSide, ExploitWindow, FortifySide, LaneRoute, SelectorVerdict, StatsSnapshot,
    StructureCatalog, StructureView,
};
use redoubt_system_threat::ThreatEvaluator;

/// Tuning knobs for side and lane selection.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SelectorTuning {
    /// Maximum damaging structures an enemy half may hold and still count
    /// as exploitable.
    pub exploit_max_defenders: usize,
    /// Expected enemy mobile spend at which the engine switches to defence.
    pub defend_spend_threshold: f32,
    /// Own mobile-point balance above which the engine attacks anyway.
    pub own_mp_ceiling: f32,
}

impl Default for SelectorTuning {
    fn default() -> Self {
        Self {
            exploit_max_defenders: 1,
            defend_spend_threshold: 14.0,
            own_mp_ceiling: 22.0,
        }
    }
}

/// Side and lane selector driven by lane threat and rolling statistics.
#[derive(Clone, Debug, Default)]
pub struct Selector {
    evaluator: ThreatEvaluator,
    tuning: SelectorTuning,
}

impl Selector {
    /// Creates a selector with the provided evaluator and tuning.
    #[must_use]
    pub const fn new(evaluator: ThreatEvaluator, tuning: SelectorTuning) -> Self {
        Self { evaluator, tuning }
    }

    /// Chooses the fortify side and attack lane for this turn.
    ///
    /// Decision order: a defend-only verdict when the opponent's observed
    /// spend looks dangerous, then the weak-side exploit override, then the
    /// minimum-threat lane with deterministic tie-breaking. An empty route
    /// set degrades to a no-attack verdict rather than an error.
    #[must_use]
    pub fn choose(
        &self,
        routes: &[LaneRoute],
        enemy: &StructureView,
        catalog: &StructureCatalog,
        stats: &StatsSnapshot,
        own_mp: f32,
    ) -> SelectorVerdict {
        let fortify = match stats.pressure_side() {
            Some(BoardSide::Left) => FortifySide::Left,
            Some(BoardSide::Right) => FortifySide::Right,
            None => FortifySide::Symmetric,
        };

        if let Some(expected) = stats.expected_enemy_spend {
            if expected >= self.tuning.defend_spend_threshold && own_mp < self.tuning.own_mp_ceiling
            {
                return SelectorVerdict {
                    fortify: FortifySide::Symmetric,
                    attack: None,
                };
            }
        }

        let attack = self
            .find_exploit(routes, enemy, catalog)
            .or_else(|| self.least_threatened(routes, enemy, catalog));

        SelectorVerdict { fortify, attack }
    }

    fn find_exploit(
        &self,
        routes: &[LaneRoute],
        enemy: &StructureView,
        catalog: &StructureCatalog,
    ) -> Option<AttackPlan> {
        let damaging = side_counts(enemy, |snapshot| catalog.damage_of(snapshot) > 0.0);

        let weak_side = [BoardSide::Left, BoardSide::Right]
            .into_iter()
            .filter(|side| damaging[side.index()] <= self.tuning.exploit_max_defenders)
            .min_by_key(|side| (damaging[side.index()], side.index()))?;

        let route = routes
            .iter()
            .find(|route| route.target_side() == weak_side)?;
        let threat = self.evaluator.evaluate(route, enemy, catalog);

        Some(AttackPlan {
            lane: route.spawn(),
            threat: threat.total,
            defenders: threat.defenders.len(),
            exploit: Some(ExploitWindow {
                side: weak_side,
                strength: damaging[weak_side.index()],
            }),
        })
    }

    fn least_threatened(
        &self,
        routes: &[LaneRoute],
        enemy: &StructureView,
        catalog: &StructureCatalog,
    ) -> Option<AttackPlan> {
        let reinforcement = side_counts(enemy, |_| true);

        let mut best: Option<(Candidate, AttackPlan)> = None;
        for (index, route) in routes.iter().enumerate() {
            let threat = self.evaluator.evaluate(route, enemy, catalog);
            let candidate = Candidate {
                threat: threat.total,
                reinforcement: reinforcement[route.target_side().index()],
                index,
            };
            let plan = AttackPlan {
                lane: route.spawn(),
                threat: threat.total,
                defenders: threat.defenders.len(),
                exploit: None,
            };

            match &mut best {
                Some((incumbent, held)) => {
                    if candidate.precedes(incumbent) {
                        *incumbent = candidate;
                        *held = plan;
                    }
                }
                None => best = Some((candidate, plan)),
            }
        }

        best.map(|(_, plan)| plan)
    }
}

fn side_counts<F>(enemy: &StructureView, mut keep: F) -> [usize; 2]
where
    F: FnMut(&redoubt_core::StructureSnapshot) -> bool,
{
    let mut counts = [0usize; 2];
    for snapshot in enemy.iter() {
        if keep(snapshot) {
            counts[snapshot.at.side().index()] += 1;
        }
    }
    counts
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    threat: f32,
    reinforcement: usize,
    index: usize,
}

impl Candidate {
    fn precedes(&self, other: &Self) -> bool {
        if self.threat != other.threat {
            return self.threat < other.threat;
        }

        if self.reinforcement != other.reinforcement {
            return self.reinforcement < other.reinforcement;
        }

        self.index < other.index
    }
}
