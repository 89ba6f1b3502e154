#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns the selector verdict into mobile deployment intents.

use serde::{Deserialize, Serialize};

use redoubt_core::{
    ArenaActions, AttackPlan, Budget, FortifySide, GridCoord, MobileCatalog, MobileKind,
    SelectorVerdict,
};

/// Tuning knobs for attack composition.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ComposerTuning {
    /// Lane threat up to which a pure skirmisher rush is acceptable.
    pub low_threat: f32,
    /// Lane threat up to which a siege-led mixed attack is acceptable.
    pub medium_threat: f32,
    /// Minimum mobile points required before rushing a defended lane.
    pub rush_mp_min: f32,
    /// Cells screened with interceptors on defend-only turns.
    pub choke_points: Vec<GridCoord>,
    /// Interceptors deployed per choke point.
    pub screen_per_choke: u32,
}

impl Default for ComposerTuning {
    fn default() -> Self {
        Self {
            low_threat: 6.0,
            medium_threat: 12.0,
            rush_mp_min: 8.0,
            choke_points: vec![
                GridCoord::new(6, 7),
                GridCoord::new(8, 5),
                GridCoord::new(19, 5),
                GridCoord::new(21, 7),
            ],
            screen_per_choke: 1,
        }
    }
}

/// Units deployed and budget left after composing one turn's attack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompositionOutcome {
    /// Whether the attack leaned on defences and wants support next turn.
    pub wants_support: bool,
    /// Siege units the arena confirmed.
    pub sieges: u32,
    /// Skirmishers the arena confirmed.
    pub skirmishers: u32,
    /// Interceptors the arena confirmed.
    pub interceptors: u32,
    /// Mobile points left after all confirmed deployments.
    pub remaining: Budget,
}

/// Composer that sizes and orders mobile deployments for the chosen lane.
#[derive(Clone, Debug, Default)]
pub struct Composer {
    tuning: ComposerTuning,
}

impl Composer {
    /// Creates a composer with the provided tuning.
    #[must_use]
    pub const fn new(tuning: ComposerTuning) -> Self {
        Self { tuning }
    }

    /// Issues deployment intents for the verdict, first matching stage wins.
    ///
    /// Undefended lanes are rushed with skirmishers alone; lightly defended
    /// lanes are rushed when the stockpile is large enough; moderately
    /// defended lanes get a siege detail sized by the distinct defenders
    /// (exploits size it from the exploit strength instead) queued ahead of
    /// the skirmishers so it leads the formation. Defend-only verdicts spend
    /// on an interceptor screen at the configured choke points. The arena is
    /// the sole authority on success; only confirmed units are charged.
    pub fn compose<A: ArenaActions>(
        &self,
        verdict: &SelectorVerdict,
        budget: Budget,
        mobiles: &MobileCatalog,
        arena: &mut A,
    ) -> CompositionOutcome {
        let mut outcome = CompositionOutcome {
            wants_support: false,
            sieges: 0,
            skirmishers: 0,
            interceptors: 0,
            remaining: budget,
        };

        match &verdict.attack {
            None => {
                if verdict.fortify == FortifySide::Symmetric {
                    self.screen_chokes(mobiles, arena, &mut outcome);
                }
            }
            Some(plan) => self.attack(plan, mobiles, arena, &mut outcome),
        }

        outcome
    }

    fn attack<A: ArenaActions>(
        &self,
        plan: &AttackPlan,
        mobiles: &MobileCatalog,
        arena: &mut A,
        outcome: &mut CompositionOutcome,
    ) {
        if plan.threat == 0.0 {
            outcome.skirmishers = rush(plan.lane, mobiles, arena, &mut outcome.remaining);
            return;
        }

        if let Some(exploit) = plan.exploit {
            let detail = exploit.strength.max(1) as u32;
            if self.lead_with_sieges(plan.lane, detail, mobiles, arena, outcome) {
                outcome.wants_support = true;
            }
            return;
        }

        if plan.threat <= self.tuning.low_threat
            && outcome.remaining.remaining() >= self.tuning.rush_mp_min
        {
            outcome.skirmishers = rush(plan.lane, mobiles, arena, &mut outcome.remaining);
            outcome.wants_support = outcome.skirmishers > 0;
            return;
        }

        if plan.threat <= self.tuning.medium_threat {
            let detail = plan.defenders as u32;
            if self.lead_with_sieges(plan.lane, detail, mobiles, arena, outcome) {
                outcome.wants_support = true;
            }
        }
    }

    /// Deploys the siege detail ahead of the skirmisher wave.
    ///
    /// Returns `false` without issuing intents when not even one siege unit
    /// plus one skirmisher fits the remaining budget.
    fn lead_with_sieges<A: ArenaActions>(
        &self,
        lane: GridCoord,
        detail: u32,
        mobiles: &MobileCatalog,
        arena: &mut A,
        outcome: &mut CompositionOutcome,
    ) -> bool {
        let siege_cost = mobiles.profile(MobileKind::Siege).cost;
        let skirmisher_cost = mobiles.profile(MobileKind::Skirmisher).cost;

        let affordable =
            ((outcome.remaining.remaining() - skirmisher_cost) / siege_cost).floor() as i64;
        let detail = (detail as i64).min(affordable);
        if detail < 1 {
            return false;
        }

        let confirmed = arena.attempt_deploy(MobileKind::Siege, lane, detail as u32);
        outcome.remaining.charge(siege_cost * confirmed as f32);
        outcome.sieges = confirmed;

        outcome.skirmishers = rush(lane, mobiles, arena, &mut outcome.remaining);
        true
    }

    fn screen_chokes<A: ArenaActions>(
        &self,
        mobiles: &MobileCatalog,
        arena: &mut A,
        outcome: &mut CompositionOutcome,
    ) {
        let cost = mobiles.profile(MobileKind::Interceptor).cost;
        for &choke in &self.tuning.choke_points {
            let batch = self.tuning.screen_per_choke;
            if batch == 0 || !outcome.remaining.covers(cost * batch as f32) {
                continue;
            }
            let confirmed = arena.attempt_deploy(MobileKind::Interceptor, choke, batch);
            outcome.remaining.charge(cost * confirmed as f32);
            outcome.interceptors += confirmed;
        }
    }
}

/// Spends the whole remaining budget on skirmishers at the lane.
fn rush<A: ArenaActions>(
    lane: GridCoord,
    mobiles: &MobileCatalog,
    arena: &mut A,
    remaining: &mut Budget,
) -> u32 {
    let cost = mobiles.profile(MobileKind::Skirmisher).cost;
    if cost <= 0.0 {
        return 0;
    }

    let count = (remaining.remaining() / cost).floor() as u32;
    if count == 0 {
        return 0;
    }

    let confirmed = arena.attempt_deploy(MobileKind::Skirmisher, lane, count);
    remaining.charge(cost * confirmed as f32);
    confirmed
}
