#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-turn orchestrator that sequences the decision systems.
//!
//! The planner is the only stateful piece of the engine: it tracks the
//! opening/steady-state phase, owns the rolling match statistics, and carries
//! the attack-support request from one turn into the next. Everything else
//! is recomputed from the views handed in each turn.

use log::debug;
use serde::{Deserialize, Serialize};

use redoubt_core::{
    ArenaActions, BoardSide, Budget, FrameEvent, GridCoord, LaneRoute, MobileCatalog,
    StructureCatalog, StructureKind, StructureView,
};
use redoubt_system_composer::Composer;
use redoubt_system_scheduler::{DrainPolicy, Scheduler, TaskQueue};
use redoubt_system_selector::Selector;
use redoubt_system_stats::MatchStats;

/// Tuning knobs for turn orchestration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TurnTuning {
    /// Whether the non-attack side is sealed with a throwaway gate wall.
    pub gate_enabled: bool,
    /// Gate cell sealing the left channel.
    pub left_gate: GridCoord,
    /// Gate cell sealing the right channel.
    pub right_gate: GridCoord,
    /// Mobile points the opponent accrues per turn, used for spend estimates.
    pub enemy_income: f32,
    /// Spend estimates below this floor are treated as noise and dropped.
    pub spend_floor: f32,
}

impl Default for TurnTuning {
    fn default() -> Self {
        Self {
            gate_enabled: true,
            left_gate: GridCoord::new(3, 11),
            right_gate: GridCoord::new(24, 11),
            enemy_income: 5.0,
            spend_floor: 6.0,
        }
    }
}

/// Everything the planner needs to know about the arena this turn.
#[derive(Clone, Debug)]
pub struct TurnView {
    /// Zero-based turn number reported by the arena.
    pub turn_number: u32,
    /// Stationary structures on the home half.
    pub own: StructureView,
    /// Stationary structures on the enemy half.
    pub enemy: StructureView,
    /// Candidate attack lanes with their arena-authoritative paths.
    pub routes: Vec<LaneRoute>,
    /// Structure points available to this engine.
    pub sp: f32,
    /// Mobile points available to this engine.
    pub mp: f32,
    /// Mobile points currently held by the opponent.
    pub enemy_mp: f32,
}

/// Condensed record of what one turn decided, for logs and tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TurnSummary {
    /// Build tasks the arena confirmed this turn.
    pub tasks_committed: usize,
    /// Lane attacked this turn, if any.
    pub attack_lane: Option<GridCoord>,
    /// Mobile units of all kinds the arena confirmed.
    pub units_deployed: u32,
    /// Structure points left after the scheduler drained.
    pub sp_left: f32,
    /// Mobile points left after the attack composed.
    pub mp_left: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Opening,
    SteadyState,
}

/// Orchestrator that runs the full decision sequence once per turn.
#[derive(Debug)]
pub struct TurnPlanner {
    phase: Phase,
    scheduler: Scheduler,
    selector: Selector,
    composer: Composer,
    structures: StructureCatalog,
    mobiles: MobileCatalog,
    tuning: TurnTuning,
    stats: MatchStats,
    queue: TaskQueue,
    support_requested: bool,
    last_enemy_mp: Option<f32>,
}

impl TurnPlanner {
    /// Creates a planner from its systems, catalogs, and tuning.
    #[must_use]
    pub fn new(
        scheduler: Scheduler,
        selector: Selector,
        composer: Composer,
        structures: StructureCatalog,
        mobiles: MobileCatalog,
        tuning: TurnTuning,
    ) -> Self {
        Self {
            phase: Phase::Opening,
            scheduler,
            selector,
            composer,
            structures,
            mobiles,
            tuning,
            stats: MatchStats::new(),
            queue: TaskQueue::new(),
            support_requested: false,
            last_enemy_mp: None,
        }
    }

    /// Folds one frame observation into the rolling statistics.
    ///
    /// Safe to call any number of times between turns; the per-turn decision
    /// only ever reads a snapshot taken at the start of the turn.
    pub fn observe(&mut self, event: FrameEvent) {
        self.stats.record(event);
    }

    /// Runs the complete decision sequence for one turn and submits it.
    pub fn play_turn<A: ArenaActions>(&mut self, view: &TurnView, arena: &mut A) -> TurnSummary {
        self.estimate_enemy_spend(view);

        match self.phase {
            Phase::Opening => self.play_opening(view, arena),
            Phase::SteadyState => self.play_steady_state(view, arena),
        }
    }

    fn play_opening<A: ArenaActions>(&mut self, view: &TurnView, arena: &mut A) -> TurnSummary {
        let accepted = self.scheduler.lay_opening(arena);
        debug!(
            "turn {}: opening book laid, {} intents accepted",
            view.turn_number, accepted
        );

        arena.end_turn();
        self.phase = Phase::SteadyState;

        TurnSummary {
            tasks_committed: accepted,
            attack_lane: None,
            units_deployed: 0,
            sp_left: 0.0,
            mp_left: view.mp,
        }
    }

    fn play_steady_state<A: ArenaActions>(
        &mut self,
        view: &TurnView,
        arena: &mut A,
    ) -> TurnSummary {
        let snapshot = self.stats.snapshot();

        self.scheduler.refresh(
            &view.own,
            &snapshot.recent_breaches,
            self.support_requested,
            &mut self.queue,
        );
        let reserve = if self.support_requested {
            self.structures.profile(StructureKind::Support).build_cost
        } else {
            0.0
        };
        let drained = self.scheduler.drain(
            &mut self.queue,
            Budget::new(view.sp),
            &DrainPolicy { reserve },
            &self.structures,
            arena,
        );

        let verdict = self.selector.choose(
            &view.routes,
            &view.enemy,
            &self.structures,
            &snapshot,
            view.mp,
        );
        let composed =
            self.composer
                .compose(&verdict, Budget::new(view.mp), &self.mobiles, arena);

        if let Some(plan) = &verdict.attack {
            self.seal_off_lane(plan.lane, arena);
        }
        self.support_requested = composed.wants_support;

        debug!(
            "turn {}: {} tasks committed, fortify {:?}, attack {:?}, \
             {} sieges / {} skirmishers / {} interceptors",
            view.turn_number,
            drained.committed.len(),
            verdict.fortify,
            verdict.attack.as_ref().map(|plan| plan.lane),
            composed.sieges,
            composed.skirmishers,
            composed.interceptors,
        );

        arena.end_turn();

        TurnSummary {
            tasks_committed: drained.committed.len(),
            attack_lane: verdict.attack.as_ref().map(|plan| plan.lane),
            units_deployed: composed.sieges + composed.skirmishers + composed.interceptors,
            sp_left: drained.remaining.remaining(),
            mp_left: composed.remaining.remaining(),
        }
    }

    /// Seals the channel away from the attack lane with a throwaway wall.
    ///
    /// The wall is flagged for removal in the same breath, so it steers this
    /// turn's pathing without surviving into the next turn.
    fn seal_off_lane<A: ArenaActions>(&self, lane: GridCoord, arena: &mut A) {
        if !self.tuning.gate_enabled {
            return;
        }

        let gate = match lane.side() {
            BoardSide::Left => self.tuning.right_gate,
            BoardSide::Right => self.tuning.left_gate,
        };
        if arena.attempt_place(StructureKind::Wall, gate) {
            let _ = arena.attempt_remove(gate);
        }
    }

    fn estimate_enemy_spend(&mut self, view: &TurnView) {
        if let Some(previous) = self.last_enemy_mp {
            let spent = previous + self.tuning.enemy_income - view.enemy_mp;
            if spent >= self.tuning.spend_floor {
                self.stats.record_enemy_spend(spent);
            }
        }
        self.last_enemy_mp = Some(view.enemy_mp);
    }
}

impl Default for TurnPlanner {
    fn default() -> Self {
        Self::new(
            Scheduler::default(),
            Selector::default(),
            Composer::default(),
            StructureCatalog::default(),
            MobileCatalog::default(),
            TurnTuning::default(),
        )
    }
}
