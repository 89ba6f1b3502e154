#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Priority-ordered, budget-constrained scheduler for build and upgrade tasks.
//!
//! The scheduler owns no arena state. Every turn it rebuilds the full task
//! queue from its fortification plan and the current occupancy view, then
//! drains the queue greedily against a structure-point budget, charging only
//! the mutations the arena confirmed.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use redoubt_core::{
    ArenaActions, BoardHalf, Budget, BuildOp, BuildTask, GridCoord, StructureCatalog,
    StructureKind, StructureView, TaskTier,
};

/// Static layout tables describing the fortification this engine maintains.
///
/// Cells are grouped by the tier their tasks drain at; a cell may appear in a
/// placement table and an upgrade table at the same time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FortificationPlan {
    /// Turrets laid on the first turn and rebuilt whenever destroyed.
    pub opening_turrets: Vec<GridCoord>,
    /// Walls directly shielding the opening turrets.
    pub center_walls: Vec<GridCoord>,
    /// Remaining walls of the opening book.
    pub opening_walls: Vec<GridCoord>,
    /// Walls upgraded unconditionally while laying the opening book.
    pub opening_upgrades: Vec<GridCoord>,
    /// Turrets added once the opening book stands.
    pub extra_turrets: Vec<GridCoord>,
    /// Walls added once the opening book stands.
    pub extra_walls: Vec<GridCoord>,
    /// Turrets upgraded when structure points allow.
    pub turret_upgrades: Vec<GridCoord>,
    /// Walls upgraded when structure points allow.
    pub wall_upgrades: Vec<GridCoord>,
    /// Cell reserved for the support structure that funds attacks.
    pub support_spot: GridCoord,
}

impl Default for FortificationPlan {
    fn default() -> Self {
        let coords = |cells: &[(u32, u32)]| -> Vec<GridCoord> {
            cells.iter().map(|&(x, y)| GridCoord::new(x, y)).collect()
        };

        Self {
            opening_turrets: coords(&[(1, 12), (26, 12), (4, 11)]),
            center_walls: coords(&[(1, 13), (26, 13), (4, 12)]),
            opening_walls: coords(&[
                (0, 13),
                (27, 13),
                (2, 12),
                (22, 12),
                (23, 12),
                (25, 12),
                (5, 11),
                (21, 11),
                (22, 11),
                (6, 10),
                (21, 10),
                (7, 9),
                (20, 9),
                (7, 8),
                (20, 8),
                (8, 7),
                (19, 7),
                (9, 6),
                (10, 6),
                (11, 6),
                (12, 6),
                (13, 6),
                (14, 6),
                (15, 6),
                (16, 6),
                (17, 6),
                (18, 6),
            ]),
            opening_upgrades: coords(&[(4, 12), (23, 12), (5, 11), (22, 11), (6, 10)]),
            extra_turrets: coords(&[(23, 11), (2, 11), (5, 10), (22, 10), (6, 9), (21, 9)]),
            extra_walls: coords(&[(3, 13), (24, 13), (3, 12), (24, 12), (5, 12), (6, 11)]),
            turret_upgrades: coords(&[
                (1, 12),
                (26, 12),
                (4, 11),
                (23, 11),
                (2, 11),
                (5, 10),
                (22, 10),
                (6, 9),
                (21, 9),
            ]),
            wall_upgrades: coords(&[
                (1, 13),
                (26, 13),
                (4, 12),
                (0, 13),
                (27, 13),
                (2, 12),
                (25, 12),
            ]),
            support_spot: GridCoord::new(13, 8),
        }
    }
}

/// Queue of pending build tasks ordered by `(tier, insertion sequence)`.
#[derive(Debug, Default)]
pub struct TaskQueue {
    heap: BinaryHeap<std::cmp::Reverse<QueuedTask>>,
    next_seq: u64,
}

impl TaskQueue {
    /// Creates an empty task queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a task; earlier pushes win ties within the same tier.
    pub fn push(&mut self, task: BuildTask) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(std::cmp::Reverse(QueuedTask { seq, task }));
    }

    /// Removes and returns the most urgent pending task.
    pub fn pop(&mut self) -> Option<BuildTask> {
        self.heap.pop().map(|entry| entry.0.task)
    }

    /// Number of tasks still pending.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Reports whether no tasks are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Discards all pending tasks and resets the insertion sequence.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.next_seq = 0;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct QueuedTask {
    seq: u64,
    task: BuildTask,
}

impl Ord for QueuedTask {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.task.tier, self.seq).cmp(&(other.task.tier, other.seq))
    }
}

impl PartialOrd for QueuedTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Configuration applied to a single drain pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DrainPolicy {
    /// Structure points withheld from every task except attack support.
    pub reserve: f32,
}

/// Result of draining the task queue against a budget.
#[derive(Clone, Debug, PartialEq)]
pub struct DrainOutcome {
    /// Tasks the arena confirmed, in commit order.
    pub committed: Vec<BuildTask>,
    /// Budget left after all confirmed charges.
    pub remaining: Budget,
}

/// Scheduler that rebuilds and drains the build-task queue every turn.
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    plan: FortificationPlan,
}

impl Scheduler {
    /// Creates a scheduler maintaining the provided fortification plan.
    #[must_use]
    pub fn new(plan: FortificationPlan) -> Self {
        Self { plan }
    }

    /// Fortification plan the scheduler maintains.
    #[must_use]
    pub fn plan(&self) -> &FortificationPlan {
        &self.plan
    }

    /// Lays the opening book unconditionally, ignoring tiers and budgets.
    ///
    /// Used on the very first turn only; the arena rejects whatever the
    /// starting balance cannot fund. Returns the number of accepted intents.
    pub fn lay_opening<A: ArenaActions>(&self, arena: &mut A) -> usize {
        let mut accepted = 0;

        for &at in &self.plan.opening_turrets {
            if arena.attempt_place(StructureKind::Turret, at) {
                accepted += 1;
            }
        }
        for &at in self.plan.center_walls.iter().chain(&self.plan.opening_walls) {
            if arena.attempt_place(StructureKind::Wall, at) {
                accepted += 1;
            }
        }
        for &at in &self.plan.opening_upgrades {
            if arena.attempt_upgrade(at) {
                accepted += 1;
            }
        }

        accepted
    }

    /// Rebuilds the full task queue from the plan and current occupancy.
    ///
    /// The queue is recomputed from scratch; a cell already holding the
    /// desired structure at the desired upgrade level is never re-enqueued.
    /// `recent_breaches` adds reactive turret tasks one row above each breach
    /// cell, and `support_requested` front-loads the attack support task.
    pub fn refresh(
        &self,
        own: &StructureView,
        recent_breaches: &[GridCoord],
        support_requested: bool,
        out: &mut TaskQueue,
    ) {
        out.clear();

        if support_requested {
            let spot = self.plan.support_spot;
            match own.occupant(spot) {
                None => out.push(BuildTask {
                    op: BuildOp::Place {
                        kind: StructureKind::Support,
                        at: spot,
                    },
                    tier: TaskTier::ATTACK_SUPPORT,
                }),
                Some(occupant)
                    if occupant.kind == StructureKind::Support && !occupant.upgraded =>
                {
                    out.push(BuildTask {
                        op: BuildOp::Upgrade {
                            kind: StructureKind::Support,
                            at: spot,
                        },
                        tier: TaskTier::ATTACK_SUPPORT,
                    });
                }
                Some(_) => {}
            }
        }

        self.enqueue_missing(
            own,
            &self.plan.opening_turrets,
            StructureKind::Turret,
            TaskTier::OPENING_TURRET,
            out,
        );
        self.enqueue_missing(
            own,
            &self.plan.center_walls,
            StructureKind::Wall,
            TaskTier::OPENING_CENTER_WALL,
            out,
        );
        self.enqueue_missing(
            own,
            &self.plan.opening_walls,
            StructureKind::Wall,
            TaskTier::OPENING_WALL,
            out,
        );

        for &breach in recent_breaches {
            // One row above the breached cell so the edge spawn stays open.
            let guard = GridCoord::new(breach.x(), breach.y() + 1);
            if guard.half() != BoardHalf::Home {
                continue;
            }
            if own.occupant(guard).is_none() {
                out.push(BuildTask {
                    op: BuildOp::Place {
                        kind: StructureKind::Turret,
                        at: guard,
                    },
                    tier: TaskTier::EXTRA_TURRET,
                });
            }
        }

        self.enqueue_missing(
            own,
            &self.plan.extra_turrets,
            StructureKind::Turret,
            TaskTier::EXTRA_TURRET,
            out,
        );
        self.enqueue_missing(
            own,
            &self.plan.extra_walls,
            StructureKind::Wall,
            TaskTier::EXTRA_WALL,
            out,
        );
        self.enqueue_upgrades(
            own,
            &self.plan.turret_upgrades,
            StructureKind::Turret,
            TaskTier::TURRET_UPGRADE,
            out,
        );
        self.enqueue_upgrades(
            own,
            &self.plan.wall_upgrades,
            StructureKind::Wall,
            TaskTier::WALL_UPGRADE,
            out,
        );
    }

    /// Drains the queue to exhaustion against the provided budget.
    ///
    /// Tasks drain in `(tier, insertion)` order. An affordable task is
    /// attempted through the arena and charged only on confirmation; a
    /// rejected task is dropped without charge. Unaffordable tasks are
    /// skipped so cheaper lower-tier tasks behind them still get their turn.
    /// The policy reserve is off limits to every tier except attack support.
    /// It is released outright when no support task turns out to be pending,
    /// and once a pending support task has been attempted; a support task the
    /// budget cannot yet fund keeps the reserve withheld so the balance
    /// carries toward it.
    pub fn drain<A: ArenaActions>(
        &self,
        queue: &mut TaskQueue,
        budget: Budget,
        policy: &DrainPolicy,
        catalog: &StructureCatalog,
        arena: &mut A,
    ) -> DrainOutcome {
        let mut remaining = budget;
        let mut reserve = policy.reserve;
        let mut support_seen = false;
        let mut committed = Vec::new();

        while let Some(task) = queue.pop() {
            let is_support = task.tier == TaskTier::ATTACK_SUPPORT;
            if is_support {
                support_seen = true;
            } else if !support_seen {
                // Tier order: nothing behind this task can be support, so
                // the reserve has nothing left to fund.
                reserve = 0.0;
            }

            let floor = if is_support { 0.0 } else { reserve };
            let cost = task.op.cost(catalog);
            if !remaining.covers(cost + floor) {
                continue;
            }

            let confirmed = match task.op {
                BuildOp::Place { kind, at } => arena.attempt_place(kind, at),
                BuildOp::Upgrade { at, .. } => arena.attempt_upgrade(at),
                BuildOp::Remove { at } => arena.attempt_remove(at),
            };
            if confirmed {
                remaining.charge(cost);
                committed.push(task);
            }
            if is_support {
                // Funded or blocked, the support spot is settled either way.
                reserve = 0.0;
            }
        }

        DrainOutcome {
            committed,
            remaining,
        }
    }

    fn enqueue_missing(
        &self,
        own: &StructureView,
        cells: &[GridCoord],
        kind: StructureKind,
        tier: TaskTier,
        out: &mut TaskQueue,
    ) {
        for &at in cells {
            if own.occupant(at).is_none() {
                out.push(BuildTask {
                    op: BuildOp::Place { kind, at },
                    tier,
                });
            }
        }
    }

    fn enqueue_upgrades(
        &self,
        own: &StructureView,
        cells: &[GridCoord],
        kind: StructureKind,
        tier: TaskTier,
        out: &mut TaskQueue,
    ) {
        for &at in cells {
            let Some(occupant) = own.occupant(at) else {
                continue;
            };
            if occupant.kind == kind && !occupant.upgraded {
                out.push(BuildTask {
                    op: BuildOp::Upgrade { kind, at },
                    tier,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TaskQueue;
    use redoubt_core::{BuildOp, BuildTask, GridCoord, StructureKind, TaskTier};

    fn place(x: u32, y: u32, tier: TaskTier) -> BuildTask {
        BuildTask {
            op: BuildOp::Place {
                kind: StructureKind::Wall,
                at: GridCoord::new(x, y),
            },
            tier,
        }
    }

    #[test]
    fn pops_by_tier_then_insertion_order() {
        let mut queue = TaskQueue::new();
        queue.push(place(0, 13, TaskTier::OPENING_WALL));
        queue.push(place(1, 13, TaskTier::OPENING_TURRET));
        queue.push(place(2, 13, TaskTier::OPENING_WALL));
        queue.push(place(3, 13, TaskTier::ATTACK_SUPPORT));

        let order: Vec<GridCoord> = std::iter::from_fn(|| queue.pop())
            .map(|task| task.op.location())
            .collect();

        assert_eq!(
            order,
            vec![
                GridCoord::new(3, 13),
                GridCoord::new(1, 13),
                GridCoord::new(0, 13),
                GridCoord::new(2, 13),
            ]
        );
    }

    #[test]
    fn equal_tiers_preserve_insertion_order() {
        let mut queue = TaskQueue::new();
        for x in 0..6 {
            queue.push(place(x, 13, TaskTier::EXTRA_WALL));
        }

        let order: Vec<u32> = std::iter::from_fn(|| queue.pop())
            .map(|task| task.op.location().x())
            .collect();

        assert_eq!(order, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn clear_resets_the_insertion_sequence() {
        let mut queue = TaskQueue::new();
        queue.push(place(0, 13, TaskTier::EXTRA_WALL));
        queue.clear();
        assert!(queue.is_empty());

        queue.push(place(1, 13, TaskTier::EXTRA_WALL));
        assert_eq!(queue.len(), 1);
        let task = queue.pop().expect("task pending");
        assert_eq!(task.op.location(), GridCoord::new(1, 13));
    }
}
