#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Redoubt decision engine.
//!
//! This crate defines the value types that connect the pure decision systems
//! to the external arena. Systems consume read-only snapshot views assembled
//! from arena queries and respond exclusively through the [`ArenaActions`]
//! mutation surface; the arena alone decides whether an intent succeeds.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Number of columns (and rows) of the diamond-shaped arena board.
pub const BOARD_SIZE: u32 = 28;

/// First row belonging to the opposing half of the board.
pub const ENEMY_HALF_START: u32 = 14;

/// Columns strictly below this threshold classify as the left board region.
pub const REGION_LEFT_END: u32 = 5;

/// Columns strictly above this threshold classify as the right board region.
pub const REGION_RIGHT_START: u32 = 22;

/// Location of a single board cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    x: u32,
    y: u32,
}

impl GridCoord {
    /// Creates a new board coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Classifies the cell into the left, middle, or right board region.
    #[must_use]
    pub const fn region(&self) -> BoardRegion {
        if self.x < REGION_LEFT_END {
            BoardRegion::Left
        } else if self.x > REGION_RIGHT_START {
            BoardRegion::Right
        } else {
            BoardRegion::Mid
        }
    }

    /// Classifies the cell into the home or enemy half of the board.
    #[must_use]
    pub const fn half(&self) -> BoardHalf {
        if self.y < ENEMY_HALF_START {
            BoardHalf::Home
        } else {
            BoardHalf::Enemy
        }
    }

    /// Reports which side of the board's centre line the cell lies on.
    #[must_use]
    pub const fn side(&self) -> BoardSide {
        if self.x < BOARD_SIZE / 2 {
            BoardSide::Left
        } else {
            BoardSide::Right
        }
    }

    /// Squared Euclidean distance to another cell, in whole cells.
    #[must_use]
    pub fn distance_squared(self, other: GridCoord) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        dx * dx + dy * dy
    }
}

/// Horizontal board region derived from fixed column thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoardRegion {
    /// Columns on the far left flank.
    Left,
    /// Columns between the two flanks.
    Mid,
    /// Columns on the far right flank.
    Right,
}

impl BoardRegion {
    /// Dense index used by tally arrays, in `Left`, `Mid`, `Right` order.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Mid => 1,
            Self::Right => 2,
        }
    }
}

/// Which half of the board a cell belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoardHalf {
    /// Rows controlled by this engine's player.
    Home,
    /// Rows controlled by the opponent.
    Enemy,
}

/// Left or right side of the board's vertical centre line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoardSide {
    /// Columns left of the centre line.
    Left,
    /// Columns right of the centre line.
    Right,
}

impl BoardSide {
    /// The side facing this one across the centre line.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Dense index used by tally arrays, in `Left`, `Right` order.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }
}

/// Kinds of stationary structures the arena can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureKind {
    /// Cheap blocking structure without a weapon.
    Wall,
    /// Damaging structure that fires on traversing mobile units.
    Turret,
    /// Structure that shields friendly mobile units passing nearby.
    Support,
}

/// Kinds of mobile units the engine can deploy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MobileKind {
    /// Fast, cheap unit used to rush weakly defended lanes.
    Skirmisher,
    /// Slow, expensive unit that dismantles fortifications.
    Siege,
    /// Defensive unit deployed to blunt incoming rushes.
    Interceptor,
}

/// Cost and combat profile of a single structure kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StructureProfile {
    /// Structure points charged when the structure is placed.
    pub build_cost: f32,
    /// Structure points charged when the structure is upgraded.
    pub upgrade_cost: f32,
    /// Damage dealt per shot against mobile units, zero for unarmed kinds.
    pub damage_per_shot: f32,
    /// Damage dealt per shot once the structure is upgraded.
    pub upgraded_damage_per_shot: f32,
    /// Hit points the structure starts with.
    pub max_health: f32,
}

/// Per-kind structure profiles read from match configuration at game start.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StructureCatalog {
    /// Profile applied to walls.
    pub wall: StructureProfile,
    /// Profile applied to turrets.
    pub turret: StructureProfile,
    /// Profile applied to supports.
    pub support: StructureProfile,
}

impl StructureCatalog {
    /// Retrieves the profile for the provided structure kind.
    #[must_use]
    pub const fn profile(&self, kind: StructureKind) -> &StructureProfile {
        match kind {
            StructureKind::Wall => &self.wall,
            StructureKind::Turret => &self.turret,
            StructureKind::Support => &self.support,
        }
    }

    /// Damage per shot of the provided snapshot, honouring its upgrade state.
    #[must_use]
    pub fn damage_of(&self, snapshot: &StructureSnapshot) -> f32 {
        let profile = self.profile(snapshot.kind);
        if snapshot.upgraded {
            profile.upgraded_damage_per_shot
        } else {
            profile.damage_per_shot
        }
    }
}

impl Default for StructureCatalog {
    fn default() -> Self {
        Self {
            wall: StructureProfile {
                build_cost: 0.5,
                upgrade_cost: 1.5,
                damage_per_shot: 0.0,
                upgraded_damage_per_shot: 0.0,
                max_health: 60.0,
            },
            turret: StructureProfile {
                build_cost: 6.0,
                upgrade_cost: 6.0,
                damage_per_shot: 5.0,
                upgraded_damage_per_shot: 15.0,
                max_health: 75.0,
            },
            support: StructureProfile {
                build_cost: 4.0,
                upgrade_cost: 4.0,
                damage_per_shot: 0.0,
                upgraded_damage_per_shot: 0.0,
                max_health: 30.0,
            },
        }
    }
}

/// Cost and combat profile of a single mobile unit kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MobileProfile {
    /// Mobile points charged per deployed unit.
    pub cost: f32,
    /// Damage the unit deals per shot against stationary defences.
    pub damage: f32,
}

/// Per-kind mobile profiles read from match configuration at game start.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MobileCatalog {
    /// Profile applied to skirmishers.
    pub skirmisher: MobileProfile,
    /// Profile applied to siege units.
    pub siege: MobileProfile,
    /// Profile applied to interceptors.
    pub interceptor: MobileProfile,
}

impl MobileCatalog {
    /// Retrieves the profile for the provided mobile kind.
    #[must_use]
    pub const fn profile(&self, kind: MobileKind) -> &MobileProfile {
        match kind {
            MobileKind::Skirmisher => &self.skirmisher,
            MobileKind::Siege => &self.siege,
            MobileKind::Interceptor => &self.interceptor,
        }
    }
}

impl Default for MobileCatalog {
    fn default() -> Self {
        Self {
            skirmisher: MobileProfile {
                cost: 1.0,
                damage: 2.0,
            },
            siege: MobileProfile {
                cost: 3.0,
                damage: 8.0,
            },
            interceptor: MobileProfile {
                cost: 1.0,
                damage: 20.0,
            },
        }
    }
}

/// Priority level of a build task; lower values drain first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskTier(u8);

impl TaskTier {
    /// Support structure funding an attack launched this turn.
    pub const ATTACK_SUPPORT: TaskTier = TaskTier(0);
    /// Turret from the opening fortification book.
    pub const OPENING_TURRET: TaskTier = TaskTier(1);
    /// Wall directly shielding an opening turret.
    pub const OPENING_CENTER_WALL: TaskTier = TaskTier(2);
    /// Remaining wall from the opening fortification book.
    pub const OPENING_WALL: TaskTier = TaskTier(3);
    /// Turret added beyond the opening book.
    pub const EXTRA_TURRET: TaskTier = TaskTier(4);
    /// Wall added beyond the opening book.
    pub const EXTRA_WALL: TaskTier = TaskTier(5);
    /// Upgrade of an existing turret.
    pub const TURRET_UPGRADE: TaskTier = TaskTier(5);
    /// Upgrade of an existing wall.
    pub const WALL_UPGRADE: TaskTier = TaskTier(6);

    /// Creates a tier with an explicit numeric priority.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Retrieves the numeric priority of the tier.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

/// Single mutation a build task asks the arena to perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildOp {
    /// Place a new structure of the given kind.
    Place {
        /// Kind of structure to place.
        kind: StructureKind,
        /// Cell the structure should occupy.
        at: GridCoord,
    },
    /// Upgrade the structure standing at the cell.
    Upgrade {
        /// Kind of the structure expected at the cell.
        kind: StructureKind,
        /// Cell holding the structure to upgrade.
        at: GridCoord,
    },
    /// Remove the structure standing at the cell.
    Remove {
        /// Cell holding the structure to remove.
        at: GridCoord,
    },
}

impl BuildOp {
    /// Cell the operation targets.
    #[must_use]
    pub const fn location(&self) -> GridCoord {
        match self {
            Self::Place { at, .. } | Self::Upgrade { at, .. } | Self::Remove { at } => *at,
        }
    }

    /// Structure points the arena will charge if the operation succeeds.
    #[must_use]
    pub fn cost(&self, catalog: &StructureCatalog) -> f32 {
        match self {
            Self::Place { kind, .. } => catalog.profile(*kind).build_cost,
            Self::Upgrade { kind, .. } => catalog.profile(*kind).upgrade_cost,
            Self::Remove { .. } => 0.0,
        }
    }
}

/// Build or upgrade task pending inside the scheduler queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildTask {
    /// Mutation the task asks the arena to perform.
    pub op: BuildOp,
    /// Priority tier deciding when the task drains.
    pub tier: TaskTier,
}

/// Remaining balance of a single per-turn resource.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Budget {
    remaining: f32,
}

impl Budget {
    /// Creates a budget holding the provided balance.
    #[must_use]
    pub const fn new(remaining: f32) -> Self {
        Self { remaining }
    }

    /// Balance still available for spending.
    #[must_use]
    pub const fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Reports whether the balance covers the provided cost.
    #[must_use]
    pub fn covers(&self, cost: f32) -> bool {
        self.remaining >= cost
    }

    /// Deducts a confirmed cost from the balance.
    ///
    /// Callers must check [`Budget::covers`] first; the balance never goes
    /// negative because unconfirmed or unaffordable costs are never charged.
    pub fn charge(&mut self, cost: f32) {
        debug_assert!(self.covers(cost), "charge requires an affordable cost");
        self.remaining -= cost;
    }
}

/// Identifier of the two diagonal board edges mobile units path toward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetEdge {
    /// Upper-left diagonal edge of the enemy half.
    TopLeft,
    /// Upper-right diagonal edge of the enemy half.
    TopRight,
}

/// Spawn cell paired with the arena-authoritative path toward its target edge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaneRoute {
    spawn: GridCoord,
    path: Vec<GridCoord>,
}

impl LaneRoute {
    /// Creates a lane route from a spawn cell and its traversal path.
    #[must_use]
    pub fn new(spawn: GridCoord, path: Vec<GridCoord>) -> Self {
        Self { spawn, path }
    }

    /// Cell where mobile units enter the lane.
    #[must_use]
    pub const fn spawn(&self) -> GridCoord {
        self.spawn
    }

    /// Cells a traversing unit would visit, empty when the edge is unreachable.
    #[must_use]
    pub fn path(&self) -> &[GridCoord] {
        &self.path
    }

    /// Enemy-half side the lane attacks into.
    #[must_use]
    pub const fn target_side(&self) -> BoardSide {
        self.spawn.side().opposite()
    }
}

/// Danger estimate for a single candidate attack lane.
#[derive(Clone, Debug, PartialEq)]
pub struct LaneThreat {
    /// Spawn cell of the evaluated lane.
    pub lane: GridCoord,
    /// Accumulated expected damage over the whole traversal.
    pub total: f32,
    /// Distinct defending structures that contributed to the total.
    pub defenders: BTreeSet<GridCoord>,
}

impl LaneThreat {
    /// Threat value representing an undefended lane.
    #[must_use]
    pub fn clear(lane: GridCoord) -> Self {
        Self {
            lane,
            total: 0.0,
            defenders: BTreeSet::new(),
        }
    }
}

/// Immutable description of one stationary structure.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StructureSnapshot {
    /// Cell the structure occupies.
    pub at: GridCoord,
    /// Kind of the structure.
    pub kind: StructureKind,
    /// Current hit points.
    pub health: f32,
    /// Hit points the structure had when intact.
    pub max_health: f32,
    /// Whether the structure has been upgraded.
    pub upgraded: bool,
}

/// Read-only snapshot of the stationary structures on one board half.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StructureView {
    snapshots: Vec<StructureSnapshot>,
}

impl StructureView {
    /// Creates a view from the provided snapshots, sorted for determinism.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<StructureSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.at);
        Self { snapshots }
    }

    /// Structure occupying the provided cell, if any.
    #[must_use]
    pub fn occupant(&self, at: GridCoord) -> Option<&StructureSnapshot> {
        self.snapshots
            .binary_search_by_key(&at, |snapshot| snapshot.at)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Iterator over the captured snapshots in deterministic cell order.
    pub fn iter(&self) -> impl Iterator<Item = &StructureSnapshot> {
        self.snapshots.iter()
    }

    /// Number of structures captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no structures.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Board side the engine chose to reinforce this turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FortifySide {
    /// Reinforce the left flank first.
    Left,
    /// Reinforce the right flank first.
    Right,
    /// Reinforce both flanks evenly; used when no attack is launched.
    Symmetric,
}

/// Weakly defended enemy half discovered by the selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExploitWindow {
    /// Enemy-half side with too few damaging structures.
    pub side: BoardSide,
    /// Number of damaging structures found on that side.
    pub strength: usize,
}

/// Attack decision produced by the selector for the composer.
#[derive(Clone, Debug, PartialEq)]
pub struct AttackPlan {
    /// Spawn cell of the chosen lane.
    pub lane: GridCoord,
    /// Total threat evaluated along the lane's path.
    pub threat: f32,
    /// Distinct defenders contributing to the lane's threat.
    pub defenders: usize,
    /// Weak-side override carried into attack sizing, when present.
    pub exploit: Option<ExploitWindow>,
}

/// Complete per-turn verdict of the side/lane selector.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectorVerdict {
    /// Side the engine should reinforce this turn.
    pub fortify: FortifySide,
    /// Lane to attack through, absent on defend-only turns.
    pub attack: Option<AttackPlan>,
}

/// The two per-turn resource pools the arena tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Structure points funding placements and upgrades.
    Structure,
    /// Mobile points funding unit deployments.
    Mobile,
}

/// Observation delivered by the arena while combat frames resolve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameEvent {
    /// A mobile unit reached a board edge and scored.
    Breach {
        /// Cell where the breach happened.
        at: GridCoord,
        /// Whether the breach happened on this engine's side.
        own_side: bool,
    },
    /// A mobile unit was sampled moving through a cell.
    MobileStep {
        /// Cell the unit was observed in.
        at: GridCoord,
        /// Whether the unit belongs to this engine's player.
        own_unit: bool,
    },
}

/// Rolling match statistics snapshotted at the start of each turn.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatsSnapshot {
    /// Breaches suffered on the home side, tallied by board region.
    pub breaches_by_region: [u32; 3],
    /// Enemy mobile movement samples, tallied by board side.
    pub movement_by_side: [u32; 2],
    /// Mean of the observed enemy per-turn mobile spend, when any was seen.
    pub expected_enemy_spend: Option<f32>,
    /// Most recent home-side breach cells, newest last.
    pub recent_breaches: Vec<GridCoord>,
}

impl StatsSnapshot {
    /// Side the opponent routes the most units through, if the tallies lean.
    #[must_use]
    pub fn pressure_side(&self) -> Option<BoardSide> {
        let [left, right] = self.movement_by_side;
        if left > right {
            Some(BoardSide::Left)
        } else if right > left {
            Some(BoardSide::Right)
        } else {
            None
        }
    }
}

/// Mutation surface the decision engine drives on the external arena.
///
/// Every attempt is advisory: the arena alone validates placement rules and
/// balances, and callers must only charge their local budget trackers for
/// attempts the arena confirmed.
pub trait ArenaActions {
    /// Attempts to place a structure; `true` when the arena accepted it.
    fn attempt_place(&mut self, kind: StructureKind, at: GridCoord) -> bool;

    /// Attempts to upgrade the structure at the cell.
    fn attempt_upgrade(&mut self, at: GridCoord) -> bool;

    /// Attempts to remove the structure at the cell.
    fn attempt_remove(&mut self, at: GridCoord) -> bool;

    /// Attempts to deploy `count` mobile units, returning how many spawned.
    fn attempt_deploy(&mut self, kind: MobileKind, at: GridCoord, count: u32) -> u32;

    /// Ends the decision window; no further mutations are valid this turn.
    fn end_turn(&mut self);
}
