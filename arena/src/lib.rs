#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Reference arena implementing the external collaborator contract.
//!
//! The production arena lives outside this repository; this crate stands in
//! for it so the decision systems can be exercised end to end by tests and
//! the demo runner. It owns the authoritative board state, validates every
//! mutation attempt, and answers the same queries the real engine exposes.
//! It deliberately resolves no combat: structures only change through the
//! mutation surface, and mobile units exist solely as deployment records.

mod navigation;

use std::collections::{BTreeMap, BTreeSet};

use redoubt_core::{
    ArenaActions, BoardHalf, GridCoord, MobileCatalog, MobileKind, StructureCatalog,
    StructureKind, BOARD_SIZE,
};

use navigation::DistanceField;

/// Structure points each player starts the match with.
const STARTING_SP: f32 = 40.0;

/// Mobile points each player starts the match with.
const STARTING_MP: f32 = 5.0;

/// Structure points accrued by both players at the start of every turn.
const SP_INCOME: f32 = 5.0;

/// Mobile points accrued by both players at the start of every turn.
const MP_INCOME: f32 = 5.0;

/// Doubled taxicab radius of the diamond, measured from the board centre.
const DIAMOND_SPAN: i64 = BOARD_SIZE as i64;

fn doubled_radius(cell: GridCoord) -> i64 {
    let centre = DIAMOND_SPAN - 1;
    let dx = (2 * i64::from(cell.x()) - centre).abs();
    let dy = (2 * i64::from(cell.y()) - centre).abs();
    dx + dy
}

/// Reports whether the coordinate lies on the diamond-shaped board.
#[must_use]
pub fn in_bounds(cell: GridCoord) -> bool {
    cell.x() < BOARD_SIZE && cell.y() < BOARD_SIZE && doubled_radius(cell) <= DIAMOND_SPAN
}

/// Reports whether the coordinate sits on the board's outer edge.
#[must_use]
pub fn on_edge(cell: GridCoord) -> bool {
    cell.x() < BOARD_SIZE && cell.y() < BOARD_SIZE && doubled_radius(cell) == DIAMOND_SPAN
}

#[derive(Clone, Copy, Debug)]
struct StructureState {
    kind: StructureKind,
    health: f32,
    upgraded: bool,
}

/// Authoritative board state for one match.
#[derive(Debug)]
pub struct Arena {
    structures: BTreeMap<GridCoord, StructureState>,
    pending_removals: BTreeSet<GridCoord>,
    sp: [f32; 2],
    mp: [f32; 2],
    turn: u32,
    structure_catalog: StructureCatalog,
    mobile_catalog: MobileCatalog,
    deployments: Vec<(MobileKind, GridCoord, u32)>,
}

impl Arena {
    /// Creates an empty arena with starting balances for both players.
    #[must_use]
    pub fn new(structure_catalog: StructureCatalog, mobile_catalog: MobileCatalog) -> Self {
        Self {
            structures: BTreeMap::new(),
            pending_removals: BTreeSet::new(),
            sp: [STARTING_SP; 2],
            mp: [STARTING_MP; 2],
            turn: 0,
            structure_catalog,
            mobile_catalog,
            deployments: Vec::new(),
        }
    }

    /// Opens a new decision window, accruing income after the first turn.
    pub fn begin_turn(&mut self) {
        if self.turn > 0 {
            for side in 0..2 {
                self.sp[side] += SP_INCOME;
                self.mp[side] += MP_INCOME;
            }
        }
        self.deployments.clear();
    }

    /// Places an opposing structure during scenario setup, free of charge.
    ///
    /// Returns `false` for cells off the board, on the home half, or
    /// already occupied.
    pub fn garrison(&mut self, kind: StructureKind, at: GridCoord, upgraded: bool) -> bool {
        if !in_bounds(at) || at.half() != BoardHalf::Enemy {
            return false;
        }
        if self.structures.contains_key(&at) {
            return false;
        }

        let profile = self.structure_catalog.profile(kind);
        let _ = self.structures.insert(
            at,
            StructureState {
                kind,
                health: profile.max_health,
                upgraded,
            },
        );
        true
    }

    /// Wears down the structure at the cell, destroying it at zero health.
    ///
    /// Scenario hook standing in for combat the reference arena never
    /// resolves itself.
    pub fn batter(&mut self, at: GridCoord, damage: f32) {
        let destroyed = match self.structures.get_mut(&at) {
            Some(state) => {
                state.health -= damage;
                state.health <= 0.0
            }
            None => false,
        };
        if destroyed {
            let _ = self.structures.remove(&at);
        }
    }

    /// Debits mobile points from one player, flooring at zero.
    ///
    /// Scenario hook used to script the opponent's deployments.
    pub fn spend_mobile(&mut self, half: BoardHalf, amount: f32) {
        let index = half_index(half);
        self.mp[index] = (self.mp[index] - amount).max(0.0);
    }

    /// Mobile deployments confirmed since the turn began.
    #[must_use]
    pub fn deployments(&self) -> &[(MobileKind, GridCoord, u32)] {
        &self.deployments
    }

    fn is_blocked(&self, cell: GridCoord) -> bool {
        !in_bounds(cell) || self.structures.contains_key(&cell)
    }
}

impl ArenaActions for Arena {
    fn attempt_place(&mut self, kind: StructureKind, at: GridCoord) -> bool {
        if !in_bounds(at) || at.half() != BoardHalf::Home {
            return false;
        }
        if self.structures.contains_key(&at) {
            return false;
        }

        let profile = *self.structure_catalog.profile(kind);
        let index = half_index(BoardHalf::Home);
        if self.sp[index] < profile.build_cost {
            return false;
        }

        self.sp[index] -= profile.build_cost;
        let _ = self.structures.insert(
            at,
            StructureState {
                kind,
                health: profile.max_health,
                upgraded: false,
            },
        );
        true
    }

    fn attempt_upgrade(&mut self, at: GridCoord) -> bool {
        if at.half() != BoardHalf::Home {
            return false;
        }
        let Some(state) = self.structures.get(&at) else {
            return false;
        };
        if state.upgraded {
            return false;
        }

        let profile = *self.structure_catalog.profile(state.kind);
        let index = half_index(BoardHalf::Home);
        if self.sp[index] < profile.upgrade_cost {
            return false;
        }

        self.sp[index] -= profile.upgrade_cost;
        if let Some(state) = self.structures.get_mut(&at) {
            state.upgraded = true;
            state.health = profile.max_health;
        }
        true
    }

    fn attempt_remove(&mut self, at: GridCoord) -> bool {
        if at.half() != BoardHalf::Home || !self.structures.contains_key(&at) {
            return false;
        }
        self.pending_removals.insert(at)
    }

    fn attempt_deploy(&mut self, kind: MobileKind, at: GridCoord, count: u32) -> u32 {
        if count == 0 || !on_edge(at) || at.half() != BoardHalf::Home {
            return 0;
        }
        if self.structures.contains_key(&at) {
            return 0;
        }

        let cost = self.mobile_catalog.profile(kind).cost;
        let index = half_index(BoardHalf::Home);
        let affordable = if cost > 0.0 {
            (self.mp[index] / cost).floor() as u32
        } else {
            count
        };
        let confirmed = count.min(affordable);
        if confirmed == 0 {
            return 0;
        }

        self.mp[index] -= cost * confirmed as f32;
        self.deployments.push((kind, at, confirmed));
        confirmed
    }

    fn end_turn(&mut self) {
        for cell in std::mem::take(&mut self.pending_removals) {
            let _ = self.structures.remove(&cell);
        }
        self.turn += 1;
    }
}

const fn half_index(half: BoardHalf) -> usize {
    match half {
        BoardHalf::Home => 0,
        BoardHalf::Enemy => 1,
    }
}

/// Query functions mirroring the read side of the external arena contract.
pub mod query {
    use redoubt_core::{
        BoardHalf, BoardSide, GridCoord, LaneRoute, ResourceKind, StructureSnapshot, StructureView,
        TargetEdge, BOARD_SIZE, ENEMY_HALF_START,
    };

    use super::{Arena, DistanceField};

    /// Structure occupying the cell, reflecting all confirmed mutations.
    #[must_use]
    pub fn occupant(arena: &Arena, at: GridCoord) -> Option<StructureSnapshot> {
        arena.structures.get(&at).map(|state| snapshot(arena, at, state))
    }

    /// Snapshot of all structures standing on the requested half.
    #[must_use]
    pub fn structure_view(arena: &Arena, half: BoardHalf) -> StructureView {
        let snapshots = arena
            .structures
            .iter()
            .filter(|(at, _)| at.half() == half)
            .map(|(&at, state)| snapshot(arena, at, state))
            .collect();
        StructureView::from_snapshots(snapshots)
    }

    /// Enemy structures able to hit a unit standing at the cell.
    #[must_use]
    pub fn attackers_in_range(
        arena: &Arena,
        at: GridCoord,
        engagement_radius: f32,
    ) -> Vec<StructureSnapshot> {
        let radius_squared = engagement_radius * engagement_radius;
        arena
            .structures
            .iter()
            .filter(|(cell, _)| cell.half() == BoardHalf::Enemy)
            .map(|(&cell, state)| snapshot(arena, cell, state))
            .filter(|candidate| {
                arena.structure_catalog.damage_of(candidate) > 0.0
                    && (at.distance_squared(candidate.at) as f32) <= radius_squared
            })
            .collect()
    }

    /// Edge a unit spawned at the cell paths toward.
    #[must_use]
    pub fn target_edge(spawn: GridCoord) -> TargetEdge {
        match spawn.side() {
            BoardSide::Left => TargetEdge::TopRight,
            BoardSide::Right => TargetEdge::TopLeft,
        }
    }

    /// Authoritative path a unit spawned at the cell would take.
    ///
    /// Empty when the spawn cell is blocked or the target edge cannot be
    /// reached through the current fortifications.
    #[must_use]
    pub fn path_to_edge(arena: &Arena, spawn: GridCoord) -> Vec<GridCoord> {
        if arena.is_blocked(spawn) {
            return Vec::new();
        }

        let goals = edge_cells(target_edge(spawn));
        let field = DistanceField::seeded_from(&goals, |cell| arena.is_blocked(cell));

        let mut path = Vec::new();
        if !field.trace_downhill(spawn, &mut path) {
            path.clear();
        }
        path
    }

    /// Candidate lane assembled from a spawn cell and its current path.
    #[must_use]
    pub fn lane_route(arena: &Arena, spawn: GridCoord) -> LaneRoute {
        LaneRoute::new(spawn, path_to_edge(arena, spawn))
    }

    /// Current balance of the requested resource pool.
    #[must_use]
    pub fn resource_balance(arena: &Arena, kind: ResourceKind, half: BoardHalf) -> f32 {
        let index = super::half_index(half);
        match kind {
            ResourceKind::Structure => arena.sp[index],
            ResourceKind::Mobile => arena.mp[index],
        }
    }

    /// Number of completed turns since the match started.
    #[must_use]
    pub fn turn_number(arena: &Arena) -> u32 {
        arena.turn
    }

    fn snapshot(arena: &Arena, at: GridCoord, state: &super::StructureState) -> StructureSnapshot {
        StructureSnapshot {
            at,
            kind: state.kind,
            health: state.health,
            max_health: arena.structure_catalog.profile(state.kind).max_health,
            upgraded: state.upgraded,
        }
    }

    /// Cells composing one of the two enemy-half diagonal edges.
    fn edge_cells(edge: TargetEdge) -> Vec<GridCoord> {
        (ENEMY_HALF_START..BOARD_SIZE)
            .map(|y| match edge {
                TargetEdge::TopLeft => GridCoord::new(y - ENEMY_HALF_START, y),
                TargetEdge::TopRight => GridCoord::new(BOARD_SIZE + ENEMY_HALF_START - 1 - y, y),
            })
            .collect()
    }
}
