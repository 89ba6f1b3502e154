use redoubt_core::{
    BoardSide, FortifySide, GridCoord, LaneRoute, StatsSnapshot, StructureCatalog, StructureKind,
    StructureSnapshot, StructureView,
};
use redoubt_system_selector::{Selector, SelectorTuning};
use redoubt_system_threat::ThreatEvaluator;

fn turret(x: u32, y: u32) -> StructureSnapshot {
    StructureSnapshot {
        at: GridCoord::new(x, y),
        kind: StructureKind::Turret,
        health: 75.0,
        max_health: 75.0,
        upgraded: false,
    }
}

fn wall(x: u32, y: u32) -> StructureSnapshot {
    StructureSnapshot {
        at: GridCoord::new(x, y),
        kind: StructureKind::Wall,
        health: 60.0,
        max_health: 60.0,
        upgraded: false,
    }
}

/// Route from the left home edge toward the enemy right half.
fn left_route() -> LaneRoute {
    LaneRoute::new(
        GridCoord::new(4, 9),
        vec![
            GridCoord::new(4, 9),
            GridCoord::new(10, 14),
            GridCoord::new(16, 18),
            GridCoord::new(21, 22),
        ],
    )
}

/// Route from the right home edge toward the enemy left half.
fn right_route() -> LaneRoute {
    LaneRoute::new(
        GridCoord::new(23, 9),
        vec![
            GridCoord::new(23, 9),
            GridCoord::new(17, 14),
            GridCoord::new(11, 18),
            GridCoord::new(6, 22),
        ],
    )
}

fn selector() -> Selector {
    Selector::new(ThreatEvaluator::default(), SelectorTuning::default())
}

#[test]
fn weak_side_override_beats_the_threat_comparison() {
    // Three turrets guard the enemy left; the single right-side turret sits
    // directly on the left route's path, so raw threat favours the right
    // route. The exploit must still send the attack into the weak right half.
    let enemy = StructureView::from_snapshots(vec![
        turret(4, 16),
        turret(5, 17),
        turret(6, 18),
        turret(16, 18),
    ]);
    let routes = [left_route(), right_route()];

    let verdict = selector().choose(
        &routes,
        &enemy,
        &StructureCatalog::default(),
        &StatsSnapshot::default(),
        10.0,
    );

    let plan = verdict.attack.expect("attack expected");
    assert_eq!(plan.lane, GridCoord::new(4, 9));
    let exploit = plan.exploit.expect("exploit window expected");
    assert_eq!(exploit.side, BoardSide::Right);
    assert_eq!(exploit.strength, 1);
    assert!(plan.threat > 0.0, "the lone turret still covers the path");
}

#[test]
fn dangerous_enemy_spend_forces_a_defend_only_verdict() {
    let stats = StatsSnapshot {
        expected_enemy_spend: Some(20.0),
        ..StatsSnapshot::default()
    };

    let verdict = selector().choose(
        &[left_route(), right_route()],
        &StructureView::default(),
        &StructureCatalog::default(),
        &stats,
        10.0,
    );

    assert_eq!(verdict.fortify, FortifySide::Symmetric);
    assert!(verdict.attack.is_none());
}

#[test]
fn a_large_own_stockpile_attacks_through_the_spend_warning() {
    let stats = StatsSnapshot {
        expected_enemy_spend: Some(20.0),
        ..StatsSnapshot::default()
    };

    let verdict = selector().choose(
        &[left_route(), right_route()],
        &StructureView::default(),
        &StructureCatalog::default(),
        &stats,
        30.0,
    );

    assert!(verdict.attack.is_some());
}

#[test]
fn the_least_threatened_lane_wins() {
    // Two turrets per side keep the exploit out of play; the pair covering
    // the right route's path makes the left route the safer choice.
    let enemy = StructureView::from_snapshots(vec![
        turret(11, 18),
        turret(12, 19),
        turret(24, 26),
        turret(25, 25),
    ]);
    let routes = [left_route(), right_route()];

    let verdict = selector().choose(
        &routes,
        &enemy,
        &StructureCatalog::default(),
        &StatsSnapshot::default(),
        10.0,
    );

    let plan = verdict.attack.expect("attack expected");
    assert_eq!(plan.lane, GridCoord::new(4, 9));
    assert!(plan.exploit.is_none());
    assert_eq!(plan.threat, 0.0, "chosen path stays out of turret range");
}

#[test]
fn threat_ties_break_toward_the_thinner_half() {
    // Turrets sit far from both paths, so both lanes score zero threat. The
    // enemy left half carries more total structures, so the right-targeting
    // route loses the tie and the left half is attacked.
    let enemy = StructureView::from_snapshots(vec![
        turret(20, 26),
        turret(21, 27),
        wall(22, 26),
        turret(2, 26),
        turret(3, 27),
    ]);
    let routes = [left_route(), right_route()];

    let verdict = selector().choose(
        &routes,
        &enemy,
        &StructureCatalog::default(),
        &StatsSnapshot::default(),
        10.0,
    );

    let plan = verdict.attack.expect("attack expected");
    assert_eq!(plan.lane, GridCoord::new(23, 9), "left half holds 2 < 3");
}

#[test]
fn symmetric_boards_prefer_the_first_candidate() {
    let enemy = StructureView::from_snapshots(vec![
        turret(2, 26),
        turret(3, 27),
        turret(24, 26),
        turret(25, 27),
    ]);
    let routes = [left_route(), right_route()];

    let verdict = selector().choose(
        &routes,
        &enemy,
        &StructureCatalog::default(),
        &StatsSnapshot::default(),
        10.0,
    );

    let plan = verdict.attack.expect("attack expected");
    assert_eq!(plan.lane, GridCoord::new(4, 9));
}

#[test]
fn exploit_without_a_matching_route_falls_back() {
    // The weak half is the left one, but the only route attacks into the
    // right half; selection falls back to the threat comparison.
    let enemy = StructureView::from_snapshots(vec![
        turret(2, 26),
        turret(20, 26),
        turret(24, 26),
        turret(25, 27),
    ]);
    let routes = [left_route()];

    let verdict = selector().choose(
        &routes,
        &enemy,
        &StructureCatalog::default(),
        &StatsSnapshot::default(),
        10.0,
    );

    let plan = verdict.attack.expect("attack expected");
    assert_eq!(plan.lane, GridCoord::new(4, 9));
    assert!(plan.exploit.is_none());
}

#[test]
fn no_routes_degrades_to_no_attack() {
    let verdict = selector().choose(
        &[],
        &StructureView::default(),
        &StructureCatalog::default(),
        &StatsSnapshot::default(),
        10.0,
    );

    assert!(verdict.attack.is_none());
    assert_eq!(
        verdict.fortify,
        FortifySide::Symmetric,
        "no movement lean means no side to favour",
    );
}

#[test]
fn fortify_follows_the_observed_movement_pressure() {
    let stats = StatsSnapshot {
        movement_by_side: [1, 5],
        ..StatsSnapshot::default()
    };

    let verdict = selector().choose(
        &[left_route(), right_route()],
        &StructureView::default(),
        &StructureCatalog::default(),
        &stats,
        10.0,
    );

    assert_eq!(verdict.fortify, FortifySide::Right);
}
