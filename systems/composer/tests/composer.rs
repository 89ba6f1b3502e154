use redoubt_core::{
    ArenaActions, AttackPlan, Budget, ExploitWindow, BoardSide, FortifySide, GridCoord,
    MobileCatalog, MobileKind, SelectorVerdict, StructureKind,
};
use redoubt_system_composer::{Composer, ComposerTuning};

/// Arena double that confirms deployments up to an optional per-call cap.
#[derive(Default)]
struct DeployArena {
    cap: Option<u32>,
    deployments: Vec<(MobileKind, GridCoord, u32)>,
}

impl ArenaActions for DeployArena {
    fn attempt_place(&mut self, _kind: StructureKind, _at: GridCoord) -> bool {
        false
    }

    fn attempt_upgrade(&mut self, _at: GridCoord) -> bool {
        false
    }

    fn attempt_remove(&mut self, _at: GridCoord) -> bool {
        false
    }

    fn attempt_deploy(&mut self, kind: MobileKind, at: GridCoord, count: u32) -> u32 {
        let confirmed = match self.cap {
            Some(cap) => count.min(cap),
            None => count,
        };
        if confirmed > 0 {
            self.deployments.push((kind, at, confirmed));
        }
        confirmed
    }

    fn end_turn(&mut self) {}
}

fn lane() -> GridCoord {
    GridCoord::new(4, 9)
}

fn attack_verdict(plan: AttackPlan) -> SelectorVerdict {
    SelectorVerdict {
        fortify: FortifySide::Left,
        attack: Some(plan),
    }
}

fn plain_plan(threat: f32, defenders: usize) -> AttackPlan {
    AttackPlan {
        lane: lane(),
        threat,
        defenders,
        exploit: None,
    }
}

#[test]
fn undefended_lane_takes_a_full_skirmisher_rush() {
    let composer = Composer::default();
    let mut arena = DeployArena::default();

    let outcome = composer.compose(
        &attack_verdict(plain_plan(0.0, 0)),
        Budget::new(10.0),
        &MobileCatalog::default(),
        &mut arena,
    );

    assert_eq!(
        arena.deployments,
        vec![(MobileKind::Skirmisher, lane(), 10)],
    );
    assert_eq!(outcome.skirmishers, 10);
    assert_eq!(outcome.sieges, 0);
    assert_eq!(outcome.remaining.remaining(), 0.0);
    assert!(!outcome.wants_support, "an open lane needs no support");
}

#[test]
fn two_defenders_send_two_sieges_ahead_of_the_wave() {
    let composer = Composer::default();
    let mut arena = DeployArena::default();

    let outcome = composer.compose(
        &attack_verdict(plain_plan(10.0, 2)),
        Budget::new(12.0),
        &MobileCatalog::default(),
        &mut arena,
    );

    assert_eq!(
        arena.deployments,
        vec![
            (MobileKind::Siege, lane(), 2),
            (MobileKind::Skirmisher, lane(), 6),
        ],
        "sieges must be queued first so they lead the formation",
    );
    assert!(outcome.wants_support);
    assert_eq!(outcome.remaining.remaining(), 0.0);
}

#[test]
fn light_defence_with_a_stockpile_still_rushes() {
    let composer = Composer::default();
    let mut arena = DeployArena::default();

    let outcome = composer.compose(
        &attack_verdict(plain_plan(5.0, 1)),
        Budget::new(9.0),
        &MobileCatalog::default(),
        &mut arena,
    );

    assert_eq!(
        arena.deployments,
        vec![(MobileKind::Skirmisher, lane(), 9)],
    );
    assert!(outcome.wants_support);
}

#[test]
fn heavy_defence_holds_the_attack_back() {
    let composer = Composer::default();
    let mut arena = DeployArena::default();

    let outcome = composer.compose(
        &attack_verdict(plain_plan(25.0, 4)),
        Budget::new(12.0),
        &MobileCatalog::default(),
        &mut arena,
    );

    assert!(arena.deployments.is_empty());
    assert!(!outcome.wants_support);
    assert_eq!(outcome.remaining.remaining(), 12.0);
}

#[test]
fn siege_detail_shrinks_to_what_the_budget_allows() {
    let composer = Composer::default();
    let mut arena = DeployArena::default();

    // Five defenders would want five sieges, but 10 MP funds only three
    // once a skirmisher is kept affordable.
    let outcome = composer.compose(
        &attack_verdict(plain_plan(11.0, 5)),
        Budget::new(10.0),
        &MobileCatalog::default(),
        &mut arena,
    );

    assert_eq!(
        arena.deployments,
        vec![
            (MobileKind::Siege, lane(), 3),
            (MobileKind::Skirmisher, lane(), 1),
        ],
    );
    assert_eq!(outcome.remaining.remaining(), 0.0);
}

#[test]
fn exploits_size_the_detail_from_the_window_strength() {
    let composer = Composer::default();
    let mut arena = DeployArena::default();

    let plan = AttackPlan {
        lane: lane(),
        threat: 30.0,
        defenders: 6,
        exploit: Some(ExploitWindow {
            side: BoardSide::Right,
            strength: 1,
        }),
    };
    let outcome = composer.compose(
        &attack_verdict(plan),
        Budget::new(12.0),
        &MobileCatalog::default(),
        &mut arena,
    );

    assert_eq!(
        arena.deployments,
        vec![
            (MobileKind::Siege, lane(), 1),
            (MobileKind::Skirmisher, lane(), 9),
        ],
        "the exploit ignores the threat thresholds entirely",
    );
    assert!(outcome.wants_support);
}

#[test]
fn an_empty_exploit_window_still_leads_with_one_siege() {
    let composer = Composer::default();
    let mut arena = DeployArena::default();

    let plan = AttackPlan {
        lane: lane(),
        threat: 2.0,
        defenders: 0,
        exploit: Some(ExploitWindow {
            side: BoardSide::Left,
            strength: 0,
        }),
    };
    let outcome = composer.compose(
        &attack_verdict(plan),
        Budget::new(5.0),
        &MobileCatalog::default(),
        &mut arena,
    );

    assert_eq!(outcome.sieges, 1);
    assert_eq!(outcome.skirmishers, 2);
}

#[test]
fn defend_only_turns_screen_the_choke_points() {
    let composer = Composer::default();
    let mut arena = DeployArena::default();
    let verdict = SelectorVerdict {
        fortify: FortifySide::Symmetric,
        attack: None,
    };

    let outcome = composer.compose(
        &verdict,
        Budget::new(5.0),
        &MobileCatalog::default(),
        &mut arena,
    );

    assert_eq!(outcome.interceptors, 4, "one interceptor per choke point");
    assert_eq!(outcome.remaining.remaining(), 1.0);
    assert!(arena
        .deployments
        .iter()
        .all(|(kind, _, _)| *kind == MobileKind::Interceptor));
}

#[test]
fn a_short_screen_budget_covers_what_it_can() {
    let composer = Composer::default();
    let mut arena = DeployArena::default();
    let verdict = SelectorVerdict {
        fortify: FortifySide::Symmetric,
        attack: None,
    };

    let outcome = composer.compose(
        &verdict,
        Budget::new(2.0),
        &MobileCatalog::default(),
        &mut arena,
    );

    assert_eq!(outcome.interceptors, 2);
    assert_eq!(outcome.remaining.remaining(), 0.0);
}

#[test]
fn no_attack_without_defend_mode_deploys_nothing() {
    let composer = Composer::default();
    let mut arena = DeployArena::default();
    let verdict = SelectorVerdict {
        fortify: FortifySide::Left,
        attack: None,
    };

    let outcome = composer.compose(
        &verdict,
        Budget::new(20.0),
        &MobileCatalog::default(),
        &mut arena,
    );

    assert!(arena.deployments.is_empty());
    assert_eq!(outcome.remaining.remaining(), 20.0);
}

#[test]
fn partially_confirmed_deployments_charge_only_what_spawned() {
    let composer = Composer::default();
    let mut arena = DeployArena {
        cap: Some(3),
        ..DeployArena::default()
    };

    let outcome = composer.compose(
        &attack_verdict(plain_plan(0.0, 0)),
        Budget::new(10.0),
        &MobileCatalog::default(),
        &mut arena,
    );

    assert_eq!(outcome.skirmishers, 3);
    assert_eq!(outcome.remaining.remaining(), 7.0);
}

#[test]
fn a_fractional_budget_below_one_unit_stays_idle() {
    let composer = Composer::new(ComposerTuning::default());
    let mut arena = DeployArena::default();

    let outcome = composer.compose(
        &attack_verdict(plain_plan(0.0, 0)),
        Budget::new(0.5),
        &MobileCatalog::default(),
        &mut arena,
    );

    assert!(arena.deployments.is_empty());
    assert_eq!(outcome.remaining.remaining(), 0.5);
}
