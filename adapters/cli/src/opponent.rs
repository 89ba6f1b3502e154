//! Seeded opponent scripts standing in for a live adversary.
//!
//! The reference arena resolves no combat, so demo matches fake the other
//! player: a script garrisons the enemy half before the first turn, then
//! spends mobile points, wears down front-line structures, and feeds the
//! frame events a real arena would deliver while its raids resolve.

use clap::ValueEnum;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use redoubt_arena::{query, Arena};
use redoubt_core::{BoardHalf, BoardSide, FrameEvent, GridCoord, ResourceKind, StructureKind};

/// Opposition presets selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OpponentPreset {
    /// A lone turret guards the left approach; the right stays open.
    Open,
    /// Symmetric turret posts behind a partial wall screen.
    Fortified,
    /// A dense, partially upgraded fortification across the whole front.
    Castle,
}

/// Deterministic opponent driven by a seeded stream of choices.
#[derive(Debug)]
pub(crate) struct OpponentScript {
    preset: OpponentPreset,
    rng: ChaCha8Rng,
    turns_seen: u32,
}

impl OpponentScript {
    /// Creates a script for the preset, reproducible for a given seed.
    pub(crate) fn new(preset: OpponentPreset, seed: u64) -> Self {
        Self {
            preset,
            rng: ChaCha8Rng::seed_from_u64(seed),
            turns_seen: 0,
        }
    }

    /// Lays the opponent's fortification before the first turn.
    pub(crate) fn garrison(&mut self, arena: &mut Arena) {
        match self.preset {
            OpponentPreset::Open => {
                let post = if self.rng.gen_bool(0.5) { (2, 15) } else { (3, 15) };
                let _ = arena.garrison(StructureKind::Turret, coord(post), false);
                for cell in [(0, 14), (1, 14), (2, 14), (3, 14), (4, 15)] {
                    if self.rng.gen_bool(0.7) {
                        let _ = arena.garrison(StructureKind::Wall, coord(cell), false);
                    }
                }
            }
            OpponentPreset::Fortified => {
                self.lay_posts(arena, &[(1, 15), (26, 15), (4, 16), (23, 16)], 0.0);
                self.lay_screen(
                    arena,
                    &[
                        (0, 14),
                        (1, 14),
                        (2, 14),
                        (3, 14),
                        (13, 14),
                        (14, 14),
                        (24, 14),
                        (25, 14),
                        (26, 14),
                        (27, 14),
                    ],
                    0.9,
                );
            }
            OpponentPreset::Castle => {
                self.lay_posts(
                    arena,
                    &[
                        (1, 15),
                        (26, 15),
                        (4, 16),
                        (23, 16),
                        (8, 17),
                        (19, 17),
                        (13, 16),
                        (14, 16),
                    ],
                    0.5,
                );
                let front: Vec<(u32, u32)> = (0..28).map(|x| (x, 14)).collect();
                self.lay_screen(arena, &front, 0.95);
            }
        }
    }

    /// Runs the opponent's share of one turn and reports what was observed.
    ///
    /// Call after the arena accrued income and before the engine decides.
    pub(crate) fn act(&mut self, arena: &mut Arena) -> Vec<FrameEvent> {
        self.turns_seen += 1;
        let mut events = Vec::new();
        if self.turns_seen < 3 || self.turns_seen % self.raid_period() != 0 {
            return events;
        }

        let held = query::resource_balance(arena, ResourceKind::Mobile, BoardHalf::Enemy);
        let spend = (held * self.spend_fraction()).floor();
        if spend < 3.0 {
            return events;
        }
        arena.spend_mobile(BoardHalf::Enemy, spend);

        let side = if self.rng.gen_bool(0.5) {
            BoardSide::Left
        } else {
            BoardSide::Right
        };
        let column = match side {
            BoardSide::Left => self.rng.gen_range(2..5),
            BoardSide::Right => self.rng.gen_range(23..26),
        };
        for row in (9..=13).rev() {
            events.push(FrameEvent::MobileStep {
                at: GridCoord::new(column, row),
                own_unit: false,
            });
        }

        // Raids chew on the wall shielding the raided channel.
        let front = match side {
            BoardSide::Left => GridCoord::new(1, 13),
            BoardSide::Right => GridCoord::new(26, 13),
        };
        arena.batter(front, spend * 1.5);

        if self.rng.gen_bool(self.breach_chance()) {
            let row = self.rng.gen_range(9..12);
            let at = match side {
                BoardSide::Left => GridCoord::new(13 - row, row),
                BoardSide::Right => GridCoord::new(14 + row, row),
            };
            events.push(FrameEvent::Breach { at, own_side: true });
        }

        events
    }

    fn lay_posts(&mut self, arena: &mut Arena, cells: &[(u32, u32)], upgrade_chance: f64) {
        for &cell in cells {
            let upgraded = upgrade_chance > 0.0 && self.rng.gen_bool(upgrade_chance);
            let _ = arena.garrison(StructureKind::Turret, coord(cell), upgraded);
        }
    }

    fn lay_screen(&mut self, arena: &mut Arena, cells: &[(u32, u32)], chance: f64) {
        for &cell in cells {
            if self.rng.gen_bool(chance) {
                let _ = arena.garrison(StructureKind::Wall, coord(cell), false);
            }
        }
    }

    fn raid_period(&self) -> u32 {
        match self.preset {
            OpponentPreset::Open => 4,
            OpponentPreset::Fortified => 3,
            OpponentPreset::Castle => 2,
        }
    }

    fn spend_fraction(&self) -> f32 {
        match self.preset {
            OpponentPreset::Open => 0.5,
            OpponentPreset::Fortified => 0.7,
            OpponentPreset::Castle => 0.9,
        }
    }

    fn breach_chance(&self) -> f64 {
        match self.preset {
            OpponentPreset::Open => 0.1,
            OpponentPreset::Fortified => 0.25,
            OpponentPreset::Castle => 0.4,
        }
    }
}

const fn coord((x, y): (u32, u32)) -> GridCoord {
    GridCoord::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::{OpponentPreset, OpponentScript};
    use redoubt_arena::{query, Arena};
    use redoubt_core::{BoardHalf, BoardSide, MobileCatalog, StructureCatalog, StructureKind};

    fn arena() -> Arena {
        Arena::new(StructureCatalog::default(), MobileCatalog::default())
    }

    #[test]
    fn open_garrisons_leave_the_right_approach_bare() {
        let mut arena = arena();
        let mut script = OpponentScript::new(OpponentPreset::Open, 11);
        script.garrison(&mut arena);

        let enemy = query::structure_view(&arena, BoardHalf::Enemy);
        assert!(!enemy.is_empty());
        assert!(enemy
            .iter()
            .filter(|snapshot| snapshot.kind == StructureKind::Turret)
            .all(|snapshot| snapshot.at.side() == BoardSide::Left));
    }

    #[test]
    fn equal_seeds_script_identical_garrisons() {
        let mut first = arena();
        let mut second = arena();
        OpponentScript::new(OpponentPreset::Castle, 99).garrison(&mut first);
        OpponentScript::new(OpponentPreset::Castle, 99).garrison(&mut second);

        assert_eq!(
            query::structure_view(&first, BoardHalf::Enemy),
            query::structure_view(&second, BoardHalf::Enemy),
        );
    }

    #[test]
    fn raids_wait_for_the_opening_turns() {
        let mut arena = arena();
        let mut script = OpponentScript::new(OpponentPreset::Castle, 5);
        script.garrison(&mut arena);

        arena.begin_turn();
        assert!(script.act(&mut arena).is_empty());
        arena.begin_turn();
        assert!(script.act(&mut arena).is_empty());
    }
}
