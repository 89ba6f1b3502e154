#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Rolling match statistics accumulated from the arena's frame feed.
//!
//! The accumulator is purely additive: frame events and spend observations
//! only ever increment tallies or append samples, so the feed can interleave
//! with turn processing as long as decisions read a snapshot taken at the
//! start of the turn instead of the live counters.

use std::collections::VecDeque;

use redoubt_core::{FrameEvent, GridCoord, StatsSnapshot};

/// Number of recent breach cells kept for reactive fortification.
const BREACH_MEMORY: usize = 4;

/// Number of enemy spend samples contributing to the rolling mean.
const SPEND_WINDOW: usize = 10;

/// Movement samples below this row count as enemy traffic worth tallying.
const MOVEMENT_ROW_LIMIT: u32 = 15;

/// Accumulator for breach, movement, and enemy-spend observations.
#[derive(Clone, Debug, Default)]
pub struct MatchStats {
    breaches_by_region: [u32; 3],
    movement_by_side: [u32; 2],
    spend_samples: VecDeque<f32>,
    recent_breaches: VecDeque<GridCoord>,
}

impl MatchStats {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one frame observation into the tallies.
    ///
    /// Breaches on the opponent's side and our own units' movement are
    /// ignored; only what the opponent does to us informs later turns.
    pub fn record(&mut self, event: FrameEvent) {
        match event {
            FrameEvent::Breach { at, own_side } => {
                if !own_side {
                    return;
                }
                self.breaches_by_region[at.region().index()] += 1;
                if self.recent_breaches.len() == BREACH_MEMORY {
                    let _ = self.recent_breaches.pop_front();
                }
                self.recent_breaches.push_back(at);
            }
            FrameEvent::MobileStep { at, own_unit } => {
                if own_unit || at.y() > MOVEMENT_ROW_LIMIT {
                    return;
                }
                self.movement_by_side[at.side().index()] += 1;
            }
        }
    }

    /// Appends one observed enemy per-turn mobile spend sample.
    pub fn record_enemy_spend(&mut self, amount: f32) {
        if self.spend_samples.len() == SPEND_WINDOW {
            let _ = self.spend_samples.pop_front();
        }
        self.spend_samples.push_back(amount);
    }

    /// Captures the current tallies for one turn's decisions.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        let expected_enemy_spend = if self.spend_samples.is_empty() {
            None
        } else {
            let sum: f32 = self.spend_samples.iter().sum();
            Some(sum / self.spend_samples.len() as f32)
        };

        StatsSnapshot {
            breaches_by_region: self.breaches_by_region,
            movement_by_side: self.movement_by_side,
            expected_enemy_spend,
            recent_breaches: self.recent_breaches.iter().copied().collect(),
        }
    }
}
