#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line runner pitting the decision engine against scripted opponents.

mod opponent;
mod plan_transfer;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use serde::Deserialize;

use redoubt_arena::{query, Arena};
use redoubt_core::{BoardHalf, GridCoord, MobileCatalog, ResourceKind, StructureCatalog};
use redoubt_system_composer::{Composer, ComposerTuning};
use redoubt_system_scheduler::{FortificationPlan, Scheduler};
use redoubt_system_selector::{Selector, SelectorTuning};
use redoubt_system_threat::{ThreatEvaluator, ThreatTuning};
use redoubt_system_turn::{TurnPlanner, TurnTuning, TurnView};

use opponent::{OpponentPreset, OpponentScript};

/// Spawn pair probing one lane per flank.
const PRIMARY_LANES: [(u32, u32); 2] = [(4, 9), (23, 9)];

/// Expanded spawn set probing every diagonal approach.
const WIDE_LANES: [(u32, u32); 6] = [(4, 9), (7, 6), (11, 2), (16, 2), (20, 6), (23, 9)];

/// Command-line arguments for one demo match.
#[derive(Debug, Parser)]
#[command(name = "redoubt", about = "Runs the decision engine against a scripted opponent")]
struct Cli {
    /// Number of turns to play.
    #[arg(long, default_value_t = 40)]
    turns: u32,

    /// Seed driving the scripted opponent's choices.
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Opposition preset to play against.
    #[arg(long, value_enum, default_value_t = OpponentPreset::Fortified)]
    opponent: OpponentPreset,

    /// JSON file overriding catalogs, tuning, and the fortification plan.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the fortification plan as a transfer string and exit.
    #[arg(long)]
    export_plan: bool,

    /// Replace the fortification plan with a transfer string.
    #[arg(long, value_name = "PLAN")]
    import_plan: Option<String>,

    /// Probe the expanded six-lane spawn set instead of the primary pair.
    #[arg(long)]
    wide_lanes: bool,
}

/// Optional overrides loaded from the `--config` JSON file.
///
/// Every section falls back to the season defaults when omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MatchConfig {
    structures: StructureCatalog,
    mobiles: MobileCatalog,
    plan: FortificationPlan,
    threat: ThreatTuning,
    selector: SelectorTuning,
    composer: ComposerTuning,
    turn: TurnTuning,
}

/// Entry point for the redoubt demo runner.
fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config file {}", path.display()))?
        }
        None => MatchConfig::default(),
    };

    if let Some(encoded) = &cli.import_plan {
        config.plan = plan_transfer::decode_plan(encoded).context("decoding the imported plan")?;
    }
    if cli.export_plan {
        println!("{}", plan_transfer::encode_plan(&config.plan));
        return Ok(());
    }

    run_match(&cli, config);
    Ok(())
}

fn run_match(cli: &Cli, config: MatchConfig) {
    let MatchConfig {
        structures,
        mobiles,
        plan,
        threat,
        selector,
        composer,
        turn,
    } = config;

    let lanes: Vec<GridCoord> = if cli.wide_lanes {
        WIDE_LANES.iter().map(|&(x, y)| GridCoord::new(x, y)).collect()
    } else {
        PRIMARY_LANES.iter().map(|&(x, y)| GridCoord::new(x, y)).collect()
    };

    let mut arena = Arena::new(structures, mobiles);
    let mut script = OpponentScript::new(cli.opponent, cli.seed);
    script.garrison(&mut arena);

    let mut planner = TurnPlanner::new(
        Scheduler::new(plan),
        Selector::new(ThreatEvaluator::new(threat), selector),
        Composer::new(composer),
        structures,
        mobiles,
        turn,
    );

    let mut tasks_committed = 0;
    let mut units_deployed = 0;
    let mut turns_attacked = 0;

    for _ in 0..cli.turns {
        arena.begin_turn();
        for event in script.act(&mut arena) {
            planner.observe(event);
        }

        let view = assemble_view(&arena, &lanes);
        let summary = planner.play_turn(&view, &mut arena);

        tasks_committed += summary.tasks_committed;
        units_deployed += summary.units_deployed;
        if summary.attack_lane.is_some() {
            turns_attacked += 1;
        }
        info!(
            "turn {}: {} tasks, {} units, sp {:.1}, mp {:.1}",
            view.turn_number,
            summary.tasks_committed,
            summary.units_deployed,
            summary.sp_left,
            summary.mp_left,
        );
    }

    let own = query::structure_view(&arena, BoardHalf::Home);
    println!("match complete after {} turns against {:?}", cli.turns, cli.opponent);
    println!("  structures standing: {}", own.len());
    println!("  build tasks committed: {tasks_committed}");
    println!("  mobile units deployed: {units_deployed}");
    println!("  turns with an attack: {turns_attacked}");
}

/// Gathers the per-turn snapshot the planner consumes from arena queries.
fn assemble_view(arena: &Arena, lanes: &[GridCoord]) -> TurnView {
    TurnView {
        turn_number: query::turn_number(arena),
        own: query::structure_view(arena, BoardHalf::Home),
        enemy: query::structure_view(arena, BoardHalf::Enemy),
        routes: lanes
            .iter()
            .map(|&spawn| query::lane_route(arena, spawn))
            .collect(),
        sp: query::resource_balance(arena, ResourceKind::Structure, BoardHalf::Home),
        mp: query::resource_balance(arena, ResourceKind::Mobile, BoardHalf::Home),
        enemy_mp: query::resource_balance(arena, ResourceKind::Mobile, BoardHalf::Enemy),
    }
}
