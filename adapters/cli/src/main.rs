#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs headless Rampart combat simulations.

mod layout_transfer;
mod waves;

use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use rampart_core::{
    CellCoord, Command, Enemy, Notification, SpecializationId, Vec2, WeaponKind, WeaponTable,
};
use rampart_system_specialization::specialization;
use rampart_world::{self as world, query, GridLayout, World};
use serde::Serialize;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use layout_transfer::WeaponLayout;
use waves::{Lane, WaveGenerator};

const GRID_COLUMNS: u32 = 16;
const GRID_ROWS: u32 = 12;
const PATH_ROW: u32 = 5;
const KILL_BOUNTY: u32 = 5;
const WAVE_BONUS: u32 = 25;
const MAX_WAVE_SECONDS: f32 = 180.0;

/// Headless driver for the Rampart combat engine.
#[derive(Parser, Debug)]
#[command(name = "rampart")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML file overriding the built-in weapon table
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for wave generation
    #[arg(short, long, default_value = "1")]
    seed: u64,

    /// Number of waves to simulate
    #[arg(short, long, default_value = "5")]
    waves: u32,

    /// Simulation ticks per second
    #[arg(long, default_value = "30")]
    tick_rate: u32,

    /// Gold available before the first wave
    #[arg(long, default_value = "600")]
    gold: u32,

    /// Layout string (`rampart:v1:...`) to restore instead of the default defence
    #[arg(short, long)]
    layout: Option<String>,

    /// Spend bounties on upgrades and specializations between waves
    #[arg(long)]
    invest: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Log command rejections and synergy passes
    #[arg(short, long)]
    verbose: bool,
}

/// Outcome of a complete simulation.
#[derive(Debug, Serialize)]
struct Report {
    seed: u64,
    waves: u32,
    kills: u32,
    leaks: u32,
    gold: u32,
    layout: String,
    weapons: Vec<WeaponRow>,
}

#[derive(Debug, Serialize)]
struct WeaponRow {
    id: u32,
    kind: &'static str,
    column: u32,
    row: u32,
    level: u8,
    specialization: Option<&'static str>,
    kills: u32,
    total_damage_dealt: f32,
    dps: f32,
}

/// Entry point for the Rampart command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    ensure!(args.tick_rate > 0, "tick rate must be positive");
    let table = load_table(args.config.as_ref())?;
    let layout = GridLayout::new(GRID_COLUMNS, GRID_ROWS, 1.0)
        .with_path((0..GRID_COLUMNS).map(|column| CellCoord::new(column, PATH_ROW)));
    let mut world = World::new(table, layout, args.gold);

    match &args.layout {
        Some(encoded) => restore_layout(&mut world, encoded)?,
        None => place_default_defence(&mut world),
    }

    let report = simulate(&mut world, &args)?;
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("failed to serialise report")?
        );
    } else {
        print_report(&report);
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_table(path: Option<&PathBuf>) -> Result<WeaponTable> {
    let Some(path) = path else {
        return Ok(WeaponTable::standard());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read weapon table {}", path.display()))?;
    WeaponTable::from_toml_str(&contents)
        .with_context(|| format!("invalid weapon table {}", path.display()))
}

fn restore_layout(world: &mut World, encoded: &str) -> Result<()> {
    let layout = WeaponLayout::decode(encoded).context("failed to decode layout string")?;
    for record in layout.records {
        let weapon = world
            .restore(record, &mut ())
            .with_context(|| {
                format!(
                    "failed to restore {} at {:?}",
                    record.kind.label(),
                    record.cell
                )
            })?;
        debug!(weapon = weapon.get(), "layout entry restored");
    }
    Ok(())
}

fn place_default_defence(world: &mut World) {
    let plan = [
        (WeaponKind::Arrow, CellCoord::new(3, PATH_ROW - 1)),
        (WeaponKind::Cannon, CellCoord::new(6, PATH_ROW + 1)),
        (WeaponKind::Frost, CellCoord::new(8, PATH_ROW - 1)),
        (WeaponKind::SpikeTrap, CellCoord::new(7, PATH_ROW)),
        (WeaponKind::Tesla, CellCoord::new(10, PATH_ROW + 1)),
        (WeaponKind::Poison, CellCoord::new(12, PATH_ROW - 1)),
    ];
    for (kind, cell) in plan {
        world::apply(world, Command::Place { kind, cell }, &mut ());
    }
}

fn simulate(world: &mut World, args: &Args) -> Result<Report> {
    let dt = 1.0 / args.tick_rate as f32;
    let max_ticks = (MAX_WAVE_SECONDS / dt).ceil() as u32;
    let tile = query::layout(world).tile_length();
    let lane = Lane {
        origin: Vec2::new(0.0, (PATH_ROW as f32 + 0.5) * tile),
        direction: Vec2::X,
        length: GRID_COLUMNS as f32 * tile,
    };

    let mut generator = WaveGenerator::new(args.seed);
    let mut notifications: Vec<Notification> = Vec::new();
    let mut kills = 0;
    let mut leaks = 0;

    for wave in 0..args.waves {
        let mut enemies = generator.wave(wave, &lane);
        let mut leaked = vec![false; enemies.len()];
        info!(wave, enemies = enemies.len(), "wave started");

        for _ in 0..max_ticks {
            for (enemy, leaked) in enemies.iter_mut().zip(leaked.iter_mut()) {
                if *leaked {
                    continue;
                }
                let _ = enemy.advance(dt);
                if enemy.is_alive() && enemy.distance_traveled() >= lane.length {
                    *leaked = true;
                    leaks += 1;
                    enemy.take_damage(enemy.hp());
                    enemy.mark_kill_attributed();
                }
            }

            world.tick(&mut enemies, dt, &mut notifications);
            for notification in notifications.drain(..) {
                if let Notification::EnemyKilled { .. } = notification {
                    kills += 1;
                    world.earn(KILL_BOUNTY);
                }
            }

            if enemies.iter().all(|enemy| !enemy.is_alive()) {
                break;
            }
        }

        world.earn(WAVE_BONUS);
        info!(
            wave,
            kills,
            leaks,
            gold = query::gold(world),
            ticks = query::tick_index(world),
            "wave finished"
        );
        if args.invest {
            invest(world);
        }
    }

    let records = query::records(world);
    let layout = WeaponLayout { records }
        .encode()
        .context("failed to encode final layout")?;
    let dps = query::dps_report(world);
    let weapons = query::weapons(world)
        .into_iter()
        .zip(dps)
        .map(|(weapon, entry)| WeaponRow {
            id: weapon.id.get(),
            kind: weapon.kind.label(),
            column: weapon.cell.column(),
            row: weapon.cell.row(),
            level: weapon.level,
            specialization: weapon.specialization.map(|id| specialization(id).name),
            kills: weapon.kills,
            total_damage_dealt: weapon.total_damage_dealt,
            dps: entry.dps,
        })
        .collect();

    Ok(Report {
        seed: args.seed,
        waves: args.waves,
        kills,
        leaks,
        gold: query::gold(world),
        layout,
        weapons,
    })
}

fn invest(world: &mut World) {
    for weapon in query::weapons(world) {
        if let Some(price) = query::upgrade_price(world, weapon.id) {
            if price <= query::gold(world) {
                world::apply(world, Command::Upgrade { weapon: weapon.id }, &mut ());
            }
        }

        if query::can_specialize(world, weapon.id) {
            let choice: Option<SpecializationId> = query::specialization_options(world, weapon.id)
                .first()
                .map(|entry| entry.id);
            match choice {
                Some(specialization) => world::apply(
                    world,
                    Command::Specialize {
                        weapon: weapon.id,
                        specialization,
                    },
                    &mut (),
                ),
                None => warn!(weapon = weapon.id.get(), "no specialization available"),
            }
        }
    }
}

fn print_report(report: &Report) {
    println!(
        "seed {} | waves {} | kills {} | leaks {} | gold {}",
        report.seed, report.waves, report.kills, report.leaks, report.gold
    );
    for weapon in &report.weapons {
        println!(
            "#{:<3} {:<10} ({:>2},{:>2}) L{} {:<15} kills {:>4} damage {:>9.1} dps {:>6.2}",
            weapon.id,
            weapon.kind,
            weapon.column,
            weapon.row,
            weapon.level,
            weapon.specialization.unwrap_or("-"),
            weapon.kills,
            weapon.total_damage_dealt,
            weapon.dps,
        );
    }
    println!("layout {}", report.layout);
}
