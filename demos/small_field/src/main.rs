//! small_field — smallest end-to-end scenario for the swarmloc simulator.
//!
//! Eight drones search a synthetic ~13 × 22 km rectangle (geography loosely
//! modeled on the Hamburg outskirts) for three radio-signal targets,
//! converge in quorums of four, localize each signal, and move on.  The
//! permitted area carries a no-fly pocket so runs with repositioned targets
//! also exercise the boundary-recovery bearings.

use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use sl_core::{GeoPoint, SimConfig, SimRng, Tick};
use sl_engine::EngineConfig;
use sl_output::{CsvWriter, SimOutputObserver};
use sl_signal::{load_targets_reader, TargetStatus};
use sl_sim::{scatter_fleet, SimBuilder, SimObserver, TickStats};
use sl_terrain::{AscGrid, Perimeter};

// ── Constants ─────────────────────────────────────────────────────────────────

const DRONE_COUNT:           usize = 8;
const SEED:                  u64   = 42;
const TOTAL_TICKS:           u64   = 20_000;
const OUTPUT_INTERVAL_TICKS: u64   = 50;
const PROGRESS_INTERVAL:     u64   = 2_000;

/// Center of the operational area.
const CENTER: GeoPoint = GeoPoint { lon: 10.0, lat: 53.6 };

// ── Target catalog ────────────────────────────────────────────────────────────

const TARGET_CSV: &str = "\
name,lon,lat
north-beacon,10.0050,53.6450
west-repeater,9.9350,53.5880
south-array,10.0420,53.5560
";

// ── Progress printer ──────────────────────────────────────────────────────────

struct Progress {
    located_seen: u64,
}

impl SimObserver for Progress {
    fn on_tick_end(&mut self, tick: Tick, stats: &TickStats) {
        let located = stats.targets_located as u64;
        if located > self.located_seen {
            self.located_seen = located;
            println!("  {tick}: localization complete ({located} so far)");
        } else if tick.0 % PROGRESS_INTERVAL == 0 && tick.0 > 0 {
            println!(
                "  {tick}: {} moving, {} waiting, largest gathering {}",
                stats.moving, stats.waiting, stats.largest_gathering
            );
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    println!("=== small_field — swarmloc drone swarm ===");
    println!("Drones: {DRONE_COUNT}  |  Ticks: {TOTAL_TICKS}  |  Seed: {SEED}");
    println!();

    // 1. Build the permitted area: a flat rectangle with a no-fly pocket
    //    carved into the eastern side, clear of the direct search paths.
    let mut grid = AscGrid::filled(200, 200, 9.90, 53.50, 0.001, -1.0, 0.0)?;
    for row in 80..120 {
        for col in 160..180 {
            grid.set_cell(row, col, -1.0);
        }
    }
    let perimeter = Perimeter::new(grid);
    println!("Perimeter: 200 × 200 cells, no-fly pocket in the east");

    // 2. Load the signal catalog.
    let catalog = load_targets_reader(Cursor::new(TARGET_CSV))?;
    println!("Targets: {}", catalog.len());

    // 3. Scatter the fleet around the center.
    let mut rng = SimRng::new(SEED);
    let fleet = scatter_fleet(DRONE_COUNT, CENTER, 2_000.0, &mut rng);

    // 4. Sim config.
    let config = SimConfig {
        total_ticks:           TOTAL_TICKS,
        seed:                  SEED,
        output_interval_ticks: OUTPUT_INTERVAL_TICKS,
        ..SimConfig::default()
    };

    // 5. Build the sim (default engine: 10 m steps, 300 m arrival, quorum 4).
    let mut sim = SimBuilder::new(config.clone(), perimeter, catalog)
        .engine_config(EngineConfig::default())
        .fleet(fleet)
        .build()?;

    // 6. Set up output.
    std::fs::create_dir_all("output/small_field")?;
    let writer = CsvWriter::new(Path::new("output/small_field"))?;
    let mut output = SimOutputObserver::new(writer, &config);

    // 7. Run — progress to stdout, snapshots to CSV.
    let t0 = Instant::now();
    println!("Running…");
    run_with_both(&mut sim, &mut Progress { located_seen: 0 }, &mut output);
    let elapsed = t0.elapsed();

    if let Some(e) = output.take_error() {
        eprintln!("output error: {e}");
    }

    // 8. Summary.
    println!();
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    let catalog = sim.catalog();
    println!(
        "Targets located: {} / {}",
        catalog.count_with_status(TargetStatus::Located),
        catalog.len()
    );
    for id in catalog.target_ids() {
        println!("  {:<14} {:?}", catalog.name(id), catalog.status(id));
    }

    // 9. Final fleet table.
    println!();
    println!("{:<10} {:<22} {:<14}", "Drone", "Position", "Target");
    println!("{}", "-".repeat(48));
    for (i, rec) in sim.registry().iter().enumerate() {
        let target = match rec.target {
            Some(t) => sim.catalog().name(t).to_string(),
            None    => "-".to_string(),
        };
        println!("{:<10} {:<22} {:<14}", sim.names()[i], rec.position.to_string(), target);
    }

    Ok(())
}

/// Fan one run out to two observers (progress printer + output writer).
fn run_with_both<A: SimObserver, B: SimObserver>(
    sim: &mut sl_sim::Sim,
    a:   &mut A,
    b:   &mut B,
) {
    struct Both<'x, A, B>(&'x mut A, &'x mut B);

    impl<A: SimObserver, B: SimObserver> SimObserver for Both<'_, A, B> {
        fn on_tick_start(&mut self, tick: Tick) {
            self.0.on_tick_start(tick);
            self.1.on_tick_start(tick);
        }
        fn on_tick_end(&mut self, tick: Tick, stats: &TickStats) {
            self.0.on_tick_end(tick, stats);
            self.1.on_tick_end(tick, stats);
        }
        fn on_snapshot(
            &mut self,
            tick:     Tick,
            registry: &sl_engine::RegistrySnapshot,
            catalog:  &sl_signal::TargetCatalog,
        ) {
            self.0.on_snapshot(tick, registry, catalog);
            self.1.on_snapshot(tick, registry, catalog);
        }
        fn on_sim_end(&mut self, tick: Tick) {
            self.0.on_sim_end(tick);
            self.1.on_sim_end(tick);
        }
    }

    sim.run(&mut Both(a, b));
}
