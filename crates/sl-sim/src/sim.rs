//! The `Sim` struct and its tick loop.

use rustc_hash::FxHashMap;

use sl_core::{DroneId, GeoPoint, SimClock, SimConfig, TargetId, Tick};
use sl_engine::{Action, DecisionUnit, DroneRecord, RegistrySnapshot, TickContext};
use sl_signal::{TargetCatalog, TargetStatus};
use sl_terrain::{ElevationModel, Perimeter};

use crate::SimObserver;

// ── TickStats ─────────────────────────────────────────────────────────────────

/// What happened during one simulation tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickStats {
    /// Drones that executed a movement this tick.
    pub moving: usize,
    /// Drones that held position.
    pub waiting: usize,
    /// Drones that picked (or failed to pick) a new target.
    pub retargets: usize,
    /// `Locating` actions executed (localizations may be re-announced by
    /// peers of an already-located target; the catalog transition itself
    /// happens once).
    pub localizations: usize,
    /// `MarkUnreachable` actions executed.
    pub unreachable: usize,
    /// Size of the largest same-target gathering after the tick.
    pub largest_gathering: usize,
    /// Running total of located targets after the tick.
    pub targets_located: usize,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// Owns the terrain layers, the target catalog, the fleet state, and one
/// decision unit per drone.  Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim {
    /// Global configuration (total ticks, seed, output interval, …).
    pub config: SimConfig,

    /// Simulation clock — tracks the current tick and maps to wall time.
    pub clock: SimClock,

    perimeter: Perimeter,
    elevation: Option<ElevationModel>,
    catalog:   TargetCatalog,

    names:     Vec<String>,
    positions: Vec<GeoPoint>,
    /// Each drone's current target commitment, recorded from its
    /// `SetNewTarget` actions.
    targets:   Vec<Option<TargetId>>,
    units:     Vec<Box<dyn DecisionUnit>>,

    /// The snapshot every drone reads this step (previous step's state).
    registry: RegistrySnapshot,

    /// Per-drone rotating jitter bearing for `idle_jitter_m`.
    wiggle_bearing: Vec<f64>,
}

impl std::fmt::Debug for Sim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sim")
            .field("config", &self.config)
            .field("clock", &self.clock)
            .field("names", &self.names)
            .field("positions", &self.positions)
            .field("targets", &self.targets)
            .finish_non_exhaustive()
    }
}

impl Sim {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        config:    SimConfig,
        perimeter: Perimeter,
        elevation: Option<ElevationModel>,
        catalog:   TargetCatalog,
        names:     Vec<String>,
        positions: Vec<GeoPoint>,
        units:     Vec<Box<dyn DecisionUnit>>,
    ) -> Self {
        let count = names.len();
        let registry = RegistrySnapshot::new(
            positions
                .iter()
                .enumerate()
                .map(|(i, &position)| DroneRecord {
                    id: DroneId(i as u32),
                    position,
                    target: None,
                })
                .collect(),
        );
        Self {
            clock: config.make_clock(),
            config,
            perimeter,
            elevation,
            catalog,
            names,
            positions,
            targets: vec![None; count],
            units,
            registry,
            wiggle_bearing: vec![0.0; count],
        }
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run the simulation from the current tick to `config.end_tick()`.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) {
        loop {
            let now = self.clock.current_tick;
            if now >= self.config.end_tick() {
                break;
            }

            observer.on_tick_start(now);
            let stats = self.process_tick(now);
            observer.on_tick_end(now, &stats);
            if self.config.output_interval_ticks > 0
                && now.0.is_multiple_of(self.config.output_interval_ticks)
            {
                observer.on_snapshot(now, &self.registry, &self.catalog);
            }

            self.clock.advance();
        }
        observer.on_sim_end(self.clock.current_tick);
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            let now = self.clock.current_tick;
            observer.on_tick_start(now);
            let stats = self.process_tick(now);
            observer.on_tick_end(now, &stats);
            if self.config.output_interval_ticks > 0
                && now.0.is_multiple_of(self.config.output_interval_ticks)
            {
                observer.on_snapshot(now, &self.registry, &self.catalog);
            }
            self.clock.advance();
        }
    }

    pub fn drone_count(&self) -> usize {
        self.names.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn positions(&self) -> &[GeoPoint] {
        &self.positions
    }

    pub fn registry(&self) -> &RegistrySnapshot {
        &self.registry
    }

    pub fn catalog(&self) -> &TargetCatalog {
        &self.catalog
    }

    /// Which drones are committed to which target, as of the last installed
    /// snapshot.
    pub fn target_occupancy(&self) -> FxHashMap<TargetId, Vec<DroneId>> {
        build_occupancy_index(&self.registry)
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn process_tick(&mut self, now: Tick) -> TickStats {
        let mut stats = TickStats::default();
        let mut new_records = Vec::with_capacity(self.units.len());

        for i in 0..self.units.len() {
            // The context borrows terrain/catalog/registry immutably while the
            // unit is borrowed mutably — disjoint fields, one drone at a time.
            let action = {
                let ctx = TickContext {
                    tick:      now,
                    position:  self.positions[i],
                    perimeter: &self.perimeter,
                    elevation: self.elevation.as_ref(),
                    catalog:   &self.catalog,
                    registry:  &self.registry,
                };
                self.units[i].decide(&ctx)
            };

            match action {
                Action::SetNewTarget(target) => {
                    self.targets[i] = target;
                    stats.retargets += 1;
                }
                Action::MoveTowards { bearing_deg, distance_m } => {
                    self.positions[i] = self.positions[i].destination(bearing_deg, distance_m);
                    stats.moving += 1;
                }
                Action::Wait => {
                    if self.config.idle_jitter_m > 0.0 {
                        // Rotate the jitter bearing so waiting drones orbit in
                        // place instead of drifting.
                        self.wiggle_bearing[i] = (self.wiggle_bearing[i] + 90.0) % 360.0;
                        self.positions[i] = self.positions[i]
                            .destination(self.wiggle_bearing[i], self.config.idle_jitter_m);
                    }
                    stats.waiting += 1;
                }
                Action::Locating(target) => {
                    self.catalog.mark_located(target);
                    stats.localizations += 1;
                }
                Action::MarkUnreachable(target) => {
                    self.catalog.mark_unreachable(target);
                    stats.unreachable += 1;
                }
            }

            new_records.push(DroneRecord {
                id:       DroneId(i as u32),
                position: self.positions[i],
                target:   self.targets[i],
            });
        }

        // Install this step's writes; next step's reads all see them.
        self.registry = RegistrySnapshot::new(new_records);

        let occupancy = build_occupancy_index(&self.registry);
        stats.largest_gathering = occupancy.values().map(Vec::len).max().unwrap_or(0);
        stats.targets_located = self.catalog.count_with_status(TargetStatus::Located);

        stats
    }
}

// ── Occupancy index ───────────────────────────────────────────────────────────

/// Build a `TargetId → Vec<DroneId>` index of target commitments.
///
/// Time complexity: O(drone_count).  Built once per tick for the summary
/// stats and on demand for observers.
fn build_occupancy_index(registry: &RegistrySnapshot) -> FxHashMap<TargetId, Vec<DroneId>> {
    let mut index: FxHashMap<TargetId, Vec<DroneId>> = FxHashMap::default();
    for rec in registry.iter() {
        if let Some(target) = rec.target {
            index.entry(target).or_default().push(rec.id);
        }
    }
    index
}
