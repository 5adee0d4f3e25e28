//! Simulation observer trait for progress reporting and data collection.

use sl_core::Tick;
use sl_engine::RegistrySnapshot;
use sl_signal::TargetCatalog;

use crate::TickStats;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, tick: Tick, stats: &TickStats) {
///         if tick.0 % self.interval == 0 {
///             println!("{tick}: {} moving, {} located", stats.moving, stats.targets_located);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any drone decides.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick with that tick's statistics.
    fn on_tick_end(&mut self, _tick: Tick, _stats: &TickStats) {}

    /// Called at snapshot intervals (every `config.output_interval_ticks`).
    ///
    /// Provides read-only access to the freshly installed registry snapshot
    /// and the catalog so output writers can record state without the sim
    /// knowing about any specific output format.
    fn on_snapshot(
        &mut self,
        _tick:     Tick,
        _registry: &RegistrySnapshot,
        _catalog:  &TargetCatalog,
    ) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
