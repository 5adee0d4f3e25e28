//! Read-only per-tick inputs passed to every decision unit.

use sl_core::{GeoPoint, Tick};
use sl_signal::TargetCatalog;
use sl_terrain::{ElevationModel, Perimeter};

use crate::RegistrySnapshot;

/// Everything one drone may consult when deciding its next action.
///
/// Built once per drone per tick by the scheduler in sl-sim.  All borrows
/// live for the duration of a single `decide` call; the scheduler never
/// allows mutable access to these structures while a context is live.
pub struct TickContext<'a> {
    /// Current simulation tick.
    pub tick: Tick,

    /// The deciding drone's own position.
    pub position: GeoPoint,

    /// Permitted-area membership service.
    pub perimeter: &'a Perimeter,

    /// Ground elevation, when the scenario provides it.  Engines configured
    /// with an elevation ceiling degrade gracefully to no ceiling check when
    /// this is `None`.
    pub elevation: Option<&'a ElevationModel>,

    /// The discoverable-target catalog.
    pub catalog: &'a TargetCatalog,

    /// Previous-step view of every drone's published state.
    pub registry: &'a RegistrySnapshot,
}
