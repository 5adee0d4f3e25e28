//! Fluent builder for constructing a [`Sim`].

use sl_core::{DroneId, SimConfig};
use sl_engine::{DecisionEngine, DecisionUnit, EngineConfig};
use sl_signal::TargetCatalog;
use sl_terrain::{ElevationModel, Perimeter};

use crate::{FleetMember, Sim, SimError, SimResult};

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SimConfig`] — total ticks, seed, output interval, …
/// - [`Perimeter`] — the permitted area
/// - [`TargetCatalog`] — the discoverable signals (may be empty)
/// - a fleet via [`fleet`](Self::fleet)
///
/// # Optional inputs
///
/// | Method             | Default                                        |
/// |--------------------|------------------------------------------------|
/// | `.engine_config(c)`| `EngineConfig::default()`                      |
/// | `.elevation(m)`    | no elevation model (ceiling check inert)       |
/// | `.units(v)`        | one `DecisionEngine` per fleet member          |
///
/// # Errors
///
/// `build()` fails when the engine config is invalid, when a custom unit
/// list does not match the fleet size, or — the fatal setup error — when any
/// fleet member starts outside the perimeter.  Starting off-bounds is a
/// scenario bug, not a runtime condition the boundary recovery should paper
/// over.
pub struct SimBuilder {
    config:        SimConfig,
    engine_config: EngineConfig,
    perimeter:     Perimeter,
    elevation:     Option<ElevationModel>,
    catalog:       TargetCatalog,
    fleet:         Vec<FleetMember>,
    units:         Option<Vec<Box<dyn DecisionUnit>>>,
}

impl SimBuilder {
    /// Create a builder with all required inputs except the fleet.
    pub fn new(config: SimConfig, perimeter: Perimeter, catalog: TargetCatalog) -> Self {
        Self {
            config,
            engine_config: EngineConfig::default(),
            perimeter,
            elevation: None,
            catalog,
            fleet: Vec::new(),
            units: None,
        }
    }

    /// Supply the engine tuning shared by all default decision engines.
    pub fn engine_config(mut self, engine_config: EngineConfig) -> Self {
        self.engine_config = engine_config;
        self
    }

    /// Supply the elevation model consulted by engines with a flight ceiling.
    pub fn elevation(mut self, elevation: ElevationModel) -> Self {
        self.elevation = Some(elevation);
        self
    }

    /// Supply the fleet (names and start positions).
    pub fn fleet(mut self, fleet: Vec<FleetMember>) -> Self {
        self.fleet = fleet;
        self
    }

    /// Supply custom decision units instead of the default engines — one per
    /// fleet member, in `DroneId` order.
    pub fn units(mut self, units: Vec<Box<dyn DecisionUnit>>) -> Self {
        self.units = Some(units);
        self
    }

    /// Validate inputs and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim> {
        self.engine_config.validate()?;

        // Starting outside the permitted area is fatal at initialization.
        for member in &self.fleet {
            if !self.perimeter.is_inside(member.start) {
                return Err(SimError::StartOutsidePerimeter {
                    name:     member.name.clone(),
                    position: member.start,
                });
            }
        }

        let units: Vec<Box<dyn DecisionUnit>> = match self.units {
            Some(units) => {
                if units.len() != self.fleet.len() {
                    return Err(SimError::FleetCountMismatch {
                        expected: self.fleet.len(),
                        got:      units.len(),
                        what:     "decision units",
                    });
                }
                units
            }
            None => self
                .fleet
                .iter()
                .enumerate()
                .map(|(i, _)| {
                    Box::new(DecisionEngine::new(DroneId(i as u32), self.engine_config.clone()))
                        as Box<dyn DecisionUnit>
                })
                .collect(),
        };

        let (names, positions) = self
            .fleet
            .into_iter()
            .map(|m| (m.name, m.start))
            .unzip();

        Ok(Sim::new(
            self.config,
            self.perimeter,
            self.elevation,
            self.catalog,
            names,
            positions,
            units,
        ))
    }
}
