//! `sl-sim` — tick loop orchestrator for the swarmloc simulator.
//!
//! # The tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   for each drone, in ascending DroneId order:
//!     ① build a TickContext from the PREVIOUS step's registry snapshot
//!     ② action = unit.decide(ctx)
//!     ③ execute the action:
//!          SetNewTarget(t)      → record the commitment
//!          MoveTowards(b, d)    → position = position.destination(b, d)
//!          Wait                 → optional in-place jitter
//!          Locating(t)          → catalog.mark_located(t)
//!          MarkUnreachable(t)   → catalog.mark_unreachable(t)
//!     ④ collect the drone's new registry record
//!   install the collected records as the next snapshot
//! ```
//!
//! One drone's full tick completes before the next drone's begins; drones are
//! never evaluated concurrently within a step.  Freedom from data races is
//! by construction, not by locking: each drone writes only its own record and
//! only the acting drone marks its own current target.  Every drone reads the
//! previous step's snapshot uniformly.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use sl_sim::{NoopObserver, SimBuilder, scatter_fleet};
//!
//! let fleet = scatter_fleet(8, center, 500.0, &mut rng);
//! let mut sim = SimBuilder::new(config, perimeter, catalog)
//!     .fleet(fleet)
//!     .build()?;
//! sim.run(&mut NoopObserver);
//! ```

pub mod builder;
pub mod error;
pub mod fleet;
pub mod observer;
pub mod sim;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use fleet::{load_fleet_csv, load_fleet_reader, scatter_fleet, FleetMember};
pub use observer::{NoopObserver, SimObserver};
pub use sim::{Sim, TickStats};
