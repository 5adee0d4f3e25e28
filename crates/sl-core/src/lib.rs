//! `sl-core` — foundational types for the `swarmloc` swarm simulator.
//!
//! This crate is a dependency of every other `sl-*` crate.  It intentionally
//! has no `sl-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `DroneId`, `TargetId`                                 |
//! | [`geo`]         | `GeoPoint`, haversine distance, bearing, destination  |
//! | [`time`]        | `Tick`, `SimClock`, `SimConfig`                       |
//! | [`rng`]         | `SimRng` (reproducible scenario setup)                |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{normalize_deg, GeoPoint};
pub use ids::{DroneId, TargetId};
pub use rng::SimRng;
pub use time::{SimClock, SimConfig, Tick};
