//! `sl-engine` — the per-drone decision engine.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                      |
//! |---------------|---------------------------------------------------------------|
//! | [`action`]    | `Action` enum — what a drone asks the host to do this tick    |
//! | [`config`]    | `EngineConfig`, `RecoveryBand`, `ElevationLimits`             |
//! | [`registry`]  | `DroneRecord`, `RegistrySnapshot` — the shared fleet view     |
//! | [`context`]   | `TickContext<'a>` — read-only per-tick inputs                 |
//! | [`unit`]      | `DecisionUnit` trait, `HoldStation` placeholder               |
//! | [`engine`]    | `DecisionEngine` — the state machine                          |
//! | [`formation`] | formation evaluation (pure function)                          |
//! | [`error`]     | `EngineError`, `EngineResult<T>`                              |
//!
//! # Design notes
//!
//! The engine is a Mealy machine: each tick consumes (catalog, perimeter, own
//! position, registry snapshot) and produces exactly one [`Action`].  All
//! mutation is to the engine's own private state; the host executes the
//! action and updates the drone's registry entry afterwards.  The tick loop
//! in `sl-sim` evaluates one drone to completion before the next, so the
//! engine needs no locking and no interior mutability.
//!
//! Two historical engine revisions (simple 45° boundary nudge vs. banded
//! ±160° recovery, with and without the elevation ceiling) are unified here
//! behind [`EngineConfig`]: `recovery_bands` expresses either policy and
//! `elevation: Option<_>` switches the ceiling check.

pub mod action;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod formation;
pub mod registry;
pub mod unit;

#[cfg(test)]
mod tests;

pub use action::Action;
pub use config::{ElevationLimits, EngineConfig, RecoveryBand};
pub use context::TickContext;
pub use engine::DecisionEngine;
pub use error::{EngineError, EngineResult};
pub use formation::Adjustment;
pub use registry::{DroneRecord, RegistrySnapshot};
pub use unit::{DecisionUnit, HoldStation};
