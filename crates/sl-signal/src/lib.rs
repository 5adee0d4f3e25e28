//! `sl-signal` — the discoverable signal-target catalog.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`catalog`] | `TargetCatalog` (SoA data + R-tree), `TargetStatus`       |
//! | [`loader`]  | CSV catalog loading                                       |
//! | [`error`]   | `SignalError`, `SignalResult<T>`                          |
//!
//! The catalog is the only shared mutable state besides the drone registry:
//! a target's status transitions `Pending → Located` exactly once, written by
//! exactly one agent's `Locating` action (or `Pending → Unreachable` when the
//! elevation check rules a target out).  All reads go through distance-sorted
//! nearest-neighbor queries.

pub mod catalog;
pub mod error;
pub mod loader;


pub use catalog::{TargetCatalog, TargetStatus};
pub use error::{SignalError, SignalResult};
pub use loader::{load_targets_csv, load_targets_reader};
