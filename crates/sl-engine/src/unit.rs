//! The `DecisionUnit` trait — the seam between a drone and its brain.

use crate::{Action, TickContext};

/// Pluggable per-drone decision making.
///
/// One unit instance exists per drone, created at spawn and owned by the
/// scheduler for the drone's lifetime.  `decide` is called exactly once per
/// tick and must be total: every well-formed input produces an action, never
/// a panic or an error.  All of the unit's knowledge between ticks lives in
/// its own private state — implementations must not stash references to the
/// context.
pub trait DecisionUnit: Send {
    /// Compute this tick's action from the drone's current view of the world.
    fn decide(&mut self, ctx: &TickContext<'_>) -> Action;
}

/// A [`DecisionUnit`] that always holds position.
///
/// Useful as a placeholder in tests or for "passive" fleet members that
/// occupy space without searching.
pub struct HoldStation;

impl DecisionUnit for HoldStation {
    fn decide(&mut self, _ctx: &TickContext<'_>) -> Action {
        Action::Wait
    }
}
