//! Drone actions — what the engine asks the host to execute each tick.

use sl_core::TargetId;

/// The single action a decision unit returns per tick.
///
/// Actions are produced by [`DecisionUnit::decide`][crate::DecisionUnit::decide]
/// and consumed by the simulation loop (sl-sim), which executes them through
/// the movement and catalog services.  The engine itself never moves the
/// drone or touches shared state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// The drone picked a new target (or found none — an empty catalog is a
    /// normal condition, not an error).  The host records the choice in the
    /// drone's registry entry; no movement happens this tick.
    SetNewTarget(Option<TargetId>),

    /// Move `distance_m` metres along `bearing_deg`.
    MoveTowards { bearing_deg: f64, distance_m: f64 },

    /// Hold position this tick.
    Wait,

    /// A quorum held an acceptable formation for the full dwell time: the
    /// localization of this target is complete.  The host marks it located.
    /// Emitted exactly once per localization, by exactly one drone per
    /// target transition.
    Locating(TargetId),

    /// The elevation check ruled this target out (terrain above the flight
    /// ceiling).  The host marks it so no drone searches for it again.
    MarkUnreachable(TargetId),
}

impl Action {
    /// `true` for actions that change the drone's position.
    #[inline]
    pub fn is_movement(&self) -> bool {
        matches!(self, Action::MoveTowards { .. })
    }
}
