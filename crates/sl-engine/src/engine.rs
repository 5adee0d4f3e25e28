//! The `DecisionEngine` state machine.
//!
//! # The two phases
//!
//! A drone's task alternates between two phases:
//!
//! 1. **Seeking** — pick a target and travel to it (mostly independent).
//! 2. **Waiting** — gather a quorum at the target, keep formation, and dwell
//!    long enough to localize it (collaborative).
//!
//! The waiting phase does not have to end successfully: a drained wait
//! budget abandons the target and re-enters seeking, which is the deadlock
//! breaker for targets nobody else ever reaches.
//!
//! # Tick evaluation order (seeking)
//!
//! needs-new-target → boundary recovery → elevation ceiling → arrival test →
//! direct travel.  The permitted-area check comes before everything else
//! that moves the drone: while outside, the drone flies recovery bearings
//! and nothing downstream runs.
//!
//! # Tick evaluation order (waiting)
//!
//! wait-budget expiry → peer recount (only while still waiting for others) →
//! quorum branch (formation, then dwell countdown, then `Locating`) or
//! below-quorum branch (formation plus accelerated budget drain).

use sl_core::{normalize_deg, DroneId, GeoPoint, TargetId};

use crate::formation::{self, Adjustment};
use crate::{Action, DecisionUnit, DroneRecord, EngineConfig, TickContext};

/// Per-drone decision state machine.
///
/// Created once at spawn, bound to a stable drone identity, mutated by every
/// `decide` call, and destroyed with the drone.  Nothing here is shared: the
/// engine communicates with the rest of the swarm only through the actions
/// it returns and the registry snapshot it is shown.
pub struct DecisionEngine {
    id:     DroneId,
    config: EngineConfig,

    // ── Phase flags ───────────────────────────────────────────────────────
    /// Seeking sub-phase: a fresh target must be selected this tick.
    needs_new_target: bool,
    /// `true` while in the waiting phase.  Implies `target.is_some()`.
    reached_target: bool,
    /// Waiting sub-phase: still recounting peers each tick.  Cleared once a
    /// quorum is first seen (the cached peer set is reused afterwards).
    waiting_for_others: bool,

    // ── Budgets and counters ──────────────────────────────────────────────
    /// Remaining waiting budget at the current target.  Signed: the
    /// below-quorum drain subtracts more than 1 per tick and may overshoot.
    wait_budget: i64,
    /// Remaining acceptable-formation ticks before localization completes.
    dwell_remaining: u32,
    /// Consecutive ticks spent outside the permitted area.
    ticks_out_of_bounds: u32,
    /// Consecutive ticks blocked by terrain above the flight ceiling.
    ticks_blocked: u32,

    // ── Current commitment ────────────────────────────────────────────────
    /// Peer membership cached by the last recount.  Membership freezes once
    /// a quorum is seen, but positions are always read live from the current
    /// snapshot — the gathering keeps adjusting around drones that move.
    peers_at_target: Vec<DroneId>,
    /// The bearing of the most recent movement decision.
    bearing_deg: f64,
    target:      Option<TargetId>,
    target_pos:  Option<GeoPoint>,
}

impl DecisionEngine {
    /// Initialize an engine for the drone with identity `id`.
    pub fn new(id: DroneId, config: EngineConfig) -> Self {
        Self {
            id,
            config,
            needs_new_target:    true,
            reached_target:      false,
            waiting_for_others:  false,
            wait_budget:         0,
            dwell_remaining:     0,
            ticks_out_of_bounds: 0,
            ticks_blocked:       0,
            peers_at_target:     Vec::new(),
            bearing_deg:         0.0,
            target:              None,
            target_pos:          None,
        }
    }

    // ── State accessors (read-only; used by the host and by tests) ────────

    pub fn id(&self) -> DroneId {
        self.id
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn needs_new_target(&self) -> bool {
        self.needs_new_target
    }

    pub fn reached_target(&self) -> bool {
        self.reached_target
    }

    pub fn waiting_for_others(&self) -> bool {
        self.waiting_for_others
    }

    pub fn wait_budget(&self) -> i64 {
        self.wait_budget
    }

    pub fn dwell_remaining(&self) -> u32 {
        self.dwell_remaining
    }

    pub fn target(&self) -> Option<TargetId> {
        self.target
    }

    pub fn bearing_deg(&self) -> f64 {
        self.bearing_deg
    }

    // ── Seeking phase ─────────────────────────────────────────────────────

    fn select_target(&mut self, ctx: &TickContext<'_>) -> Action {
        // Search from the fleet centroid, not our own position — independent
        // drones searching from the same point pick the same target.
        let search_from = ctx.registry.centroid().unwrap_or(ctx.position);

        match ctx.catalog.nearest_pending_or_first(search_from) {
            Some(id) => {
                let pos = ctx.catalog.position(id);
                self.target = Some(id);
                self.target_pos = Some(pos);
                self.bearing_deg = ctx.position.bearing_to(pos);
                self.needs_new_target = false;
                Action::SetNewTarget(Some(id))
            }
            // No targets in this area at all; stay where we are and look
            // again next tick.
            None => Action::SetNewTarget(None),
        }
    }

    fn travel(&mut self, ctx: &TickContext<'_>) -> Action {
        if self.needs_new_target {
            return self.select_target(ctx);
        }

        let Some(target_pos) = self.target_pos else {
            // Target state was lost without the flag being set; recover by
            // re-entering selection next tick.
            self.needs_new_target = true;
            return Action::Wait;
        };

        let direct = ctx.position.bearing_to(target_pos);

        // Outside the permitted area: steer recovery bearings, nothing else.
        if !ctx.perimeter.is_inside(ctx.position) {
            self.ticks_out_of_bounds += 1;
            self.bearing_deg = self.recovery_bearing(direct, self.ticks_out_of_bounds);
            return self.step();
        }
        self.ticks_out_of_bounds = 0;

        if let Some(action) = self.check_elevation(ctx, direct) {
            return action;
        }

        if ctx.position.distance_m(target_pos) < self.config.arrival_threshold_m {
            // Target reached: arm the waiting phase for the next tick.
            self.reached_target = true;
            self.wait_budget = self.config.max_wait_ticks;
            self.dwell_remaining = self.config.locate_dwell_ticks;
            self.waiting_for_others = true;
            return Action::Wait;
        }

        self.bearing_deg = direct;
        self.step()
    }

    /// Elevation ceiling check (enabled by config, supplied by scenario).
    ///
    /// A target under terrain above the ceiling is written off; high terrain
    /// one step ahead is steered around with the same band policy as
    /// boundary recovery, on its own consecutive-tick counter.
    fn check_elevation(&mut self, ctx: &TickContext<'_>, direct: f64) -> Option<Action> {
        let (Some(limits), Some(elevation)) = (self.config.elevation, ctx.elevation) else {
            return None;
        };
        let target_pos = self.target_pos?;

        if elevation.height_at(target_pos) > limits.max_flight_height_m {
            let target = self.target?;
            self.needs_new_target = true;
            return Some(Action::MarkUnreachable(target));
        }

        let ahead = ctx.position.destination(direct, self.config.step_distance_m);
        if elevation.height_at(ahead) > limits.max_flight_height_m {
            self.ticks_blocked += 1;
            self.bearing_deg = self.recovery_bearing(direct, self.ticks_blocked);
            return Some(self.step());
        }
        self.ticks_blocked = 0;
        None
    }

    /// The bearing to fly after `consecutive_ticks` ticks of being off-course
    /// (outside the perimeter, or terrain-blocked).
    fn recovery_bearing(&self, direct_deg: f64, consecutive_ticks: u32) -> f64 {
        let mut band_end = 0u64;
        for band in &self.config.recovery_bands {
            band_end += band.max_ticks as u64;
            if (consecutive_ticks as u64) <= band_end {
                return normalize_deg(direct_deg + band.bearing_offset_deg);
            }
        }
        // All bands exhausted: accept re-crossing and head straight in.
        direct_deg
    }

    // ── Waiting phase ─────────────────────────────────────────────────────

    fn hold_at_target(&mut self, ctx: &TickContext<'_>) -> Action {
        let (Some(target), Some(target_pos)) = (self.target, self.target_pos) else {
            self.reset_to_seeking();
            return Action::Wait;
        };

        // Waited too long and nobody came — abandon this target.  The reset
        // takes effect next tick; this tick is spent in place.
        if self.wait_budget <= 0 {
            self.reset_to_seeking();
            self.waiting_for_others = false;
            return Action::Wait;
        }

        if self.waiting_for_others {
            self.peers_at_target = ctx
                .registry
                .peers_at_target(
                    target,
                    target_pos,
                    self.config.peer_tolerance_factor * self.config.arrival_threshold_m,
                )
                .into_iter()
                .map(|r| r.id)
                .collect();
        }
        // Resolve the cached membership against the current snapshot so the
        // evaluator always sees live positions.
        let peers: Vec<DroneRecord> = self
            .peers_at_target
            .iter()
            .filter_map(|&id| ctx.registry.get(id).copied())
            .collect();
        let peer_count = peers.len();

        if peer_count >= self.config.quorum {
            // Enough drones for a good localization; stop counting heads.
            self.waiting_for_others = false;

            let adjustment =
                formation::evaluate(self.id, ctx.position, target_pos, &peers, &self.config);
            if let Adjustment::Steer(bearing) = adjustment {
                self.bearing_deg = bearing;
                return self.step();
            }

            if self.dwell_remaining == 0 {
                // Held an acceptable formation for the full dwell: done here.
                self.reset_to_seeking();
                return Action::Locating(target);
            }
            self.dwell_remaining -= 1;
            Action::Wait
        } else {
            // Below quorum: position ourselves anyway so the formation is
            // already forming when the others arrive.
            let adjustment =
                formation::evaluate(self.id, ctx.position, target_pos, &peers, &self.config);

            // The fewer drones present, the faster the budget drains.
            self.wait_budget -= (self.config.quorum - peer_count) as i64;

            match adjustment {
                Adjustment::Steer(bearing) => {
                    self.bearing_deg = bearing;
                    self.step()
                }
                Adjustment::Hold => Action::Wait,
            }
        }
    }

    // ── Shared helpers ────────────────────────────────────────────────────

    fn reset_to_seeking(&mut self) {
        self.reached_target = false;
        self.needs_new_target = true;
    }

    fn step(&self) -> Action {
        Action::MoveTowards {
            bearing_deg: self.bearing_deg,
            distance_m:  self.config.step_distance_m,
        }
    }
}

impl DecisionUnit for DecisionEngine {
    fn decide(&mut self, ctx: &TickContext<'_>) -> Action {
        if self.reached_target {
            self.hold_at_target(ctx)
        } else {
            self.travel(ctx)
        }
    }
}
