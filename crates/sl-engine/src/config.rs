//! Engine tuning parameters.

use crate::{EngineError, EngineResult};

/// One leg of the boundary-recovery policy.
///
/// While the drone has been outside the permitted area for up to `max_ticks`
/// consecutive ticks (counting across all earlier bands), it steers at
/// `bearing_to_target + bearing_offset_deg`.  After every band is exhausted
/// the drone flies directly at the target — drift correction has failed and
/// re-crossing is accepted.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecoveryBand {
    pub max_ticks:          u32,
    pub bearing_offset_deg: f64,
}

/// Flight-ceiling parameters for the optional elevation check.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElevationLimits {
    /// Terrain above this height (metres) cannot be overflown.
    pub max_flight_height_m: f64,
}

/// All tunables of the decision engine.
///
/// The defaults reproduce the reference behavior: 10 m steps, 300 m arrival,
/// a 4-drone quorum, a 4000-tick wait budget, a 1000-tick localization dwell,
/// and ±160° recovery bands of 15 ticks each.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Metres moved per `MoveTowards` tick (a velocity model, not dynamics).
    pub step_distance_m: f64,

    /// Distance below which a target counts as reached.
    pub arrival_threshold_m: f64,

    /// Ticks a drone will wait at a target before giving up on it.  Drains
    /// faster than 1/tick while the gathering is below quorum.
    pub max_wait_ticks: i64,

    /// Consecutive acceptable-formation ticks needed to complete a
    /// localization.
    pub locate_dwell_ticks: u32,

    /// Minimum drone count (including self) for a trustworthy localization.
    pub quorum: usize,

    /// Peers count as "at the target" within
    /// `peer_tolerance_factor × arrival_threshold_m` — wider than the
    /// arrival threshold so drones still approaching are included.
    pub peer_tolerance_factor: f64,

    /// A peer closer than `crowding_factor × formation spacing` triggers a
    /// repulsion correction.
    pub crowding_factor: f64,

    /// When the local cluster's centroid sits farther than this from the
    /// target, a bearing-to-target correction is blended into the repulsion
    /// average.
    pub cluster_drift_m: f64,

    /// Offset applied to the direct bearing for the spiral-back maneuver
    /// when a drone has strayed off-station.
    pub spiral_offset_deg: f64,

    /// Boundary-recovery policy, outermost band first.
    pub recovery_bands: Vec<RecoveryBand>,

    /// `Some` enables the elevation ceiling check.
    pub elevation: Option<ElevationLimits>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            step_distance_m:       10.0,
            arrival_threshold_m:   300.0,
            max_wait_ticks:        4_000,
            locate_dwell_ticks:    1_000,
            quorum:                4,
            peer_tolerance_factor: 2.0,
            crowding_factor:       0.7,
            cluster_drift_m:       50.0,
            spiral_offset_deg:     80.0,
            recovery_bands: vec![
                RecoveryBand { max_ticks: 15, bearing_offset_deg: 160.0 },
                RecoveryBand { max_ticks: 15, bearing_offset_deg: -160.0 },
            ],
            elevation: None,
        }
    }
}

impl EngineConfig {
    /// The historical single-band policy: nudge +45° for as long as the
    /// drone stays outside, never fall back to the direct bearing.
    pub fn single_band_recovery() -> Self {
        Self {
            recovery_bands: vec![RecoveryBand {
                max_ticks:          u32::MAX,
                bearing_offset_deg: 45.0,
            }],
            ..Self::default()
        }
    }

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> EngineResult<()> {
        if self.quorum == 0 {
            return Err(EngineError::Config("quorum must be at least 1".into()));
        }
        if self.step_distance_m <= 0.0 {
            return Err(EngineError::Config(format!(
                "step_distance_m {} must be positive",
                self.step_distance_m
            )));
        }
        if self.arrival_threshold_m <= 0.0 {
            return Err(EngineError::Config(format!(
                "arrival_threshold_m {} must be positive",
                self.arrival_threshold_m
            )));
        }
        if self.peer_tolerance_factor < 1.0 {
            return Err(EngineError::Config(
                "peer_tolerance_factor below 1.0 would exclude drones that already arrived".into(),
            ));
        }
        Ok(())
    }
}
