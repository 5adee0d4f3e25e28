//! Formation evaluation — a pure function from peer state to a corrective
//! bearing.
//!
//! No drone knows the ideal formation; each only reacts to peers that stand
//! too close, yet the population converges to an approximate ring around the
//! target because every drone runs the identical rule.  The ideal spacing is
//! derived from a square formation: a quarter of the circumference of a
//! circle whose radius is the arrival threshold, widened linearly when more
//! than a quorum of drones gather.

use std::f64::consts::PI;

use sl_core::{normalize_deg, DroneId, GeoPoint};

use crate::{DroneRecord, EngineConfig};

/// Metres added to the formation-circle radius per drone beyond the quorum.
const RADIUS_GROWTH_PER_DRONE_M: f64 = 10.0;

/// Metres added to the off-station leash per drone beyond the quorum.
const LEASH_GROWTH_PER_DRONE_M: f64 = 5.0;

/// The outcome of a formation evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Adjustment {
    /// Sufficiently spaced from every peer — hold position.
    Hold,
    /// Move along this bearing to improve the formation.
    Steer(f64),
}

/// Evaluate the drone's position within the gathering at `target_pos`.
///
/// `drones_at_target` is the full peer set at the target, self included —
/// the drone's own record is skipped when scanning for crowding but its
/// count participates in the spacing formula, matching how the gathering
/// size is perceived.
///
/// Three regimes, checked in order of construction:
/// 1. No peer within `crowding_factor ×` spacing → [`Adjustment::Hold`].
/// 2. Crowded → average the peer→self repulsion bearings; when the local
///    cluster's centroid (crowding peers + self) has drifted more than
///    `cluster_drift_m` off the target, blend in a centroid→target
///    correction so the cluster slides back over the target.
/// 3. Safety override: if the drone itself is beyond the widened arrival
///    leash, discard the averages and spiral back at
///    `bearing_to_target + spiral_offset_deg` — an averaged correction must
///    never fling a drone off-station.
pub fn evaluate(
    own_id:           DroneId,
    own_pos:          GeoPoint,
    target_pos:       GeoPoint,
    drones_at_target: &[DroneRecord],
    config:           &EngineConfig,
) -> Adjustment {
    let beyond_quorum = drones_at_target.len() as f64 - config.quorum as f64;

    let radius = config.arrival_threshold_m + RADIUS_GROWTH_PER_DRONE_M * beyond_quorum;
    let spacing = radius * 2.0 * PI / 4.0;
    let crowding_distance = spacing * config.crowding_factor;

    let mut bearing_sum = 0.0;
    let mut lon_sum = 0.0;
    let mut lat_sum = 0.0;
    let mut crowding = 0usize;

    for peer in drones_at_target {
        if peer.id == own_id {
            continue;
        }
        if peer.position.distance_m(own_pos) < crowding_distance {
            // Repulsion: steer along the bearing pointing from the peer at us.
            bearing_sum += peer.position.bearing_to(own_pos);
            lon_sum += peer.position.lon;
            lat_sum += peer.position.lat;
            crowding += 1;
        }
    }

    if crowding == 0 {
        return Adjustment::Hold;
    }

    lon_sum += own_pos.lon;
    lat_sum += own_pos.lat;
    let cluster = (crowding + 1) as f64;
    let centroid = GeoPoint::new(lon_sum / cluster, lat_sum / cluster);

    let mut bearing = if centroid.distance_m(target_pos) > config.cluster_drift_m {
        (bearing_sum + centroid.bearing_to(target_pos)) / cluster
    } else {
        bearing_sum / crowding as f64
    };

    let leash = config.arrival_threshold_m + LEASH_GROWTH_PER_DRONE_M * beyond_quorum;
    if own_pos.distance_m(target_pos) > leash {
        bearing = own_pos.bearing_to(target_pos) + config.spiral_offset_deg;
    }

    Adjustment::Steer(normalize_deg(bearing))
}
