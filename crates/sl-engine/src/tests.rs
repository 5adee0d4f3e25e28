//! Unit tests for the decision engine and formation evaluator.

use sl_core::{DroneId, GeoPoint, TargetId, Tick};
use sl_signal::TargetCatalog;
use sl_terrain::{AscGrid, ElevationModel, Perimeter};

use crate::{
    formation, Action, Adjustment, DecisionEngine, DecisionUnit, DroneRecord, ElevationLimits,
    EngineConfig, RegistrySnapshot, TickContext,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// A fully walkable perimeter covering lon 9.5–10.5, lat 53.0–54.0.
fn open_perimeter() -> Perimeter {
    Perimeter::new(AscGrid::filled(100, 100, 9.5, 53.0, 0.01, -1.0, 0.0).unwrap())
}

fn catalog_at(points: &[(f64, f64)]) -> TargetCatalog {
    TargetCatalog::new(
        points.iter().map(|&(lon, lat)| GeoPoint::new(lon, lat)).collect(),
        (0..points.len()).map(|i| format!("sig-{i}")).collect(),
    )
}

fn record(id: u32, position: GeoPoint, target: Option<TargetId>) -> DroneRecord {
    DroneRecord { id: DroneId(id), position, target }
}

fn ctx<'a>(
    position:  GeoPoint,
    perimeter: &'a Perimeter,
    catalog:   &'a TargetCatalog,
    registry:  &'a RegistrySnapshot,
) -> TickContext<'a> {
    TickContext {
        tick: Tick(0),
        position,
        perimeter,
        elevation: None,
        catalog,
        registry,
    }
}

const TARGET: GeoPoint = GeoPoint { lon: 10.0, lat: 53.5 };

/// Drive a fresh engine through target selection and arrival so it enters
/// the waiting phase.  Returns the engine and its committed target.
fn engine_at_target(own_pos: GeoPoint, perimeter: &Perimeter, catalog: &TargetCatalog) -> (DecisionEngine, TargetId) {
    let mut engine = DecisionEngine::new(DroneId(0), EngineConfig::default());
    let registry = RegistrySnapshot::new(vec![record(0, own_pos, None)]);

    let action = engine.decide(&ctx(own_pos, perimeter, catalog, &registry));
    let Action::SetNewTarget(Some(target)) = action else {
        panic!("expected target selection, got {action:?}");
    };

    let action = engine.decide(&ctx(own_pos, perimeter, catalog, &registry));
    assert_eq!(action, Action::Wait);
    assert!(engine.reached_target());

    (engine, target)
}

// ── Target selection ──────────────────────────────────────────────────────────

#[cfg(test)]
mod target_selection {
    use super::*;

    #[test]
    fn selects_nearest_pending_to_fleet_centroid() {
        let perimeter = open_perimeter();
        // Target 0 is nearest to the deciding drone; target 1 is nearest to
        // the fleet centroid.  Centroid wins.
        let catalog = catalog_at(&[(9.7, 53.5), (10.25, 53.5)]);
        let own_pos = GeoPoint::new(9.6, 53.5);
        let registry = RegistrySnapshot::new(vec![
            record(0, own_pos, None),
            record(1, GeoPoint::new(10.4, 53.5), None),
            record(2, GeoPoint::new(10.4, 53.5), None),
            record(3, GeoPoint::new(10.4, 53.5), None),
        ]);

        let mut engine = DecisionEngine::new(DroneId(0), EngineConfig::default());
        let action = engine.decide(&ctx(own_pos, &perimeter, &catalog, &registry));

        assert_eq!(action, Action::SetNewTarget(Some(TargetId(1))));
        assert!(!engine.needs_new_target());
        assert_eq!(engine.target(), Some(TargetId(1)));
    }

    #[test]
    fn empty_catalog_idles_indefinitely() {
        let perimeter = open_perimeter();
        let catalog = TargetCatalog::empty();
        let own_pos = GeoPoint::new(10.0, 53.5);
        let registry = RegistrySnapshot::new(vec![record(0, own_pos, None)]);

        let mut engine = DecisionEngine::new(DroneId(0), EngineConfig::default());
        for _ in 0..50 {
            let action = engine.decide(&ctx(own_pos, &perimeter, &catalog, &registry));
            assert_eq!(action, Action::SetNewTarget(None));
            assert!(!action.is_movement());
        }
        assert!(engine.needs_new_target());
    }

    #[test]
    fn all_located_falls_back_to_nearest() {
        let perimeter = open_perimeter();
        let mut catalog = catalog_at(&[(10.0, 53.5)]);
        catalog.mark_located(TargetId(0));
        let own_pos = GeoPoint::new(9.9, 53.5);
        let registry = RegistrySnapshot::new(vec![record(0, own_pos, None)]);

        let mut engine = DecisionEngine::new(DroneId(0), EngineConfig::default());
        let action = engine.decide(&ctx(own_pos, &perimeter, &catalog, &registry));
        assert_eq!(action, Action::SetNewTarget(Some(TargetId(0))));
    }
}

// ── Traveling ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod traveling {
    use super::*;

    #[test]
    fn steps_toward_target_at_fixed_distance() {
        let perimeter = open_perimeter();
        let catalog = catalog_at(&[(TARGET.lon, TARGET.lat)]);
        let own_pos = TARGET.destination(270.0, 2_000.0); // 2 km west
        let registry = RegistrySnapshot::new(vec![record(0, own_pos, None)]);

        let mut engine = DecisionEngine::new(DroneId(0), EngineConfig::default());
        engine.decide(&ctx(own_pos, &perimeter, &catalog, &registry));
        let action = engine.decide(&ctx(own_pos, &perimeter, &catalog, &registry));

        let Action::MoveTowards { bearing_deg, distance_m } = action else {
            panic!("expected movement, got {action:?}");
        };
        assert_eq!(distance_m, 10.0);
        assert!((bearing_deg - 90.0).abs() < 0.5, "got bearing {bearing_deg}");
    }

    #[test]
    fn arrival_just_inside_threshold_switches_to_waiting() {
        let perimeter = open_perimeter();
        let catalog = catalog_at(&[(TARGET.lon, TARGET.lat)]);
        let own_pos = TARGET.destination(270.0, 299.0);

        let (engine, _) = engine_at_target(own_pos, &perimeter, &catalog);
        assert!(engine.reached_target());
        assert!(engine.waiting_for_others());
        assert_eq!(engine.wait_budget(), 4_000);
        assert_eq!(engine.dwell_remaining(), 1_000);
    }

    #[test]
    fn no_arrival_just_outside_threshold() {
        let perimeter = open_perimeter();
        let catalog = catalog_at(&[(TARGET.lon, TARGET.lat)]);
        let own_pos = TARGET.destination(270.0, 301.0);
        let registry = RegistrySnapshot::new(vec![record(0, own_pos, None)]);

        let mut engine = DecisionEngine::new(DroneId(0), EngineConfig::default());
        engine.decide(&ctx(own_pos, &perimeter, &catalog, &registry));
        let action = engine.decide(&ctx(own_pos, &perimeter, &catalog, &registry));

        assert!(action.is_movement());
        assert!(!engine.reached_target());
    }
}

// ── Boundary recovery ─────────────────────────────────────────────────────────

#[cfg(test)]
mod boundary_recovery {
    use super::*;

    /// Perimeter whose extent lies well north of the agent, so the agent is
    /// outside while its target (inside the extent) sits due north.
    fn northern_perimeter() -> Perimeter {
        Perimeter::new(AscGrid::filled(100, 20, 9.5, 53.55, 0.01, -1.0, 0.0).unwrap())
    }

    #[test]
    fn bands_then_direct() {
        let perimeter = northern_perimeter();
        let catalog = catalog_at(&[(10.0, 53.6)]);
        let own_pos = GeoPoint::new(10.0, 53.0); // due south of the target
        let registry = RegistrySnapshot::new(vec![record(0, own_pos, None)]);

        let mut engine = DecisionEngine::new(DroneId(0), EngineConfig::default());
        engine.decide(&ctx(own_pos, &perimeter, &catalog, &registry)); // select

        let mut bearings = Vec::new();
        for _ in 0..35 {
            match engine.decide(&ctx(own_pos, &perimeter, &catalog, &registry)) {
                Action::MoveTowards { bearing_deg, .. } => bearings.push(bearing_deg),
                other => panic!("expected movement, got {other:?}"),
            }
        }

        // bearing_to_target is exactly 0° (due north), so the recovery
        // bearings are 160°, 200° (= −160° mod 360), then 0° (direct).
        for (i, &b) in bearings.iter().enumerate() {
            let expected = match i {
                0..=14  => 160.0,
                15..=29 => 200.0,
                _       => 0.0,
            };
            assert!((b - expected).abs() < 1e-9, "tick {}: got {b}, want {expected}", i + 1);
        }
    }

    #[test]
    fn counter_resets_when_back_inside() {
        let perimeter = northern_perimeter();
        let catalog = catalog_at(&[(10.0, 53.7)]);
        let outside = GeoPoint::new(10.0, 53.0);
        let inside = GeoPoint::new(10.0, 53.6); // inside extent, ~11 km from target
        let registry = RegistrySnapshot::new(vec![record(0, outside, None)]);

        let mut engine = DecisionEngine::new(DroneId(0), EngineConfig::default());
        engine.decide(&ctx(outside, &perimeter, &catalog, &registry)); // select

        // 20 out-of-bounds ticks: past the first band.
        for _ in 0..20 {
            engine.decide(&ctx(outside, &perimeter, &catalog, &registry));
        }
        // One tick back inside resets the counter (direct travel).
        let action = engine.decide(&ctx(inside, &perimeter, &catalog, &registry));
        assert!((bearing_of(action)).abs() < 1e-9);

        // Out of bounds again: back in the first band, not the second.
        let action = engine.decide(&ctx(outside, &perimeter, &catalog, &registry));
        assert!((bearing_of(action) - 160.0).abs() < 1e-9);
    }

    fn bearing_of(action: Action) -> f64 {
        match action {
            Action::MoveTowards { bearing_deg, .. } => bearing_deg,
            other => panic!("expected movement, got {other:?}"),
        }
    }
}

// ── Waiting, quorum, and dwell ────────────────────────────────────────────────

#[cfg(test)]
mod waiting {
    use super::*;

    /// Four drones parked on the 250 m ring around TARGET, 90° apart —
    /// pairwise distances ≈ 354 m, beyond the ≈ 330 m crowding distance, so
    /// the formation is acceptable as-is.
    fn quorum_registry(own_pos: GeoPoint, target: TargetId) -> RegistrySnapshot {
        RegistrySnapshot::new(vec![
            record(0, own_pos, Some(target)),
            record(1, TARGET.destination(0.0, 250.0), Some(target)),
            record(2, TARGET.destination(90.0, 250.0), Some(target)),
            record(3, TARGET.destination(180.0, 250.0), Some(target)),
        ])
    }

    #[test]
    fn quorum_clears_waiting_flag_and_preserves_budget() {
        let perimeter = open_perimeter();
        let catalog = catalog_at(&[(TARGET.lon, TARGET.lat)]);
        let own_pos = TARGET.destination(270.0, 250.0);
        let (mut engine, target) = engine_at_target(own_pos, &perimeter, &catalog);

        let registry = quorum_registry(own_pos, target);
        let action = engine.decide(&ctx(own_pos, &perimeter, &catalog, &registry));

        assert_eq!(action, Action::Wait);
        assert!(!engine.waiting_for_others());
        // At quorum the budget never drains; the dwell countdown started.
        assert_eq!(engine.wait_budget(), 4_000);
        assert_eq!(engine.dwell_remaining(), 999);
    }

    #[test]
    fn crowded_quorum_steers_instead_of_dwelling() {
        let perimeter = open_perimeter();
        let catalog = catalog_at(&[(TARGET.lon, TARGET.lat)]);
        let own_pos = TARGET.destination(270.0, 40.0);
        let (mut engine, target) = engine_at_target(own_pos, &perimeter, &catalog);

        // Everyone bunched within 100 m of the target.
        let registry = RegistrySnapshot::new(vec![
            record(0, own_pos, Some(target)),
            record(1, TARGET.destination(0.0, 40.0), Some(target)),
            record(2, TARGET.destination(90.0, 40.0), Some(target)),
            record(3, TARGET.destination(180.0, 40.0), Some(target)),
        ]);
        let action = engine.decide(&ctx(own_pos, &perimeter, &catalog, &registry));

        assert!(action.is_movement());
        // Dwell only counts down on acceptable-formation ticks.
        assert_eq!(engine.dwell_remaining(), 1_000);
    }

    #[test]
    fn below_quorum_drains_budget_by_shortfall() {
        let perimeter = open_perimeter();
        let catalog = catalog_at(&[(TARGET.lon, TARGET.lat)]);
        let own_pos = TARGET.destination(270.0, 250.0);
        let (mut engine, target) = engine_at_target(own_pos, &perimeter, &catalog);

        // Two drones present (self + one well-spaced peer): shortfall = 2.
        let registry = RegistrySnapshot::new(vec![
            record(0, own_pos, Some(target)),
            record(1, TARGET.destination(0.0, 250.0), Some(target)),
        ]);

        let mut previous = engine.wait_budget();
        for i in 1..=5 {
            engine.decide(&ctx(own_pos, &perimeter, &catalog, &registry));
            let budget = engine.wait_budget();
            assert_eq!(budget, previous - 2, "tick {i}");
            assert!(budget < previous, "budget must strictly decrease below quorum");
            previous = budget;
        }
        assert!(engine.waiting_for_others());
    }

    #[test]
    fn deadlock_breaker_abandons_target_alone() {
        let perimeter = open_perimeter();
        let catalog = catalog_at(&[(TARGET.lon, TARGET.lat)]);
        let own_pos = TARGET.destination(270.0, 250.0);
        let (mut engine, target) = engine_at_target(own_pos, &perimeter, &catalog);

        let registry = RegistrySnapshot::new(vec![record(0, own_pos, Some(target))]);

        // Alone: shortfall 3/tick against a budget of 4000.
        let mut ticks = 0u32;
        while !engine.needs_new_target() {
            ticks += 1;
            assert!(ticks <= 4_000, "engine never abandoned the target");
            let action = engine.decide(&ctx(own_pos, &perimeter, &catalog, &registry));
            assert_ne!(action, Action::Locating(target));
        }
        assert!(!engine.reached_target());
        // ceil(4000 / 3) waiting ticks, then the expiry tick itself.
        assert_eq!(ticks, 1_335);

        // The reset takes effect now: the next tick re-selects.
        let action = engine.decide(&ctx(own_pos, &perimeter, &catalog, &registry));
        assert!(matches!(action, Action::SetNewTarget(Some(_))));
    }

    #[test]
    fn locating_emitted_exactly_once_after_dwell() {
        let perimeter = open_perimeter();
        let catalog = catalog_at(&[(TARGET.lon, TARGET.lat)]);
        let own_pos = TARGET.destination(270.0, 250.0);
        let (mut engine, target) = engine_at_target(own_pos, &perimeter, &catalog);

        let registry = quorum_registry(own_pos, target);

        let mut locating = 0u32;
        for i in 1..=1_001 {
            let action = engine.decide(&ctx(own_pos, &perimeter, &catalog, &registry));
            match action {
                Action::Wait => assert!(i <= 1_000, "dwell overran"),
                Action::Locating(t) => {
                    assert_eq!(i, 1_001, "localization completed early");
                    assert_eq!(t, target);
                    locating += 1;
                }
                other => panic!("tick {i}: unexpected {other:?}"),
            }
        }
        assert_eq!(locating, 1);
        assert!(engine.needs_new_target());
        assert!(!engine.reached_target());
    }
}

// ── Formation evaluation ──────────────────────────────────────────────────────

#[cfg(test)]
mod formation_eval {
    use super::*;

    fn config() -> EngineConfig {
        EngineConfig::default()
    }

    #[test]
    fn holds_when_spaced_and_leaves_bearing_unchanged() {
        let perimeter = open_perimeter();
        let catalog = catalog_at(&[(TARGET.lon, TARGET.lat)]);
        let own_pos = TARGET.destination(270.0, 250.0);
        let (mut engine, target) = engine_at_target(own_pos, &perimeter, &catalog);

        let drones = vec![
            record(0, own_pos, Some(target)),
            record(1, TARGET.destination(0.0, 250.0), Some(target)),
            record(2, TARGET.destination(90.0, 250.0), Some(target)),
            record(3, TARGET.destination(180.0, 250.0), Some(target)),
        ];
        let adjustment = formation::evaluate(DroneId(0), own_pos, TARGET, &drones, &config());
        assert_eq!(adjustment, Adjustment::Hold);

        // Through the engine, a Hold leaves the stored bearing untouched.
        let before = engine.bearing_deg();
        let registry = RegistrySnapshot::new(drones);
        let action = engine.decide(&ctx(own_pos, &perimeter, &catalog, &registry));
        assert_eq!(action, Action::Wait);
        assert_eq!(engine.bearing_deg(), before);
    }

    #[test]
    fn alone_in_peer_set_always_holds() {
        let own_pos = TARGET.destination(270.0, 100.0);
        let drones = vec![record(0, own_pos, Some(TargetId(0)))];
        let adjustment = formation::evaluate(DroneId(0), own_pos, TARGET, &drones, &config());
        assert_eq!(adjustment, Adjustment::Hold);
    }

    #[test]
    fn repels_from_a_close_peer() {
        // Self on the target, peer 10 m due north: the only repulsion bearing
        // is peer→self = 180°, the cluster centroid hugs the target, and the
        // result is a straight flight south.
        let own_pos = TARGET;
        let peer_pos = TARGET.destination(0.0, 10.0);
        let drones = vec![
            record(0, own_pos, Some(TargetId(0))),
            record(1, peer_pos, Some(TargetId(0))),
        ];
        let adjustment = formation::evaluate(DroneId(0), own_pos, TARGET, &drones, &config());
        let Adjustment::Steer(bearing) = adjustment else {
            panic!("expected steering, got {adjustment:?}");
        };
        assert!((bearing - 180.0).abs() < 0.5, "got {bearing}");
    }

    #[test]
    fn spirals_back_when_off_station() {
        // Crowded AND 400 m off the target (leash for 2 drones is 290 m):
        // everything else is discarded for bearing_to_target + 80°.
        let own_pos = TARGET.destination(270.0, 400.0); // due west
        let peer_pos = own_pos.destination(0.0, 100.0);
        let drones = vec![
            record(0, own_pos, Some(TargetId(0))),
            record(1, peer_pos, Some(TargetId(0))),
        ];
        let adjustment = formation::evaluate(DroneId(0), own_pos, TARGET, &drones, &config());
        let Adjustment::Steer(bearing) = adjustment else {
            panic!("expected steering, got {adjustment:?}");
        };
        assert!((bearing - 170.0).abs() < 0.5, "got {bearing}");
    }

    #[test]
    fn blends_target_correction_when_cluster_drifts() {
        // Cluster (self + a peer 20 m east of us) floats 200 m north of the
        // target: the repulsion average (270°) must be pulled toward the
        // centroid→target bearing (≈180°).
        let own_pos = TARGET.destination(0.0, 200.0);
        let peer_pos = own_pos.destination(90.0, 20.0);
        let drones = vec![
            record(0, own_pos, Some(TargetId(0))),
            record(1, peer_pos, Some(TargetId(0))),
        ];
        let adjustment = formation::evaluate(DroneId(0), own_pos, TARGET, &drones, &config());
        let Adjustment::Steer(bearing) = adjustment else {
            panic!("expected steering, got {adjustment:?}");
        };
        assert!(bearing > 180.0 && bearing < 270.0, "got {bearing}");
    }
}

// ── Elevation ceiling ─────────────────────────────────────────────────────────

#[cfg(test)]
mod elevation {
    use super::*;

    fn ceiling_config() -> EngineConfig {
        EngineConfig {
            elevation: Some(ElevationLimits { max_flight_height_m: 70.0 }),
            ..EngineConfig::default()
        }
    }

    fn ctx_with_elevation<'a>(
        position:  GeoPoint,
        perimeter: &'a Perimeter,
        elevation: &'a ElevationModel,
        catalog:   &'a TargetCatalog,
        registry:  &'a RegistrySnapshot,
    ) -> TickContext<'a> {
        TickContext {
            tick: Tick(0),
            position,
            perimeter,
            elevation: Some(elevation),
            catalog,
            registry,
        }
    }

    #[test]
    fn target_above_ceiling_is_marked_unreachable() {
        let perimeter = open_perimeter();
        let elevation =
            ElevationModel::new(AscGrid::filled(100, 100, 9.5, 53.0, 0.01, -9999.0, 100.0).unwrap());
        let catalog = catalog_at(&[(TARGET.lon, TARGET.lat)]);
        let own_pos = TARGET.destination(270.0, 2_000.0);
        let registry = RegistrySnapshot::new(vec![record(0, own_pos, None)]);

        let mut engine = DecisionEngine::new(DroneId(0), ceiling_config());
        engine.decide(&ctx_with_elevation(own_pos, &perimeter, &elevation, &catalog, &registry));
        let action =
            engine.decide(&ctx_with_elevation(own_pos, &perimeter, &elevation, &catalog, &registry));

        assert_eq!(action, Action::MarkUnreachable(TargetId(0)));
        assert!(engine.needs_new_target());
    }

    #[test]
    fn high_terrain_ahead_steers_around() {
        let perimeter = open_perimeter();
        // A high ridge over lon 10.00–10.05; flat elsewhere, target beyond it.
        let mut grid = AscGrid::filled(100, 100, 9.5, 53.0, 0.01, -9999.0, 0.0).unwrap();
        for row in 0..100 {
            for col in 50..55 {
                grid.set_cell(row, col, 100.0);
            }
        }
        let elevation = ElevationModel::new(grid);
        let catalog = catalog_at(&[(10.1, 53.5)]);
        let own_pos = GeoPoint::new(9.99999, 53.5); // ridge starts one step east
        let registry = RegistrySnapshot::new(vec![record(0, own_pos, None)]);

        let mut engine = DecisionEngine::new(DroneId(0), ceiling_config());
        engine.decide(&ctx_with_elevation(own_pos, &perimeter, &elevation, &catalog, &registry));
        let action =
            engine.decide(&ctx_with_elevation(own_pos, &perimeter, &elevation, &catalog, &registry));

        let Action::MoveTowards { bearing_deg, .. } = action else {
            panic!("expected movement, got {action:?}");
        };
        // First recovery band applied to the ≈ 90° direct bearing.
        assert!((bearing_deg - 250.0).abs() < 0.5, "got {bearing_deg}");
    }
}

// ── Config validation ─────────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use super::*;

    #[test]
    fn default_validates() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_quorum_rejected() {
        let cfg = EngineConfig { quorum: 0, ..EngineConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn single_band_recovery_never_goes_direct() {
        let perimeter = Perimeter::new(
            AscGrid::filled(100, 20, 9.5, 53.55, 0.01, -1.0, 0.0).unwrap(),
        );
        let catalog = catalog_at(&[(10.0, 53.6)]);
        let own_pos = GeoPoint::new(10.0, 53.0);
        let registry = RegistrySnapshot::new(vec![record(0, own_pos, None)]);

        let mut engine = DecisionEngine::new(DroneId(0), EngineConfig::single_band_recovery());
        engine.decide(&ctx(own_pos, &perimeter, &catalog, &registry));
        for _ in 0..100 {
            match engine.decide(&ctx(own_pos, &perimeter, &catalog, &registry)) {
                Action::MoveTowards { bearing_deg, .. } => {
                    assert!((bearing_deg - 45.0).abs() < 1e-9)
                }
                other => panic!("expected movement, got {other:?}"),
            }
        }
    }
}
