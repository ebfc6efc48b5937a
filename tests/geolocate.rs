//! Tests for the one-shot geolocation bootstrap

use tripmap::adapter::RecordingEngine;
use tripmap::view::{AutoCenterFlag, GeolocateError, GeolocationBootstrapper, LatestCell};
use tripmap::{EngineOp, GeoPoint, MapConfig};

#[test]
fn test_success_flies_to_fix_at_local_zoom() {
    let config = MapConfig::default();
    let mut engine = RecordingEngine::new();
    let bootstrap = GeolocationBootstrapper::new(AutoCenterFlag::new());

    bootstrap.handle_result(&mut engine, Ok(GeoPoint::new(42.36, -71.06)), &config);

    match engine.ops().last() {
        Some(EngineOp::FlyTo { center, zoom, .. }) => {
            assert_eq!(*zoom, config.locate_zoom);
            assert!((center.latitude - 42.36).abs() < 1e-9);
        }
        other => panic!("expected a fly-to, got {other:?}"),
    }
    assert!(!bootstrap.is_pending());
}

#[test]
fn test_selection_established_first_wins() {
    let config = MapConfig::default();
    let mut engine = RecordingEngine::new();
    let bootstrap = GeolocationBootstrapper::new(AutoCenterFlag::new());

    // The user clicked a pin before the fix arrived.
    bootstrap.selection_cell().set(true);
    bootstrap.handle_result(&mut engine, Ok(GeoPoint::new(42.36, -71.06)), &config);

    assert_eq!(engine.ops().len(), 0);
    // The attempt is still spent.
    assert!(!bootstrap.is_pending());
}

#[test]
fn test_failure_consumes_silently() {
    let config = MapConfig::default();
    let mut engine = RecordingEngine::new();
    let bootstrap = GeolocationBootstrapper::new(AutoCenterFlag::new());

    bootstrap.handle_result(&mut engine, Err(GeolocateError::PermissionDenied), &config);

    assert_eq!(engine.ops().len(), 0);
    assert!(!bootstrap.is_pending());
}

#[test]
fn test_second_result_ignored() {
    let config = MapConfig::default();
    let mut engine = RecordingEngine::new();
    let bootstrap = GeolocationBootstrapper::new(AutoCenterFlag::new());

    bootstrap.handle_result(&mut engine, Ok(GeoPoint::new(42.36, -71.06)), &config);
    let ops = engine.ops().len();

    bootstrap.handle_result(&mut engine, Ok(GeoPoint::new(34.05, -118.24)), &config);
    assert_eq!(engine.ops().len(), ops);
}

#[test]
fn test_skip_preconsumes_attempt() {
    let config = MapConfig::default();
    let mut engine = RecordingEngine::new();
    let bootstrap = GeolocationBootstrapper::new(AutoCenterFlag::new());

    bootstrap.skip();
    assert!(!bootstrap.is_pending());

    bootstrap.handle_result(&mut engine, Ok(GeoPoint::new(42.36, -71.06)), &config);
    assert_eq!(engine.ops().len(), 0);
}

#[test]
fn test_out_of_range_fix_discarded() {
    let config = MapConfig::default();
    let mut engine = RecordingEngine::new();
    let bootstrap = GeolocationBootstrapper::new(AutoCenterFlag::new());

    bootstrap.handle_result(&mut engine, Ok(GeoPoint::new(120.0, 10.0)), &config);

    assert_eq!(engine.ops().len(), 0);
    assert!(!bootstrap.is_pending());
}

#[test]
fn test_flag_shared_between_clones() {
    let flag = AutoCenterFlag::new();
    let clone = flag.clone();

    assert!(flag.consume());
    assert!(!clone.consume());
    assert!(clone.is_consumed());
}

#[test]
fn test_latest_cell_returns_latest_value() {
    let cell: LatestCell<bool> = LatestCell::new();
    assert!(!cell.get());

    let reader = cell.clone();
    cell.set(true);
    assert!(reader.get());

    cell.set(false);
    assert!(!reader.get());
}
