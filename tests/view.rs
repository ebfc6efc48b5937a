//! Integration tests for the mounted map view

use tripmap::adapter::{MapEngine, MarkerKey, RecordingEngine};
use tripmap::view::{AutoCenterFlag, GeolocateError, MapView, MemoryViewportStore, ViewportStore};
use tripmap::{
    Bounds, EngineOp, GeoPoint, MapConfig, SelectionEvent, Trip, TripActivity, TripLodging,
    TripMapError,
};

fn sample_trips() -> Vec<Trip> {
    vec![
        Trip::new(1, "Lisbon", 38.7223, -9.1393).with_date("2024-03-01"),
        Trip::new(2, "Porto", 41.1579, -8.6291).with_date("2024-04-01"),
    ]
}

fn trip_with_details() -> Trip {
    Trip::new(10, "Rome", 41.9028, 12.4964)
        .with_activities(vec![TripActivity::new(101, "Colosseum", 41.8902, 12.4922)])
        .with_lodgings(vec![TripLodging::new(201, "Hotel", 41.8986, 12.4768)])
}

fn mounted() -> MapView<RecordingEngine, MemoryViewportStore> {
    MapView::mount(
        || Ok(RecordingEngine::new()),
        MapConfig::default(),
        MemoryViewportStore::new(),
        AutoCenterFlag::new(),
    )
    .expect("headless engine always initializes")
}

#[test]
fn test_mount_frames_default_region() {
    let view = mounted();
    let config = MapConfig::default();

    match view.engine().ops().first() {
        Some(EngineOp::SetView { center, zoom }) => {
            assert_eq!(*center, config.default_center);
            assert_eq!(*zoom, config.default_zoom);
        }
        other => panic!("expected an initial set-view, got {other:?}"),
    }
    assert!(view.auto_center_pending());
}

#[test]
fn test_mount_restores_stored_viewport() {
    let store = MemoryViewportStore::with_raw(r#"{"lat": 41.15, "lng": -8.62, "zoom": 11.0}"#);
    let view = MapView::mount(
        || Ok(RecordingEngine::new()),
        MapConfig::default(),
        store,
        AutoCenterFlag::new(),
    )
    .expect("mount should succeed");

    match view.engine().ops().first() {
        Some(EngineOp::SetView { center, zoom }) => {
            assert!((center.latitude - 41.15).abs() < 1e-9);
            assert_eq!(*zoom, 11.0);
        }
        other => panic!("expected an initial set-view, got {other:?}"),
    }
    // Restoration pre-consumes the auto-center attempt.
    assert!(!view.auto_center_pending());
}

#[test]
fn test_mount_failure_creates_no_state() {
    let result = MapView::<RecordingEngine, _>::mount(
        || Err(TripMapError::engine_init("missing container")),
        MapConfig::default(),
        MemoryViewportStore::new(),
        AutoCenterFlag::new(),
    );

    assert!(matches!(result, Err(TripMapError::EngineInit { .. })));
}

#[test]
fn test_set_trips_filters_unmappable_coordinates() {
    let mut view = mounted();
    view.set_trips(vec![
        Trip::new(1, "Lisbon", 38.7223, -9.1393),
        Trip::new(2, "Broken", f64::NAN, -8.6291),
        Trip::new(3, "Off the grid", 120.0, 200.0),
    ]);

    assert_eq!(view.trips().len(), 1);
    assert_eq!(view.rendered_marker_count(), 1);
}

#[test]
fn test_trip_click_selects_and_reports() {
    let mut view = mounted();
    view.set_trips(sample_trips());

    let event = view.handle_marker_click(MarkerKey::Trip(2));

    assert_eq!(event, SelectionEvent::TripSelected(2));
    assert_eq!(view.selection().selected_trip, Some(2));
    // The sidebar focus animation fired.
    assert!(view
        .engine()
        .ops()
        .iter()
        .any(|op| matches!(op, EngineOp::FlyTo { .. })));
}

#[test]
fn test_activity_then_lodging_mutual_exclusivity() {
    let mut view = mounted();
    view.set_trips(vec![trip_with_details()]);
    view.enter_full_screen(10);

    view.handle_marker_click(MarkerKey::Activity(101));
    assert_eq!(view.selection().selected_activity, Some(101));

    view.handle_marker_click(MarkerKey::Lodging(201));
    let selection = view.selection();
    assert_eq!(selection.selected_activity, None);
    assert_eq!(selection.selected_lodging, Some(201));

    // Exactly one detail pin renders active, and it is the lodging's.
    let active_details: Vec<_> = view
        .engine()
        .live_specs()
        .into_iter()
        .filter(|spec| !matches!(spec.key, MarkerKey::Trip(_)) && spec.icon.is_active())
        .collect();
    assert_eq!(active_details.len(), 1);
    assert_eq!(active_details[0].key, MarkerKey::Lodging(201));
}

#[test]
fn test_full_screen_enter_and_exit_transitions() {
    let mut view = mounted();
    view.set_trips(vec![trip_with_details()]);

    view.select_trip(Some(10));
    view.enter_full_screen(10);
    let selection = view.selection();
    assert_eq!(selection.full_screen_trip, Some(10));
    assert_eq!(selection.selected_trip, None);

    view.exit_full_screen();
    let selection = view.selection();
    assert_eq!(selection.full_screen_trip, None);
    assert_eq!(selection.selected_trip, Some(10));
}

#[test]
fn test_resize_invalidates_exactly_once_per_event() {
    let mut view = mounted();
    view.set_trips(sample_trips());

    let before = view
        .engine()
        .ops()
        .iter()
        .filter(|op| matches!(op, EngineOp::InvalidateSize))
        .count();
    assert_eq!(before, 0);

    view.handle_resize();
    view.handle_resize();

    let after = view
        .engine()
        .ops()
        .iter()
        .filter(|op| matches!(op, EngineOp::InvalidateSize))
        .count();
    assert_eq!(after, 2);
}

#[test]
fn test_move_end_persists_viewport() {
    let mut view = mounted();
    assert!(view.viewport_store().load().is_none());

    // The user panned somewhere and the move settled.
    view.engine_mut().set_view(GeoPoint::new(41.15, -8.62), 11.0);
    view.handle_move_end();

    let stored = view
        .viewport_store()
        .load()
        .expect("viewport should persist");
    assert!((stored.lat - 41.15).abs() < 1e-9);
    assert!((stored.lng - (-8.62)).abs() < 1e-9);
    assert_eq!(stored.zoom, 11.0);
}

#[test]
fn test_geolocation_after_click_does_not_move_camera() {
    let mut view = mounted();
    view.set_trips(sample_trips());

    view.handle_marker_click(MarkerKey::Trip(1));
    let moves_before = view
        .engine()
        .ops()
        .iter()
        .filter(|op| matches!(op, EngineOp::FlyTo { .. } | EngineOp::FitBounds { .. }))
        .count();

    // The slow geolocation fix arrives after the user already picked a
    // trip: selection wins.
    view.handle_geolocate_result(Ok(GeoPoint::new(42.36, -71.06)));

    let moves_after = view
        .engine()
        .ops()
        .iter()
        .filter(|op| matches!(op, EngineOp::FlyTo { .. } | EngineOp::FitBounds { .. }))
        .count();
    assert_eq!(moves_after, moves_before);
    assert!(!view.auto_center_pending());
}

#[test]
fn test_geolocation_without_selection_centers_map() {
    let mut view = mounted();
    view.set_trips(sample_trips());

    view.handle_geolocate_result(Ok(GeoPoint::new(42.36, -71.06)));

    match view.engine().ops().last() {
        Some(EngineOp::FlyTo { center, zoom, .. }) => {
            assert!((center.latitude - 42.36).abs() < 1e-9);
            assert_eq!(*zoom, MapConfig::default().locate_zoom);
        }
        other => panic!("expected a fly-to, got {other:?}"),
    }
}

#[test]
fn test_geolocation_failure_keeps_default_viewport() {
    let mut view = mounted();
    let center_before = view.engine().center();

    view.handle_geolocate_result(Err(GeolocateError::Timeout));

    assert_eq!(view.engine().center(), center_before);
    assert!(!view.auto_center_pending());
}

#[test]
fn test_pins_in_viewport_query() {
    let mut view = mounted();
    view.set_trips(sample_trips());

    let portugal_north = Bounds {
        min_lat: 40.5,
        max_lat: 42.0,
        min_lng: -9.0,
        max_lng: -8.0,
    };
    let hits = view.pins_in_viewport(&portugal_north);
    assert_eq!(hits, vec![2]);

    let nearby = view.pins_near(38.72, -9.14, 0.1);
    assert_eq!(nearby, vec![1]);
}
