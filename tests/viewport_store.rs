//! Tests for session-scoped viewport persistence

use tripmap::view::{MemoryViewportStore, StoredViewport, ViewportStore, VIEWPORT_STORAGE_KEY};

#[test]
fn test_empty_store_loads_nothing() {
    let store = MemoryViewportStore::new();
    assert!(store.load().is_none());
}

#[test]
fn test_save_then_load_roundtrip() {
    let mut store = MemoryViewportStore::new();
    let viewport = StoredViewport {
        lat: 38.7223,
        lng: -9.1393,
        zoom: 7.0,
    };

    store.save(&viewport);
    assert_eq!(store.load(), Some(viewport));
}

#[test]
fn test_save_overwrites_previous_value() {
    let mut store = MemoryViewportStore::new();
    store.save(&StoredViewport {
        lat: 38.7223,
        lng: -9.1393,
        zoom: 7.0,
    });
    store.save(&StoredViewport {
        lat: 41.1579,
        lng: -8.6291,
        zoom: 11.0,
    });

    let loaded = store.load().expect("viewport should load");
    assert_eq!(loaded.lat, 41.1579);
    assert_eq!(loaded.zoom, 11.0);
}

#[test]
fn test_malformed_payload_treated_as_absent() {
    let store = MemoryViewportStore::with_raw("not json at all");
    assert!(store.load().is_none());

    let store = MemoryViewportStore::with_raw(r#"{"lat": "nope"}"#);
    assert!(store.load().is_none());

    let store = MemoryViewportStore::with_raw(r#"{"lat": 1.0}"#);
    assert!(store.load().is_none());
}

#[test]
fn test_out_of_range_payload_treated_as_absent() {
    let store = MemoryViewportStore::with_raw(r#"{"lat": 120.0, "lng": 10.0, "zoom": 5.0}"#);
    assert!(store.load().is_none());

    let store = MemoryViewportStore::with_raw(r#"{"lat": 10.0, "lng": 10.0, "zoom": -3.0}"#);
    assert!(store.load().is_none());
}

#[test]
fn test_wire_format_is_plain_json_object() {
    let mut store = MemoryViewportStore::new();
    store.save(&StoredViewport {
        lat: 30.0,
        lng: 10.0,
        zoom: 3.0,
    });

    let raw = store.raw().expect("payload should exist");
    let value: serde_json::Value = serde_json::from_str(raw).expect("payload should be JSON");
    assert_eq!(value["lat"], 30.0);
    assert_eq!(value["lng"], 10.0);
    assert_eq!(value["zoom"], 3.0);
}

#[test]
fn test_storage_key_is_stable() {
    // The key is part of the session-storage contract with the UI shell.
    assert_eq!(VIEWPORT_STORAGE_KEY, "travel-map:viewport");
}
