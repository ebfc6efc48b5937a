//! # Map View
//!
//! The map-view unit: owns the single map-engine instance for its mounted
//! lifetime and composes focused components:
//! - `MarkerSetManager` - desired-set computation and keyed reconciliation
//! - `CameraController` - selection-driven viewport transitions
//! - `GeolocationBootstrapper` - one-shot recentering on the user
//! - `ViewportStore` - session persistence of the last viewport
//!
//! Selection state flows in through the transition methods; marker clicks
//! flow back out as [`SelectionEvent`] values for the embedding screen.

pub mod camera;
pub mod geolocate;
pub mod marker_set;
pub mod viewport_store;

pub use camera::{focus_bounds, CameraController, DetailKind};
pub use geolocate::{AutoCenterFlag, GeolocateError, GeolocationBootstrapper, LatestCell};
pub use marker_set::MarkerSetManager;
pub use viewport_store::{
    MemoryViewportStore, StoredViewport, ViewportStore, VIEWPORT_STORAGE_KEY,
};

use crate::adapter::{MapEngine, MarkerKey};
use crate::error::Result;
use crate::spatial::PinIndex;
use crate::{Bounds, GeoPoint, MapConfig, Trip};

/// Ephemeral selection state for the map screen.
///
/// Full-screen mode supersedes sidebar selection, and activity/lodging
/// selection are mutually exclusive; the transition methods maintain both
/// invariants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub selected_trip: Option<u64>,
    pub full_screen_trip: Option<u64>,
    pub selected_activity: Option<u64>,
    pub selected_lodging: Option<u64>,
}

impl Selection {
    /// No selection at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// Select a trip for the sidebar, or clear everything with `None`.
    pub fn select_trip(&mut self, trip_id: Option<u64>) {
        self.selected_trip = trip_id;
        self.full_screen_trip = None;
        self.selected_activity = None;
        self.selected_lodging = None;
    }

    /// Enter full-screen mode for a trip.
    pub fn enter_full_screen(&mut self, trip_id: u64) {
        self.full_screen_trip = Some(trip_id);
        self.selected_trip = None;
        self.selected_activity = None;
        self.selected_lodging = None;
    }

    /// Leave full-screen mode, returning to the sidebar view of the same
    /// trip.
    pub fn exit_full_screen(&mut self) {
        self.selected_trip = self.full_screen_trip.take();
        self.selected_activity = None;
        self.selected_lodging = None;
    }

    /// Select an activity, clearing any lodging selection.
    pub fn select_activity(&mut self, activity_id: Option<u64>) {
        self.selected_activity = activity_id;
        if activity_id.is_some() {
            self.selected_lodging = None;
        }
    }

    /// Select a lodging, clearing any activity selection.
    pub fn select_lodging(&mut self, lodging_id: Option<u64>) {
        self.selected_lodging = lodging_id;
        if lodging_id.is_some() {
            self.selected_activity = None;
        }
    }

    /// Clear every selection dimension.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// The trip whose details are in focus, regardless of mode.
    pub fn focused_trip(&self) -> Option<u64> {
        self.full_screen_trip.or(self.selected_trip)
    }

    /// Whether anything at all is selected.
    pub fn is_active(&self) -> bool {
        self.selected_trip.is_some()
            || self.full_screen_trip.is_some()
            || self.selected_activity.is_some()
            || self.selected_lodging.is_some()
    }
}

/// Outward selection-change value produced by a marker click, consumed by
/// the embedding screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    TripSelected(u64),
    ActivitySelected(u64),
    LodgingSelected(u64),
}

/// The mounted map view.
///
/// Owns exactly one engine instance from mount to drop and never
/// re-initializes it on state changes.
pub struct MapView<E: MapEngine, S: ViewportStore> {
    engine: E,
    store: S,
    config: MapConfig,
    trips: Vec<Trip>,
    selection: Selection,
    markers: MarkerSetManager,
    camera: CameraController,
    bootstrap: GeolocationBootstrapper,
    spatial: PinIndex,
}

impl<E: MapEngine, S: ViewportStore> MapView<E, S> {
    /// Mount the view: create the engine, restore the stored viewport or
    /// frame the default region, and arm the geolocation bootstrap.
    ///
    /// A failing engine factory yields `Err` and no partial state. When a
    /// stored viewport is restored, the auto-center attempt is pre-consumed
    /// so geolocation never yanks the camera away from it.
    pub fn mount<F>(
        create_engine: F,
        config: MapConfig,
        store: S,
        auto_center: AutoCenterFlag,
    ) -> Result<Self>
    where
        F: FnOnce() -> Result<E>,
    {
        let mut engine = create_engine()?;
        let bootstrap = GeolocationBootstrapper::new(auto_center);

        match store.load() {
            Some(viewport) => {
                engine.set_view(viewport.center(), viewport.zoom);
                bootstrap.skip();
            }
            None => {
                engine.set_view(config.default_center, config.default_zoom);
            }
        }

        Ok(Self {
            engine,
            store,
            config,
            trips: Vec::new(),
            selection: Selection::none(),
            markers: MarkerSetManager::new(),
            camera: CameraController::new(),
            bootstrap,
            spatial: PinIndex::new(),
        })
    }

    // ========================================================================
    // Data
    // ========================================================================

    /// Replace the trip dataset. Trips without a valid coordinate are
    /// excluded from mapping entirely.
    pub fn set_trips(&mut self, trips: Vec<Trip>) {
        let before = trips.len();
        self.trips = trips
            .into_iter()
            .filter(Trip::has_valid_point)
            .collect();
        let dropped = before - self.trips.len();
        if dropped > 0 {
            log::debug!("excluded {dropped} trips without a mappable coordinate");
        }
        self.spatial.mark_dirty();
        self.refresh();
    }

    /// The currently mapped trips.
    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    // ========================================================================
    // Selection transitions
    // ========================================================================

    /// Select a trip for the sidebar, or clear everything with `None`.
    pub fn select_trip(&mut self, trip_id: Option<u64>) {
        self.selection.select_trip(trip_id);
        self.refresh();
    }

    /// Enter full-screen mode for a trip.
    pub fn enter_full_screen(&mut self, trip_id: u64) {
        self.selection.enter_full_screen(trip_id);
        self.refresh();
    }

    /// Leave full-screen mode back to the sidebar view.
    pub fn exit_full_screen(&mut self) {
        self.selection.exit_full_screen();
        self.refresh();
    }

    /// Select an activity (clears any lodging selection).
    pub fn select_activity(&mut self, activity_id: Option<u64>) {
        self.selection.select_activity(activity_id);
        self.refresh();
    }

    /// Select a lodging (clears any activity selection).
    pub fn select_lodging(&mut self, lodging_id: Option<u64>) {
        self.selection.select_lodging(lodging_id);
        self.refresh();
    }

    /// Clear every selection dimension. The camera stays where the user
    /// left it.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.refresh();
    }

    /// Current selection state.
    pub fn selection(&self) -> Selection {
        self.selection
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Apply a marker click: updates the selection and returns the value
    /// for the embedding screen's selection callback.
    pub fn handle_marker_click(&mut self, key: MarkerKey) -> SelectionEvent {
        match key {
            MarkerKey::Trip(id) => {
                self.select_trip(Some(id));
                SelectionEvent::TripSelected(id)
            }
            MarkerKey::Activity(id) => {
                self.select_activity(Some(id));
                SelectionEvent::ActivitySelected(id)
            }
            MarkerKey::Lodging(id) => {
                self.select_lodging(Some(id));
                SelectionEvent::LodgingSelected(id)
            }
        }
    }

    /// Persist the viewport after a user-driven move or zoom ended.
    pub fn handle_move_end(&mut self) {
        let center = self.engine.center();
        self.store.save(&StoredViewport {
            lat: center.latitude,
            lng: center.longitude,
            zoom: self.engine.zoom(),
        });
    }

    /// Recompute the engine layout after the host container resized, e.g.
    /// because a side panel opened or closed.
    pub fn handle_resize(&mut self) {
        self.engine.invalidate_size();
    }

    /// Apply an asynchronous geolocation result.
    pub fn handle_geolocate_result(
        &mut self,
        result: std::result::Result<GeoPoint, GeolocateError>,
    ) {
        self.bootstrap
            .handle_result(&mut self.engine, result, &self.config);
    }

    /// Whether the one-shot auto-center attempt is still outstanding.
    pub fn auto_center_pending(&self) -> bool {
        self.bootstrap.is_pending()
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Ids of deduplicated pins inside the given bounds.
    pub fn pins_in_viewport(&mut self, bounds: &Bounds) -> Vec<u64> {
        self.spatial.ensure_built(&self.trips);
        self.spatial.query_viewport(bounds)
    }

    /// Ids of deduplicated pins within a radius (in degrees) of a point.
    pub fn pins_near(&mut self, latitude: f64, longitude: f64, radius_degrees: f64) -> Vec<u64> {
        self.spatial.ensure_built(&self.trips);
        self.spatial.find_nearby(latitude, longitude, radius_degrees)
    }

    /// Number of markers currently rendered.
    pub fn rendered_marker_count(&self) -> usize {
        self.markers.rendered_len()
    }

    /// Borrow the engine handle.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Mutably borrow the engine handle.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Current configuration.
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Borrow the viewport store.
    pub fn viewport_store(&self) -> &S {
        &self.store
    }

    // ========================================================================
    // Reconciliation
    // ========================================================================

    fn refresh(&mut self) {
        // Mirror the selection into the cell read by the delayed
        // geolocation continuation.
        self.bootstrap.selection_cell().set(self.selection.is_active());

        let desired = MarkerSetManager::desired_markers(&self.trips, &self.selection);
        self.markers.reconcile(&mut self.engine, desired);
        self.camera
            .apply(&mut self.engine, &self.trips, &self.selection, &self.config);
    }
}
