//! Selection-driven camera control.
//!
//! Each transition rule keeps its own last-focused key, so unrelated
//! reconciliation passes never restart an animation. Cancellation is the
//! engine's job: a new fly-to supersedes whatever is in flight.

use crate::adapter::MapEngine;
use crate::location::LocationKey;
use crate::{Bounds, GeoPoint, MapConfig, Trip};

use super::Selection;

/// Kind half of the detail focus key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailKind {
    Activity,
    Lodging,
}

/// Decides, for each selection transition, whether and where to animate
/// the viewport.
#[derive(Debug, Default)]
pub struct CameraController {
    last_full_screen: Option<u64>,
    last_sidebar_key: Option<LocationKey>,
    last_detail: Option<(DetailKind, u64)>,
}

impl CameraController {
    /// Create a controller with no focus history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate the transition rules against the current state.
    pub fn apply<E: MapEngine>(
        &mut self,
        engine: &mut E,
        trips: &[Trip],
        selection: &Selection,
        config: &MapConfig,
    ) {
        self.apply_full_screen(engine, trips, selection, config);
        self.apply_sidebar(engine, trips, selection, config);
        self.apply_detail(engine, trips, selection, config);
    }

    /// Entering full-screen fits the region covering the trip and all its
    /// detail coordinates. Exiting clears the sidebar key, so re-entering
    /// a sidebar selection afterwards re-triggers its focus animation
    /// instead of being skipped as a repeat of the same location key.
    fn apply_full_screen<E: MapEngine>(
        &mut self,
        engine: &mut E,
        trips: &[Trip],
        selection: &Selection,
        config: &MapConfig,
    ) {
        let Some(trip_id) = selection.full_screen_trip else {
            if self.last_full_screen.take().is_some() {
                self.last_sidebar_key = None;
            }
            return;
        };

        if self.last_full_screen == Some(trip_id) {
            return;
        }
        self.last_full_screen = Some(trip_id);

        let Some(trip) = find_trip(trips, trip_id) else {
            return;
        };
        let bounds = focus_bounds(trip).pad(config.fit_padding_ratio);
        engine.fit_bounds(&bounds, config.fit_max_zoom, config.fit_fly_duration_secs);
    }

    /// Sidebar selection centers on the trip at a fixed zoom, once per
    /// distinct location key. Deselecting everything leaves the user's
    /// viewport alone.
    fn apply_sidebar<E: MapEngine>(
        &mut self,
        engine: &mut E,
        trips: &[Trip],
        selection: &Selection,
        config: &MapConfig,
    ) {
        if selection.full_screen_trip.is_some() {
            return;
        }
        let Some(trip) = selection.selected_trip.and_then(|id| find_trip(trips, id)) else {
            return;
        };

        let key = LocationKey::of_raw(trip.lat, trip.lng);
        if self.last_sidebar_key == Some(key) {
            return;
        }
        self.last_sidebar_key = Some(key);

        engine.fly_to(
            trip.point(),
            config.selected_trip_zoom,
            config.select_fly_duration_secs,
        );
    }

    /// Detail selection centers on the entry's coordinate, keyed by
    /// (kind, id): switching between an activity and a lodging always
    /// re-triggers, re-selecting the same one does not.
    fn apply_detail<E: MapEngine>(
        &mut self,
        engine: &mut E,
        trips: &[Trip],
        selection: &Selection,
        config: &MapConfig,
    ) {
        let Some((kind, id, point)) = detail_target(trips, selection) else {
            return;
        };

        if self.last_detail == Some((kind, id)) {
            return;
        }
        self.last_detail = Some((kind, id));

        engine.fly_to(point, config.detail_zoom, config.fly_duration_secs);
    }
}

/// Bounding region covering the trip location plus all its activities and
/// coordinate-bearing lodgings.
pub fn focus_bounds(trip: &Trip) -> Bounds {
    let mut bounds = Bounds::from_point(trip.point());
    for activity in &trip.activities {
        if activity.point().is_valid() {
            bounds.extend(activity.point());
        }
    }
    for lodging in &trip.lodgings {
        if let Some(point) = lodging.point() {
            bounds.extend(point);
        }
    }
    bounds
}

fn find_trip(trips: &[Trip], id: u64) -> Option<&Trip> {
    trips.iter().find(|trip| trip.id == id)
}

fn detail_target(trips: &[Trip], selection: &Selection) -> Option<(DetailKind, u64, GeoPoint)> {
    let focused = selection.focused_trip().and_then(|id| find_trip(trips, id))?;

    if let Some(activity_id) = selection.selected_activity {
        let activity = focused
            .activities
            .iter()
            .find(|activity| activity.id == activity_id)?;
        return Some((DetailKind::Activity, activity.id, activity.point()));
    }

    if let Some(lodging_id) = selection.selected_lodging {
        let lodging = focused
            .lodgings
            .iter()
            .find(|lodging| lodging.id == lodging_id)?;
        return Some((DetailKind::Lodging, lodging.id, lodging.point()?));
    }

    None
}
