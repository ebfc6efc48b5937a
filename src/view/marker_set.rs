//! Marker set computation and reconciliation.
//!
//! The desired marker set is a pure function of (trips, selection); the
//! manager diffs it against the previously rendered set and issues the
//! minimal remove/add calls. A changed visual state destroys and recreates
//! the marker; an unchanged one is left untouched, so repeated passes with
//! identical inputs cause no marker churn.

use std::collections::HashMap;

use crate::adapter::{MapEngine, MarkerIcon, MarkerId, MarkerKey, MarkerSpec};
use crate::location::{dedup_trips, LocationKey};
use crate::{Trip, TripActivity, TripLodging, PLACEHOLDER_IMAGE};

use super::Selection;

/// Reconciles the rendered marker set against the desired set.
#[derive(Debug, Default)]
pub struct MarkerSetManager {
    rendered: HashMap<MarkerKey, (MarkerId, MarkerSpec)>,
}

impl MarkerSetManager {
    /// Create a manager with nothing rendered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the marker set that should be visible for the current data
    /// and selection.
    pub fn desired_markers(trips: &[Trip], selection: &Selection) -> Vec<MarkerSpec> {
        let mut specs = trip_pin_specs(trips, selection);
        specs.extend(detail_pin_specs(trips, selection));
        specs
    }

    /// Apply a desired set: stale and changed markers are removed first,
    /// then new and changed ones are added.
    pub fn reconcile<E: MapEngine>(&mut self, engine: &mut E, desired: Vec<MarkerSpec>) {
        let desired_by_key: HashMap<MarkerKey, &MarkerSpec> =
            desired.iter().map(|spec| (spec.key, spec)).collect();

        let mut stale: Vec<MarkerKey> = Vec::new();
        for (key, (_, spec)) in &self.rendered {
            if desired_by_key.get(key).map_or(true, |d| *d != spec) {
                stale.push(*key);
            }
        }
        for key in stale {
            if let Some((id, _)) = self.rendered.remove(&key) {
                engine.remove_marker(id);
            }
        }

        for spec in desired {
            if self.rendered.contains_key(&spec.key) {
                continue;
            }
            let id = engine.add_marker(&spec);
            self.rendered.insert(spec.key, (id, spec));
        }
    }

    /// Remove every rendered marker (teardown).
    pub fn clear<E: MapEngine>(&mut self, engine: &mut E) {
        for (_, (id, _)) in self.rendered.drain() {
            engine.remove_marker(id);
        }
    }

    /// Number of markers currently rendered.
    pub fn rendered_len(&self) -> usize {
        self.rendered.len()
    }

    /// Whether a marker for the given entity is currently rendered.
    pub fn is_rendered(&self, key: MarkerKey) -> bool {
        self.rendered.contains_key(&key)
    }

    /// Keys of the currently rendered markers.
    pub fn rendered_keys(&self) -> impl Iterator<Item = MarkerKey> + '_ {
        self.rendered.keys().copied()
    }
}

fn trip_pin_specs(trips: &[Trip], selection: &Selection) -> Vec<MarkerSpec> {
    let representatives = dedup_trips(trips);

    if let Some(full_screen_id) = selection.full_screen_trip {
        // Full-screen mode suppresses every trip pin except the
        // representative at the focused trip's location.
        let Some(trip) = trips.iter().find(|trip| trip.id == full_screen_id) else {
            return Vec::new();
        };
        let focus_key = LocationKey::of_raw(trip.lat, trip.lng);
        return representatives
            .into_iter()
            .filter(|rep| LocationKey::of_raw(rep.lat, rep.lng) == focus_key)
            .map(|rep| trip_spec(rep, true))
            .collect();
    }

    let selected_key = selection
        .selected_trip
        .and_then(|id| trips.iter().find(|trip| trip.id == id))
        .map(|trip| LocationKey::of_raw(trip.lat, trip.lng));

    representatives
        .into_iter()
        .map(|rep| {
            let active = selected_key == Some(LocationKey::of_raw(rep.lat, rep.lng));
            trip_spec(rep, active)
        })
        .collect()
}

fn detail_pin_specs(trips: &[Trip], selection: &Selection) -> Vec<MarkerSpec> {
    let Some(focused) = selection
        .focused_trip()
        .and_then(|id| trips.iter().find(|trip| trip.id == id))
    else {
        return Vec::new();
    };

    let own_key = LocationKey::of_raw(focused.lat, focused.lng);
    let mut specs = Vec::new();

    for activity in &focused.activities {
        if !activity.point().is_valid() {
            continue;
        }
        // A detail entry stacked exactly on the trip pin would be redundant.
        if LocationKey::of(activity.point()) == own_key {
            continue;
        }
        let active = selection.selected_activity == Some(activity.id);
        specs.push(activity_spec(activity, active));
    }

    for lodging in &focused.lodgings {
        let Some(point) = lodging.point() else {
            continue;
        };
        if LocationKey::of(point) == own_key {
            continue;
        }
        let active = selection.selected_lodging == Some(lodging.id);
        specs.push(lodging_spec(lodging, active));
    }

    specs
}

fn trip_spec(trip: &Trip, active: bool) -> MarkerSpec {
    MarkerSpec {
        key: MarkerKey::Trip(trip.id),
        point: trip.point(),
        icon: MarkerIcon::TripPhoto {
            thumbnail: image_or_placeholder(&trip.thumbnail),
            title: trip.title.clone(),
            active,
        },
    }
}

fn activity_spec(activity: &TripActivity, active: bool) -> MarkerSpec {
    MarkerSpec {
        key: MarkerKey::Activity(activity.id),
        point: activity.point(),
        icon: MarkerIcon::ActivityPhoto {
            image: image_or_placeholder(&activity.image),
            active,
        },
    }
}

fn lodging_spec(lodging: &TripLodging, active: bool) -> MarkerSpec {
    // Callers only pass coordinate-bearing lodgings.
    let point = lodging.point().unwrap_or_default();
    MarkerSpec {
        key: MarkerKey::Lodging(lodging.id),
        point,
        icon: MarkerIcon::LodgingPhoto {
            image: image_or_placeholder(&lodging.image),
            active,
        },
    }
}

fn image_or_placeholder(url: &str) -> String {
    if url.trim().is_empty() {
        PLACEHOLDER_IMAGE.to_string()
    } else {
        url.to_string()
    }
}
