//! Spatial indexing for viewport queries.
//!
//! Uses an R-tree over the deduplicated pin set to efficiently answer
//! "which pins are in this viewport" and "which pins are near this point".

use rstar::{RTree, RTreeObject, AABB};

use crate::location::dedup_trips;
use crate::{Bounds, Trip};

/// Pin entry wrapper for R-tree spatial indexing.
#[derive(Debug, Clone)]
pub struct PinEntry {
    pub trip_id: u64,
    pub latitude: f64,
    pub longitude: f64,
}

impl RTreeObject for PinEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.longitude, self.latitude])
    }
}

/// Spatial index over deduplicated trip pins.
///
/// Maintains an R-tree with dirty tracking so the tree is rebuilt at most
/// once per dataset change.
#[derive(Debug)]
pub struct PinIndex {
    tree: RTree<PinEntry>,
    dirty: bool,
}

impl Default for PinIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl PinIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self {
            tree: RTree::new(),
            dirty: false,
        }
    }

    /// Mark the index as needing rebuild.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Check if the index needs rebuild.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Rebuild the index from the trip dataset (deduplicated).
    pub fn rebuild(&mut self, trips: &[Trip]) {
        let pins: Vec<PinEntry> = dedup_trips(trips)
            .into_iter()
            .map(|trip| PinEntry {
                trip_id: trip.id,
                latitude: trip.lat,
                longitude: trip.lng,
            })
            .collect();

        self.tree = RTree::bulk_load(pins);
        self.dirty = false;
    }

    /// Ensure the index is up to date.
    pub fn ensure_built(&mut self, trips: &[Trip]) {
        if self.dirty {
            self.rebuild(trips);
        }
    }

    /// Clear the index.
    pub fn clear(&mut self) {
        self.tree = RTree::new();
        self.dirty = false;
    }

    /// Query pins within a viewport.
    pub fn query_viewport(&self, bounds: &Bounds) -> Vec<u64> {
        let search_bounds = AABB::from_corners(
            [bounds.min_lng, bounds.min_lat],
            [bounds.max_lng, bounds.max_lat],
        );

        self.tree
            .locate_in_envelope_intersecting(&search_bounds)
            .map(|pin| pin.trip_id)
            .collect()
    }

    /// Query pins within raw coordinate bounds.
    pub fn query_viewport_raw(
        &self,
        min_lat: f64,
        max_lat: f64,
        min_lng: f64,
        max_lng: f64,
    ) -> Vec<u64> {
        self.query_viewport(&Bounds {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        })
    }

    /// Find pins near a point.
    pub fn find_nearby(&self, lat: f64, lng: f64, radius_degrees: f64) -> Vec<u64> {
        self.query_viewport_raw(
            lat - radius_degrees,
            lat + radius_degrees,
            lng - radius_degrees,
            lng + radius_degrees,
        )
    }

    /// Get the number of indexed pins.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
