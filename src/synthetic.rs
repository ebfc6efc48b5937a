//! Synthetic trip dataset generator for tests and debugging.
//!
//! Generates trip sets with known co-located landmark clusters, providing
//! ground truth for validation of the dedup and reconciliation logic.
//!
//! Feature-gated behind `synthetic` — not included in production builds.
//!
//! # Example
//!
//! ```rust
//! use tripmap::synthetic::SyntheticScenario;
//! use tripmap::GeoPoint;
//!
//! let scenario = SyntheticScenario {
//!     origin: GeoPoint::new(40.0, -95.0),
//!     trip_count: 50,
//!     landmark_count: 5,
//!     shared_fraction: 0.6,
//!     activities_per_trip: 2,
//!     lodgings_per_trip: 1,
//!     seed: 42,
//! };
//!
//! let dataset = scenario.generate();
//! assert_eq!(dataset.trips.len(), 50);
//! assert!(dataset.distinct_locations <= 50);
//! ```

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::location::LocationKey;
use crate::{GeoPoint, Trip, TripActivity, TripLodging};

/// Configuration for a synthetic trip dataset.
#[derive(Debug, Clone)]
pub struct SyntheticScenario {
    /// Region center the dataset is scattered around.
    pub origin: GeoPoint,
    /// Number of trips to generate.
    pub trip_count: usize,
    /// Number of shared landmark positions.
    pub landmark_count: usize,
    /// Fraction of trips snapped exactly onto a landmark (0.0-1.0).
    pub shared_fraction: f64,
    /// Activities generated per trip, offset from the trip position.
    pub activities_per_trip: usize,
    /// Coordinate-bearing lodgings generated per trip.
    pub lodgings_per_trip: usize,
    /// RNG seed for reproducible datasets.
    pub seed: u64,
}

/// A generated dataset with ground truth.
#[derive(Debug, Clone)]
pub struct SyntheticDataset {
    /// The generated trips, in generation order.
    pub trips: Vec<Trip>,
    /// Ground truth: the number of distinct location keys in the dataset,
    /// i.e. the expected pin count after dedup.
    pub distinct_locations: usize,
}

impl SyntheticScenario {
    /// Generate the dataset.
    pub fn generate(&self) -> SyntheticDataset {
        let mut rng = StdRng::seed_from_u64(self.seed);

        // Landmarks are quantized to the location-key grid so snapped
        // trips collide exactly.
        let landmarks: Vec<GeoPoint> = (0..self.landmark_count)
            .map(|_| {
                quantize(GeoPoint::new(
                    self.origin.latitude + rng.random_range(-0.5..0.5),
                    self.origin.longitude + rng.random_range(-0.5..0.5),
                ))
            })
            .collect();

        let mut trips = Vec::with_capacity(self.trip_count);
        let mut keys: HashSet<LocationKey> = HashSet::new();

        for index in 0..self.trip_count {
            let snapped = !landmarks.is_empty() && rng.random_bool(self.shared_fraction);
            let point = if snapped {
                landmarks[rng.random_range(0..landmarks.len())]
            } else {
                // Unique positions live in a band disjoint from the
                // landmark scatter.
                GeoPoint::new(
                    self.origin.latitude + 1.0 + index as f64 * 0.001,
                    self.origin.longitude + 1.0,
                )
            };
            keys.insert(LocationKey::of(point));

            let date = format!(
                "{:04}-{:02}-{:02}",
                2020 + index % 6,
                1 + index % 12,
                1 + index % 28
            );

            let base_id = (index as u64 + 1) * 1000;
            let activities: Vec<TripActivity> = (0..self.activities_per_trip)
                .map(|j| {
                    TripActivity::new(
                        base_id + j as u64 + 1,
                        &format!("Activity {index}-{j}"),
                        point.latitude + 0.01 * (j as f64 + 1.0),
                        point.longitude + 0.01,
                    )
                })
                .collect();
            let lodgings: Vec<TripLodging> = (0..self.lodgings_per_trip)
                .map(|j| {
                    TripLodging::new(
                        base_id + 100 + j as u64 + 1,
                        &format!("Lodging {index}-{j}"),
                        point.latitude - 0.01 * (j as f64 + 1.0),
                        point.longitude - 0.01,
                    )
                })
                .collect();

            trips.push(
                Trip::new(
                    index as u64 + 1,
                    &format!("Trip {index}"),
                    point.latitude,
                    point.longitude,
                )
                .with_date(&date)
                .with_activities(activities)
                .with_lodgings(lodgings),
            );
        }

        SyntheticDataset {
            trips,
            distinct_locations: keys.len(),
        }
    }
}

/// Round a point onto the location-key grid.
fn quantize(point: GeoPoint) -> GeoPoint {
    let key = LocationKey::of(point);
    GeoPoint::new(key.latitude(), key.longitude())
}
