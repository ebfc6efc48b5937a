//! Location identity and trip deduplication.
//!
//! Multiple posts about the same landmark share a real-world position. To
//! avoid stacked pins, trips are grouped by a rounded-coordinate identity
//! and only the most recent post per location is rendered.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::{GeoPoint, Trip};

/// Coordinate scale for location identity: 6 decimal places (~11 cm).
const KEY_SCALE: f64 = 1e6;

/// Rounded-coordinate identity used to merge trips and entries that share
/// a real-world position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocationKey {
    lat_e6: i64,
    lng_e6: i64,
}

impl LocationKey {
    /// Derive the key for a point.
    pub fn of(point: GeoPoint) -> Self {
        Self::of_raw(point.latitude, point.longitude)
    }

    /// Derive the key for a raw coordinate pair.
    pub fn of_raw(latitude: f64, longitude: f64) -> Self {
        Self {
            lat_e6: (latitude * KEY_SCALE).round() as i64,
            lng_e6: (longitude * KEY_SCALE).round() as i64,
        }
    }

    /// Latitude of the key's grid cell, in degrees.
    pub fn latitude(&self) -> f64 {
        self.lat_e6 as f64 / KEY_SCALE
    }

    /// Longitude of the key's grid cell, in degrees.
    pub fn longitude(&self) -> f64 {
        self.lng_e6 as f64 / KEY_SCALE
    }
}

/// Parse a trip date string to a unix timestamp for ordering.
///
/// Accepts RFC 3339, bare ISO date/datetime, and the "Jun 1, 2025" display
/// form. Unparseable dates order as epoch, so a trip with a malformed date
/// loses the representative slot to any dated trip at the same location.
pub fn parse_trip_date(date: &str) -> i64 {
    let trimmed = date.trim();
    if trimmed.is_empty() {
        return 0;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return dt.timestamp();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return dt.and_utc().timestamp();
    }
    for format in ["%Y-%m-%d", "%b %d, %Y", "%B %d, %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            if let Some(dt) = date.and_hms_opt(0, 0, 0) {
                return dt.and_utc().timestamp();
            }
        }
    }

    0
}

/// Deduplicate trips sharing a location key.
///
/// Within each group of co-located trips, the one with the latest parseable
/// date is kept as the representative. Ties keep the earlier trip in input
/// order; representatives are returned in input order.
pub fn dedup_trips(trips: &[Trip]) -> Vec<&Trip> {
    let mut winner_index: HashMap<LocationKey, usize> = HashMap::new();

    for (index, trip) in trips.iter().enumerate() {
        let key = LocationKey::of_raw(trip.lat, trip.lng);
        match winner_index.get(&key) {
            Some(&current) => {
                if parse_trip_date(&trip.date) > parse_trip_date(&trips[current].date) {
                    winner_index.insert(key, index);
                }
            }
            None => {
                winner_index.insert(key, index);
            }
        }
    }

    let mut winners: Vec<usize> = winner_index.into_values().collect();
    winners.sort_unstable();
    winners.into_iter().map(|index| &trips[index]).collect()
}
