//! # Trip Map
//!
//! Headless map-view engine for travel journaling applications.
//!
//! This library provides:
//! - Trip pin deduplication by rounded-coordinate location identity
//! - Declarative marker-set computation with keyed reconciliation against
//!   an imperative map engine
//! - Selection-driven camera control (sidebar focus, full-screen fit,
//!   detail fly-to) with per-rule focus tracking
//! - One-shot geolocation bootstrap and session-scoped viewport persistence
//! - Spatial index for viewport queries over the deduplicated pin set
//!
//! ## Features
//!
//! - **`synthetic`** - Synthetic trip dataset generation for tests
//! - **`http`** - Place search client (Nominatim-backed proxy contract)
//!
//! ## Quick Start
//!
//! ```rust
//! use tripmap::adapter::RecordingEngine;
//! use tripmap::view::{AutoCenterFlag, MapView, MemoryViewportStore};
//! use tripmap::{MapConfig, Trip};
//!
//! let mut view = MapView::mount(
//!     || Ok(RecordingEngine::new()),
//!     MapConfig::default(),
//!     MemoryViewportStore::new(),
//!     AutoCenterFlag::new(),
//! )
//! .expect("headless engine always initializes");
//!
//! view.set_trips(vec![
//!     Trip::new(1, "Lisbon", 38.7223, -9.1393),
//!     Trip::new(2, "Porto", 41.1579, -8.6291),
//! ]);
//!
//! view.select_trip(Some(1));
//! assert_eq!(view.selection().selected_trip, Some(1));
//! ```

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{Result, TripMapError};

// Location identity and trip deduplication
pub mod location;
pub use location::{dedup_trips, parse_trip_date, LocationKey};

// Imperative map-engine boundary
pub mod adapter;
pub use adapter::{EngineOp, MapEngine, MarkerIcon, MarkerId, MarkerKey, MarkerSpec};

// The map-view unit: host, marker set, camera, geolocation, persistence
pub mod view;
pub use view::{MapView, Selection, SelectionEvent};

// Spatial index over deduplicated pins
pub mod spatial;
pub use spatial::{PinEntry, PinIndex};

// Place search client (proxy contract over Nominatim)
#[cfg(feature = "http")]
pub mod places;
#[cfg(feature = "http")]
pub use places::{PlaceOption, PlaceSearchClient, SearchMode};

// Synthetic trip dataset generation for tests and debugging
#[cfg(feature = "synthetic")]
pub mod synthetic;

/// Fallback image substituted for missing or broken pin thumbnails.
pub const PLACEHOLDER_IMAGE: &str =
    "https://images.unsplash.com/photo-1488085061387-422e29b40080?auto=format&fit=crop&w=1200&q=80";

// ============================================================================
// Core Types
// ============================================================================

/// A geographic coordinate with latitude and longitude.
///
/// # Example
/// ```
/// use tripmap::GeoPoint;
/// let point = GeoPoint::new(38.7223, -9.1393); // Lisbon
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a new geographic point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check if the point has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

/// Geographic bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Create bounds from a set of points.
    pub fn from_points(points: &[GeoPoint]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let mut min_lat = f64::MAX;
        let mut max_lat = f64::MIN;
        let mut min_lng = f64::MAX;
        let mut max_lng = f64::MIN;

        for p in points {
            min_lat = min_lat.min(p.latitude);
            max_lat = max_lat.max(p.latitude);
            min_lng = min_lng.min(p.longitude);
            max_lng = max_lng.max(p.longitude);
        }

        Some(Self {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        })
    }

    /// Bounds collapsed onto a single point.
    pub fn from_point(point: GeoPoint) -> Self {
        Self {
            min_lat: point.latitude,
            max_lat: point.latitude,
            min_lng: point.longitude,
            max_lng: point.longitude,
        }
    }

    /// Get the center point of the bounds.
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }

    /// Grow the bounds to include a point.
    pub fn extend(&mut self, point: GeoPoint) {
        self.min_lat = self.min_lat.min(point.latitude);
        self.max_lat = self.max_lat.max(point.latitude);
        self.min_lng = self.min_lng.min(point.longitude);
        self.max_lng = self.max_lng.max(point.longitude);
    }

    /// Return bounds extended on each side by the given ratio of the
    /// corresponding span. A ratio of 0.5 grows a 1x1 box to 2x2.
    pub fn pad(&self, ratio: f64) -> Self {
        let lat_pad = (self.max_lat - self.min_lat) * ratio;
        let lng_pad = (self.max_lng - self.min_lng) * ratio;
        Self {
            min_lat: self.min_lat - lat_pad,
            max_lat: self.max_lat + lat_pad,
            min_lng: self.min_lng - lng_pad,
            max_lng: self.max_lng + lng_pad,
        }
    }

    /// Check if a raw coordinate falls within the bounds (inclusive).
    pub fn contains_raw(&self, latitude: f64, longitude: f64) -> bool {
        latitude >= self.min_lat
            && latitude <= self.max_lat
            && longitude >= self.min_lng
            && longitude <= self.max_lng
    }
}

/// A user-authored travel post anchored to one geographic coordinate.
///
/// Activities and lodgings arrive embedded in the trip payload and are
/// exclusively owned by it for rendering purposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub author: String,
    /// Display date string; parsed leniently for dedup ordering.
    #[serde(default)]
    pub date: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub owner_user_id: u64,
    #[serde(default)]
    pub activities: Vec<TripActivity>,
    #[serde(default)]
    pub lodgings: Vec<TripLodging>,
}

impl Trip {
    /// Create a minimal trip for the given coordinate.
    pub fn new(id: u64, title: &str, lat: f64, lng: f64) -> Self {
        Self {
            id,
            title: title.to_string(),
            thumbnail: String::new(),
            author: String::new(),
            date: String::new(),
            lat,
            lng,
            description: String::new(),
            owner_user_id: 0,
            activities: Vec::new(),
            lodgings: Vec::new(),
        }
    }

    /// Set the trip date.
    pub fn with_date(mut self, date: &str) -> Self {
        self.date = date.to_string();
        self
    }

    /// Set the trip's activities.
    pub fn with_activities(mut self, activities: Vec<TripActivity>) -> Self {
        self.activities = activities;
        self
    }

    /// Set the trip's lodgings.
    pub fn with_lodgings(mut self, lodgings: Vec<TripLodging>) -> Self {
        self.lodgings = lodgings;
        self
    }

    /// The trip's anchor coordinate.
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }

    /// Check if the trip carries a mappable coordinate.
    pub fn has_valid_point(&self) -> bool {
        self.point().is_valid()
    }
}

/// A sub-entry of a trip anchored to its own coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripActivity {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    pub lat: f64,
    pub lng: f64,
}

impl TripActivity {
    /// Create a minimal activity for the given coordinate.
    pub fn new(id: u64, title: &str, lat: f64, lng: f64) -> Self {
        Self {
            id,
            title: title.to_string(),
            description: String::new(),
            image: String::new(),
            lat,
            lng,
        }
    }

    /// The activity's coordinate.
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}

/// A lodging entry of a trip. May lack a coordinate, in which case it is
/// never rendered as a map pin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripLodging {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

impl TripLodging {
    /// Create a minimal lodging with a coordinate.
    pub fn new(id: u64, title: &str, lat: f64, lng: f64) -> Self {
        Self {
            id,
            title: title.to_string(),
            description: String::new(),
            image: String::new(),
            address: String::new(),
            lat: Some(lat),
            lng: Some(lng),
        }
    }

    /// Create a lodging without a coordinate (address-only).
    pub fn without_point(id: u64, title: &str, address: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            description: String::new(),
            image: String::new(),
            address: address.to_string(),
            lat: None,
            lng: None,
        }
    }

    /// The lodging's coordinate, if it has a valid one.
    pub fn point(&self) -> Option<GeoPoint> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => {
                let point = GeoPoint::new(lat, lng);
                point.is_valid().then_some(point)
            }
            _ => None,
        }
    }
}

/// Configuration for map framing, zoom presets and animation durations.
#[derive(Debug, Clone)]
pub struct MapConfig {
    /// Initial center when no stored viewport exists.
    /// Default: (30, 10), a whole-world framing.
    pub default_center: GeoPoint,

    /// Initial zoom when no stored viewport exists. Default: 3.
    pub default_zoom: f64,

    /// Zoom applied when focusing a sidebar-selected trip. Default: 6.
    pub selected_trip_zoom: f64,

    /// Zoom applied when focusing an activity or lodging pin. Default: 13.
    pub detail_zoom: f64,

    /// Zoom applied after a successful geolocation fix. Default: 10.
    pub locate_zoom: f64,

    /// Bounds padding ratio for the full-screen fit. Default: 0.5.
    pub fit_padding_ratio: f64,

    /// Zoom cap for the full-screen fit, preventing over-zoom when all
    /// points are clustered. Default: 12.
    pub fit_max_zoom: f64,

    /// Fly-to duration for detail and geolocation moves, in seconds.
    /// Default: 1.0.
    pub fly_duration_secs: f64,

    /// Fly-to duration for sidebar trip focus, in seconds. Default: 1.2.
    pub select_fly_duration_secs: f64,

    /// Fit-bounds duration for full-screen entry, in seconds. Default: 1.5.
    pub fit_fly_duration_secs: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_center: GeoPoint::new(30.0, 10.0),
            default_zoom: 3.0,
            selected_trip_zoom: 6.0,
            detail_zoom: 13.0,
            locate_zoom: 10.0,
            fit_padding_ratio: 0.5,
            fit_max_zoom: 12.0,
            fly_duration_secs: 1.0,
            select_fly_duration_secs: 1.2,
            fit_fly_duration_secs: 1.5,
        }
    }
}
