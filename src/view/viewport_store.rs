//! Session-scoped viewport persistence.
//!
//! The last user-chosen center/zoom is written on every move end and read
//! back on mount, so a reload within the session restores the map where
//! the user left it. Malformed or missing values are treated as absent,
//! never as an error.

use serde::{Deserialize, Serialize};

use crate::GeoPoint;

/// Storage key the viewport is persisted under.
pub const VIEWPORT_STORAGE_KEY: &str = "travel-map:viewport";

/// The persisted viewport payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StoredViewport {
    pub lat: f64,
    pub lng: f64,
    pub zoom: f64,
}

impl StoredViewport {
    /// The stored center as a point.
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }

    /// Whether the payload holds a usable viewport.
    pub fn is_usable(&self) -> bool {
        self.center().is_valid() && self.zoom.is_finite() && self.zoom >= 0.0
    }
}

/// Session storage contract for the viewport.
pub trait ViewportStore {
    /// Load the stored viewport, if present and well-formed.
    fn load(&self) -> Option<StoredViewport>;

    /// Persist the viewport, overwriting any previous value.
    fn save(&mut self, viewport: &StoredViewport);
}

/// In-memory store holding the raw JSON payload, mirroring web session
/// storage. Keeping the raw form makes malformed-payload behavior
/// exercisable.
#[derive(Debug, Default)]
pub struct MemoryViewportStore {
    raw: Option<String>,
}

impl MemoryViewportStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with a raw payload, as if left by a previous page
    /// load.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
        }
    }

    /// The raw stored payload.
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }
}

impl ViewportStore for MemoryViewportStore {
    fn load(&self) -> Option<StoredViewport> {
        let raw = self.raw.as_deref()?;
        let viewport: StoredViewport = match serde_json::from_str(raw) {
            Ok(viewport) => viewport,
            Err(e) => {
                log::warn!("discarding malformed stored viewport: {e}");
                return None;
            }
        };
        if !viewport.is_usable() {
            log::warn!("discarding out-of-range stored viewport");
            return None;
        }
        Some(viewport)
    }

    fn save(&mut self, viewport: &StoredViewport) {
        match serde_json::to_string(viewport) {
            Ok(raw) => self.raw = Some(raw),
            Err(e) => log::warn!("failed to serialize viewport for storage: {e}"),
        }
    }
}
