//! Unified error handling for the map view engine.
//!
//! The reconciliation, camera and geolocation paths never fail: they
//! degrade to "show less" and log instead. Errors exist only at the
//! construction boundary and in the place-search client.

use thiserror::Error;

/// Result alias for fallible map-view operations.
pub type Result<T> = std::result::Result<T, TripMapError>;

/// Errors produced by the map view engine.
#[derive(Debug, Error)]
pub enum TripMapError {
    /// The underlying map engine could not be initialized, e.g. the host
    /// container is missing. Callers render nothing; no partial state is
    /// created.
    #[error("map engine failed to initialize: {reason}")]
    EngineInit { reason: String },

    /// The place search proxy rejected the request or the upstream
    /// geocoder failed.
    #[cfg(feature = "http")]
    #[error("place search failed with status {status}")]
    PlaceSearch { status: u16 },

    /// Transport-level HTTP failure while talking to the geocoder.
    #[cfg(feature = "http")]
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl TripMapError {
    /// Convenience constructor for engine initialization failures.
    pub fn engine_init(reason: impl Into<String>) -> Self {
        Self::EngineInit {
            reason: reason.into(),
        }
    }
}
