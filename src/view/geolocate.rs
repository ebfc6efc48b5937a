//! One-shot geolocation bootstrap.
//!
//! Shortly after first load the map recenters on the user's real-world
//! location, at most once per application session, and only if nothing
//! else has claimed the camera by the time the asynchronous fix arrives.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;

use crate::adapter::MapEngine;
use crate::{GeoPoint, MapConfig};

static GLOBAL_AUTO_CENTER: Lazy<AutoCenterFlag> = Lazy::new(AutoCenterFlag::new);

/// Process-wide "has auto-centered" flag.
///
/// Lifecycle: unset at application start; set exactly once per session by
/// a stored-viewport restoration, a geolocation result, or a geolocation
/// failure; never reset during the session. Production code shares
/// [`AutoCenterFlag::global`]; tests inject a fresh instance.
#[derive(Debug, Clone, Default)]
pub struct AutoCenterFlag(Arc<AtomicBool>);

impl AutoCenterFlag {
    /// Create a fresh, unconsumed flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// The application-wide instance.
    pub fn global() -> Self {
        GLOBAL_AUTO_CENTER.clone()
    }

    /// Whether the one auto-center attempt has already happened.
    pub fn is_consumed(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Mark the flag consumed. Returns true only for the call that
    /// actually consumed it.
    pub fn consume(&self) -> bool {
        self.0
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}

/// Latest-value cell: written synchronously on every state change, read
/// only inside already-scheduled asynchronous continuations. Single
/// writer, any readers; not a synchronization primitive.
#[derive(Debug, Default)]
pub struct LatestCell<T>(Arc<Mutex<T>>);

impl<T> Clone for LatestCell<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: Clone + Default> LatestCell<T> {
    /// Create a cell holding the default value.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the held value.
    pub fn set(&self, value: T) {
        match self.0.lock() {
            Ok(mut guard) => *guard = value,
            Err(poisoned) => *poisoned.into_inner() = value,
        }
    }

    /// Read the latest value.
    pub fn get(&self) -> T {
        match self.0.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

/// Why a geolocation attempt produced no coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeolocateError {
    PermissionDenied,
    Unavailable,
    Timeout,
}

/// Attempts, at most once per session, to recenter the map on the user's
/// location, deferring to any already-established selection.
#[derive(Debug)]
pub struct GeolocationBootstrapper {
    flag: AutoCenterFlag,
    selection_active: LatestCell<bool>,
}

impl GeolocationBootstrapper {
    /// Create a bootstrapper around the given flag instance.
    pub fn new(flag: AutoCenterFlag) -> Self {
        Self {
            flag,
            selection_active: LatestCell::new(),
        }
    }

    /// Cell the host writes on every selection change; read when the
    /// asynchronous fix arrives.
    pub fn selection_cell(&self) -> LatestCell<bool> {
        self.selection_active.clone()
    }

    /// Pre-consume the attempt, e.g. because a stored viewport was
    /// restored on mount.
    pub fn skip(&self) {
        self.flag.consume();
    }

    /// Whether the auto-center attempt is still outstanding.
    pub fn is_pending(&self) -> bool {
        !self.flag.is_consumed()
    }

    /// Apply an asynchronous geolocation result.
    ///
    /// Late results after the flag was consumed are ignored. A selection
    /// established by arrival time wins over the fix; failures are
    /// swallowed and leave the current viewport alone.
    pub fn handle_result<E: MapEngine>(
        &self,
        engine: &mut E,
        result: Result<GeoPoint, GeolocateError>,
        config: &MapConfig,
    ) {
        if !self.flag.consume() {
            return;
        }

        let point = match result {
            Ok(point) if point.is_valid() => point,
            Ok(_) => {
                log::warn!("ignoring out-of-range geolocation fix");
                return;
            }
            Err(e) => {
                log::debug!("geolocation unavailable: {e:?}");
                return;
            }
        };

        if self.selection_active.get() {
            return;
        }

        engine.fly_to(point, config.locate_zoom, config.fly_duration_secs);
    }
}
